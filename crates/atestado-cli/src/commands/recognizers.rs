//! Recognizers command - list the recognizers a configuration registers.

use console::style;

use atestado_core::RecognizerRegistry;

pub async fn run(config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let registry = RecognizerRegistry::from_config(&config.recognizers)?;

    println!("{}", style("Recognizers (dispatch order):").bold());
    println!();

    for (index, adapter) in registry.adapters().iter().enumerate() {
        let labels: Vec<&str> = adapter.labels().iter().map(|l| l.as_str()).collect();
        println!(
            "  {}. {} {}",
            index + 1,
            style(adapter.name()).cyan(),
            style(format!("[{}]", labels.join(", "))).dim()
        );
    }

    Ok(())
}
