//! Process command - extract fields from a single document.

use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use atestado_core::{FieldResult, Pipeline};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input text file (default: stdin)
    #[arg(conflicts_with = "text")]
    input: Option<PathBuf>,

    /// Document text given inline
    #[arg(short, long)]
    text: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output, one row per value
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path)?;

    let text = match (&args.text, &args.input) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => {
            if !path.exists() {
                anyhow::bail!("Input file not found: {}", path.display());
            }
            info!("Processing file: {}", path.display());
            fs::read_to_string(path)?
        }
        (None, None) => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let pipeline = Pipeline::from_config(&config)?;
    let result = pipeline.process(&text)?;

    let output = format_result(&result, args.format, args.pretty || config.batch.pretty)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

pub fn format_result(result: &FieldResult, format: OutputFormat, pretty: bool) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json if pretty => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Json => Ok(serde_json::to_string(result)?),
        OutputFormat::Csv => format_csv(result),
        OutputFormat::Text => Ok(format_text(result)),
    }
}

fn format_csv(result: &FieldResult) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["label", "value"])?;
    for (label, values) in result.iter() {
        for value in values {
            wtr.write_record([label.as_str(), value.as_str()])?;
        }
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(result: &FieldResult) -> String {
    let mut output = String::new();

    for (label, values) in result.iter() {
        if values.is_empty() {
            output.push_str(&format!("{}: -\n", label));
        } else {
            output.push_str(&format!("{}: {}\n", label, values.join("; ")));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use atestado_core::Label;

    fn sample() -> FieldResult {
        let mut result = FieldResult::new();
        result.insert(Label::Cid, "M54.5");
        result.insert(Label::Data, "12/08/2024");
        result.insert(Label::Data, "13/08/2024");
        result
    }

    #[test]
    fn test_csv_has_one_row_per_value() {
        let csv = format_result(&sample(), OutputFormat::Csv, false).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines, vec!["label,value", "CID,M54.5", "DATA,12/08/2024", "DATA,13/08/2024"]);
    }

    #[test]
    fn test_text_lists_every_label() {
        let text = format_result(&sample(), OutputFormat::Text, false).unwrap();
        assert!(text.contains("DATA: 12/08/2024; 13/08/2024"));
        assert!(text.contains("CRM: -"));
        assert_eq!(text.lines().count(), Label::ALL.len());
    }
}
