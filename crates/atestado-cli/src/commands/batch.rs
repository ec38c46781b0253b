//! Batch processing command for multiple documents.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use atestado_core::models::config::FailurePolicy;
use atestado_core::{load_documents, BatchReport, Label, Pipeline};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern (.txt, .json, .jsonl)
    #[arg(required = true)]
    input: String,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Keep failed documents in the output with an error message
    #[arg(long)]
    flag_failures: bool,

    /// Exit with an error if any document failed
    #[arg(long)]
    strict: bool,

    /// Also write a per-document summary CSV
    #[arg(long)]
    summary: Option<PathBuf>,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path)?;

    let files = expand_inputs(&args.input)?;
    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    let mut documents = Vec::new();
    for path in &files {
        let loaded = load_documents(path)?;
        debug!("Loaded {} documents from {}", loaded.len(), path.display());
        documents.extend(loaded);
    }

    eprintln!(
        "{} Found {} documents in {} files",
        style("ℹ").blue(),
        documents.len(),
        files.len()
    );

    let policy = if args.flag_failures {
        FailurePolicy::Flag
    } else {
        config.batch.on_failure
    };
    let pipeline = Pipeline::from_config(&config)?.with_failure_policy(policy);

    let pb = ProgressBar::new(documents.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} documents")?
            .progress_chars("=>-"),
    );

    let report = pipeline.process_batch_with(&documents, |id, ok| {
        if !ok {
            pb.println(format!("{} Document {} failed", style("✗").red(), id));
        }
        pb.inc(1);
    });

    pb.finish_and_clear();

    let json = report.to_json(args.pretty || config.batch.pretty)?;
    if let Some(output_path) = &args.output {
        fs::write(output_path, &json)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", json);
    }

    if let Some(summary_path) = &args.summary {
        write_summary(summary_path, &documents, &report)?;
        eprintln!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    eprintln!(
        "{} Processed {} documents in {:?}",
        style("✓").green(),
        documents.len(),
        start.elapsed()
    );
    eprintln!(
        "   {} successful, {} failed",
        style(documents.len() - report.failures.len()).green(),
        style(report.failures.len()).red()
    );

    if report.has_failures() {
        eprintln!();
        eprintln!("{}", style("Failed documents:").red());
        for failure in &report.failures {
            eprintln!("  - {}: {}", failure.id, failure.error);
        }

        if args.strict {
            anyhow::bail!("{} documents failed", report.failures.len());
        }
    }

    Ok(())
}

/// Expand a glob pattern into supported input files, sorted by path.
fn expand_inputs(pattern: &str) -> anyhow::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = glob(pattern)?
        .filter_map(|r| match r {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("Skipping unreadable path: {}", e);
                None
            }
        })
        .filter(|p| p.is_file() && is_supported(p))
        .collect();

    files.sort();
    Ok(files)
}

fn is_supported(path: &Path) -> bool {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    matches!(ext.to_lowercase().as_str(), "txt" | "json" | "jsonl")
}

fn write_summary(path: &Path, documents: &[String], report: &BatchReport) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    let mut header = vec!["id".to_string(), "status".to_string()];
    header.extend(Label::ALL.iter().map(|label| label.to_string()));
    header.push("error".to_string());
    wtr.write_record(&header)?;

    for id in 1..=documents.len() {
        let mut row = vec![id.to_string()];

        if let Some(failure) = report.failures.iter().find(|f| f.id == id) {
            row.push("error".to_string());
            row.extend(Label::ALL.iter().map(|_| String::new()));
            row.push(failure.error.clone());
        } else if let Some(record) = report.records.iter().find(|r| r.id == id) {
            row.push("success".to_string());
            row.extend(
                Label::ALL
                    .iter()
                    .map(|label| record.entidades.get(*label).join("; ")),
            );
            row.push(String::new());
        } else {
            continue;
        }

        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}
