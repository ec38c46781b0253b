//! Document and batch entry points.

use std::path::Path;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{AtestadoError, Result};
use crate::fusion::FusionEngine;
use crate::models::config::FailurePolicy;
use crate::models::{AtestadoConfig, DocumentRecord, FieldResult};
use crate::recognizer::RecognizerRegistry;

/// Recognizers and fusion engine, built once and reused for every document.
pub struct Pipeline {
    registry: RecognizerRegistry,
    engine: FusionEngine,
    on_failure: FailurePolicy,
}

impl Pipeline {
    pub fn new(registry: RecognizerRegistry, engine: FusionEngine) -> Self {
        Self {
            registry,
            engine,
            on_failure: FailurePolicy::default(),
        }
    }

    /// Build the pipeline described by a configuration.
    pub fn from_config(config: &AtestadoConfig) -> Result<Self> {
        let registry = RecognizerRegistry::from_config(&config.recognizers)?;
        let engine = FusionEngine::new(&config.normalization);

        info!(recognizers = registry.len(), "Pipeline ready");

        Ok(Self::new(registry, engine).with_failure_policy(config.batch.on_failure))
    }

    /// Set how failed documents appear in batch output.
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.on_failure = policy;
        self
    }

    pub fn registry(&self) -> &RecognizerRegistry {
        &self.registry
    }

    /// Extract the fields of a single document.
    pub fn process(&self, text: &str) -> Result<FieldResult> {
        Ok(self.engine.fuse(&self.registry, text)?)
    }

    /// Process documents sequentially, in input order.
    pub fn process_batch(&self, texts: &[String]) -> BatchReport {
        self.process_batch_with(texts, |_, _| {})
    }

    /// Process documents, calling `progress` with each id and its outcome.
    ///
    /// A failing document never stops the batch.
    pub fn process_batch_with<F>(&self, texts: &[String], mut progress: F) -> BatchReport
    where
        F: FnMut(usize, bool),
    {
        let start = Instant::now();
        let mut report = BatchReport::default();

        for (index, text) in texts.iter().enumerate() {
            let id = index + 1;
            match self.engine.fuse(&self.registry, text) {
                Ok(entidades) => {
                    report.records.push(DocumentRecord {
                        id,
                        texto: text.clone(),
                        entidades,
                        erro: None,
                    });
                    progress(id, true);
                }
                Err(e) => {
                    warn!(id, recognizer = %e.recognizer(), "Document failed: {}", e);

                    if self.on_failure == FailurePolicy::Flag {
                        report.records.push(DocumentRecord {
                            id,
                            texto: text.clone(),
                            entidades: FieldResult::new(),
                            erro: Some(e.to_string()),
                        });
                    }
                    report.failures.push(DocumentFailure {
                        id,
                        recognizer: e.recognizer().to_string(),
                        error: e.to_string(),
                    });
                    progress(id, false);
                }
            }
        }

        info!(
            documents = texts.len(),
            failed = report.failures.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Batch finished"
        );

        report
    }
}

/// Result of a batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Output records, in input order.
    pub records: Vec<DocumentRecord>,
    /// Documents whose recognition failed.
    pub failures: Vec<DocumentFailure>,
}

impl BatchReport {
    /// Serialize the records array.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(&self.records)?
        } else {
            serde_json::to_string(&self.records)?
        };
        Ok(json)
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// A document that could not be processed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentFailure {
    pub id: usize,
    pub recognizer: String,
    pub error: String,
}

/// Input document, either bare text or an object with a `texto` field.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DocumentInput {
    Text(String),
    Record { texto: String },
}

impl From<DocumentInput> for String {
    fn from(input: DocumentInput) -> Self {
        match input {
            DocumentInput::Text(text) | DocumentInput::Record { texto: text } => text,
        }
    }
}

/// Load documents from a file.
///
/// `.json` holds an array, `.jsonl` one document per line; any other
/// extension is read as a single plain-text document.
pub fn load_documents(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match extension.as_deref() {
        Some("json") => parse_json_documents(&content),
        Some("jsonl") => parse_jsonl_documents(&content),
        _ => Ok(vec![content]),
    }
}

/// Parse a JSON array of strings or `{"texto": ...}` objects.
pub fn parse_json_documents(content: &str) -> Result<Vec<String>> {
    let inputs: Vec<DocumentInput> = serde_json::from_str(content)?;
    Ok(inputs.into_iter().map(String::from).collect())
}

/// Parse one JSON document per non-blank line.
pub fn parse_jsonl_documents(content: &str) -> Result<Vec<String>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(number, line)| {
            serde_json::from_str::<DocumentInput>(line)
                .map(String::from)
                .map_err(|e| AtestadoError::Input(format!("line {}: {}", number + 1, e)))
        })
        .collect()
}
