//! Recognizer backed by an external program.
//!
//! Trained models live outside this crate. Any program that reads a
//! document on stdin and prints a JSON array of `{start, end, label, text}`
//! spans on stdout can be registered as a recognizer.

use std::io::{ErrorKind, Write};
use std::process::{Command, Stdio};

use tracing::debug;

use super::Recognizer;
use crate::error::RecognitionError;
use crate::models::config::CommandRecognizerConfig;
use crate::models::{Label, RawSpan};

/// Recognizer that runs a subprocess per document.
pub struct CommandRecognizer {
    name: String,
    program: String,
    args: Vec<String>,
    labels: Vec<Label>,
}

impl CommandRecognizer {
    pub fn new(name: impl Into<String>, program: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            program: program.into(),
            args: Vec::new(),
            labels: Vec::new(),
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn with_labels(mut self, labels: Vec<Label>) -> Self {
        self.labels = labels;
        self
    }

    pub fn from_config(config: &CommandRecognizerConfig) -> Self {
        Self::new(&config.name, &config.program)
            .with_args(config.args.clone())
            .with_labels(config.labels.clone())
    }

    fn unavailable(&self, reason: impl Into<String>) -> RecognitionError {
        RecognitionError::Unavailable {
            recognizer: self.name.clone(),
            reason: reason.into(),
        }
    }

    fn malformed(&self, reason: impl Into<String>) -> RecognitionError {
        RecognitionError::MalformedOutput {
            recognizer: self.name.clone(),
            reason: reason.into(),
        }
    }
}

impl Recognizer for CommandRecognizer {
    fn name(&self) -> &str {
        &self.name
    }

    fn labels(&self) -> &[Label] {
        &self.labels
    }

    fn recognize(&self, text: &str) -> Result<Vec<RawSpan>, RecognitionError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.unavailable(format!("failed to start {}: {}", self.program, e)))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| self.unavailable("stdin not captured"))?;

        // Feed stdin from a separate thread so a chatty child cannot deadlock us
        let output = std::thread::scope(|scope| {
            let writer = scope.spawn(move || stdin.write_all(text.as_bytes()));
            let output = child.wait_with_output();
            let written = writer.join();
            (output, written)
        });

        let output = match output {
            (Ok(output), Ok(Ok(()))) => output,
            (Ok(output), _) if !output.status.success() => output,
            // A child may answer without reading the whole document
            (Ok(output), Ok(Err(e))) if e.kind() == ErrorKind::BrokenPipe => output,
            (Ok(_), Ok(Err(e))) => {
                return Err(RecognitionError::InvalidInput {
                    recognizer: self.name.clone(),
                    reason: format!("failed to write document: {}", e),
                });
            }
            (Ok(_), Err(_)) => return Err(self.unavailable("stdin writer panicked")),
            (Err(e), _) => return Err(self.unavailable(format!("failed to wait: {}", e))),
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(self.unavailable(format!(
                "exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let spans: Vec<RawSpan> = serde_json::from_slice(&output.stdout)
            .map_err(|e| self.malformed(e.to_string()))?;

        debug!(
            recognizer = %self.name,
            spans = spans.len(),
            "External recognizer finished"
        );

        Ok(spans)
    }
}
