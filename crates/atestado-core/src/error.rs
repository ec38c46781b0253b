//! Error types for the atestado-core library.

use thiserror::Error;

/// Main error type for the atestado library.
#[derive(Error, Debug)]
pub enum AtestadoError {
    /// A recognizer could not process a document.
    #[error("recognition error: {0}")]
    Recognition(#[from] RecognitionError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Input documents could not be loaded.
    #[error("input error: {0}")]
    Input(String),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by a recognizer while processing a document.
///
/// These abort the current document only; the batch driver records them
/// and moves on to the next document.
#[derive(Error, Debug)]
pub enum RecognitionError {
    /// The recognizer backend is not available (missing program, not loaded).
    #[error("recognizer {recognizer} unavailable: {reason}")]
    Unavailable { recognizer: String, reason: String },

    /// The document could not be handed to the recognizer.
    #[error("recognizer {recognizer} rejected input: {reason}")]
    InvalidInput { recognizer: String, reason: String },

    /// The recognizer produced output that does not follow the span contract.
    #[error("recognizer {recognizer} returned malformed output: {reason}")]
    MalformedOutput { recognizer: String, reason: String },
}

impl RecognitionError {
    /// Name of the recognizer that failed.
    pub fn recognizer(&self) -> &str {
        match self {
            Self::Unavailable { recognizer, .. }
            | Self::InvalidInput { recognizer, .. }
            | Self::MalformedOutput { recognizer, .. } => recognizer,
        }
    }
}

/// Errors related to configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A label name in the configuration is not part of the closed label set.
    #[error("unknown label: {0}")]
    UnknownLabel(String),

    /// A recognizer entry is incomplete or contradictory.
    #[error("invalid recognizer {name}: {reason}")]
    InvalidRecognizer { name: String, reason: String },

    /// No recognizer was configured.
    #[error("no recognizers configured")]
    NoRecognizers,
}

/// Result type for the atestado library.
pub type Result<T> = std::result::Result<T, AtestadoError>;
