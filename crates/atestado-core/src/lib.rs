//! Core library for medical certificate field extraction.
//!
//! This crate provides:
//! - Recognizers that locate candidate spans (built-in patterns, external models)
//! - Per-field normalizers (dates, CID codes, document types, patient names)
//! - A fusion engine merging every recognizer's output into one result
//! - Batch processing with per-document failure isolation

pub mod error;
pub mod fusion;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod recognizer;

pub use error::{AtestadoError, ConfigError, RecognitionError, Result};
pub use fusion::FusionEngine;
pub use models::{AtestadoConfig, DocumentRecord, FieldResult, FieldValues, Label, LabeledSpan, RawSpan};
pub use normalize::{FieldNormalizer, NormalizerTable};
pub use pipeline::{load_documents, BatchReport, DocumentFailure, Pipeline};
pub use recognizer::{Recognizer, RecognizerAdapter, RecognizerRegistry};
