//! Fusion of recognizer output into one result per document.

mod engine;

pub use engine::{dedup_names, FusionEngine};
