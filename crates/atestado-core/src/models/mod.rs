//! Data models for certificate field extraction.

pub mod config;
pub mod label;
pub mod record;

pub use config::AtestadoConfig;
pub use label::Label;
pub use record::{DocumentRecord, FieldResult, FieldValues, LabeledSpan, RawSpan};
