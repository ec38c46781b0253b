//! Per-field validation and canonicalization of recognizer output.

pub mod cid;
pub mod dates;
pub mod doc_type;
pub mod durations;
pub mod names;
pub mod patterns;

pub use cid::{clean_cid, CidNormalizer};
pub use dates::{clean_date, parse_date, DateNormalizer};
pub use doc_type::{is_document_type, DocTypeNormalizer};
pub use durations::{is_clock_time, DurationNormalizer, PassThrough, TimeOfDayNormalizer};
pub use names::{is_valid_patient_name, NameRejection, PatientNameNormalizer};

use std::collections::BTreeMap;

use crate::models::Label;
use crate::models::config::NormalizationConfig;

/// Trait for field normalizers.
///
/// A rejected candidate yields `None`; rejection is a filtering outcome,
/// never an error.
pub trait FieldNormalizer: Send + Sync {
    /// The label this normalizer is registered for.
    fn label(&self) -> Label;

    /// Validate a candidate and return its canonical value.
    fn normalize(&self, candidate: &str) -> Option<String>;
}

/// Lookup table from label to its normalizer.
pub struct NormalizerTable {
    normalizers: BTreeMap<Label, Box<dyn FieldNormalizer>>,
}

impl NormalizerTable {
    /// Build the table for every label of the closed set.
    pub fn new(config: &NormalizationConfig) -> Self {
        let mut table = Self {
            normalizers: BTreeMap::new(),
        };

        table.register(Box::new(PatientNameNormalizer::new()));
        table.register(Box::new(CidNormalizer::new()));
        table.register(Box::new(
            DateNormalizer::new().with_calendar_validation(config.validate_calendar_dates),
        ));
        table.register(Box::new(DocTypeNormalizer::new()));
        table.register(Box::new(
            DurationNormalizer::new().with_strict(config.strict_durations),
        ));
        table.register(Box::new(PassThrough::new(Label::Crm)));
        for label in [Label::HorarioInicioAtendimento, Label::HorarioFimAtendimento] {
            table.register(Box::new(
                TimeOfDayNormalizer::new(label).with_strict(config.strict_times),
            ));
        }

        table
    }

    /// Register a normalizer, replacing any previous one for its label.
    pub fn register(&mut self, normalizer: Box<dyn FieldNormalizer>) {
        self.normalizers.insert(normalizer.label(), normalizer);
    }

    /// Normalize a candidate for a label.
    pub fn normalize(&self, label: Label, candidate: &str) -> Option<String> {
        self.normalizers
            .get(&label)
            .and_then(|normalizer| normalizer.normalize(candidate))
    }
}

impl Default for NormalizerTable {
    fn default() -> Self {
        Self::new(&NormalizationConfig::default())
    }
}
