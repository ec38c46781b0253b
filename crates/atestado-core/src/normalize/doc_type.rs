//! Document type matching for TIPO_DOC candidates.

use super::FieldNormalizer;
use super::patterns::DOC_TYPE;
use crate::models::Label;

/// TIPO_DOC normalizer.
///
/// The whole trimmed candidate must be a document-type phrase; a phrase
/// embedded in longer text is rejected.
pub struct DocTypeNormalizer;

impl DocTypeNormalizer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DocTypeNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldNormalizer for DocTypeNormalizer {
    fn label(&self) -> Label {
        Label::TipoDoc
    }

    fn normalize(&self, candidate: &str) -> Option<String> {
        let candidate = candidate.trim();
        DOC_TYPE.is_match(candidate).then(|| candidate.to_string())
    }
}

/// Check whether a candidate is exactly a document-type phrase.
pub fn is_document_type(candidate: &str) -> bool {
    DocTypeNormalizer::new().normalize(candidate).is_some()
}
