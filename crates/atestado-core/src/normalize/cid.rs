//! CID-10 diagnosis code canonicalization.

use super::FieldNormalizer;
use super::patterns::{CID_CODE, CID_MARKER};
use crate::models::Label;

/// CID normalizer.
///
/// Strips a leading `CID`/`CID-10` marker with its separator and any
/// parentheses, then accepts only a bare code such as `M54.5` or `I10`.
pub struct CidNormalizer;

impl CidNormalizer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CidNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldNormalizer for CidNormalizer {
    fn label(&self) -> Label {
        Label::Cid
    }

    fn normalize(&self, candidate: &str) -> Option<String> {
        let candidate = candidate.trim();
        let residue = CID_MARKER.replace(candidate, "");
        let residue = residue.trim().trim_end_matches(')').trim_end();

        if CID_CODE.is_match(residue) {
            Some(residue.to_string())
        } else {
            None
        }
    }
}

/// Canonicalize a CID candidate.
pub fn clean_cid(candidate: &str) -> Option<String> {
    CidNormalizer::new().normalize(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cid_with_marker() {
        assert_eq!(clean_cid("CID: M54.5"), Some("M54.5".to_string()));
        assert_eq!(clean_cid("CID J18.9"), Some("J18.9".to_string()));
        assert_eq!(clean_cid("CID- J01.9"), Some("J01.9".to_string()));
        assert_eq!(clean_cid("CID:M54.5"), Some("M54.5".to_string()));
        assert_eq!(clean_cid("CID-10: F41.1"), Some("F41.1".to_string()));
    }

    #[test]
    fn test_cid_marker_variants() {
        assert_eq!(clean_cid("cid- F41.1"), Some("F41.1".to_string()));
        assert_eq!(clean_cid("CiD_ G43.909"), Some("G43.909".to_string()));
        assert_eq!(clean_cid("(CID: J03.9)"), Some("J03.9".to_string()));
        assert_eq!(clean_cid("  I10  "), Some("I10".to_string()));
    }

    #[test]
    fn test_cid_rejected() {
        assert_eq!(clean_cid("M5X.5"), None);
        assert_eq!(clean_cid("CID"), None);
        assert_eq!(clean_cid("m54.5"), None);
        assert_eq!(clean_cid("M54."), None);
        assert_eq!(clean_cid("CID M54.5 lombalgia"), None);
        assert_eq!(clean_cid(""), None);
    }
}
