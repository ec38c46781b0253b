//! Span and result types exchanged between recognizers, the fusion engine
//! and the batch output.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use super::label::Label;

/// A span as emitted by a recognizer, before its label is resolved.
///
/// This is the wire shape external recognizers must produce:
/// `{"start": 0, "end": 8, "label": "TIPO_DOC", "text": "ATESTADO"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSpan {
    /// Byte offset of the span start in the document.
    pub start: usize,
    /// Byte offset one past the span end.
    pub end: usize,
    /// Label as named by the recognizer (may be an alias).
    pub label: String,
    /// Surface text of the span.
    pub text: String,
}

impl RawSpan {
    pub fn new(start: usize, end: usize, label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            label: label.into(),
            text: text.into(),
        }
    }

    /// Build a span from a regex match over the document.
    pub fn from_match(m: regex::Match<'_>, label: Label) -> Self {
        Self::new(m.start(), m.end(), label.as_str(), m.as_str())
    }
}

/// A span whose label has been resolved to the closed set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledSpan {
    pub start: usize,
    pub end: usize,
    pub label: Label,
    pub text: String,
}

/// Ordered, duplicate-free list of cleaned values for one field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldValues(Vec<String>);

impl FieldValues {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a value unless it is empty or already present.
    ///
    /// Returns `true` if the value was added.
    pub fn insert(&mut self, value: impl Into<String>) -> bool {
        let value = value.into();
        if value.is_empty() || self.0.contains(&value) {
            return false;
        }
        self.0.push(value);
        true
    }

    pub fn contains(&self, value: &str) -> bool {
        self.0.iter().any(|v| v == value)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

// Drops duplicates and empty strings found in the input
impl<'de> Deserialize<'de> for FieldValues {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Vec::<String>::deserialize(deserializer)?.into_iter().collect())
    }
}

impl IntoIterator for FieldValues {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a FieldValues {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<String> for FieldValues {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut values = FieldValues::new();
        for value in iter {
            values.insert(value);
        }
        values
    }
}

/// Final per-document mapping from label to cleaned values.
///
/// Every label of the closed set is present, possibly with an empty list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldResult {
    fields: BTreeMap<Label, FieldValues>,
}

impl FieldResult {
    /// Create a result with an empty list for every label.
    pub fn new() -> Self {
        Self {
            fields: Label::ALL
                .iter()
                .map(|label| (*label, FieldValues::new()))
                .collect(),
        }
    }

    /// Values accepted for a label.
    pub fn get(&self, label: Label) -> &[String] {
        self.fields
            .get(&label)
            .map(FieldValues::as_slice)
            .unwrap_or(&[])
    }

    /// Append a value to a label. Returns `true` if it was new.
    pub fn insert(&mut self, label: Label, value: impl Into<String>) -> bool {
        self.fields.entry(label).or_default().insert(value)
    }

    /// Replace every value of a label.
    pub fn replace(&mut self, label: Label, values: FieldValues) {
        self.fields.insert(label, values);
    }

    /// Remove and return the values of a label, leaving an empty list.
    pub fn take(&mut self, label: Label) -> FieldValues {
        std::mem::take(self.fields.entry(label).or_default())
    }

    /// `true` when no label has any value.
    pub fn is_empty(&self) -> bool {
        self.fields.values().all(FieldValues::is_empty)
    }

    /// Iterate labels with their values in closed-set order.
    pub fn iter(&self) -> impl Iterator<Item = (Label, &[String])> {
        self.fields.iter().map(|(label, values)| (*label, values.as_slice()))
    }
}

// Labels missing from the input come back as empty lists
impl<'de> Deserialize<'de> for FieldResult {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let fields = BTreeMap::<Label, FieldValues>::deserialize(deserializer)?;
        let mut result = Self::new();
        for (label, values) in fields {
            result.replace(label, values);
        }
        Ok(result)
    }
}

impl Default for FieldResult {
    fn default() -> Self {
        Self::new()
    }
}

/// One record of a batch output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// 1-based position of the document in the batch.
    pub id: usize,
    /// Raw document text.
    pub texto: String,
    /// Extracted fields.
    pub entidades: FieldResult,
    /// Failure message, when a failed document is flagged rather than omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub erro: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_field_values_suppress_duplicates_and_empty() {
        let mut values = FieldValues::new();
        assert!(values.insert("M54.5"));
        assert!(!values.insert("M54.5"));
        assert!(!values.insert(""));
        assert!(values.insert("I10"));
        assert_eq!(values.as_slice(), &["M54.5".to_string(), "I10".to_string()]);
    }

    #[test]
    fn test_field_result_has_every_label() {
        let result = FieldResult::new();
        assert!(result.is_empty());
        assert_eq!(result.iter().count(), Label::ALL.len());
        for label in Label::ALL {
            assert!(result.get(label).is_empty());
        }
    }

    #[test]
    fn test_field_result_serializes_in_label_order() {
        let mut result = FieldResult::new();
        result.insert(Label::Crm, "CRM 34876");
        result.insert(Label::NomePaciente, "MARIA FERNANDA OLIVEIRA");

        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(
            json,
            "{\"NOME_PACIENTE\":[\"MARIA FERNANDA OLIVEIRA\"],\"CID\":[],\"DATA\":[],\
             \"TIPO_DOC\":[],\"TEMPO_AFASTAMENTO\":[],\"CRM\":[\"CRM 34876\"],\
             \"HORARIO_INICIO_ATENDIMENTO\":[],\"HORARIO_FIM_ATENDIMENTO\":[]}"
        );
    }

    #[test]
    fn test_take_leaves_empty_list() {
        let mut result = FieldResult::new();
        result.insert(Label::NomePaciente, "Ana Costa");
        let names = result.take(Label::NomePaciente);
        assert_eq!(names.len(), 1);
        assert!(result.get(Label::NomePaciente).is_empty());
        assert_eq!(result.iter().count(), Label::ALL.len());
    }

    #[test]
    fn test_field_values_iterate() {
        let values: FieldValues = ["Ana Costa", "Rui Lima"].iter().map(|v| v.to_string()).collect();
        let borrowed: Vec<&String> = (&values).into_iter().collect();
        assert_eq!(borrowed.len(), 2);
        let owned: Vec<String> = values.into_iter().collect();
        assert_eq!(owned, vec!["Ana Costa".to_string(), "Rui Lima".to_string()]);
    }

    #[test]
    fn test_field_result_deserialize_fills_missing_labels() {
        let result: FieldResult =
            serde_json::from_str(r#"{"CID": ["M54.5", "M54.5", ""]}"#).unwrap();
        assert_eq!(result.iter().count(), Label::ALL.len());
        assert_eq!(result.get(Label::Cid), &["M54.5".to_string()]);
        assert!(result.get(Label::Data).is_empty());

        let record: DocumentRecord =
            serde_json::from_str(r#"{"id": 3, "texto": "x", "entidades": {}}"#).unwrap();
        assert_eq!(record.entidades, FieldResult::new());
        assert_eq!(record.erro, None);
    }

    #[test]
    fn test_record_omits_missing_error() {
        let record = DocumentRecord {
            id: 1,
            texto: "ATESTADO".to_string(),
            entidades: FieldResult::new(),
            erro: None,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("erro").is_none());
        assert_eq!(json["id"], 1);
    }
}
