//! Plausibility filter for NOME_PACIENTE candidates.
//!
//! Recognizers for patient names often fire on physician names, headings
//! and clinical phrases. The filter rejects anything that does not look
//! like a full personal name; accepted candidates are returned with their
//! original casing.

use super::FieldNormalizer;
use super::patterns::{NAME_DIGIT, NAME_SPECIAL_CHAR};
use crate::models::Label;

/// Professional titles and council abbreviations.
const TITLE_TOKENS: &[&str] = &["dr", "dra", "drª", "crm", "crf", "enf", "fisioter", "nutr"];

/// Clinical and administrative vocabulary, matched as whole tokens.
const CLINICAL_VOCABULARY: &[&str] = &[
    "afastamento", "indicado", "necessário", "necessario", "tratamento", "diagnóstico",
    "diagnostico", "repouso", "paciente", "compareceu", "atendimento", "avaliação",
    "avaliacao", "clínica", "clinica", "hospital", "unidade", "serviço", "servico",
    "período", "periodo", "dias", "dia", "cid", "código", "codigo", "documento",
    "declaro", "consta", "confirmo", "atesto", "realizou", "avaliado", "diagnosticado",
    "recomendado", "realizado", "acompanhamento", "cuidados", "dieta", "protocolo",
    "fins", "devidos", "fim", "inicio", "início", "manhã", "manha", "tarde", "noite",
    "horário", "horario", "cpf", "laudo", "atestado", "declaração", "declaracao",
    "relatório", "relatorio", "receituário", "receituario", "médico", "medico",
    "médica", "medica",
];

/// Vocabulary stems, matched as token prefixes ("consulta", "consultório").
const CLINICAL_STEMS: &[&str] = &["consult", "diagnostic", "afastament", "atendiment"];

const PREPOSITIONS: &[&str] = &["de", "do", "da", "dos", "das", "e"];

const COURTESY_TITLES: &[&str] = &["sr", "sra", "srta"];

const ADDRESS_TOKENS: &[&str] = &[
    "cidade", "estado", "país", "pais", "rua", "avenida", "bairro", "nº", "número", "numero",
];

/// Why a name candidate was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameRejection {
    Title,
    ClinicalVocabulary,
    Digit,
    SpecialCharacter,
    Preposition,
    CourtesyTitle,
    TooFewParts,
    AddressToken,
    ShortPart,
    NotCapitalized,
}

/// NOME_PACIENTE normalizer.
pub struct PatientNameNormalizer;

impl PatientNameNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Check a candidate, reporting the first rule it breaks.
    pub fn check(&self, candidate: &str) -> Result<(), NameRejection> {
        let parts: Vec<&str> = candidate.split_whitespace().collect();
        let tokens: Vec<String> = parts
            .iter()
            .map(|p| p.trim_end_matches('.').to_lowercase())
            .collect();
        let has_token = |set: &[&str]| tokens.iter().any(|t| set.contains(&t.as_str()));

        if has_token(TITLE_TOKENS) {
            return Err(NameRejection::Title);
        }
        if has_token(CLINICAL_VOCABULARY)
            || tokens
                .iter()
                .any(|t| CLINICAL_STEMS.iter().any(|stem| t.starts_with(stem)))
        {
            return Err(NameRejection::ClinicalVocabulary);
        }
        if NAME_DIGIT.is_match(candidate) {
            return Err(NameRejection::Digit);
        }
        if NAME_SPECIAL_CHAR.is_match(candidate) {
            return Err(NameRejection::SpecialCharacter);
        }
        if has_token(PREPOSITIONS) {
            return Err(NameRejection::Preposition);
        }
        if has_token(COURTESY_TITLES) {
            return Err(NameRejection::CourtesyTitle);
        }
        if parts.len() < 2 {
            return Err(NameRejection::TooFewParts);
        }
        if has_token(ADDRESS_TOKENS) {
            return Err(NameRejection::AddressToken);
        }
        if parts.iter().any(|p| p.chars().count() < 2) {
            return Err(NameRejection::ShortPart);
        }
        if !parts
            .iter()
            .filter(|p| p.chars().count() > 1)
            .all(|p| p.chars().next().is_some_and(char::is_uppercase))
        {
            return Err(NameRejection::NotCapitalized);
        }

        Ok(())
    }
}

impl Default for PatientNameNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldNormalizer for PatientNameNormalizer {
    fn label(&self) -> Label {
        Label::NomePaciente
    }

    fn normalize(&self, candidate: &str) -> Option<String> {
        let candidate = candidate.trim();
        self.check(candidate).ok().map(|()| candidate.to_string())
    }
}

/// Check whether a candidate is a plausible patient name.
pub fn is_valid_patient_name(candidate: &str) -> bool {
    PatientNameNormalizer::new().normalize(candidate).is_some()
}
