//! The closed set of certificate field labels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Field label attached to a recognized span.
///
/// Declaration order is the closed-set order used for output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Label {
    /// Patient full name.
    #[serde(rename = "NOME_PACIENTE")]
    NomePaciente,
    /// Diagnosis code (CID-10).
    #[serde(rename = "CID")]
    Cid,
    /// Date of service or issue.
    #[serde(rename = "DATA")]
    Data,
    /// Document type (atestado, declaração, ...).
    #[serde(rename = "TIPO_DOC")]
    TipoDoc,
    /// Recommended absence period.
    #[serde(rename = "TEMPO_AFASTAMENTO")]
    TempoAfastamento,
    /// Physician council registration.
    #[serde(rename = "CRM")]
    Crm,
    /// Start of service hours.
    #[serde(rename = "HORARIO_INICIO_ATENDIMENTO")]
    HorarioInicioAtendimento,
    /// End of service hours.
    #[serde(rename = "HORARIO_FIM_ATENDIMENTO")]
    HorarioFimAtendimento,
}

impl Label {
    /// Every label, in closed-set order.
    pub const ALL: [Label; 8] = [
        Label::NomePaciente,
        Label::Cid,
        Label::Data,
        Label::TipoDoc,
        Label::TempoAfastamento,
        Label::Crm,
        Label::HorarioInicioAtendimento,
        Label::HorarioFimAtendimento,
    ];

    /// Canonical label name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::NomePaciente => "NOME_PACIENTE",
            Label::Cid => "CID",
            Label::Data => "DATA",
            Label::TipoDoc => "TIPO_DOC",
            Label::TempoAfastamento => "TEMPO_AFASTAMENTO",
            Label::Crm => "CRM",
            Label::HorarioInicioAtendimento => "HORARIO_INICIO_ATENDIMENTO",
            Label::HorarioFimAtendimento => "HORARIO_FIM_ATENDIMENTO",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = ConfigError;

    /// Parse a canonical label name. Aliases are resolved by
    /// [`LabelAliases`](crate::recognizer::LabelAliases), not here.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Label::ALL
            .iter()
            .copied()
            .find(|label| label.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownLabel(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical_names() {
        for label in Label::ALL {
            assert_eq!(label.as_str().parse::<Label>().unwrap(), label);
        }
    }

    #[test]
    fn test_parse_rejects_alias() {
        assert!("HORARIO_INICIO".parse::<Label>().is_err());
        assert!("nome_paciente".parse::<Label>().is_err());
    }

    #[test]
    fn test_serde_uses_canonical_names() {
        let json = serde_json::to_string(&Label::TempoAfastamento).unwrap();
        assert_eq!(json, "\"TEMPO_AFASTAMENTO\"");
    }
}
