//! Configuration structures for the extraction pipeline.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::label::Label;

/// Main configuration for the atestado pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AtestadoConfig {
    /// Recognizers to load at startup.
    pub recognizers: RecognizersConfig,

    /// Field normalization configuration.
    pub normalization: NormalizationConfig,

    /// Batch processing configuration.
    pub batch: BatchConfig,
}

/// Which recognizers to register, and how their labels map to the closed set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognizersConfig {
    /// Built-in pattern recognizers, in dispatch order.
    pub builtin: Vec<BuiltinRecognizer>,

    /// External recognizers invoked as subprocesses, run after the built-ins.
    pub commands: Vec<CommandRecognizerConfig>,

    /// Extra label aliases shared by every recognizer.
    pub aliases: BTreeMap<String, Label>,
}

impl Default for RecognizersConfig {
    fn default() -> Self {
        Self {
            builtin: BuiltinRecognizer::ALL.to_vec(),
            commands: Vec::new(),
            aliases: BTreeMap::new(),
        }
    }
}

/// Built-in pattern recognizers, one per field family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuiltinRecognizer {
    Cid,
    PatientName,
    Date,
    DocType,
    Absence,
    Crm,
    Schedule,
}

impl BuiltinRecognizer {
    /// Every built-in recognizer in default dispatch order.
    pub const ALL: [BuiltinRecognizer; 7] = [
        BuiltinRecognizer::Cid,
        BuiltinRecognizer::PatientName,
        BuiltinRecognizer::Date,
        BuiltinRecognizer::DocType,
        BuiltinRecognizer::Absence,
        BuiltinRecognizer::Crm,
        BuiltinRecognizer::Schedule,
    ];
}

/// An external recognizer reached through a subprocess.
///
/// The program receives the document on stdin and must print a JSON array
/// of `{start, end, label, text}` objects on stdout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandRecognizerConfig {
    /// Name used in logs and error messages.
    pub name: String,

    /// Program to execute.
    pub program: String,

    /// Arguments passed to the program.
    #[serde(default)]
    pub args: Vec<String>,

    /// Labels this recognizer is expected to emit.
    #[serde(default)]
    pub labels: Vec<Label>,

    /// Label aliases specific to this recognizer.
    #[serde(default)]
    pub aliases: BTreeMap<String, Label>,
}

/// Field normalization configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizationConfig {
    /// Reject dates that do not exist in the calendar (e.g. 31/02/2024).
    pub validate_calendar_dates: bool,

    /// Accept only numeric durations or named periods for TEMPO_AFASTAMENTO.
    pub strict_durations: bool,

    /// Accept only clock-time shapes for the HORARIO_* fields.
    pub strict_times: bool,
}

/// Batch processing configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// What to do with documents whose recognition failed.
    pub on_failure: FailurePolicy,

    /// Pretty-print the JSON output.
    pub pretty: bool,
}

/// Treatment of a document whose recognition failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Leave the document out of the output records.
    #[default]
    Skip,
    /// Keep a record with empty entities and the error message.
    Flag,
}

impl AtestadoConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_registers_every_builtin() {
        let config = AtestadoConfig::default();
        assert_eq!(config.recognizers.builtin, BuiltinRecognizer::ALL.to_vec());
        assert!(config.recognizers.commands.is_empty());
        assert_eq!(config.batch.on_failure, FailurePolicy::Skip);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: AtestadoConfig = serde_json::from_str(
            r#"{
                "normalization": { "strict_times": true },
                "recognizers": {
                    "builtin": ["cid", "date"],
                    "commands": [{
                        "name": "nomes",
                        "program": "ner-nomes",
                        "labels": ["NOME_PACIENTE"],
                        "aliases": { "PACIENTE": "NOME_PACIENTE" }
                    }]
                }
            }"#,
        )
        .unwrap();

        assert!(config.normalization.strict_times);
        assert!(!config.normalization.strict_durations);
        assert_eq!(
            config.recognizers.builtin,
            vec![BuiltinRecognizer::Cid, BuiltinRecognizer::Date]
        );
        let command = &config.recognizers.commands[0];
        assert!(command.args.is_empty());
        assert_eq!(command.aliases.get("PACIENTE"), Some(&Label::NomePaciente));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = AtestadoConfig::default();
        config.batch.on_failure = FailurePolicy::Flag;
        config.save(&path).unwrap();

        let loaded = AtestadoConfig::from_file(&path).unwrap();
        assert_eq!(loaded.batch.on_failure, FailurePolicy::Flag);
    }
}
