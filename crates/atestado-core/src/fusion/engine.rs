//! Fusion engine combining every recognizer's spans into a FieldResult.

use std::time::Instant;

use tracing::{debug, trace};

use crate::error::RecognitionError;
use crate::models::config::NormalizationConfig;
use crate::models::{FieldResult, FieldValues, Label};
use crate::normalize::NormalizerTable;
use crate::recognizer::RecognizerRegistry;

/// Dispatches a document to every recognizer and merges the cleaned values.
pub struct FusionEngine {
    normalizers: NormalizerTable,
}

impl FusionEngine {
    /// Create an engine with the default normalizers.
    pub fn new(config: &NormalizationConfig) -> Self {
        Self {
            normalizers: NormalizerTable::new(config),
        }
    }

    /// Use a custom normalizer table.
    pub fn with_normalizers(normalizers: NormalizerTable) -> Self {
        Self { normalizers }
    }

    pub fn normalizers(&self) -> &NormalizerTable {
        &self.normalizers
    }

    /// Extract every field of the closed label set from a document.
    ///
    /// Recognizers run in registration order. Each span is normalized by its
    /// label's normalizer and appended unless rejected or already present.
    /// Patient names are then reduced to the longest non-overlapping
    /// candidates. A failing recognizer aborts the document.
    pub fn fuse(
        &self,
        registry: &RecognizerRegistry,
        text: &str,
    ) -> Result<FieldResult, RecognitionError> {
        let start = Instant::now();
        let mut result = FieldResult::new();

        for adapter in registry.adapters() {
            let spans = adapter.recognize(text)?;
            trace!(recognizer = %adapter.name(), spans = spans.len(), "Recognizer finished");

            for span in spans {
                match self.normalizers.normalize(span.label, &span.text) {
                    Some(value) => {
                        result.insert(span.label, value);
                    }
                    None => trace!(label = %span.label, text = %span.text, "Candidate rejected"),
                }
            }
        }

        let names = result.take(Label::NomePaciente);
        let names = dedup_names(names)
            .into_iter()
            .filter_map(|name| self.normalizers.normalize(Label::NomePaciente, &name))
            .collect();
        result.replace(Label::NomePaciente, names);

        debug!(
            chars = text.len(),
            fields = result.iter().filter(|(_, values)| !values.is_empty()).count(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "Fused document"
        );

        Ok(result)
    }
}

impl Default for FusionEngine {
    fn default() -> Self {
        Self::new(&NormalizationConfig::default())
    }
}

/// Keep only names that are not contained in a longer kept name.
///
/// Candidates are visited by descending character count; among equal
/// lengths the first-seen candidate is visited first.
pub fn dedup_names(names: FieldValues) -> FieldValues {
    let mut candidates = names.into_vec();
    candidates.sort_by_key(|name| std::cmp::Reverse(name.chars().count()));

    let mut kept = FieldValues::new();
    for candidate in candidates {
        if kept.iter().any(|name| name.contains(candidate.as_str())) {
            continue;
        }
        kept.insert(candidate);
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::RecognizersConfig;
    use crate::models::RawSpan;
    use crate::recognizer::{Recognizer, RecognizerAdapter};
    use pretty_assertions::assert_eq;

    struct Fixed {
        name: &'static str,
        spans: Vec<RawSpan>,
    }

    impl Recognizer for Fixed {
        fn name(&self) -> &str {
            self.name
        }

        fn labels(&self) -> &[Label] {
            &[]
        }

        fn recognize(&self, _text: &str) -> Result<Vec<RawSpan>, RecognitionError> {
            Ok(self.spans.clone())
        }
    }

    struct Broken;

    impl Recognizer for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn labels(&self) -> &[Label] {
            &[Label::Cid]
        }

        fn recognize(&self, _text: &str) -> Result<Vec<RawSpan>, RecognitionError> {
            Err(RecognitionError::Unavailable {
                recognizer: "broken".to_string(),
                reason: "model not loaded".to_string(),
            })
        }
    }

    fn registry_with(recognizers: Vec<Box<dyn Recognizer>>) -> RecognizerRegistry {
        let mut registry = RecognizerRegistry::new();
        for recognizer in recognizers {
            registry.register(RecognizerAdapter::new(recognizer));
        }
        registry
    }

    fn names(values: &[&str]) -> FieldValues {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_dedup_keeps_longest_name() {
        let kept = dedup_names(names(&["Maria Silva", "Maria Silva Santos"]));
        assert_eq!(kept.as_slice(), &["Maria Silva Santos".to_string()]);
    }

    #[test]
    fn test_dedup_keeps_unrelated_names() {
        let kept = dedup_names(names(&["Ana Souza", "Carlos Mendes Lima", "Mendes Lima"]));
        assert_eq!(
            kept.into_vec(),
            vec!["Carlos Mendes Lima".to_string(), "Ana Souza".to_string()]
        );
    }

    #[test]
    fn test_dedup_equal_length_keeps_first_seen_order() {
        let kept = dedup_names(names(&["Ana Souza", "Eva Souza"]));
        assert_eq!(
            kept.into_vec(),
            vec!["Ana Souza".to_string(), "Eva Souza".to_string()]
        );
    }

    #[test]
    fn test_end_to_end_with_builtin_recognizers() {
        let text = "ATESTADO Atesto que MARIA FERNANDA OLIVEIRA compareceu em 12/08/2024 das 14:20 às 15:30. CID J18.9. CRM 34876.";
        let registry = RecognizerRegistry::from_config(&RecognizersConfig::default()).unwrap();
        let result = FusionEngine::default().fuse(&registry, text).unwrap();

        assert_eq!(result.get(Label::TipoDoc), &["ATESTADO".to_string()]);
        assert_eq!(result.get(Label::Data), &["12/08/2024".to_string()]);
        assert_eq!(result.get(Label::Cid), &["J18.9".to_string()]);
        assert_eq!(result.get(Label::HorarioInicioAtendimento), &["14:20".to_string()]);
        assert_eq!(result.get(Label::HorarioFimAtendimento), &["15:30".to_string()]);
        assert_eq!(
            result.get(Label::NomePaciente),
            &["MARIA FERNANDA OLIVEIRA".to_string()]
        );
        assert_eq!(result.get(Label::Crm), &["CRM 34876".to_string()]);
        assert!(result.get(Label::TempoAfastamento).is_empty());
    }

    struct Certificate {
        text: &'static str,
        fields: [(Label, &'static [&'static str]); 8],
    }

    #[test]
    fn test_certificate_corpus() {
        let corpus = [
            Certificate {
                text: "ATESTADO MÉDICO Declaro que o paciente CARLOS EDUARDO MENDONÇA esteve em consulta no dia 12/08/2024 das 14:20 às 15:30. Diagnosticado com pneumonia (CID J18.9). Recomendado repouso por 7 dias. CRM: 34876.",
                fields: [
                    (Label::NomePaciente, &["CARLOS EDUARDO MENDONÇA"]),
                    (Label::Cid, &["J18.9"]),
                    (Label::TipoDoc, &["ATESTADO MÉDICO"]),
                    (Label::Data, &["12/08/2024"]),
                    (Label::HorarioInicioAtendimento, &["14:20"]),
                    (Label::HorarioFimAtendimento, &["15:30"]),
                    (Label::TempoAfastamento, &["7 dias"]),
                    (Label::Crm, &["CRM: 34876"]),
                ],
            },
            Certificate {
                text: "DECLARAÇÃO Atesto para fins legais que MARIA FERNANDA OLIVEIRA compareceu para tratamento de enxaqueca crônica (CID G43.909) em 30/09/2024 no horário das 09 00 às 10 15. Dr. Roberto Silva - CRM/SP 56789.",
                fields: [
                    (Label::NomePaciente, &["MARIA FERNANDA OLIVEIRA"]),
                    (Label::Cid, &["G43.909"]),
                    (Label::TipoDoc, &["DECLARAÇÃO"]),
                    (Label::Data, &["30/09/2024"]),
                    (Label::HorarioInicioAtendimento, &["09 00"]),
                    (Label::HorarioFimAtendimento, &["10 15"]),
                    (Label::TempoAfastamento, &[]),
                    (Label::Crm, &["CRM/SP 56789"]),
                ],
            },
            Certificate {
                text: "DECLARAÇÃO Confirmo que JULIANA SOUZA ALMEIDA foi atendida em 05/02/2025 no período das 16 30 às 17 45. Diagnosticada com asma brônquica não alérgica (CID J45.909). Necessário uso contínuo de medicação. CRM 23456.",
                fields: [
                    (Label::NomePaciente, &["JULIANA SOUZA ALMEIDA"]),
                    (Label::Cid, &["J45.909"]),
                    (Label::TipoDoc, &["DECLARAÇÃO"]),
                    (Label::Data, &["05/02/2025"]),
                    (Label::HorarioInicioAtendimento, &["16 30"]),
                    (Label::HorarioFimAtendimento, &["17 45"]),
                    (Label::TempoAfastamento, &[]),
                    (Label::Crm, &["CRM 23456"]),
                ],
            },
            Certificate {
                text: "ATESTADO Atesto que LUCAS GABRIEL PEIXOTO esteve em consulta em 30 de setembro de 2025. Durante o período das 18:20 às 19:45 (noite). Diagnóstico: Conjuntivite bacteriana (cid: H10.2). Afastamento necessário: (3 dias). Dra. Fernanda Lima | CRM: 11223/SC.",
                fields: [
                    (Label::NomePaciente, &["LUCAS GABRIEL PEIXOTO"]),
                    (Label::Cid, &["H10.2"]),
                    (Label::TipoDoc, &["ATESTADO"]),
                    (Label::Data, &["30 de setembro de 2025"]),
                    (Label::HorarioInicioAtendimento, &["18:20"]),
                    (Label::HorarioFimAtendimento, &["19:45"]),
                    (Label::TempoAfastamento, &["3 dias"]),
                    (Label::Crm, &["CRM: 11223/SC"]),
                ],
            },
            Certificate {
                text: "DECLARACAO Declaro que PATRÍCIA NUNES FERNANDES esteve em consulta em 15-Jul-2025 das 16:00 às 17:30. Diagnosticada com Lombalgia (CID: M54.5). Necessário repouso por no período da tarde. CRM/RN 22334.",
                fields: [
                    (Label::NomePaciente, &["PATRÍCIA NUNES FERNANDES"]),
                    (Label::Cid, &["M54.5"]),
                    (Label::TipoDoc, &["DECLARACAO"]),
                    (Label::Data, &["15-Jul-2025"]),
                    (Label::HorarioInicioAtendimento, &["16:00"]),
                    (Label::HorarioFimAtendimento, &["17:30"]),
                    (Label::TempoAfastamento, &["período da tarde"]),
                    (Label::Crm, &["CRM/RN 22334"]),
                ],
            },
        ];

        let registry = RecognizerRegistry::from_config(&RecognizersConfig::default()).unwrap();
        let engine = FusionEngine::default();

        for certificate in corpus {
            let result = engine.fuse(&registry, certificate.text).unwrap();
            for (label, expected) in certificate.fields {
                assert_eq!(
                    result.get(label),
                    expected,
                    "{label} in {:?}",
                    certificate.text
                );
            }
        }
    }

    #[test]
    fn test_fusion_is_idempotent() {
        let text = "DECLARAÇÃO Declaro que Fernanda Lopes Santos esteve em 05/01/2025. CID: M54.5. Repouso por 2 dias.";
        let registry = RecognizerRegistry::from_config(&RecognizersConfig::default()).unwrap();
        let engine = FusionEngine::default();

        let first = engine.fuse(&registry, text).unwrap();
        let second = engine.fuse(&registry, text).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_merges_overlapping_recognizers() {
        let text = "Maria Silva Santos";
        let registry = registry_with(vec![
            Box::new(Fixed {
                name: "primeiro",
                spans: vec![
                    RawSpan::new(0, 11, "NOME_PACIENTE", "Maria Silva"),
                    RawSpan::new(0, 8, "TIPO_DOC", "ATESTADO"),
                ],
            }),
            Box::new(Fixed {
                name: "segundo",
                spans: vec![
                    RawSpan::new(0, 18, "NOME_PACIENTE", "Maria Silva Santos"),
                    RawSpan::new(0, 8, "TIPO_DOC", "ATESTADO"),
                    RawSpan::new(0, 8, "TIPO_DOC", "atestado comum"),
                ],
            }),
        ]);

        let result = FusionEngine::default().fuse(&registry, text).unwrap();
        assert_eq!(
            result.get(Label::NomePaciente),
            &["Maria Silva Santos".to_string()]
        );
        assert_eq!(result.get(Label::TipoDoc), &["ATESTADO".to_string()]);
    }

    #[test]
    fn test_drops_unknown_labels_and_rejected_values() {
        let registry = registry_with(vec![Box::new(Fixed {
            name: "ruidoso",
            spans: vec![
                RawSpan::new(0, 3, "ORGANIZACAO", "SUS"),
                RawSpan::new(0, 5, "CID", "M5X.5"),
                RawSpan::new(0, 14, "NOME_PACIENTE", "Dr. João Silva"),
                RawSpan::new(0, 5, "HORARIO_INICIO", "08:00"),
            ],
        })]);

        let result = FusionEngine::default().fuse(&registry, "irrelevante").unwrap();
        assert!(result.get(Label::Cid).is_empty());
        assert!(result.get(Label::NomePaciente).is_empty());
        assert_eq!(
            result.get(Label::HorarioInicioAtendimento),
            &["08:00".to_string()]
        );
    }

    #[test]
    fn test_empty_text_yields_empty_lists() {
        let registry = RecognizerRegistry::from_config(&RecognizersConfig::default()).unwrap();
        let result = FusionEngine::default().fuse(&registry, "").unwrap();
        assert!(result.is_empty());
        assert_eq!(result.iter().count(), Label::ALL.len());
    }

    #[test]
    fn test_recognizer_failure_propagates() {
        let registry = registry_with(vec![
            Box::new(Fixed {
                name: "ok",
                spans: vec![RawSpan::new(0, 8, "TIPO_DOC", "ATESTADO")],
            }),
            Box::new(Broken),
        ]);

        let err = FusionEngine::default().fuse(&registry, "ATESTADO").unwrap_err();
        assert_eq!(err.recognizer(), "broken");
    }
}
