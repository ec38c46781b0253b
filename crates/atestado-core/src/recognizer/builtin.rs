//! Built-in pattern recognizers.
//!
//! They reproduce the annotation rules the per-field models were trained
//! on, so the pipeline runs end to end without trained models. Each one
//! emits raw spans only; cleaning is left to the normalizers.

use regex::Regex;

use super::patterns::*;
use super::Recognizer;
use crate::error::RecognitionError;
use crate::models::config::BuiltinRecognizer;
use crate::models::{Label, RawSpan};
use crate::normalize::patterns::{DURATION_NUMERIC, DURATION_PERIOD};

/// Maximum characters after an absence anchor searched for a duration.
const ABSENCE_WINDOW_CHARS: usize = 80;

/// Maximum characters accepted from the raw-window fallback.
const ABSENCE_FALLBACK_CHARS: usize = 60;

/// Labels emitted by the schedule recognizer before alias resolution.
pub const SCHEDULE_START_ALIAS: &str = "HORARIO_INICIO";
pub const SCHEDULE_END_ALIAS: &str = "HORARIO_FIM";

/// Create a built-in recognizer.
pub fn create_builtin(kind: BuiltinRecognizer) -> Box<dyn Recognizer> {
    match kind {
        BuiltinRecognizer::Cid => Box::new(RegexRecognizer::new("cid", Label::Cid, &CID_MENTION)),
        BuiltinRecognizer::Date => {
            Box::new(RegexRecognizer::new("data", Label::Data, &DATE_MENTION))
        }
        BuiltinRecognizer::DocType => Box::new(RegexRecognizer::new(
            "tipo_doc",
            Label::TipoDoc,
            &DOC_TYPE_MENTION,
        )),
        BuiltinRecognizer::Crm => Box::new(RegexRecognizer::new("crm", Label::Crm, &CRM_MENTION)),
        BuiltinRecognizer::PatientName => Box::new(PatientNameRecognizer),
        BuiltinRecognizer::Schedule => Box::new(ScheduleRecognizer),
        BuiltinRecognizer::Absence => Box::new(AbsenceRecognizer),
    }
}

/// Emits every match of a single pattern under one label.
pub struct RegexRecognizer {
    name: &'static str,
    labels: [Label; 1],
    pattern: &'static Regex,
}

impl RegexRecognizer {
    pub fn new(name: &'static str, label: Label, pattern: &'static Regex) -> Self {
        Self {
            name,
            labels: [label],
            pattern,
        }
    }
}

impl Recognizer for RegexRecognizer {
    fn name(&self) -> &str {
        self.name
    }

    fn labels(&self) -> &[Label] {
        &self.labels
    }

    fn recognize(&self, text: &str) -> Result<Vec<RawSpan>, RecognitionError> {
        Ok(self
            .pattern
            .find_iter(text)
            .map(|m| RawSpan::from_match(m, self.labels[0]))
            .collect())
    }
}

/// Patient names: upper-case runs anywhere, and title-case runs after an
/// introducing word such as "que" or "paciente".
pub struct PatientNameRecognizer;

impl Recognizer for PatientNameRecognizer {
    fn name(&self) -> &str {
        "nome_paciente"
    }

    fn labels(&self) -> &[Label] {
        &[Label::NomePaciente]
    }

    fn recognize(&self, text: &str) -> Result<Vec<RawSpan>, RecognitionError> {
        let mut spans: Vec<RawSpan> = UPPERCASE_NAME
            .find_iter(text)
            .map(|m| RawSpan::from_match(m, Label::NomePaciente))
            .collect();

        spans.extend(
            ANCHORED_NAME
                .captures_iter(text)
                .filter_map(|caps| caps.get(1))
                .map(|m| RawSpan::from_match(m, Label::NomePaciente)),
        );

        spans.sort_by_key(|span| span.start);
        Ok(spans)
    }
}

/// Service hours given as a range ("das 14:20 às 15:30").
///
/// Emits the short alias labels, which the adapter maps to the
/// `HORARIO_*_ATENDIMENTO` labels.
pub struct ScheduleRecognizer;

impl Recognizer for ScheduleRecognizer {
    fn name(&self) -> &str {
        "horarios"
    }

    fn labels(&self) -> &[Label] {
        &[Label::HorarioInicioAtendimento, Label::HorarioFimAtendimento]
    }

    fn recognize(&self, text: &str) -> Result<Vec<RawSpan>, RecognitionError> {
        let mut spans = Vec::new();
        for caps in SCHEDULE_RANGE.captures_iter(text) {
            if let (Some(start), Some(end)) = (caps.get(1), caps.get(2)) {
                spans.push(RawSpan::new(start.start(), start.end(), SCHEDULE_START_ALIAS, start.as_str()));
                spans.push(RawSpan::new(end.start(), end.end(), SCHEDULE_END_ALIAS, end.as_str()));
            }
        }
        Ok(spans)
    }
}

/// Absence period following an anchor such as "afastamento" or "repouso".
///
/// Within the sentence after each anchor, matchers are tried in order and
/// the first hit wins: numeric duration, then named period, then the raw
/// window after "de"/"por".
pub struct AbsenceRecognizer;

impl AbsenceRecognizer {
    fn strategies() -> [fn(&str) -> Option<(usize, usize)>; 3] {
        [numeric_duration, named_period, raw_window]
    }
}

impl Recognizer for AbsenceRecognizer {
    fn name(&self) -> &str {
        "tempo_afastamento"
    }

    fn labels(&self) -> &[Label] {
        &[Label::TempoAfastamento]
    }

    fn recognize(&self, text: &str) -> Result<Vec<RawSpan>, RecognitionError> {
        let mut spans: Vec<RawSpan> = Vec::new();

        for anchor in ABSENCE_ANCHOR.find_iter(text) {
            let offset = anchor.end();
            let window = absence_window(&text[offset..]);

            let found = Self::strategies()
                .iter()
                .find_map(|strategy| strategy(window));

            if let Some((start, end)) = found {
                let (start, end) = (offset + start, offset + end);
                if !spans.iter().any(|s| s.start == start && s.end == end) {
                    spans.push(RawSpan::new(
                        start,
                        end,
                        Label::TempoAfastamento.as_str(),
                        &text[start..end],
                    ));
                }
            }
        }

        Ok(spans)
    }
}

/// The rest of the sentence after an anchor, capped in characters.
fn absence_window(rest: &str) -> &str {
    let sentence_end = ABSENCE_WINDOW_END
        .find(rest)
        .map(|m| m.start())
        .unwrap_or(rest.len());
    let cap = rest
        .char_indices()
        .nth(ABSENCE_WINDOW_CHARS)
        .map(|(i, _)| i)
        .unwrap_or(rest.len());
    &rest[..sentence_end.min(cap)]
}

fn numeric_duration(window: &str) -> Option<(usize, usize)> {
    DURATION_NUMERIC.find(window).map(|m| (m.start(), m.end()))
}

fn named_period(window: &str) -> Option<(usize, usize)> {
    DURATION_PERIOD.find(window).map(|m| (m.start(), m.end()))
}

fn raw_window(window: &str) -> Option<(usize, usize)> {
    // "afastamento de suas atividades" names no duration
    let window = match ABSENCE_ACTIVITIES.find(window) {
        Some(m) => &window[..m.start()],
        None => window,
    };
    let rest = ABSENCE_FALLBACK.captures(window)?.get(1)?;
    let trimmed = rest.as_str().trim_end();
    let len = trimmed.chars().count();

    if (1..=ABSENCE_FALLBACK_CHARS).contains(&len) && trimmed.chars().any(char::is_alphanumeric) {
        Some((rest.start(), rest.start() + trimmed.len()))
    } else {
        None
    }
}
