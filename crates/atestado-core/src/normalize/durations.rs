//! Trim-only normalizers for absence periods, service hours and CRM, with
//! optional shape checks.

use super::FieldNormalizer;
use super::patterns::{DURATION_NUMERIC, DURATION_PERIOD, TIME_OF_DAY};
use crate::models::Label;

/// Accepts any non-empty trimmed candidate for its label.
pub struct PassThrough {
    label: Label,
}

impl PassThrough {
    pub fn new(label: Label) -> Self {
        Self { label }
    }
}

impl FieldNormalizer for PassThrough {
    fn label(&self) -> Label {
        self.label
    }

    fn normalize(&self, candidate: &str) -> Option<String> {
        let candidate = candidate.trim();
        (!candidate.is_empty()).then(|| candidate.to_string())
    }
}

/// TEMPO_AFASTAMENTO normalizer.
pub struct DurationNormalizer {
    strict: bool,
}

impl DurationNormalizer {
    pub fn new() -> Self {
        Self { strict: false }
    }

    /// Require a numeric duration ("3 dias") or a named period ("período da tarde").
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

impl Default for DurationNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldNormalizer for DurationNormalizer {
    fn label(&self) -> Label {
        Label::TempoAfastamento
    }

    fn normalize(&self, candidate: &str) -> Option<String> {
        let candidate = candidate.trim();
        if candidate.is_empty() {
            return None;
        }
        if self.strict
            && !DURATION_NUMERIC.is_match(candidate)
            && !DURATION_PERIOD.is_match(candidate)
        {
            return None;
        }
        Some(candidate.to_string())
    }
}

/// HORARIO_INICIO_ATENDIMENTO / HORARIO_FIM_ATENDIMENTO normalizer.
pub struct TimeOfDayNormalizer {
    label: Label,
    strict: bool,
}

impl TimeOfDayNormalizer {
    pub fn new(label: Label) -> Self {
        Self {
            label,
            strict: false,
        }
    }

    /// Require a clock time with hour <= 23 and minute <= 59.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

impl FieldNormalizer for TimeOfDayNormalizer {
    fn label(&self) -> Label {
        self.label
    }

    fn normalize(&self, candidate: &str) -> Option<String> {
        let candidate = candidate.trim();
        if candidate.is_empty() {
            return None;
        }
        if self.strict && !is_clock_time(candidate) {
            return None;
        }
        Some(candidate.to_string())
    }
}

/// Check for `HH:MM`, `HHhMM` or `HH MM` with a valid hour and minute.
pub fn is_clock_time(candidate: &str) -> bool {
    let Some(caps) = TIME_OF_DAY.captures(candidate) else {
        return false;
    };
    let hour = caps.get(1).or_else(|| caps.get(3));
    let minute = caps.get(2).or_else(|| caps.get(4));

    match (hour, minute) {
        (Some(h), Some(m)) => {
            let h: u32 = h.as_str().parse().unwrap_or(99);
            let m: u32 = m.as_str().parse().unwrap_or(99);
            h <= 23 && m <= 59
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pass_through_trims() {
        let normalizer = PassThrough::new(Label::Crm);
        assert_eq!(normalizer.normalize("  CRM 34876 "), Some("CRM 34876".to_string()));
        assert_eq!(normalizer.normalize("   "), None);
    }

    #[test]
    fn test_duration_lenient() {
        let normalizer = DurationNormalizer::new();
        assert_eq!(normalizer.normalize(" algum tempo "), Some("algum tempo".to_string()));
    }

    #[test]
    fn test_duration_strict() {
        let normalizer = DurationNormalizer::new().with_strict(true);
        assert_eq!(normalizer.normalize("7 dias"), Some("7 dias".to_string()));
        assert_eq!(normalizer.normalize("3 (três) dias"), Some("3 (três) dias".to_string()));
        assert_eq!(normalizer.normalize("2 semanas"), Some("2 semanas".to_string()));
        assert_eq!(
            normalizer.normalize("período da tarde"),
            Some("período da tarde".to_string())
        );
        assert_eq!(normalizer.normalize("algum tempo"), None);
    }

    #[test]
    fn test_clock_time_shapes() {
        assert!(is_clock_time("14:20"));
        assert!(is_clock_time("11h30"));
        assert!(is_clock_time("09 00"));
        assert!(is_clock_time("7:05"));
        assert!(!is_clock_time("25:00"));
        assert!(!is_clock_time("12:75"));
        assert!(!is_clock_time("meio-dia"));
    }

    #[test]
    fn test_time_of_day_strict() {
        let normalizer = TimeOfDayNormalizer::new(Label::HorarioInicioAtendimento).with_strict(true);
        assert_eq!(normalizer.normalize(" 14:20 "), Some("14:20".to_string()));
        assert_eq!(normalizer.normalize("tarde"), None);

        let lenient = TimeOfDayNormalizer::new(Label::HorarioFimAtendimento);
        assert_eq!(lenient.normalize("tarde"), Some("tarde".to_string()));
    }
}
