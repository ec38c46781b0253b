//! Date cleaning for DATA candidates.

use chrono::NaiveDate;
use regex::Regex;

use super::FieldNormalizer;
use super::patterns::{
    DATE_ABBREV_PARTS, DATE_ACCEPTED, DATE_LONG_PARTS, DATE_MIXED_SEPARATORS, DATE_NUMERIC_PARTS,
};
use crate::models::Label;

const MONTHS: [&str; 12] = [
    "janeiro", "fevereiro", "março", "abril", "maio", "junho",
    "julho", "agosto", "setembro", "outubro", "novembro", "dezembro",
];

/// DATA normalizer.
///
/// Returns the leftmost accepted date found anywhere in the candidate,
/// unchanged. Mixed separators such as `12/08-2024` are only tried when no
/// accepted shape matches.
pub struct DateNormalizer {
    validate_calendar: bool,
}

impl DateNormalizer {
    pub fn new() -> Self {
        Self {
            validate_calendar: false,
        }
    }

    /// Also reject dates that do not exist (e.g. `31/02/2024`).
    pub fn with_calendar_validation(mut self, validate: bool) -> Self {
        self.validate_calendar = validate;
        self
    }

    fn matchers() -> [&'static Regex; 2] {
        [&DATE_ACCEPTED, &DATE_MIXED_SEPARATORS]
    }
}

impl Default for DateNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldNormalizer for DateNormalizer {
    fn label(&self) -> Label {
        Label::Data
    }

    fn normalize(&self, candidate: &str) -> Option<String> {
        for matcher in Self::matchers() {
            for m in matcher.find_iter(candidate) {
                if !self.validate_calendar || parse_date(m.as_str()).is_some() {
                    return Some(m.as_str().to_string());
                }
            }
        }
        None
    }
}

/// Clean a DATA candidate with default settings.
pub fn clean_date(candidate: &str) -> Option<String> {
    DateNormalizer::new().normalize(candidate)
}

/// Parse an accepted date shape into a calendar date.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();

    let (day, month, year) = if let Some(caps) = DATE_NUMERIC_PARTS.captures(text) {
        (caps[1].parse().ok()?, caps[2].parse().ok()?, parse_year(&caps[3])?)
    } else if let Some(caps) = DATE_LONG_PARTS.captures(text) {
        (caps[1].parse().ok()?, full_month_number(&caps[2])?, caps[3].parse().ok()?)
    } else if let Some(caps) = DATE_ABBREV_PARTS.captures(text) {
        (caps[1].parse().ok()?, abbreviated_month_number(&caps[2])?, caps[3].parse().ok()?)
    } else {
        return None;
    };

    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_year(s: &str) -> Option<i32> {
    let year: i32 = s.parse().ok()?;
    match s.len() {
        // Two-digit year: 00-50 is 20xx, 51-99 is 19xx
        2 if year <= 50 => Some(2000 + year),
        2 => Some(1900 + year),
        4 => Some(year),
        _ => None,
    }
}

fn full_month_number(name: &str) -> Option<u32> {
    let name = name.to_lowercase();
    let name = if name == "marco" { "março".to_string() } else { name };
    MONTHS
        .iter()
        .position(|m| *m == name)
        .map(|i| i as u32 + 1)
}

/// Resolve "Set", "set", "Setembro" and similar.
fn abbreviated_month_number(name: &str) -> Option<u32> {
    let name = name.to_lowercase();
    if name.chars().count() < 3 {
        return None;
    }
    MONTHS
        .iter()
        .position(|m| m.starts_with(&name) || (name == "marco" && *m == "março"))
        .map(|i| i as u32 + 1)
}
