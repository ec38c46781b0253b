//! Regex patterns used to validate and canonicalize field candidates.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Accepted date shapes in one alternation, so the leftmost date wins:
    // "12/08/2024", "12-08-2024", "12.08.2024", "15 de setembro de 2025", "15/Set/2025"
    pub static ref DATE_ACCEPTED: Regex = Regex::new(
        r"(?i)\b\d{1,2}/\d{1,2}/\d{2,4}\b|\b\d{1,2}-\d{1,2}-\d{2,4}\b|\b\d{1,2}\.\d{1,2}\.\d{2,4}\b|\b\d{1,2}\s+de\s+[a-zç]{3,9}\s+de\s+\d{4}\b|\b\d{1,2}[-/](?:jan|fev|mar|abr|mai|jun|jul|ago|set|out|nov|dez)[a-z]*[-/]\d{4}\b"
    ).unwrap();

    // Fallback when no accepted shape matches
    pub static ref DATE_MIXED_SEPARATORS: Regex = Regex::new(
        r"\b\d{1,2}[/\-.]\d{1,2}[/\-.]\d{2,4}\b"
    ).unwrap();

    // Date components, for calendar validation
    pub static ref DATE_NUMERIC_PARTS: Regex = Regex::new(
        r"^(\d{1,2})[/\-.](\d{1,2})[/\-.](\d{2,4})$"
    ).unwrap();

    pub static ref DATE_LONG_PARTS: Regex = Regex::new(
        r"(?i)^(\d{1,2})\s+de\s+(\p{L}+)\s+de\s+(\d{4})$"
    ).unwrap();

    pub static ref DATE_ABBREV_PARTS: Regex = Regex::new(
        r"^(\d{1,2})[-/](\p{L}+)[-/](\d{4})$"
    ).unwrap();

    // Diagnosis code: leading marker such as "CID:", "(CID-10 ", "cid_ "
    pub static ref CID_MARKER: Regex = Regex::new(
        r"(?i)^\(?\s*(?:CID(?:-?10)?)?\s*[:\-_]?\s*\(?\s*"
    ).unwrap();

    pub static ref CID_CODE: Regex = Regex::new(
        r"^[A-Z]\d+(?:\.\d+)?$"
    ).unwrap();

    // Whole-candidate document type phrases
    pub static ref DOC_TYPE: Regex = Regex::new(
        r"(?i)^(?:RELAT[ÓO]RIO|DECLARA[CÇ][ÃA]O|ATESTADO|RECEITU[ÁA]RIO|LAUDO)(?:\s*M[ÉE]DIC[AO])?$"
    ).unwrap();

    // Patient name rejection patterns
    pub static ref NAME_DIGIT: Regex = Regex::new(
        r"\d"
    ).unwrap();

    pub static ref NAME_SPECIAL_CHAR: Regex = Regex::new(
        r#"[.,:;?!@#$%^&*()_+=|<>/\\{}\[\]~"'’º-]"#
    ).unwrap();

    // Absence duration: "3 dias", "1 (um) dia", "2 semanas"
    pub static ref DURATION_NUMERIC: Regex = Regex::new(
        r"(?i)\b\d{1,3}(?:\s*\([\w.]+?\))?\s*(?:dias?|horas?|semanas?|m[êe]s(?:es)?)\b"
    ).unwrap();

    // Absence duration as a named period: "período da tarde"
    pub static ref DURATION_PERIOD: Regex = Regex::new(
        r"(?i)(?:per[ií]odo|turno)\s+da\s+(?:manh[ãa]|tarde|noite)|per[ií]odo\s+integral"
    ).unwrap();

    // Clock time: "14:20", "11h30", "09 00"
    pub static ref TIME_OF_DAY: Regex = Regex::new(
        r"^(\d{1,2})\s*[:hH]\s*(\d{2})$|^(\d{2})\s(\d{2})$"
    ).unwrap();
}
