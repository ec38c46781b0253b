//! Regex patterns used by the built-in recognizers to locate candidate spans.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // "CID: M54.5", "(CID- J01.9", "cid_ A09"
    pub static ref CID_MENTION: Regex = Regex::new(
        r"\b(?i:CID(?:-?10)?)\s*[:\-_]?\s*[A-Z]\d+(?:\.\d+)?"
    ).unwrap();

    pub static ref DATE_MENTION: Regex = Regex::new(
        r"(?i)\b\d{1,2}[/\-.]\d{1,2}[/\-.]\d{2,4}\b|\b\d{1,2}\s+de\s+[a-zç]{3,9}\s+de\s+\d{4}\b|\b\d{1,2}[-/](?:jan|fev|mar|abr|mai|jun|jul|ago|set|out|nov|dez)[a-z]*[-/]\d{4}\b"
    ).unwrap();

    pub static ref DOC_TYPE_MENTION: Regex = Regex::new(
        r"(?i)\b(?:RELAT[ÓO]RIO|DECLARA[CÇ][ÃA]O|ATESTADO|RECEITU[ÁA]RIO|LAUDO)(?:\s+M[ÉE]DIC[AO])?\b"
    ).unwrap();

    // "das 14:20 às 15:30", "entre 08 45 e 10 30", "(14:00-15:20)"
    pub static ref SCHEDULE_RANGE: Regex = Regex::new(
        r"(?i)\b(\d{1,2}(?:[:h]\d{2}|\s\d{2}))\s*(?:às|as|até|a|e|-)\s*(\d{1,2}(?:[:h]\d{2}|\s\d{2}))\b"
    ).unwrap();

    // "CRM 34876", "CRM-PE 123456", "CRM: 99876/BA"
    pub static ref CRM_MENTION: Regex = Regex::new(
        r"\bCRM(?:[\s\-/:]*[A-Z]{2}\b)?[\s\-/:]*\d{4,6}(?:\s*/\s*[A-Z]{2}\b)?"
    ).unwrap();

    // Absence anchors; the duration follows within the same sentence
    pub static ref ABSENCE_ANCHOR: Regex = Regex::new(
        r"(?i)\b(?:afastamento|afastar|repouso)\b"
    ).unwrap();

    pub static ref ABSENCE_WINDOW_END: Regex = Regex::new(
        r"[.;\n]"
    ).unwrap();

    pub static ref ABSENCE_ACTIVITIES: Regex = Regex::new(
        r"(?i)\s+de\s+suas\s+atividades"
    ).unwrap();

    // Last-resort window: "afastamento [domiciliar] de|por <window>"
    pub static ref ABSENCE_FALLBACK: Regex = Regex::new(
        r"(?i)^\s*(?:\p{L}+\s+){0,2}?(?:de|por)\s+(\S.*)$"
    ).unwrap();

    // Upper-case name runs: "MARIA FERNANDA OLIVEIRA"
    pub static ref UPPERCASE_NAME: Regex = Regex::new(
        r"\b\p{Lu}{2,}(?:[ \t]+\p{Lu}{2,})+\b"
    ).unwrap();

    // Title-case names introduced by an anchor: "que Fernanda Lopes Santos"
    pub static ref ANCHORED_NAME: Regex = Regex::new(
        r"(?:\b(?:que|paciente|a|ao)|\bsr\(a\)\.?,?)\s+(\p{Lu}\p{Ll}+(?:[ \t]+(?:(?:d[aeo]s?|e)[ \t]+)?\p{Lu}\p{Ll}+)+)"
    ).unwrap();
}
