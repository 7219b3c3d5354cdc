use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// `(NNN) NNN-NNNN` first so the parenthesised form is captured whole;
/// then the bare forms with `-`, `.`, space or no separator.
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(\d{3}\)\s?\d{3}[-.\s]?\d{4}\b|\b\d{3}[-.\s]?\d{3}[-.\s]?\d{4}\b").unwrap()
});

const STREET_WORDS: &[&str] = &[
    "street", "st", "avenue", "ave", "road", "rd", "boulevard", "blvd", "drive", "dr", "lane",
    "ln",
];

const FACILITY_WORDS: &[&str] = &[
    "clinic", "hospital", "medical", "health", "center", "pharmacy", "dental", "care", "urgent",
    "family",
];

/// Checked in order, first hit wins.
const FACILITY_KINDS: &[&str] = &["hospital", "clinic", "pharmacy"];

/// Phone numbers in `text`, raw as written, duplicates dropped (first occurrence kept).
pub fn find_phones(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    PHONE_RE
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|p| seen.insert(*p))
        .map(str::to_string)
        .collect()
}

pub fn looks_like_address(text: &str) -> bool {
    let lower = text.to_lowercase();
    let has_number = text.chars().any(|c| c.is_ascii_digit());
    let has_street_word = STREET_WORDS.iter().any(|w| lower.contains(w));
    let len = text.chars().count();

    has_number && has_street_word && len > 10 && len < 200
}

pub fn looks_like_facility_name(text: &str) -> bool {
    let lower = text.to_lowercase();
    let has_health_word = FACILITY_WORDS.iter().any(|w| lower.contains(w));
    let len = text.chars().count();

    has_health_word && len > 5 && len < 100
}

/// The single extra tag a facility name earns: hospital, clinic or pharmacy.
pub fn facility_kind(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    FACILITY_KINDS.iter().copied().find(|k| lower.contains(k))
}

/// Crisis lines are recognised from their surrounding text, not the number.
pub fn mentions_crisis(context: &str) -> bool {
    let lower = context.to_lowercase();
    lower.contains("crisis") || lower.contains("suicide")
}

// ── Tests ──
