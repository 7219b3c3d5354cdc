use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::Deserialize;

use crate::error::{CrawlError, Result};

const DEFAULT_RULES: &[(&str, &[&str])] = &[
    ("flu", &["flu", "influenza", "flu shot", "flu vaccine"]),
    ("covid19", &["covid", "covid-19", "coronavirus", "sars-cov-2"]),
    ("vaccination", &["vaccine", "vaccination", "immunization", "shot"]),
    (
        "mental_health",
        &["mental health", "behavioral health", "counseling", "therapy"],
    ),
    ("pediatric", &["pediatric", "children", "kids", "infant", "child"]),
    ("dental", &["dental", "dentist", "teeth", "oral health"]),
    ("emergency_room", &["emergency", "er", "trauma", "24 hour"]),
    ("urgent_care", &["urgent care", "walk-in", "immediate care"]),
    ("crisis_services", &["crisis", "suicide", "crisis line", "hotline"]),
    ("substance_abuse", &["substance", "addiction", "rehab", "detox"]),
    ("opioid_treatment", &["opioid", "methadone", "suboxone", "narcan"]),
];

/// How a trigger phrase has to appear in the text to count as a hit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Plain substring search. "er" hits inside "user".
    #[default]
    Substring,
    /// Phrase must be bounded by non-alphanumeric characters or the text ends.
    WholeWord,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRule {
    pub name: String,
    pub phrases: Vec<String>,
}

/// Tag name → trigger phrases. Built once at startup, then only read.
#[derive(Debug, Clone)]
pub struct TagTable {
    rules: Vec<TagRule>,
    mode: MatchMode,
}

impl Default for TagTable {
    fn default() -> Self {
        let rules = DEFAULT_RULES
            .iter()
            .map(|(name, phrases)| TagRule {
                name: name.to_string(),
                phrases: phrases.iter().map(|p| p.to_string()).collect(),
            })
            .collect();
        TagTable {
            rules,
            mode: MatchMode::Substring,
        }
    }
}

impl TagTable {
    pub fn new(rules: Vec<TagRule>, mode: MatchMode) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut normalized = Vec::with_capacity(rules.len());

        for rule in rules {
            let name = rule.name.trim().to_string();
            if name.is_empty() {
                return Err(CrawlError::TagTable("empty tag name".into()));
            }
            if !seen.insert(name.clone()) {
                return Err(CrawlError::TagTable(format!("duplicate tag '{}'", name)));
            }
            let phrases: Vec<String> = rule
                .phrases
                .iter()
                .map(|p| p.trim().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect();
            if phrases.is_empty() {
                return Err(CrawlError::TagTable(format!(
                    "tag '{}' has no trigger phrases",
                    name
                )));
            }
            normalized.push(TagRule { name, phrases });
        }

        Ok(TagTable {
            rules: normalized,
            mode,
        })
    }

    /// Build from a `[tags]` config table.
    pub fn from_map(map: BTreeMap<String, Vec<String>>, mode: MatchMode) -> Result<Self> {
        let rules = map
            .into_iter()
            .map(|(name, phrases)| TagRule { name, phrases })
            .collect();
        Self::new(rules, mode)
    }

    pub fn with_mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn rules(&self) -> &[TagRule] {
        &self.rules
    }

    /// Every tag with at least one trigger phrase in `text` + `context`.
    pub fn tags_for(&self, text: &str, context: &str) -> BTreeSet<String> {
        let haystack = format!("{} {}", text, context).to_lowercase();
        self.rules
            .iter()
            .filter(|rule| {
                rule.phrases
                    .iter()
                    .any(|p| contains_phrase(&haystack, p, self.mode))
            })
            .map(|rule| rule.name.clone())
            .collect()
    }
}

/// `haystack` and `phrase` are expected to be lower-cased already.
pub fn contains_phrase(haystack: &str, phrase: &str, mode: MatchMode) -> bool {
    match mode {
        MatchMode::Substring => haystack.contains(phrase),
        MatchMode::WholeWord => {
            // Step one char at a time so overlapping occurrences are all tried.
            let mut from = 0;
            while let Some(pos) = haystack[from..].find(phrase) {
                let start = from + pos;
                let before = haystack[..start].chars().next_back();
                let after = haystack[start + phrase.len()..].chars().next();
                if !before.is_some_and(char::is_alphanumeric)
                    && !after.is_some_and(char::is_alphanumeric)
                {
                    return true;
                }
                match haystack[start..].chars().next() {
                    Some(c) => from = start + c.len_utf8(),
                    None => break,
                }
            }
            false
        }
    }
}

// ── Tests ──
