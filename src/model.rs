use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    ContactInfo,
    Location,
    Facility,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::ContactInfo => "CONTACT_INFO",
            Category::Location => "LOCATION",
            Category::Facility => "FACILITY",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    PhoneNumber,
    Address,
    FacilityName,
}

/// One finding on a page. Phone values are kept exactly as written on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceRecord {
    pub category: Category,
    #[serde(rename = "type")]
    pub kind: ResourceType,
    pub value: String,
    pub tags: BTreeSet<String>,
    /// Where on the page the match came from, e.g. "crisis services".
    pub context: String,
    /// Surrounding words the tags were derived from.
    pub excerpt: String,
    pub confidence: f32,
}

#[cfg(test)]
impl ResourceRecord {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResult {
    pub url: String,
    pub timestamp: DateTime<Utc>,
    pub resources: Vec<ResourceRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PageResult {
    pub fn new(url: &str, resources: Vec<ResourceRecord>) -> Self {
        PageResult {
            url: url.to_string(),
            timestamp: Utc::now(),
            resources,
            error: None,
        }
    }

    pub fn failed(url: &str, error: impl ToString) -> Self {
        PageResult {
            url: url.to_string(),
            timestamp: Utc::now(),
            resources: Vec::new(),
            error: Some(error.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn count_by_type(&self, kind: ResourceType) -> usize {
        self.resources.iter().filter(|r| r.kind == kind).count()
    }

    pub fn count_by_category(&self) -> BTreeMap<Category, usize> {
        let mut counts = BTreeMap::new();
        for r in &self.resources {
            *counts.entry(r.category).or_insert(0) += 1;
        }
        counts
    }
}

// ── Tests ──
