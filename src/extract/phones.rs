use crate::document::Document;
use crate::matchers::{find_phones, mentions_crisis};
use crate::model::{Category, ResourceRecord, ResourceType};

use super::Extractor;

/// (selector, where-on-the-page label). `body` last: it re-finds everything.
const SCOPES: &[(&str, &str)] = &[
    (".contact-info", "contact information"),
    (".emergency", "emergency services"),
    (".crisis", "crisis services"),
    (".appointment", "appointment scheduling"),
    ("body", "general content"),
];

const CONFIDENCE: f32 = 0.8;

pub const CRISIS_HOTLINE: &str = "crisis_hotline";

/// One record per number per scope; a number in two scopes yields two records.
pub fn extract<D: Document + ?Sized>(doc: &D, ex: &Extractor<'_>) -> Vec<ResourceRecord> {
    let mut records = Vec::new();

    for (selector, label) in SCOPES {
        for element in doc.select(selector) {
            for phone in find_phones(&element.text()) {
                let (excerpt, mut tags) = ex.enrich(&phone, element.parent_text());
                if mentions_crisis(&excerpt) {
                    tags.insert(CRISIS_HOTLINE.to_string());
                }
                records.push(ResourceRecord {
                    category: Category::ContactInfo,
                    kind: ResourceType::PhoneNumber,
                    value: phone,
                    tags,
                    context: label.to_string(),
                    excerpt,
                    confidence: CONFIDENCE,
                });
            }
        }
    }

    records
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::HtmlDocument;
    use crate::tags::TagTable;

    fn phones(html: &str) -> Vec<ResourceRecord> {
        let table = TagTable::default();
        extract(&HtmlDocument::parse(html), &Extractor::new(&table))
    }

    #[test]
    fn two_formats_in_body() {
        let records = phones("<body><p>Call us at 555-123-4567 or (555) 987-6543</p></body>");
        let values: Vec<&str> = records.iter().map(|r| r.value.as_str()).collect();
        assert_eq!(values, vec!["555-123-4567", "(555) 987-6543"]);
        assert!(records.iter().all(|r| r.kind == ResourceType::PhoneNumber));
        assert!(records.iter().all(|r| r.context == "general content"));
    }

    #[test]
    fn same_number_in_two_scopes_is_two_records() {
        let records = phones(
            r#"<body><div class="appointment">Book: 555-222-3333</div></body>"#,
        );
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].context, "appointment scheduling");
        assert_eq!(records[1].context, "general content");
        assert_eq!(records[0].value, records[1].value);
    }

    #[test]
    fn duplicates_within_one_block_collapse() {
        let records = phones("<body><p>555-222-3333 and again 555-222-3333</p></body>");
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn crisis_context_adds_hotline_tag() {
        let records = phones(
            r#"<body><div class="crisis"><p>24/7 crisis support: 555-273-8255</p></div></body>"#,
        );
        assert!(!records.is_empty());
        assert!(records.iter().all(|r| r.has_tag(CRISIS_HOTLINE)));
        assert!(records.iter().all(|r| r.has_tag("crisis_services")));
    }

    #[test]
    fn no_hotline_tag_without_crisis_words() {
        let records = phones("<body><p>Billing office 555-273-8255</p></body>");
        assert_eq!(records.len(), 1);
        assert!(!records[0].has_tag(CRISIS_HOTLINE));
    }

    #[test]
    fn suicide_context_counts_as_crisis() {
        let records = phones("<body><p>Suicide prevention lifeline 555-273-8255</p></body>");
        assert!(records[0].has_tag(CRISIS_HOTLINE));
    }
}
