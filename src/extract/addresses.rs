use crate::document::Document;
use crate::matchers::looks_like_address;
use crate::model::{Category, ResourceRecord, ResourceType};

use super::Extractor;

const SELECTORS: &[(&str, &str)] = &[
    (".address", "facility_address"),
    (".location", "service_location"),
    (r#"[itemtype*="PostalAddress"]"#, "structured_address"),
    ("address", "html_address_tag"),
];

const CONFIDENCE: f32 = 0.7;

pub fn extract<D: Document + ?Sized>(doc: &D, ex: &Extractor<'_>) -> Vec<ResourceRecord> {
    let mut records = Vec::new();

    for (selector, label) in SELECTORS {
        for element in doc.select(selector) {
            let text = element.stripped_text();
            if !looks_like_address(&text) {
                continue;
            }
            let (excerpt, tags) = ex.enrich(&text, element.parent_text());
            records.push(ResourceRecord {
                category: Category::Location,
                kind: ResourceType::Address,
                value: text,
                tags,
                context: label.to_string(),
                excerpt,
                confidence: CONFIDENCE,
            });
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

    fn addresses(html: &str) -> Vec<ResourceRecord> {
        let table = TagTable::default();
        extract(&HtmlDocument::parse(html), &Extractor::new(&table))
    }

    #[test]
    fn each_selector_has_its_label() {
        let records = addresses(
            r#"<body>
                <div class="address">100 Oak Avenue, Salem</div>
                <div class="location">42 Pine Road, Eugene</div>
                <div itemscope itemtype="https://schema.org/PostalAddress">7 Elm Boulevard</div>
                <address>900 River Drive</address>
            </body>"#,
        );
        let labels: Vec<&str> = records.iter().map(|r| r.context.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "facility_address",
                "service_location",
                "structured_address",
                "html_address_tag"
            ]
        );
        assert!(records.iter().all(|r| r.category == Category::Location));
    }

    #[test]
    fn rejects_non_addresses() {
        let records = addresses(
            r#"<body><div class="location">Downtown</div><address>Main Street</address></body>"#,
        );
        assert!(records.is_empty());
    }

    #[test]
    fn value_is_stripped_text() {
        let records = addresses("<body><address>\n  123 Main Street\n  </address></body>");
        assert_eq!(records[0].value, "123 Main Street");
    }

    #[test]
    fn tags_come_from_surroundings() {
        let records = addresses(
            r#"<body><section><h3>Dental clinic</h3><div class="address">55 Maple Street</div></section></body>"#,
        );
        assert_eq!(records.len(), 1);
        assert!(records[0].has_tag("dental"));
    }
}
