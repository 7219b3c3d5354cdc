use crate::document::Document;
use crate::matchers::{facility_kind, looks_like_facility_name};
use crate::model::{Category, ResourceRecord, ResourceType};

use super::Extractor;

const SELECTORS: &[(&str, &str)] = &[
    ("h1, h2, h3", "heading"),
    (".facility-name", "explicit_facility"),
    (".clinic-name", "clinic_listing"),
    (".location-name", "location_listing"),
];

const CONFIDENCE: f32 = 0.6;

pub fn extract<D: Document + ?Sized>(doc: &D, ex: &Extractor<'_>) -> Vec<ResourceRecord> {
    let mut records = Vec::new();

    for (selector, label) in SELECTORS {
        for element in doc.select(selector) {
            let text = element.stripped_text();
            if !looks_like_facility_name(&text) {
                continue;
            }
            let (excerpt, mut tags) = ex.enrich(&text, element.parent_text());
            if let Some(kind) = facility_kind(&text) {
                tags.insert(kind.to_string());
            }
            records.push(ResourceRecord {
                category: Category::Facility,
                kind: ResourceType::FacilityName,
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

    fn facilities(html: &str) -> Vec<ResourceRecord> {
        let table = TagTable::default();
        extract(&HtmlDocument::parse(html), &Extractor::new(&table))
    }

    #[test]
    fn hospital_heading_gets_hospital_tag() {
        let records = facilities("<body><h2>St. Mary's Hospital</h2></body>");
        assert_eq!(records.len(), 1);
        assert!(records[0].has_tag("hospital"));
        assert_eq!(records[0].context, "heading");
    }

    #[test]
    fn plain_center_gets_no_kind_tag() {
        let records = facilities("<body><h1>Springfield Medical Center</h1></body>");
        assert_eq!(records.len(), 1);
        for kind in ["hospital", "clinic", "pharmacy"] {
            assert!(!records[0].has_tag(kind));
        }
    }

    #[test]
    fn kind_tags_are_exclusive() {
        let records = facilities(r#"<body><div class="clinic-name">Eastside Clinic Pharmacy</div></body>"#);
        assert!(records[0].has_tag("clinic"));
        assert!(!records[0].has_tag("pharmacy"));
        assert_eq!(records[0].context, "clinic_listing");
    }

    #[test]
    fn non_health_headings_skipped() {
        let records = facilities("<body><h1>Welcome</h1><h2>News</h2><h3>Contact Us</h3></body>");
        assert!(records.is_empty());
    }
}
