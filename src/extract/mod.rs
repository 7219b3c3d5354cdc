pub mod addresses;
pub mod facilities;
pub mod phones;

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::context::{context_window, DEFAULT_WORDS_AROUND};
use crate::document::Document;
use crate::error::CrawlError;
use crate::model::PageResult;
use crate::tags::TagTable;

/// Runs every matcher over a page and tags what they find.
pub struct Extractor<'a> {
    tags: &'a TagTable,
    words_around: usize,
}

impl<'a> Extractor<'a> {
    pub fn new(tags: &'a TagTable) -> Self {
        Extractor {
            tags,
            words_around: DEFAULT_WORDS_AROUND,
        }
    }

    pub fn with_words_around(mut self, words_around: usize) -> Self {
        self.words_around = words_around;
        self
    }

    /// Phones, then addresses, then facilities.
    pub fn extract<D: Document + ?Sized>(&self, doc: &D, url: &str) -> PageResult {
        let mut resources = phones::extract(doc, self);
        let phone_count = resources.len();
        resources.extend(addresses::extract(doc, self));
        let address_count = resources.len() - phone_count;
        resources.extend(facilities::extract(doc, self));

        debug!(
            "{}: {} phones, {} addresses, {} facilities",
            url,
            phone_count,
            address_count,
            resources.len() - phone_count - address_count
        );
        if resources.is_empty() && doc.full_text().trim().is_empty() {
            warn!("{}: no visible text, page may be rendered by script", url);
        }
        PageResult::new(url, resources)
    }

    /// A page that never arrived becomes an empty, error-marked result.
    pub fn extract_fetched<D: Document>(
        &self,
        fetched: Result<D, CrawlError>,
        url: &str,
    ) -> PageResult {
        match fetched {
            Ok(doc) => self.extract(&doc, url),
            Err(e) => PageResult::failed(url, e),
        }
    }

    /// Context window around `value` in `surrounding`, and the tags it earns.
    fn enrich(&self, value: &str, surrounding: &str) -> (String, BTreeSet<String>) {
        let excerpt = context_window(surrounding, value, self.words_around);
        let tags = self.tags.tags_for(value, &excerpt);
        (excerpt, tags)
    }
}

// ── Tests ──
