use scraper::{ElementRef, Html, Selector};
use tracing::warn;

/// Text nodes under these never count as visible text.
const HIDDEN_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// Text snapshot of one selected element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    fragments: Vec<String>,
    parent_text: String,
}

impl Element {
    pub fn new(fragments: Vec<String>, parent_text: impl Into<String>) -> Self {
        Element {
            fragments,
            parent_text: parent_text.into(),
        }
    }

    /// Single text node whose parent holds `parent_text`.
    #[cfg(test)]
    pub fn from_text(text: impl Into<String>, parent_text: impl Into<String>) -> Self {
        Self::new(vec![text.into()], parent_text)
    }

    /// Visible text as-is.
    pub fn text(&self) -> String {
        self.fragments.concat()
    }

    /// Each text node trimmed, blanks dropped, glued without separator.
    pub fn stripped_text(&self) -> String {
        self.fragments
            .iter()
            .map(|f| f.trim())
            .filter(|f| !f.is_empty())
            .collect()
    }

    /// Visible text of the enclosing element, or of this one at the root.
    pub fn parent_text(&self) -> &str {
        &self.parent_text
    }
}

/// The read-only view of a fetched page the extractor works against.
pub trait Document {
    /// Elements matching a CSS selector, in document order.
    fn select(&self, query: &str) -> Vec<Element>;

    fn full_text(&self) -> String;
}

pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    pub fn parse(source: &str) -> Self {
        HtmlDocument {
            html: Html::parse_document(source),
        }
    }
}

impl Document for HtmlDocument {
    fn select(&self, query: &str) -> Vec<Element> {
        let selector = match Selector::parse(query) {
            Ok(s) => s,
            Err(e) => {
                warn!("Invalid selector {:?}: {}", query, e);
                return Vec::new();
            }
        };

        self.html
            .select(&selector)
            .map(|el| {
                let fragments = visible_fragments(el);
                let parent_text = el
                    .parent()
                    .and_then(ElementRef::wrap)
                    .map(|p| visible_fragments(p).concat())
                    .unwrap_or_else(|| fragments.concat());
                Element::new(fragments, parent_text)
            })
            .collect()
    }

    fn full_text(&self) -> String {
        visible_fragments(self.html.root_element()).concat()
    }
}

fn visible_fragments(el: ElementRef<'_>) -> Vec<String> {
    el.descendants()
        .filter_map(|node| {
            let text: &str = node.value().as_text()?;
            let hidden = node
                .ancestors()
                .filter_map(ElementRef::wrap)
                .any(|a| HIDDEN_TAGS.contains(&a.value().name()));
            (!hidden).then(|| text.to_string())
        })
        .collect()
}

// ── Tests ──
