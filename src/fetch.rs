use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::info;

use crate::document::HtmlDocument;
use crate::error::{CrawlError, Result};
use crate::settings::FetchSettings;

/// Anything that turns a URL into a parsed page.
#[allow(async_fn_in_trait)]
pub trait PageSource {
    async fn fetch(&self, url: &str) -> Result<HtmlDocument>;
}

/// Live HTTP fetcher. Identifies itself with the configured user agent.
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(settings: &FetchSettings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(settings.user_agent.as_str())
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(CrawlError::Client)?;
        Ok(Fetcher { client })
    }
}

impl PageSource for Fetcher {
    async fn fetch(&self, url: &str) -> Result<HtmlDocument> {
        info!("Fetching: {}", url);
        let request_error = |source| CrawlError::Request {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(request_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(CrawlError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_lowercase);
        if let Some(ct) = content_type.filter(|ct| !is_html(ct)) {
            return Err(CrawlError::Parse {
                url: url.to_string(),
                message: format!("unsupported content type {}", ct),
            });
        }

        let body = response.text().await.map_err(request_error)?;
        Ok(HtmlDocument::parse(&body))
    }
}

fn is_html(content_type: &str) -> bool {
    content_type.contains("html") || content_type.starts_with("text/")
}

// ── Tests ──
