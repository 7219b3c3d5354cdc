use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("could not parse {url}: {message}")]
    Parse { url: String, message: String },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("bad site list {}: {message}", path.display())]
    SiteList { path: PathBuf, message: String },

    #[error("invalid tag table: {0}")]
    TagTable(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] config::ConfigError),
}

impl CrawlError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CrawlError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = CrawlError> = std::result::Result<T, E>;
