use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;
use crate::tags::{MatchMode, TagTable};

/// Picked up from the working directory when `--config` is not given.
const DEFAULT_CONFIG: &str = "health_crawler";
const ENV_PREFIX: &str = "HEALTH_CRAWLER";

pub const DEFAULT_USER_AGENT: &str = "Educational-Health-Crawler/1.0 (Learning Purpose)";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        FetchSettings {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BatchSettings {
    /// Pause between two site fetches.
    pub delay_secs: f64,
    pub max_sites: usize,
    /// Holds the `us-<state>.csv` site lists.
    pub data_dir: PathBuf,
}

impl Default for BatchSettings {
    fn default() -> Self {
        BatchSettings {
            delay_secs: 2.0,
            max_sites: 5,
            data_dir: PathBuf::from("data/state_websites"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub fetch: FetchSettings,
    pub batch: BatchSettings,
    pub output_dir: PathBuf,
    pub context_words: usize,
    pub tag_match: MatchMode,
    /// Replaces the built-in tag table when present.
    pub tags: Option<BTreeMap<String, Vec<String>>>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            fetch: FetchSettings::default(),
            batch: BatchSettings::default(),
            output_dir: PathBuf::from("output"),
            context_words: crate::context::DEFAULT_WORDS_AROUND,
            tag_match: MatchMode::Substring,
            tags: None,
        }
    }
}

impl Settings {
    /// Defaults, then the TOML file, then `HEALTH_CRAWLER_*` env vars
    /// (`__` separates nested keys: `HEALTH_CRAWLER_BATCH__DELAY_SECS`).
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let file_source = match file {
            Some(path) => File::from(path),
            None => File::with_name(DEFAULT_CONFIG).required(false),
        };

        let settings = Config::builder()
            .add_source(file_source)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    pub fn tag_table(&self) -> Result<TagTable> {
        match &self.tags {
            Some(map) => TagTable::from_map(map.clone(), self.tag_match),
            None => Ok(TagTable::default().with_mode(self.tag_match)),
        }
    }
}

// ── Tests ──
