use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::csv::{parse_rows, sniff_separator};
use crate::error::{CrawlError, Result};

/// Accepted header names per field; the per-state lists and the national
/// list name their columns differently.
const LABEL_COLUMNS: &[&str] = &["county", "name"];
const DEPARTMENT_COLUMNS: &[&str] = &["department_name", "pha"];
const URL_COLUMNS: &[&str] = &["website_url", "pha_url"];
const POPULATION_COLUMNS: &[&str] = &["population", "population_proper"];
const CATEGORY_COLUMNS: &[&str] = &["category"];
const STATE_COLUMNS: &[&str] = &["state_id", "state"];

/// One health department to crawl.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteRecord {
    pub county: String,
    pub department_name: String,
    pub website_url: String,
    pub population: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl SiteRecord {
    pub fn population_or_unknown(&self) -> &str {
        self.population.as_deref().unwrap_or("Unknown")
    }
}

/// `<data_dir>/us-<state>.csv`
pub fn state_file(data_dir: &Path, state_code: &str) -> PathBuf {
    data_dir.join(format!("us-{}.csv", state_code.trim().to_lowercase()))
}

pub fn load_sites(path: &Path) -> Result<Vec<SiteRecord>> {
    let text = std::fs::read_to_string(path).map_err(|e| CrawlError::io(path, e))?;
    let sites = parse_sites(&text).map_err(|message| CrawlError::SiteList {
        path: path.to_path_buf(),
        message,
    })?;
    info!("Loaded {} health departments from {}", sites.len(), path.display());
    Ok(sites)
}

fn parse_sites(text: &str) -> std::result::Result<Vec<SiteRecord>, String> {
    let sep = sniff_separator(text.strip_prefix('\u{feff}').unwrap_or(text));
    let mut rows = parse_rows(text, sep).into_iter();
    let header: Vec<String> = rows
        .next()
        .ok_or("empty file")?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    let find = |names: &[&str]| header.iter().position(|h| names.contains(&h.as_str()));
    let url_col = find(URL_COLUMNS).ok_or("no website_url column")?;
    let label_col = find(LABEL_COLUMNS).ok_or("no county/name column")?;
    let department_col = find(DEPARTMENT_COLUMNS);
    let population_col = find(POPULATION_COLUMNS);
    let category_col = find(CATEGORY_COLUMNS);
    let state_col = find(STATE_COLUMNS);

    let mut sites = Vec::new();
    for (line, row) in rows.enumerate() {
        let cell = |col: Option<usize>| {
            col.and_then(|c| row.get(c))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let Some(website_url) = cell(Some(url_col)) else {
            // header is line 1
            warn!("Skipping row {}: no website URL", line + 2);
            continue;
        };
        let county = cell(Some(label_col)).unwrap_or_else(|| "Unknown".to_string());

        sites.push(SiteRecord {
            department_name: cell(department_col).unwrap_or_else(|| county.clone()),
            county,
            website_url,
            population: cell(population_col),
            category: cell(category_col),
            state: cell(state_col),
        });
    }

    Ok(sites)
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comma_layout() {
        let text = "county,department_name,website_url,population\n\
                    Lane,Lane County Public Health,https://lanecounty.org/health,382971\n\
                    Benton,Benton County Health,https://bentoncounty.gov/health,\n";
        let sites = parse_sites(text).unwrap();
        assert_eq!(sites.len(), 2);
        assert_eq!(sites[0].county, "Lane");
        assert_eq!(sites[0].population.as_deref(), Some("382971"));
        assert_eq!(sites[1].population_or_unknown(), "Unknown");
    }

    #[test]
    fn semicolon_national_layout() {
        let text = "\u{feff}name;parent_id;community_id;category;pha;population_proper;state_id;pha_url\n\
                    Eugene;1;10;city;Lane County Public Health;177923;OR;https://lanecounty.org/health\n";
        let sites = parse_sites(text).unwrap();
        assert_eq!(sites.len(), 1);
        let s = &sites[0];
        assert_eq!(s.county, "Eugene");
        assert_eq!(s.department_name, "Lane County Public Health");
        assert_eq!(s.website_url, "https://lanecounty.org/health");
        assert_eq!(s.category.as_deref(), Some("city"));
        assert_eq!(s.state.as_deref(), Some("OR"));
    }

    #[test]
    fn rows_without_url_are_skipped() {
        let text = "county,department_name,website_url\nLane,Lane Health,\nLinn,Linn Health,https://linn.example\n";
        let sites = parse_sites(text).unwrap();
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].county, "Linn");
    }

    #[test]
    fn missing_url_column_is_an_error() {
        assert!(parse_sites("county,department_name\nLane,Lane Health\n").is_err());
        assert!(parse_sites("").is_err());
    }

    #[test]
    fn state_file_name() {
        assert_eq!(
            state_file(Path::new("data"), "CA"),
            PathBuf::from("data/us-ca.csv")
        );
    }

    #[test]
    fn load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("us-or.csv");
        std::fs::write(&path, "county,department_name,website_url\nLane,Lane Health,https://lane.example\n").unwrap();
        let sites = load_sites(&path).unwrap();
        assert_eq!(sites[0].website_url, "https://lane.example");

        let missing = load_sites(&dir.path().join("us-xx.csv"));
        assert!(matches!(missing, Err(CrawlError::Io { .. })));
    }
}
