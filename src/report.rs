use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use tracing::info;

use crate::batch::{BatchSummary, SiteCrawl};
use crate::csv::write_row;
use crate::error::{CrawlError, Result};
use crate::model::{Category, PageResult, ResourceType};

const SUMMARY_HEADER: &[&str] = &[
    "County",
    "Department",
    "URL",
    "Phones Found",
    "Addresses Found",
    "Facilities Found",
    "Total Resources",
    "Status",
];

#[derive(Debug, Serialize)]
pub struct CrawlInfo {
    pub state: String,
    pub timestamp: DateTime<Utc>,
    pub total_sites: usize,
    pub successful_crawls: usize,
}

#[derive(Debug, Serialize)]
pub struct BatchReport<'a> {
    pub crawl_info: CrawlInfo,
    pub results: &'a [SiteCrawl],
}

/// File-name stamp shared by all outputs of one run, e.g. `20261015_142501`.
pub fn file_stamp() -> String {
    Local::now().format("%Y%m%d_%H%M%S").to_string()
}

fn create(dir: &Path, name: &str) -> Result<(PathBuf, BufWriter<fs::File>)> {
    fs::create_dir_all(dir).map_err(|e| CrawlError::io(dir, e))?;
    let path = dir.join(name);
    let file = fs::File::create(&path).map_err(|e| CrawlError::io(&path, e))?;
    Ok((path, BufWriter::new(file)))
}

fn write_json<T: Serialize>(dir: &Path, name: &str, value: &T) -> Result<PathBuf> {
    let (path, mut out) = create(dir, name)?;
    serde_json::to_writer_pretty(&mut out, value)?;
    out.flush().map_err(|e| CrawlError::io(&path, e))?;
    Ok(path)
}

pub fn write_page_json(dir: &Path, stamp: &str, page: &PageResult) -> Result<PathBuf> {
    let path = write_json(dir, &format!("categorized_results_{}.json", stamp), page)?;
    info!("Results saved to: {}", path.display());
    Ok(path)
}

pub fn write_batch_json(
    dir: &Path,
    state: &str,
    stamp: &str,
    results: &[SiteCrawl],
) -> Result<PathBuf> {
    let report = BatchReport {
        crawl_info: CrawlInfo {
            state: state.to_uppercase(),
            timestamp: Utc::now(),
            total_sites: results.len(),
            successful_crawls: results.iter().filter(|r| r.page.is_success()).count(),
        },
        results,
    };
    let path = write_json(dir, &format!("batch_{}_{}.json", state.to_lowercase(), stamp), &report)?;
    info!("Detailed results: {}", path.display());
    Ok(path)
}

/// One row per site with per-type counts; failed sites report zeros.
pub fn write_summary_csv(
    dir: &Path,
    state: &str,
    stamp: &str,
    results: &[SiteCrawl],
) -> Result<PathBuf> {
    let name = format!("batch_{}_summary_{}.csv", state.to_lowercase(), stamp);
    let (path, mut out) = create(dir, &name)?;
    let io_err = |e| CrawlError::io(&path, e);

    write_row(&mut out, SUMMARY_HEADER, ',').map_err(io_err)?;
    for r in results {
        let page = &r.page;
        let (counts, status) = if page.is_success() {
            (
                [
                    page.count_by_type(ResourceType::PhoneNumber),
                    page.count_by_type(ResourceType::Address),
                    page.count_by_type(ResourceType::FacilityName),
                    page.resources.len(),
                ],
                "SUCCESS",
            )
        } else {
            ([0; 4], "ERROR")
        };

        let mut row = vec![r.county.clone(), r.department_name.clone(), page.url.clone()];
        row.extend(counts.iter().map(|n| n.to_string()));
        row.push(status.to_string());
        write_row(&mut out, row.as_slice(), ',').map_err(io_err)?;
    }
    out.flush().map_err(io_err)?;

    info!("Summary CSV: {}", path.display());
    Ok(path)
}

pub fn write_text_report(
    dir: &Path,
    state: &str,
    stamp: &str,
    results: &[SiteCrawl],
) -> Result<PathBuf> {
    let name = format!("batch_{}_report_{}.txt", state.to_lowercase(), stamp);
    let (path, mut out) = create(dir, &name)?;
    let text = render_batch(state, &BatchSummary::from_results(results));
    out.write_all(text.as_bytes())
        .and_then(|_| out.flush())
        .map_err(|e| CrawlError::io(&path, e))?;

    info!("Text report: {}", path.display());
    Ok(path)
}

pub fn render_batch(state: &str, summary: &BatchSummary) -> String {
    let mut s = String::new();
    let _ = writeln!(s, "BATCH CRAWLING REPORT - {}", state.to_uppercase());
    let _ = writeln!(s, "{}\n", "=".repeat(50));
    let _ = writeln!(s, "Crawled: {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(s, "Total Sites: {}", summary.sites);
    let _ = writeln!(s, "Successful: {}", summary.successful);
    let _ = writeln!(s, "Failed: {}\n", summary.failed());

    let _ = writeln!(s, "SUMMARY STATISTICS");
    let _ = writeln!(s, "{}", "-".repeat(20));
    let _ = writeln!(s, "Total Resources Found: {}", summary.total_resources);
    for (category, n) in &summary.by_category {
        let _ = writeln!(s, "{}: {}", category.as_str(), n);
    }

    if !summary.by_tag.is_empty() {
        let _ = writeln!(s, "\nRESOURCES BY TAG");
        let _ = writeln!(s, "{}", "-".repeat(16));
        for (tag, n) in &summary.by_tag {
            let _ = writeln!(s, "{}: {}", tag, n);
        }
    }

    let _ = writeln!(s, "\nTOP COUNTIES BY RESOURCES FOUND");
    let _ = writeln!(s, "{}", "-".repeat(35));
    for (county, n) in &summary.ranking {
        let _ = writeln!(s, "{}: {} resources", county, n);
    }

    if !summary.failures.is_empty() {
        let _ = writeln!(s, "\nFAILED CRAWLS");
        let _ = writeln!(s, "{}", "-".repeat(15));
        for (county, cause) in &summary.failures {
            let _ = writeln!(s, "{}: {}", county, cause);
        }
    }

    let _ = writeln!(s, "\nDetailed results available in JSON format.");
    s
}

/// Console view of one page, grouped by category.
pub fn render_page(page: &PageResult) -> String {
    let mut s = String::new();
    let _ = writeln!(s, "\n--- Categorized Results for {} ---", page.url);
    let _ = writeln!(s, "Crawled at: {}", page.timestamp.to_rfc3339());

    if let Some(e) = &page.error {
        let _ = writeln!(s, "  Error: {}", e);
        return s;
    }
    if page.resources.is_empty() {
        let _ = writeln!(s, "  No categorized resources found.");
        return s;
    }

    let mut by_category: BTreeMap<Category, Vec<_>> = BTreeMap::new();
    for r in &page.resources {
        by_category.entry(r.category).or_default().push(r);
    }
    for (category, items) in by_category {
        let _ = writeln!(s, "\n{} ({} items):", category.as_str(), items.len());
        for item in items {
            let tags = if item.tags.is_empty() {
                "general".to_string()
            } else {
                item.tags.iter().cloned().collect::<Vec<_>>().join(", ")
            };
            let _ = writeln!(s, "  • {}", item.value);
            let _ = writeln!(s, "    Tags: {}", tags);
            let _ = writeln!(s, "    Confidence: {}", item.confidence);
        }
    }
    s
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::model::ResourceRecord;

    fn record(category: Category, kind: ResourceType, value: &str, tags: &[&str]) -> ResourceRecord {
        ResourceRecord {
            category,
            kind,
            value: value.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect::<BTreeSet<_>>(),
            context: "general content".to_string(),
            excerpt: String::new(),
            confidence: 0.8,
        }
    }

    fn crawls() -> Vec<SiteCrawl> {
        let ok = PageResult::new(
            "https://lane.example",
            vec![
                record(Category::ContactInfo, ResourceType::PhoneNumber, "541-682-3608", &["crisis_hotline", "crisis_services"]),
                record(Category::ContactInfo, ResourceType::PhoneNumber, "541-682-4041", &[]),
                record(Category::Facility, ResourceType::FacilityName, "Riverstone Clinic", &["clinic"]),
            ],
        );
        let failed = PageResult::failed("https://benton.example", "https://benton.example returned HTTP 503");
        vec![
            SiteCrawl {
                county: "Lane".into(),
                department_name: "Lane County Public Health".into(),
                population: "382971".into(),
                category: None,
                page: ok,
            },
            SiteCrawl {
                county: "Benton".into(),
                department_name: "Benton, County Health".into(),
                population: "Unknown".into(),
                category: None,
                page: failed,
            },
        ]
    }

    #[test]
    fn summary_csv_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_summary_csv(dir.path(), "OR", "20260101_000000", &crawls()).unwrap();
        assert!(path.ends_with("batch_or_summary_20260101_000000.csv"));

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], SUMMARY_HEADER.join(","));
        assert_eq!(lines[1], "Lane,Lane County Public Health,https://lane.example,2,0,1,3,SUCCESS");
        assert_eq!(lines[2], "Benton,\"Benton, County Health\",https://benton.example,0,0,0,0,ERROR");
    }

    #[test]
    fn batch_json_has_crawl_info() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_batch_json(&dir.path().join("out"), "or", "stamp", &crawls()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(json["crawl_info"]["state"], "OR");
        assert_eq!(json["crawl_info"]["total_sites"], 2);
        assert_eq!(json["crawl_info"]["successful_crawls"], 1);
        assert_eq!(json["results"][0]["resources"][0]["type"], "phone_number");
        assert_eq!(json["results"][1]["error"], "https://benton.example returned HTTP 503");
    }

    #[test]
    fn text_report_lists_failures_and_tags() {
        let summary = BatchSummary::from_results(&crawls());
        let text = render_batch("or", &summary);
        assert!(text.starts_with("BATCH CRAWLING REPORT - OR"));
        assert!(text.contains("Total Resources Found: 3"));
        assert!(text.contains("CONTACT_INFO: 2"));
        assert!(text.contains("crisis_hotline: 1"));
        assert!(text.contains("Lane: 3 resources"));
        assert!(text.contains("Benton: https://benton.example returned HTTP 503"));
    }

    #[test]
    fn page_view_groups_by_category() {
        let page = &crawls()[0].page;
        let view = render_page(page);
        assert!(view.contains("CONTACT_INFO (2 items):"));
        assert!(view.contains("FACILITY (1 items):"));
        assert!(view.contains("Tags: general"));
        assert!(view.contains("Tags: crisis_hotline, crisis_services"));
    }

    #[test]
    fn page_json_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_page_json(dir.path(), "stamp", &crawls()[0].page).unwrap();
        let back: PageResult = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(back.resources.len(), 3);
    }
}
