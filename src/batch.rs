use std::collections::BTreeMap;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::extract::Extractor;
use crate::fetch::PageSource;
use crate::model::{Category, PageResult};
use crate::sites::SiteRecord;

/// A site's list metadata together with what was found on its page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteCrawl {
    pub county: String,
    pub department_name: String,
    pub population: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(flatten)]
    pub page: PageResult,
}

impl SiteCrawl {
    fn new(site: &SiteRecord, page: PageResult) -> Self {
        SiteCrawl {
            county: site.county.clone(),
            department_name: site.department_name.clone(),
            population: site.population_or_unknown().to_string(),
            category: site.category.clone(),
            page,
        }
    }
}

/// Crawl up to `max_sites` sites one after another, pausing `delay` between them.
///
/// A site that fails to fetch is recorded with its error and the run goes on.
pub async fn crawl_sites<S: PageSource>(
    source: &S,
    extractor: &Extractor<'_>,
    sites: &[SiteRecord],
    max_sites: usize,
    delay: Duration,
) -> Vec<SiteCrawl> {
    let sites = &sites[..sites.len().min(max_sites)];
    let total = sites.len();

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );

    let mut results = Vec::with_capacity(total);
    for (i, site) in sites.iter().enumerate() {
        pb.set_message(site.county.clone());
        info!(
            "[{}/{}] {} ({}) {}",
            i + 1,
            total,
            site.county,
            site.department_name,
            site.website_url
        );

        let fetched = source.fetch(&site.website_url).await;
        let page = extractor.extract_fetched(fetched, &site.website_url);
        match &page.error {
            Some(e) => warn!("Error crawling {}: {}", site.county, e),
            None => info!("Found {} resources", page.resources.len()),
        }
        results.push(SiteCrawl::new(site, page));
        pb.inc(1);

        if i + 1 < total && !delay.is_zero() {
            info!("Waiting {:.1} seconds...", delay.as_secs_f64());
            tokio::time::sleep(delay).await;
        }
    }

    pb.finish_and_clear();
    results
}

/// Aggregate view over one batch run.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub sites: usize,
    pub successful: usize,
    pub total_resources: usize,
    pub by_category: BTreeMap<Category, usize>,
    pub by_tag: BTreeMap<String, usize>,
    /// Successful sites by resource count, highest first; ties keep crawl order.
    pub ranking: Vec<(String, usize)>,
    /// (county, cause) for every failed site.
    pub failures: Vec<(String, String)>,
}

impl BatchSummary {
    pub fn from_results(results: &[SiteCrawl]) -> Self {
        let mut summary = BatchSummary {
            sites: results.len(),
            ..Default::default()
        };

        for r in results {
            if let Some(e) = &r.page.error {
                summary.failures.push((r.county.clone(), e.clone()));
                continue;
            }
            summary.successful += 1;
            summary.total_resources += r.page.resources.len();
            summary
                .ranking
                .push((r.county.clone(), r.page.resources.len()));
            for (category, n) in r.page.count_by_category() {
                *summary.by_category.entry(category).or_insert(0) += n;
            }
            for tag in r.page.resources.iter().flat_map(|res| &res.tags) {
                *summary.by_tag.entry(tag.clone()).or_insert(0) += 1;
            }
        }

        summary.ranking.sort_by(|a, b| b.1.cmp(&a.1));
        summary
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn print(&self) {
        println!("\n=== BATCH CRAWLING SUMMARY ===");
        println!("Total sites processed: {}", self.sites);
        println!("Successful crawls: {}", self.successful);
        println!("Failed crawls: {}", self.failed());

        if self.successful == 0 {
            return;
        }
        println!("Total resources found: {}", self.total_resources);

        println!("\nResources by category:");
        for (category, n) in &self.by_category {
            println!("  {}: {}", category.as_str(), n);
        }

        println!("\nTop counties by resources:");
        for (county, n) in self.ranking.iter().take(5) {
            println!("  {}: {} resources", county, n);
        }
    }
}

// ── Tests ──
