mod batch;
mod context;
mod csv;
mod document;
mod error;
mod extract;
mod fetch;
mod matchers;
mod model;
mod report;
mod settings;
mod sites;
mod split;
mod tags;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::extract::Extractor;
use crate::fetch::{Fetcher, PageSource};
use crate::settings::Settings;

#[derive(Parser)]
#[command(
    name = "health_crawler",
    about = "Find phone numbers, addresses and facilities on public health department websites"
)]
struct Cli {
    /// TOML config file (default: ./health_crawler.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl a single page and print what was found
    Page {
        url: String,
        /// Only print, don't write the JSON file
        #[arg(long)]
        no_save: bool,
    },
    /// Crawl a state's health departments from its site list
    Batch {
        /// Two-letter state code (e.g. ca, or, tx)
        state: String,
        /// Max sites to crawl (default from config)
        #[arg(short = 'n', long)]
        max_sites: Option<usize>,
        /// Seconds to wait between sites
        #[arg(short, long)]
        delay: Option<f64>,
        /// Site list to use instead of <data_dir>/us-<state>.csv
        #[arg(long)]
        sites: Option<PathBuf>,
    },
    /// Split the national site list into one file per state
    Split {
        /// `;`-separated national list (e.g. US.csv)
        input: PathBuf,
        /// Output directory (default: the configured data dir)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Show the active tag table
    Tags,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let table = settings.tag_table()?;
    let extractor = Extractor::new(&table).with_words_around(settings.context_words);

    match cli.command {
        Commands::Page { url, no_save } => {
            let fetcher = Fetcher::new(&settings.fetch)?;
            let page = extractor.extract_fetched(fetcher.fetch(&url).await, &url);
            print!("{}", report::render_page(&page));
            if !no_save && page.is_success() {
                report::write_page_json(&settings.output_dir, &report::file_stamp(), &page)?;
            }
        }
        Commands::Batch {
            state,
            max_sites,
            delay,
            sites: site_list,
        } => {
            let list = site_list.unwrap_or_else(|| sites::state_file(&settings.batch.data_dir, &state));
            let targets = sites::load_sites(&list)
                .with_context(|| format!("Failed to load site list for {}", state.to_uppercase()))?;
            if targets.is_empty() {
                println!("No websites in {}.", list.display());
                return Ok(());
            }

            let max_sites = max_sites.unwrap_or(settings.batch.max_sites);
            let delay = politeness_delay(delay.unwrap_or(settings.batch.delay_secs))?;
            println!(
                "Crawling {} of {} {} health departments...",
                max_sites.min(targets.len()),
                targets.len(),
                state.to_uppercase()
            );

            let fetcher = Fetcher::new(&settings.fetch)?;
            let results = batch::crawl_sites(
                &fetcher,
                &extractor,
                &targets,
                max_sites,
                delay,
            )
            .await;

            batch::BatchSummary::from_results(&results).print();

            let stamp = report::file_stamp();
            let out = &settings.output_dir;
            report::write_batch_json(out, &state, &stamp, &results)?;
            report::write_summary_csv(out, &state, &stamp, &results)?;
            report::write_text_report(out, &state, &stamp, &results)?;
            println!("\nReports written to {}", out.display());
        }
        Commands::Split { input, out } => {
            let out = out.unwrap_or_else(|| settings.batch.data_dir.clone());
            let written = split::split_by_state(&input, &out)
                .with_context(|| format!("Failed to split {}", input.display()))?;
            for f in &written {
                println!("  {}: {} rows -> {}", f.state, f.rows, f.path.display());
            }
            println!("Wrote {} state files.", written.len());
        }
        Commands::Tags => {
            println!("Match mode: {:?}", table.mode());
            for rule in table.rules() {
                println!("  {:<18} {}", rule.name, rule.phrases.join(", "));
            }
        }
    }

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    Ok(())
}

/// Negative delays mean no pause; infinite or oversized ones are rejected.
fn politeness_delay(secs: f64) -> anyhow::Result<Duration> {
    Duration::try_from_secs_f64(secs.max(0.0))
        .with_context(|| format!("Invalid delay between sites: {} seconds", secs))
}

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}

// ── Tests ──
