//! Crawl orchestration across all configured sources.
//!
//! A run walks sources sequentially: crawl one source to completion, hand
//! its batch to the importer, add up whatever got inserted. Any source
//! failing — at construction, mid-crawl, or at import — contributes zero
//! and is logged; the run itself never aborts.

use sqlx::sqlite::SqlitePool;
use tracing::{error, info, instrument};

use crate::config::CrawlConfig;
use crate::cutoff::cutoff_from_lookback;
use crate::importer;
use crate::models::Announcement;
use crate::sources::{beijing_rsj::BeijingRsjSource, mohrss::MohrssSource, JobSource};
use crate::spider::crawl_source;

/// Construct the production source set.
///
/// Sources that fail to construct (an HTTP client that will not build) are
/// logged and left out rather than failing the run.
pub fn default_sources() -> Vec<Box<dyn JobSource>> {
    let mut sources: Vec<Box<dyn JobSource>> = Vec::new();

    match BeijingRsjSource::new() {
        Ok(source) => sources.push(Box::new(source)),
        Err(e) => error!(error = %e, "could not construct beijing_rsj source"),
    }
    sources.push(Box::new(MohrssSource::new()));

    sources
}

/// Run every configured source through the importer, returning the total
/// number of newly inserted announcements.
#[instrument(level = "info", skip_all, fields(lookback_days = ?config.lookback_days))]
pub async fn run_all(pool: &SqlitePool, config: &CrawlConfig) -> u64 {
    run_sources(pool, &default_sources(), config).await
}

/// Orchestrate an explicit source set. Split out from [`run_all`] so tests
/// can drive the full pipeline with stub sources.
pub async fn run_sources(
    pool: &SqlitePool,
    sources: &[Box<dyn JobSource>],
    config: &CrawlConfig,
) -> u64 {
    let cutoff = cutoff_from_lookback(config.lookback_days);
    let mut total_inserted = 0u64;

    for source in sources {
        let batch = crawl_source(source.as_ref(), cutoff, config.max_pages).await;

        match importer::import_batch(pool, &batch).await {
            Ok(inserted) => {
                info!(
                    source = source.name(),
                    crawled = batch.len(),
                    inserted,
                    "source imported"
                );
                total_inserted += inserted;
            }
            Err(e) => {
                error!(source = source.name(), error = %e, "import failed; source contributes 0");
            }
        }
    }

    info!(total_inserted, "crawl run finished");
    total_inserted
}

/// Crawl every configured source without importing, returning the combined
/// batches. Backs the CLI's `--dump-json` mode, which emits batches in the
/// spider/importer wire shape instead of writing to the store.
pub async fn collect_all(config: &CrawlConfig) -> Vec<Announcement> {
    let cutoff = cutoff_from_lookback(config.lookback_days);
    let mut all = Vec::new();

    for source in default_sources() {
        let batch = crawl_source(source.as_ref(), cutoff, config.max_pages).await;
        all.extend(batch);
    }

    all
}
