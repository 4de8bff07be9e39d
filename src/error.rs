//! Error taxonomy for the crawl-and-import pipeline.
//!
//! Failures here are deliberately coarse: a fetch failure ends one source's
//! pagination early, an import failure zeroes one source's contribution for
//! the run, and a scheduler failure surfaces to the caller of the scheduler
//! API. None of them terminate the recurring job — the timer always survives
//! to its next firing. Malformed pages are not an error at all; they parse
//! to zero records, which the spider treats as end of listing.

use thiserror::Error;

/// A page retrieval failure, transport-level or HTTP-level.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network or protocol error from the HTTP client.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("unexpected status {status} fetching {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Headless browser launch, navigation, or extraction failure.
    #[error("browser fetch failed: {0}")]
    Browser(String),
}

/// A storage failure during batch import or a store query.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// A failure while managing the recurring crawl job.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("scheduler error: {0}")]
    Scheduler(#[from] tokio_cron_scheduler::JobSchedulerError),
}
