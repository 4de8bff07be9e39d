//! # Gov Job Crawler
//!
//! An incremental crawl-and-import pipeline for government recruitment
//! announcements. Site-specific spiders paginate external listing sites,
//! apply a date-based cutoff so old pages are never re-fetched, and hand
//! their batches to an idempotent importer that deduplicates against the
//! announcement store by URL. A process-wide scheduler fires the whole
//! run on a cron or interval trigger and supports runtime
//! reconfiguration.
//!
//! ## Architecture
//!
//! ```text
//! Scheduler (cron 02:00 / every N hours, or trigger_now)
//!     └─► Orchestrator: for each source, sequentially
//!             └─► Spider: fetch page → parse records → cutoff check → next page
//!                     └─► Importer: one transactional batch, INSERT … ON CONFLICT(url) DO NOTHING
//! ```
//!
//! Failures stay local: a source that fails to fetch, parse, or import
//! contributes zero records to that run and the remaining sources carry
//! on. The recurring timer always survives to its next firing.

pub mod cli;
pub mod config;
pub mod cutoff;
pub mod error;
pub mod fetch;
pub mod importer;
pub mod models;
pub mod orchestrator;
pub mod scheduler;
pub mod sources;
pub mod spider;

pub use config::{CrawlConfig, ScheduleConfig, TriggerKind};
pub use models::{Announcement, RawRecord};
pub use scheduler::{CrawlScheduler, SchedulerStatus};
