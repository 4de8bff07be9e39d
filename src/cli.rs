//! Command-line interface definitions.
//!
//! This module defines the CLI arguments and options using the `clap`
//! crate. Options shared by every command (database URL, page bound) live
//! on the top level and can also come from the environment.

use clap::{Parser, Subcommand};

use crate::config::{DEFAULT_CRON_HOUR, DEFAULT_LOOKBACK_DAYS, DEFAULT_MAX_PAGES};

/// Command-line arguments for the crawler.
///
/// # Examples
///
/// ```sh
/// # One-shot incremental crawl, last 7 days
/// gov_job_crawler crawl
///
/// # Full crawl of everything the sources still list
/// gov_job_crawler crawl --all
///
/// # Print the batches as JSON instead of importing
/// gov_job_crawler crawl --dump-json
///
/// # Run the recurring scheduler (daily at 02:00 by default)
/// gov_job_crawler serve
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// SQLite database URL for the announcement store
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:announcements.db")]
    pub database_url: String,

    /// Safety bound on pages fetched per source
    #[arg(long, env = "CRAWL_MAX_PAGES", default_value_t = DEFAULT_MAX_PAGES)]
    pub max_pages: u32,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Crawl all sources once and import the results
    Crawl {
        /// Only keep records published within the last N days
        #[arg(short, long, default_value_t = DEFAULT_LOOKBACK_DAYS)]
        days: u32,

        /// Crawl the full listings with no date cutoff
        #[arg(long, conflicts_with = "days")]
        all: bool,

        /// Print the crawled batches as JSON to stdout instead of importing
        #[arg(long)]
        dump_json: bool,
    },

    /// Run the recurring crawl scheduler until interrupted
    Serve {
        /// Lookback window bound to the scheduled job, in days
        #[arg(short, long, default_value_t = DEFAULT_LOOKBACK_DAYS)]
        days: u32,

        /// Hour of day for the daily cron trigger
        #[arg(long, default_value_t = DEFAULT_CRON_HOUR)]
        cron_hour: u32,

        /// Fire every N hours instead of the daily cron trigger
        #[arg(long, conflicts_with = "cron_hour")]
        interval_hours: Option<u32>,
    },

    /// Show stored announcement counts and the most recent entries
    Status {
        /// How many recent announcements to list
        #[arg(short, long, default_value_t = 10)]
        limit: i64,
    },
}
