//! Binary entrypoint for the recruitment announcement crawler.
//!
//! Wires the CLI to the pipeline: a one-shot crawl (optionally dumped as
//! JSON instead of imported), the recurring scheduler daemon, or a quick
//! look at what the store currently holds.

use std::str::FromStr;

use anyhow::Context;
use clap::Parser;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;
use tracing_subscriber::{fmt as tfmt, EnvFilter};

use gov_job_crawler::cli::{Cli, Command};
use gov_job_crawler::config::{CrawlConfig, ScheduleConfig, TriggerKind};
use gov_job_crawler::scheduler::CrawlScheduler;
use gov_job_crawler::{importer, orchestrator};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let args = Cli::parse();

    let pool = connect(&args.database_url).await?;
    importer::ensure_schema(&pool)
        .await
        .context("could not initialize announcement schema")?;

    match args.command {
        Command::Crawl { days, all, dump_json } => {
            let config = CrawlConfig {
                lookback_days: if all { None } else { Some(days) },
                max_pages: args.max_pages,
            };

            if dump_json {
                let batch = orchestrator::collect_all(&config).await;
                println!("{}", serde_json::to_string_pretty(&batch)?);
            } else {
                let inserted = orchestrator::run_all(&pool, &config).await;
                info!(inserted, "crawl complete");
                println!("Imported {inserted} new announcements.");
            }
        }

        Command::Serve {
            days,
            cron_hour,
            interval_hours,
        } => {
            let schedule = ScheduleConfig {
                kind: if interval_hours.is_some() {
                    TriggerKind::Interval
                } else {
                    TriggerKind::Cron
                },
                cron_hour,
                interval_hours: interval_hours.unwrap_or(24),
                lookback_days: days,
            };

            let mut scheduler = CrawlScheduler::start(pool, schedule, args.max_pages)
                .await
                .context("could not start crawl scheduler")?;

            let status = scheduler.status().await?;
            info!(trigger = %status.trigger, next_run = ?status.next_run_time, "scheduler running; press Ctrl-C to stop");

            tokio::signal::ctrl_c()
                .await
                .context("could not listen for shutdown signal")?;
            scheduler.shutdown().await?;
        }

        Command::Status { limit } => {
            let total = importer::count_announcements(&pool).await?;
            println!("{total} announcements stored.");
            for ann in importer::recent_announcements(&pool, limit).await? {
                println!("{}  [{}] {}  {}", ann.publish_date, ann.source, ann.title, ann.url);
            }
        }
    }

    Ok(())
}

async fn connect(database_url: &str) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("invalid database url {database_url:?}"))?
        .create_if_missing(true);

    SqlitePoolOptions::new()
        .connect_with(options)
        .await
        .context("could not open announcement database")
}
