//! Recurring crawl scheduling.
//!
//! [`CrawlScheduler`] owns one standing job bound to the orchestrator. The
//! job's trigger (daily cron or fixed interval) and its bound lookback
//! window live in one piece of state and are always replaced together;
//! reconfiguring only the trigger while the old lookback stays bound is
//! exactly the inconsistency this type exists to prevent.
//!
//! At most one orchestrator run is in flight at a time: scheduled firings
//! and on-demand triggers contend on a shared gate, and whichever finds it
//! held logs the skip and contributes nothing. On-demand triggers run
//! out-of-band and never disturb the standing timer.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::sqlite::SqlitePool;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::{CrawlConfig, ScheduleConfig, TriggerKind};
use crate::error::SchedulerError;
use crate::orchestrator;

/// Snapshot of the standing job, as exposed to the status query.
#[derive(Debug, Clone, Serialize)]
pub struct SchedulerStatus {
    /// When the recurring trigger next fires, if the scheduler knows.
    pub next_run_time: Option<DateTime<Utc>>,
    /// Human-readable trigger description.
    pub trigger: String,
    /// Lookback window currently bound to the job.
    pub lookback_days: u32,
}

struct JobState {
    job_id: Uuid,
    config: ScheduleConfig,
}

/// Process-wide scheduler for the recurring crawl job.
pub struct CrawlScheduler {
    scheduler: JobScheduler,
    pool: SqlitePool,
    max_pages: u32,
    state: Arc<Mutex<JobState>>,
    run_gate: Arc<Mutex<()>>,
}

impl CrawlScheduler {
    /// Begin the recurring timer with the given schedule.
    pub async fn start(
        pool: SqlitePool,
        config: ScheduleConfig,
        max_pages: u32,
    ) -> Result<Self, SchedulerError> {
        let scheduler = JobScheduler::new().await?;
        let run_gate = Arc::new(Mutex::new(()));

        let job = make_job(&pool, &run_gate, max_pages, &config)?;
        let job_id = scheduler.add(job).await?;
        scheduler.start().await?;

        info!(trigger = %config.trigger_description(), lookback_days = config.lookback_days,
            "crawl scheduler started");

        Ok(Self {
            scheduler,
            pool,
            max_pages,
            state: Arc::new(Mutex::new(JobState { job_id, config })),
            run_gate,
        })
    }

    /// Run a crawl immediately, out-of-band from the recurring schedule.
    ///
    /// Returns the number of announcements imported, or 0 when another run
    /// is already in flight (the trigger is then a no-op).
    pub async fn trigger_now(&self, lookback_days: Option<u32>) -> u64 {
        let config = CrawlConfig {
            lookback_days,
            max_pages: self.max_pages,
        };
        run_guarded(&self.pool, &self.run_gate, &config).await
    }

    /// Atomically replace the recurring trigger and its bound lookback
    /// window with a new schedule.
    pub async fn reconfigure(&self, config: ScheduleConfig) -> Result<(), SchedulerError> {
        let mut state = self.state.lock().await;

        let job = make_job(&self.pool, &self.run_gate, self.max_pages, &config)?;
        let new_id = self.scheduler.add(job).await?;
        if let Err(e) = self.scheduler.remove(&state.job_id).await {
            warn!(error = %e, "could not remove superseded crawl job");
        }

        state.job_id = new_id;
        state.config = config;
        info!(trigger = %config.trigger_description(), lookback_days = config.lookback_days,
            "crawl schedule reconfigured");
        Ok(())
    }

    /// Read-only snapshot of the standing job.
    pub async fn status(&self) -> Result<SchedulerStatus, SchedulerError> {
        let state = self.state.lock().await;
        let mut scheduler = self.scheduler.clone();
        let next_run_time = scheduler.next_tick_for_job(state.job_id).await?;

        Ok(SchedulerStatus {
            next_run_time,
            trigger: state.config.trigger_description(),
            lookback_days: state.config.lookback_days,
        })
    }

    /// Cancel the recurring timer. An in-flight run finishes on its own.
    pub async fn shutdown(&mut self) -> Result<(), SchedulerError> {
        self.scheduler.shutdown().await?;
        info!("crawl scheduler shut down");
        Ok(())
    }
}

/// Run the orchestrator unless another run already holds the gate.
async fn run_guarded(pool: &SqlitePool, gate: &Mutex<()>, config: &CrawlConfig) -> u64 {
    match gate.try_lock() {
        Ok(_guard) => orchestrator::run_all(pool, config).await,
        Err(_) => {
            warn!("a crawl run is already in flight; skipping this trigger");
            0
        }
    }
}

/// Build the standing job for a schedule, binding the lookback window into
/// the job's closure so trigger and arguments travel together.
fn make_job(
    pool: &SqlitePool,
    gate: &Arc<Mutex<()>>,
    max_pages: u32,
    config: &ScheduleConfig,
) -> Result<Job, SchedulerError> {
    let pool = pool.clone();
    let gate = Arc::clone(gate);
    let crawl = CrawlConfig {
        lookback_days: Some(config.lookback_days),
        max_pages,
    };

    let runner = move |_uuid, _lock| {
        let pool = pool.clone();
        let gate = Arc::clone(&gate);
        Box::pin(async move {
            info!("scheduled crawl firing");
            let inserted = run_guarded(&pool, &gate, &crawl).await;
            info!(inserted, "scheduled crawl finished");
        }) as std::pin::Pin<Box<dyn std::future::Future<Output = ()> + Send>>
    };

    let job = match config.kind {
        TriggerKind::Cron => {
            // sec min hour day month weekday
            let schedule = format!("0 0 {} * * *", config.cron_hour);
            Job::new_async(schedule.as_str(), runner)?
        }
        TriggerKind::Interval => {
            let period = std::time::Duration::from_secs(u64::from(config.interval_hours) * 3600);
            Job::new_repeated_async(period, runner)?
        }
    };

    Ok(job)
}
