//! Configuration for crawl runs and the recurring schedule.
//!
//! Two knobs govern a crawl run: the lookback window (how far back in time
//! records are still considered fresh) and the page-count safety bound.
//! The schedule configuration is owned by the scheduler and read by the
//! orchestrator at trigger time; reconfiguring it always replaces the
//! trigger and the bound lookback window together.

use serde::{Deserialize, Serialize};

/// Default lookback window for incremental crawls, in days.
pub const DEFAULT_LOOKBACK_DAYS: u32 = 7;

/// Default hour-of-day for the daily cron trigger.
pub const DEFAULT_CRON_HOUR: u32 = 2;

/// Upper bound on pages fetched per source, guarding against pagination
/// bugs and redirect loops.
pub const DEFAULT_MAX_PAGES: u32 = 50;

/// Per-run crawl settings.
#[derive(Debug, Clone, Copy)]
pub struct CrawlConfig {
    /// How many days back a record may be published and still be imported.
    /// `None` crawls the full listing with no cutoff.
    pub lookback_days: Option<u32>,
    /// Maximum pages fetched per source.
    pub max_pages: u32,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            lookback_days: Some(DEFAULT_LOOKBACK_DAYS),
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

/// Which kind of recurring trigger drives the crawl job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerKind {
    /// Fire once a day at a fixed hour.
    Cron,
    /// Fire every N hours.
    Interval,
}

/// The recurring schedule and the arguments bound to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    pub kind: TriggerKind,
    /// Hour of day for [`TriggerKind::Cron`].
    pub cron_hour: u32,
    /// Period in hours for [`TriggerKind::Interval`].
    pub interval_hours: u32,
    /// Lookback window bound to the scheduled job.
    pub lookback_days: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            kind: TriggerKind::Cron,
            cron_hour: DEFAULT_CRON_HOUR,
            interval_hours: 24,
            lookback_days: DEFAULT_LOOKBACK_DAYS,
        }
    }
}

impl ScheduleConfig {
    /// Human-readable trigger description, as reported by `status()`.
    pub fn trigger_description(&self) -> String {
        match self.kind {
            TriggerKind::Cron => format!("cron[hour={:02}:00]", self.cron_hour),
            TriggerKind::Interval => format!("interval[hours={}]", self.interval_hours),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_original_deployment() {
        let sched = ScheduleConfig::default();
        assert_eq!(sched.kind, TriggerKind::Cron);
        assert_eq!(sched.cron_hour, 2);
        assert_eq!(sched.lookback_days, 7);

        let crawl = CrawlConfig::default();
        assert_eq!(crawl.lookback_days, Some(7));
        assert_eq!(crawl.max_pages, 50);
    }

    #[test]
    fn test_trigger_description() {
        let mut sched = ScheduleConfig::default();
        assert_eq!(sched.trigger_description(), "cron[hour=02:00]");

        sched.kind = TriggerKind::Interval;
        sched.interval_hours = 12;
        assert_eq!(sched.trigger_description(), "interval[hours=12]");
    }

    #[test]
    fn test_trigger_kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&TriggerKind::Cron).unwrap(), "\"cron\"");
        assert_eq!(
            serde_json::to_string(&TriggerKind::Interval).unwrap(),
            "\"interval\""
        );
    }
}
