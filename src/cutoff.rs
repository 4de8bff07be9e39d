//! Date-based cutoff policy for incremental crawls.
//!
//! A crawl run derives a cutoff date from its configured lookback window and
//! gates every listing record against it. The policy is deliberately
//! conservative: anything that cannot be read as a date keeps the crawl
//! going, because an unknown date must not be assumed old.

use chrono::{Duration, Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

/// Noise commonly wrapped around dates on government listing pages:
/// brackets, parentheses, and whitespace.
static DATE_NOISE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\[\]()\s]").unwrap());

/// Compute the cutoff date for a lookback window of `days`, or `None` for
/// an unbounded crawl.
pub fn cutoff_from_lookback(days: Option<u32>) -> Option<NaiveDate> {
    days.map(|d| Local::now().date_naive() - Duration::days(i64::from(d)))
}

/// Decide whether a listing record's date falls before the cutoff.
///
/// Returns `true` only when the date string parses as `YYYY-MM-DD` (after
/// stripping bracket/parenthesis/whitespace noise) and the parsed date is
/// strictly earlier than the cutoff. Every other case returns `false`:
/// no cutoff configured, an empty date field, or an unparsable date
/// (logged as a warning).
pub fn is_before_cutoff(raw_date: &str, cutoff: Option<NaiveDate>) -> bool {
    let Some(cutoff) = cutoff else {
        return false;
    };
    if raw_date.is_empty() {
        return false;
    }

    let cleaned = DATE_NOISE.replace_all(raw_date, "");
    match NaiveDate::parse_from_str(&cleaned, "%Y-%m-%d") {
        Ok(date) => date < cutoff,
        Err(_) => {
            warn!(raw_date, "could not parse publish date; not treating as old");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cutoff() -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(2026, 8, 20)
    }

    #[test]
    fn test_no_cutoff_never_stops() {
        assert!(!is_before_cutoff("1999-01-01", None));
        assert!(!is_before_cutoff("", None));
        assert!(!is_before_cutoff("garbage", None));
    }

    #[test]
    fn test_empty_date_never_stops() {
        assert!(!is_before_cutoff("", cutoff()));
    }

    #[test]
    fn test_strictly_earlier_comparison() {
        assert!(is_before_cutoff("2026-08-19", cutoff()));
        // Equal to the cutoff is still fresh.
        assert!(!is_before_cutoff("2026-08-20", cutoff()));
        assert!(!is_before_cutoff("2026-08-21", cutoff()));
    }

    #[test]
    fn test_noise_wrapped_dates() {
        assert!(is_before_cutoff("[2026-08-19]", cutoff()));
        assert!(is_before_cutoff("(2026-08-19)", cutoff()));
        assert!(is_before_cutoff("  2026-08-19  ", cutoff()));
        assert!(is_before_cutoff("[ 2026-08-19 ]", cutoff()));
        assert!(!is_before_cutoff("[2026-08-20]", cutoff()));
    }

    #[test]
    fn test_unparsable_dates_never_stop() {
        for raw in [
            "2026/08/19",
            "19-08-2026",
            "2026-8-19-extra",
            "昨天",
            "not a date",
            "2026-13-01",
        ] {
            assert!(!is_before_cutoff(raw, cutoff()), "{raw} should not stop the crawl");
        }
    }

    #[test]
    fn test_cutoff_from_lookback() {
        assert_eq!(cutoff_from_lookback(None), None);

        let today = Local::now().date_naive();
        assert_eq!(cutoff_from_lookback(Some(0)), Some(today));
        assert_eq!(cutoff_from_lookback(Some(7)), Some(today - Duration::days(7)));
    }
}
