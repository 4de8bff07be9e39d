//! Generic pagination driver over a [`JobSource`].
//!
//! One loop serves every source: fetch a page, parse it, emit records
//! until one falls before the cutoff, then either advance to the next
//! page or stop. Fetch failures and empty pages both end the source
//! quietly; a crawl is a best-effort sweep, not a transaction.

use chrono::NaiveDate;
use tracing::{info, instrument, warn};

use crate::cutoff::is_before_cutoff;
use crate::models::Announcement;
use crate::sources::JobSource;

/// Crawl one source to completion, returning its batch of announcements.
///
/// The loop is bounded by `max_pages` so a pagination bug or redirect
/// loop on the remote site cannot run forever. Reaching a record older
/// than `cutoff` stops both emission and pagination: listings are assumed
/// newest-first, so one stale record implies everything after it is stale
/// too. A site that reorders or interleaves entries would lose
/// recent-but-delayed records to this short-circuit.
#[instrument(level = "info", skip_all, fields(source = source.name()))]
pub async fn crawl_source(
    source: &dyn JobSource,
    cutoff: Option<NaiveDate>,
    max_pages: u32,
) -> Vec<Announcement> {
    let mut batch = Vec::new();
    let mut current_url = source.start_url();
    let mut pages_fetched = 0u32;

    while pages_fetched < max_pages {
        let html = match source.fetch_page(&current_url).await {
            Ok(html) => html,
            Err(e) => {
                warn!(url = %current_url, error = %e, "page fetch failed; ending source early");
                break;
            }
        };
        pages_fetched += 1;

        let records = source.parse_listing(&current_url, &html);
        if records.is_empty() {
            info!(url = %current_url, "no records on page; end of listing");
            break;
        }

        let mut reached_cutoff = false;
        for record in records {
            if is_before_cutoff(&record.publish_date, cutoff) {
                reached_cutoff = true;
                break;
            }
            batch.push(Announcement::from_raw(
                record,
                source.source_label(),
                source.category(),
            ));
        }

        if reached_cutoff {
            info!(url = %current_url, "reached cutoff date; stopping pagination");
            break;
        }

        match source.next_page_url(&current_url) {
            Some(next) => current_url = next,
            None => break,
        }
    }

    info!(
        pages = pages_fetched,
        records = batch.len(),
        "source crawl finished"
    );
    batch
}
