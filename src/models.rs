//! Data models for recruitment announcements.
//!
//! This module defines the two record shapes the pipeline moves between:
//! - [`RawRecord`]: what a source's listing parser emits, date still in the
//!   site's own formatting
//! - [`Announcement`]: the normalized, importable record tagged with its
//!   source and category labels
//!
//! The `Announcement` field names are the wire contract between spiders and
//! the importer (and the shape of the `--dump-json` output), so they must
//! serialize exactly as `title`, `url`, `publish_date`, `source`, `category`.

use serde::{Deserialize, Serialize};

/// A listing entry as parsed from a source page, before normalization.
///
/// The `publish_date` is the site's raw date text (possibly wrapped in
/// brackets or padded with whitespace); the cutoff policy is responsible
/// for interpreting it. Records missing a title or URL are dropped by the
/// parsers and never reach this type.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    /// Announcement headline, whitespace-trimmed.
    pub title: String,
    /// Absolute URL of the announcement detail page.
    pub url: String,
    /// The publish date exactly as displayed by the site.
    pub publish_date: String,
}

/// A recruitment announcement ready for import.
///
/// Identity is the `url`; the announcement store enforces uniqueness on it
/// and an announcement is never updated or deleted once imported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Announcement {
    /// Announcement headline.
    pub title: String,
    /// Absolute URL, the unique key in the announcement store.
    pub url: String,
    /// Publish date string carried through from the listing unchanged.
    pub publish_date: String,
    /// Human-readable name of the publishing agency.
    pub source: String,
    /// Recruitment category label fixed per source.
    pub category: String,
}

impl Announcement {
    /// Build an announcement from a parsed record plus its source's labels.
    pub fn from_raw(record: RawRecord, source: &str, category: &str) -> Self {
        Self {
            title: record.title,
            url: record.url,
            publish_date: record.publish_date,
            source: source.to_string(),
            category: category.to_string(),
        }
    }
}
