//! Listing sources for government recruitment announcements.
//!
//! Each source pairs a fetcher with a listing parser behind the
//! [`JobSource`] trait; the spider drives any source through the same
//! pagination loop. A source contributes fixed `source` and `category`
//! labels that tag every record it emits.
//!
//! # Supported sources
//!
//! | Source | Module | Fetch method |
//! |--------|--------|--------------|
//! | 北京市人力资源和社会保障局 | [`beijing_rsj`] | plain HTTP |
//! | 人力资源和社会保障部 | [`mohrss`] | headless browser (JS-rendered listing) |
//!
//! Both sites share the numeric pagination convention handled by
//! [`next_index_url`]: `index.html` is page 1, `index_1.html` page 2,
//! `index_n.html` page n+1.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::FetchError;
use crate::models::RawRecord;

pub mod beijing_rsj;
pub mod mohrss;

/// One external listing site: a fetcher/parser pairing plus fixed labels.
#[async_trait]
pub trait JobSource: Send + Sync {
    /// Short machine name used in logs.
    fn name(&self) -> &'static str;

    /// Publishing agency label stamped onto every record.
    fn source_label(&self) -> &'static str;

    /// Recruitment category label stamped onto every record.
    fn category(&self) -> &'static str;

    /// First listing page.
    fn start_url(&self) -> String;

    /// Retrieve one listing page.
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError>;

    /// Extract the page's records in display order. Entries missing a
    /// title or URL are dropped silently; a malformed page yields an
    /// empty list, which the spider reads as end of listing.
    fn parse_listing(&self, page_url: &str, html: &str) -> Vec<RawRecord>;

    /// Address of the page after `current`, if the convention admits one.
    fn next_page_url(&self, current: &str) -> Option<String> {
        next_index_url(current)
    }
}

static INDEXED_PAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"index_(\d+)\.html").unwrap());

/// Compute the next page URL under the `index.html` / `index_n.html`
/// numbering convention: the base listing maps to `index_1.html`, and
/// `index_n.html` maps to `index_{n+1}.html`. URLs outside the convention
/// have no next page.
pub fn next_index_url(current: &str) -> Option<String> {
    if let Some(caps) = INDEXED_PAGE.captures(current) {
        let idx: u64 = caps[1].parse().ok()?;
        Some(current.replace(
            &format!("index_{idx}.html"),
            &format!("index_{}.html", idx + 1),
        ))
    } else if current.contains("index.html") {
        Some(current.replace("index.html", "index_1.html"))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_page_maps_to_index_1() {
        assert_eq!(
            next_index_url("https://rsj.beijing.gov.cn/xxgk/gkzp/index.html"),
            Some("https://rsj.beijing.gov.cn/xxgk/gkzp/index_1.html".to_string())
        );
    }

    #[test]
    fn test_indexed_page_increments() {
        assert_eq!(
            next_index_url("https://example.gov.cn/zpgg/index_1.html"),
            Some("https://example.gov.cn/zpgg/index_2.html".to_string())
        );
        assert_eq!(
            next_index_url("https://example.gov.cn/zpgg/index_41.html"),
            Some("https://example.gov.cn/zpgg/index_42.html".to_string())
        );
    }

    #[test]
    fn test_unconventional_url_has_no_next() {
        assert_eq!(next_index_url("https://example.gov.cn/zpgg/list.html"), None);
        assert_eq!(next_index_url("https://example.gov.cn/zpgg/"), None);
    }
}
