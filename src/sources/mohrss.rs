//! Ministry of Human Resources and Social Security listing.
//!
//! Scrapes central-agency recruitment announcements from
//! <https://www.mohrss.gov.cn/SYrlzyhshbzb/fwyd/SYkaoshizhaopin/zyhgjjgsydwgkzp/zpgg/>.
//! The listing only materializes after JavaScript runs, so pages are
//! fetched through the headless-browser fetcher and the parser reads the
//! rendered DOM: anchors whose href starts with `./202` and carry a
//! `title` attribute, with the publish date in a `span` inside the same
//! `li`.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

use super::JobSource;
use crate::error::FetchError;
use crate::fetch::{BrowserFetcher, PageFetcher};
use crate::models::RawRecord;

const START_URL: &str =
    "https://www.mohrss.gov.cn/SYrlzyhshbzb/fwyd/SYkaoshizhaopin/zyhgjjgsydwgkzp/zpgg/index.html";

/// The listing is ready once at least one announcement anchor exists.
const READY_SELECTOR: &str = "a[href^='./202'][title]";

static LINK: Lazy<Selector> = Lazy::new(|| Selector::parse(READY_SELECTOR).unwrap());
static DATE: Lazy<Selector> = Lazy::new(|| Selector::parse("span").unwrap());

pub struct MohrssSource {
    fetcher: BrowserFetcher,
}

impl MohrssSource {
    pub fn new() -> Self {
        Self {
            fetcher: BrowserFetcher::new(Some(READY_SELECTOR)),
        }
    }
}

impl Default for MohrssSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JobSource for MohrssSource {
    fn name(&self) -> &'static str {
        "mohrss"
    }

    fn source_label(&self) -> &'static str {
        "人力资源和社会保障部"
    }

    fn category(&self) -> &'static str {
        "中央和国家机关事业单位公开招聘"
    }

    fn start_url(&self) -> String {
        START_URL.to_string()
    }

    async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        self.fetcher.fetch(url).await
    }

    fn parse_listing(&self, page_url: &str, html: &str) -> Vec<RawRecord> {
        let base = Url::parse(page_url).ok();
        let document = Html::parse_document(html);

        let mut records = Vec::new();
        for link in document.select(&LINK) {
            let title = link
                .value()
                .attr("title")
                .map(str::to_string)
                .unwrap_or_else(|| link.text().collect::<String>())
                .trim()
                .to_string();
            let Some(href) = link.value().attr("href") else {
                continue;
            };
            if title.is_empty() {
                continue;
            }

            let url = match base.as_ref().and_then(|b| b.join(href).ok()) {
                Some(resolved) => resolved.to_string(),
                None => continue,
            };

            // The date sits in a span next to the anchor, inside the same li.
            let publish_date = link
                .parent()
                .and_then(ElementRef::wrap)
                .and_then(|li| li.select(&DATE).next())
                .map(|span| span.text().collect::<String>().trim().to_string())
                .unwrap_or_default();

            records.push(RawRecord {
                title,
                url,
                publish_date,
            });
        }

        debug!(count = records.len(), page_url, "parsed mohrss listing");
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"
        <html><body><ul>
          <li>
            <a href="./202608/t20260824_501.html" title="中央某机关所属事业单位招聘公告">中央某机关…</a>
            <span>2026-08-24</span>
          </li>
          <li>
            <a href="./202608/t20260818_500.html" title="另一机关招聘公告">另一机关…</a>
            <span>2026-08-18</span>
          </li>
          <li>
            <a href="./about.html" title="关于我们">关于我们</a>
          </li>
        </ul></body></html>
    "#;

    #[test]
    fn test_parse_listing_matches_announcement_anchors_only() {
        let records = MohrssSource::new().parse_listing(START_URL, LISTING);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title, "中央某机关所属事业单位招聘公告");
        assert_eq!(
            records[0].url,
            "https://www.mohrss.gov.cn/SYrlzyhshbzb/fwyd/SYkaoshizhaopin/zyhgjjgsydwgkzp/zpgg/202608/t20260824_501.html"
        );
        assert_eq!(records[0].publish_date, "2026-08-24");
        assert_eq!(records[1].publish_date, "2026-08-18");
    }

    #[test]
    fn test_anchor_without_date_span_keeps_empty_date() {
        let html = r#"
            <li><a href="./202608/t20260824_1.html" title="无日期公告">无日期公告</a></li>
        "#;
        let records = MohrssSource::new().parse_listing(START_URL, html);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].publish_date, "");
    }

    #[test]
    fn test_next_page_follows_index_convention() {
        let source = MohrssSource::new();
        assert_eq!(
            source.next_page_url(START_URL).as_deref(),
            Some(
                "https://www.mohrss.gov.cn/SYrlzyhshbzb/fwyd/SYkaoshizhaopin/zyhgjjgsydwgkzp/zpgg/index_1.html"
            )
        );
    }
}
