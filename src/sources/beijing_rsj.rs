//! Beijing Municipal Human Resources and Social Security Bureau listing.
//!
//! Scrapes the public recruitment section at
//! <https://rsj.beijing.gov.cn/xxgk/gkzp/index.html>. The listing is
//! server-rendered HTML: each `li` under `.listBox ul.list` holds an
//! anchor (relative href plus a `title` attribute) and a `span` with the
//! publish date.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use super::JobSource;
use crate::error::FetchError;
use crate::fetch::{HttpFetcher, PageFetcher};
use crate::models::RawRecord;

const START_URL: &str = "https://rsj.beijing.gov.cn/xxgk/gkzp/index.html";

static ITEM: Lazy<Selector> = Lazy::new(|| Selector::parse(".listBox ul.list li").unwrap());
static LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a").unwrap());
static DATE: Lazy<Selector> = Lazy::new(|| Selector::parse("span").unwrap());

pub struct BeijingRsjSource {
    fetcher: HttpFetcher,
}

impl BeijingRsjSource {
    pub fn new() -> Result<Self, FetchError> {
        Ok(Self {
            fetcher: HttpFetcher::new()?,
        })
    }
}

#[async_trait]
impl JobSource for BeijingRsjSource {
    fn name(&self) -> &'static str {
        "beijing_rsj"
    }

    fn source_label(&self) -> &'static str {
        "北京市人力资源和社会保障局"
    }

    fn category(&self) -> &'static str {
        "事业单位公开招聘"
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
        for li in document.select(&ITEM) {
            let Some(link) = li.select(&LINK).next() else {
                continue;
            };
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

            // hrefs are relative, e.g. ./202512/t20251215_4342086.html
            let url = match base.as_ref().and_then(|b| b.join(href).ok()) {
                Some(resolved) => resolved.to_string(),
                None => continue,
            };

            let publish_date = li
                .select(&DATE)
                .next()
                .map(|span| span.text().collect::<String>().trim().to_string())
                .unwrap_or_default();

            records.push(RawRecord {
                title,
                url,
                publish_date,
            });
        }

        debug!(count = records.len(), page_url, "parsed beijing_rsj listing");
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> BeijingRsjSource {
        BeijingRsjSource::new().unwrap()
    }

    const LISTING: &str = r#"
        <html><body><div class="listBox">
          <ul class="list">
            <li>
              <a href="./202608/t20260825_100.html" title="某事业单位2026年招聘公告">某事业单位…</a>
              <span>2026-08-25</span>
            </li>
            <li>
              <a href="./202608/t20260820_99.html">另一单位招聘</a>
              <span>[2026-08-20]</span>
            </li>
            <li><span>2026-08-19</span></li>
          </ul>
        </div></body></html>
    "#;

    #[test]
    fn test_parse_listing_extracts_records_in_order() {
        let records =
            source().parse_listing("https://rsj.beijing.gov.cn/xxgk/gkzp/index.html", LISTING);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title, "某事业单位2026年招聘公告");
        assert_eq!(
            records[0].url,
            "https://rsj.beijing.gov.cn/xxgk/gkzp/202608/t20260825_100.html"
        );
        assert_eq!(records[0].publish_date, "2026-08-25");

        // Title falls back to the anchor text when the attribute is absent.
        assert_eq!(records[1].title, "另一单位招聘");
        assert_eq!(records[1].publish_date, "[2026-08-20]");
    }

    #[test]
    fn test_entry_without_link_is_dropped() {
        let records =
            source().parse_listing("https://rsj.beijing.gov.cn/xxgk/gkzp/index.html", LISTING);
        assert!(records.iter().all(|r| !r.url.is_empty()));
    }

    #[test]
    fn test_malformed_page_yields_no_records() {
        let records = source().parse_listing(
            "https://rsj.beijing.gov.cn/xxgk/gkzp/index.html",
            "<html><body><p>维护中</p></body></html>",
        );
        assert!(records.is_empty());
    }

    #[test]
    fn test_labels() {
        let s = source();
        assert_eq!(s.source_label(), "北京市人力资源和社会保障局");
        assert_eq!(s.category(), "事业单位公开招聘");
    }
}
