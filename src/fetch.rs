//! Page fetchers for listing sources.
//!
//! Two implementations share the [`PageFetcher`] interface:
//! - [`HttpFetcher`]: plain HTTP retrieval via `reqwest`, for listings that
//!   render server-side
//! - [`BrowserFetcher`]: headless Chromium via `chromiumoxide`, for listings
//!   that only materialize after JavaScript runs
//!
//! Fetch failures are recoverable by design: the spider treats a failed
//! page as the end of that source's listing and other sources continue
//! unaffected.

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use tracing::{debug, warn};

use crate::error::FetchError;

/// How long the browser fetcher polls for its readiness selector.
const SELECTOR_WAIT_ATTEMPTS: u32 = 30;
const SELECTOR_WAIT_INTERVAL: Duration = Duration::from_millis(500);

/// Retrieves one listing page as text.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Plain HTTP fetcher with a browser-like identity.
///
/// Government sites tend to reject default client user agents, so the
/// client mimics a desktop browser: full UA string, typical Accept
/// headers, redirect following, and a 30 second timeout.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, FetchError> {
        let user_agent = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
             AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"
                .parse()
                .expect("static header value"),
        );
        headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            "zh-CN,zh;q=0.9,en;q=0.5".parse().expect("static header value"),
        );

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(user_agent)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response.text().await?;
        debug!(%url, bytes = body.len(), "fetched page over http");
        Ok(body)
    }
}

/// Headless-browser fetcher for JavaScript-rendered listings.
///
/// Launches a fresh Chromium per fetch, navigates, optionally waits for a
/// readiness selector to appear, and returns the rendered DOM. A fresh
/// browser per page keeps the failure surface small; pagination against
/// these sources is shallow enough that launch cost does not matter.
pub struct BrowserFetcher {
    /// CSS selector that must be present before the DOM is read.
    wait_selector: Option<String>,
}

impl BrowserFetcher {
    pub fn new(wait_selector: Option<&str>) -> Self {
        Self {
            wait_selector: wait_selector.map(str::to_string),
        }
    }
}

#[async_trait]
impl PageFetcher for BrowserFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let config = BrowserConfig::builder()
            .no_sandbox()
            .arg("--ignore-certificate-errors")
            .build()
            .map_err(FetchError::Browser)?;

        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| FetchError::Browser(e.to_string()))?;

        // The handler must be polled for the browser connection to make
        // progress; it ends when the browser closes.
        let driver = tokio::spawn(async move { while handler.next().await.is_some() {} });

        let result = fetch_rendered(&browser, url, self.wait_selector.as_deref()).await;

        if let Err(e) = browser.close().await {
            warn!(%url, error = %e, "failed to close headless browser");
        }
        driver.abort();

        result
    }
}

async fn fetch_rendered(
    browser: &Browser,
    url: &str,
    wait_selector: Option<&str>,
) -> Result<String, FetchError> {
    let page = browser
        .new_page(url)
        .await
        .map_err(|e| FetchError::Browser(e.to_string()))?;

    page.wait_for_navigation()
        .await
        .map_err(|e| FetchError::Browser(e.to_string()))?;

    if let Some(selector) = wait_selector {
        let mut found = false;
        for _ in 0..SELECTOR_WAIT_ATTEMPTS {
            if page.find_element(selector).await.is_ok() {
                found = true;
                break;
            }
            tokio::time::sleep(SELECTOR_WAIT_INTERVAL).await;
        }
        if !found {
            return Err(FetchError::Browser(format!(
                "selector {selector:?} never appeared on {url}"
            )));
        }
    }

    let html = page
        .content()
        .await
        .map_err(|e| FetchError::Browser(e.to_string()))?;
    debug!(%url, bytes = html.len(), "fetched page via headless browser");

    if let Err(e) = page.close().await {
        warn!(%url, error = %e, "failed to close browser page");
    }

    Ok(html)
}
