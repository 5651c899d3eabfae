//! Pluggable page-fetch backends.
//!
//! The crawler only needs one capability from a backend: URL in, HTML out.
//! [`ReaderFetcher`] goes through an r.jina.ai-style reader endpoint (cheap,
//! no rendering); [`BrowserFetcher`] drives a real browser through WebDriver
//! for pages that need JavaScript. Selection is configuration-driven via
//! [`fetcher_for`].

use std::time::Duration;

use async_trait::async_trait;
use inlet_config::{CrawlSettings, FetchBackend};
use inlet_drivers::{BrowserClient, BrowserOpts};
use inlet_http::{Auth, HeaderMap, HeaderValue, HttpClient, RequestOpts};
use serde_json::json;
use url::Url;

use crate::error::CrawlError;

/// Backend seam: URL in, raw HTML out.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch_html(&self, url: &Url) -> Result<String, CrawlError>;
}

/// Build the configured backend.
pub fn fetcher_for(settings: &CrawlSettings) -> Result<Box<dyn PageFetcher>, CrawlError> {
    match settings.backend {
        FetchBackend::Reader => Ok(Box::new(ReaderFetcher::new(settings)?)),
        FetchBackend::Browser => Ok(Box::new(BrowserFetcher::new(settings))),
    }
}

// ==============================
// Reader backend
// ==============================

/// Lightweight fetch through a reader endpoint that returns page HTML.
pub struct ReaderFetcher {
    http: HttpClient,
    api_key: Option<String>,
}

impl ReaderFetcher {
    pub fn new(settings: &CrawlSettings) -> Result<Self, CrawlError> {
        let http = HttpClient::new(&settings.reader_endpoint)
            .map_err(CrawlError::Http)?
            .with_timeout(Duration::from_millis(settings.timeout_ms));
        Ok(Self {
            http,
            api_key: settings
                .reader_api_key
                .as_deref()
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(String::from),
        })
    }
}

#[async_trait]
impl PageFetcher for ReaderFetcher {
    fn name(&self) -> &'static str {
        "reader"
    }

    async fn fetch_html(&self, url: &Url) -> Result<String, CrawlError> {
        if self.api_key.is_none() {
            tracing::warn!(
                target: "crawl.reader",
                "no reader API key configured; requests may be rate-limited"
            );
        }

        let mut headers = HeaderMap::new();
        headers.insert("X-Return-Format", HeaderValue::from_static("html"));

        let html = self
            .http
            .post_text(
                "",
                &json!({ "url": url.as_str() }),
                RequestOpts {
                    auth: self.api_key.as_deref().map(Auth::Bearer),
                    headers: Some(headers),
                    ..Default::default()
                },
            )
            .await?;

        tracing::debug!(target: "crawl.reader", url = %url, html_len = html.len(), "fetched");
        Ok(html)
    }
}

// ==============================
// Browser backend
// ==============================

/// Full rendering through a WebDriver-controlled browser. Each fetch runs in
/// its own browser session.
pub struct BrowserFetcher {
    opts: BrowserOpts,
    wait_for_selector: Option<String>,
}

impl BrowserFetcher {
    pub fn new(settings: &CrawlSettings) -> Self {
        Self {
            opts: BrowserOpts {
                headless: settings.headless,
                timeout: Duration::from_millis(settings.timeout_ms),
                webdriver_url: settings.webdriver_url.clone(),
            },
            wait_for_selector: settings.wait_for_selector.clone(),
        }
    }

    async fn capture(&self, client: &BrowserClient, url: &Url) -> Result<String, CrawlError> {
        let page = client.goto(url.as_str()).await?;
        match &self.wait_for_selector {
            Some(selector) => page.wait_for_selector(selector).await?,
            None => page.wait_until_ready().await?,
        }
        Ok(page.content().await?)
    }
}

#[async_trait]
impl PageFetcher for BrowserFetcher {
    fn name(&self) -> &'static str {
        "browser"
    }

    async fn fetch_html(&self, url: &Url) -> Result<String, CrawlError> {
        let client = BrowserClient::connect(self.opts.clone()).await?;
        let result = self.capture(&client, url).await;
        // Close before returning so a failed capture never leaks a session.
        if let Err(e) = client.close().await {
            tracing::warn!(target: "crawl.browser", url = %url, error = %e, "session close failed");
        }

        match &result {
            Ok(html) => {
                tracing::debug!(target: "crawl.browser", url = %url, html_len = html.len(), "fetched")
            }
            Err(e) => tracing::warn!(target: "crawl.browser", url = %url, error = %e, "fetch failed"),
        }
        result
    }
}
