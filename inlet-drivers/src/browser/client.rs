use std::time::Duration;

use fantoccini::ClientBuilder;
use serde_json::json;
use webdriver::capabilities::Capabilities;

use super::page::BrowserPage;
use super::DriverError;

const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";
const VIEWPORT: (u32, u32) = (1280, 720);

/// Connection options for [`BrowserClient::connect`].
#[derive(Debug, Clone)]
pub struct BrowserOpts {
    pub headless: bool,
    /// Budget for navigation and readiness waits.
    pub timeout: Duration,
    /// WebDriver endpoint (Chromedriver by default).
    pub webdriver_url: String,
}

impl Default for BrowserOpts {
    fn default() -> Self {
        Self {
            headless: true,
            timeout: Duration::from_secs(30),
            webdriver_url: std::env::var("INLET_WEBDRIVER_URL")
                .unwrap_or_else(|_| DEFAULT_WEBDRIVER_URL.to_string()),
        }
    }
}

/// A connected WebDriver session dedicated to a single fetch.
pub struct BrowserClient {
    client: fantoccini::Client,
    timeout: Duration,
}

impl BrowserClient {
    /// Connect to the WebDriver service and open a browser window sized to a
    /// fixed viewport.
    pub async fn connect(opts: BrowserOpts) -> Result<Self, DriverError> {
        let mut caps = Capabilities::new();
        let mut args = vec![json!("--disable-blink-features=AutomationControlled")];
        if opts.headless {
            args.push(json!("--headless"));
            args.push(json!("--disable-gpu"));
        }
        caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));

        tracing::debug!(
            target: "browser.session",
            webdriver_url = %opts.webdriver_url,
            headless = opts.headless,
            "connecting"
        );

        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(&opts.webdriver_url)
            .await?;
        client.set_window_size(VIEWPORT.0, VIEWPORT.1).await?;

        Ok(Self {
            client,
            timeout: opts.timeout,
        })
    }

    /// Navigate to `url` and return a page handle.
    ///
    /// Navigation is bounded by the configured timeout; a slow page returns
    /// [`DriverError::Timeout`] instead of hanging the crawl.
    pub async fn goto(&self, url: &str) -> Result<BrowserPage, DriverError> {
        tokio::time::timeout(self.timeout, self.client.goto(url))
            .await
            .map_err(|_| DriverError::Timeout(self.timeout, format!("navigating to {url}")))??;
        Ok(BrowserPage::new(self.client.clone(), self.timeout))
    }

    /// Close the underlying browser session.
    pub async fn close(self) -> Result<(), DriverError> {
        self.client.close().await?;
        Ok(())
    }
}
