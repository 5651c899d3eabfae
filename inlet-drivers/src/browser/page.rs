use std::time::{Duration, Instant};

use fantoccini::{Client, Locator};

use super::DriverError;

const READY_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Handle to a navigated page.
pub struct BrowserPage {
    client: Client,
    timeout: Duration,
}

impl BrowserPage {
    pub(crate) fn new(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Block until an element matching `selector` is present.
    pub async fn wait_for_selector(&self, selector: &str) -> Result<(), DriverError> {
        tokio::time::timeout(
            self.timeout,
            self.client.wait().for_element(Locator::Css(selector)),
        )
        .await
        .map_err(|_| DriverError::Timeout(self.timeout, format!("waiting for `{selector}`")))??;
        Ok(())
    }

    /// Block until `document.readyState` reports `complete`.
    ///
    /// WebDriver navigation usually returns once the document is interactive;
    /// polling readiness narrows the window in which scripts are still
    /// mutating the DOM before we take the source.
    pub async fn wait_until_ready(&self) -> Result<(), DriverError> {
        let started = Instant::now();
        loop {
            let state = self
                .client
                .execute("return document.readyState", vec![])
                .await?;
            if state.as_str() == Some("complete") {
                return Ok(());
            }
            if started.elapsed() >= self.timeout {
                return Err(DriverError::Timeout(
                    self.timeout,
                    "waiting for document readiness".to_string(),
                ));
            }
            tokio::time::sleep(READY_POLL_INTERVAL).await;
        }
    }

    /// Return the full rendered page source.
    pub async fn content(&self) -> Result<String, DriverError> {
        Ok(self.client.source().await?)
    }

    /// Return the page title.
    pub async fn title(&self) -> Result<String, DriverError> {
        Ok(self.client.title().await?)
    }

    /// Return the current page URL (after redirects).
    pub async fn current_url(&self) -> Result<url::Url, DriverError> {
        Ok(self.client.current_url().await?)
    }
}
