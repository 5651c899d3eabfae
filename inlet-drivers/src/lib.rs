//! Browser rendering driver for the crawl pipeline.
//!
//! Wraps a WebDriver session (`fantoccini`) behind a small API: connect with
//! chrome options, navigate, wait for a selector or document readiness, and
//! take the rendered page source. Everything else browsers can do is out of
//! scope here.

pub mod browser;

pub use browser::{BrowserClient, BrowserOpts, BrowserPage, DriverError};
