mod client;
mod page;

pub use client::{BrowserClient, BrowserOpts};
pub use page::BrowserPage;

use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by the browser driver.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("webdriver session failed: {0}")]
    Session(#[from] fantoccini::error::NewSessionError),
    #[error("webdriver command failed: {0}")]
    Command(#[from] fantoccini::error::CmdError),
    #[error("timed out after {0:?} while {1}")]
    Timeout(Duration, String),
}
