use thiserror::Error;

/// Errors surfaced by the crawl-and-extract pipeline.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("fetch failed: {0}")]
    Http(#[from] inlet_http::HttpError),

    #[error("browser fetch failed: {0}")]
    Browser(#[from] inlet_drivers::DriverError),

    #[error("extraction failed: {0}")]
    Extract(String),

    #[error("unsupported document type: `{0}`")]
    UnsupportedDocument(String),

    #[error("invalid URL `{url}`: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
