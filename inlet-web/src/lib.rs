//! Web content acquisition tools.
//!
//! - Search providers behind a uniform trait (`search`): Tavily, DuckDuckGo,
//!   Brave, arXiv, Serper — selected by configuration
//! - Crawl-and-extract pipeline (`crawl`, `fetch`, `extract`): fetch a URL's
//!   HTML through a pluggable backend (reader endpoint or WebDriver browser),
//!   normalize it into an [`Article`] of text and image blocks, memoize
//!   repeated fetches (`cache`)
//! - Document path (`documents`): discover downloadable files on a page,
//!   fetch them, and extract their text (PDF/DOCX/XLSX/PPTX)

pub mod article;
pub mod cache;
pub mod crawl;
pub mod documents;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod search;

pub use article::{Article, Block};
pub use cache::FetchCache;
pub use crawl::Crawler;
pub use error::CrawlError;
pub use search::{provider_for, SearchError, SearchHit, SearchProvider};
