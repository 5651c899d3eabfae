//! The crawl pipeline: fetch → extract → cache.

use std::sync::Arc;

use futures::future::join_all;
use inlet_config::CrawlSettings;
use url::Url;

use crate::article::Article;
use crate::cache::FetchCache;
use crate::error::CrawlError;
use crate::extract::extract_article;
use crate::fetch::{fetcher_for, PageFetcher};

/// Fetches pages through the configured backend and reduces them to
/// [`Article`]s, memoizing by URL.
pub struct Crawler {
    fetcher: Box<dyn PageFetcher>,
    cache: FetchCache,
}

impl Crawler {
    /// Build a crawler with the backend named in `settings`.
    pub fn from_settings(settings: &CrawlSettings) -> Result<Self, CrawlError> {
        Ok(Self::with_fetcher(fetcher_for(settings)?))
    }

    /// Build a crawler around an explicit backend (tests, custom fetchers).
    pub fn with_fetcher(fetcher: Box<dyn PageFetcher>) -> Self {
        Self {
            fetcher,
            cache: FetchCache::new(),
        }
    }

    pub fn cache(&self) -> &FetchCache {
        &self.cache
    }

    /// Fetch `url` and extract its article. Always goes to the network.
    pub async fn crawl(&self, url: &str) -> Result<Article, CrawlError> {
        let parsed = Url::parse(url).map_err(|source| CrawlError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        tracing::info!(
            target: "crawl",
            url = %parsed,
            backend = self.fetcher.name(),
            "crawling"
        );

        let html = self.fetcher.fetch_html(&parsed).await?;
        extract_article(&html, &parsed)
    }

    /// Like [`crawl`](Self::crawl), but memoized: repeated fetches of the
    /// same URL return the cached article.
    pub async fn crawl_cached(&self, url: &str) -> Result<Arc<Article>, CrawlError> {
        if let Some(hit) = self.cache.get(url) {
            tracing::debug!(target: "crawl.cache", %url, "hit");
            return Ok(hit);
        }
        let article = self.crawl(url).await?;
        Ok(self.cache.insert(article))
    }

    /// Crawl many URLs concurrently (unordered gather). Results come back in
    /// input order; one failing URL does not abort the rest.
    pub async fn crawl_many(&self, urls: &[String]) -> Vec<Result<Arc<Article>, CrawlError>> {
        join_all(urls.iter().map(|url| self.crawl_cached(url))).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::PageFetcher;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Serves canned HTML and counts fetches.
    struct CannedFetcher {
        calls: Arc<AtomicUsize>,
    }

    impl CannedFetcher {
        fn new() -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    calls: Arc::clone(&calls),
                },
                calls,
            )
        }
    }

    #[async_trait]
    impl PageFetcher for CannedFetcher {
        fn name(&self) -> &'static str {
            "canned"
        }

        async fn fetch_html(&self, url: &Url) -> Result<String, CrawlError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if url.path().contains("missing") {
                return Err(CrawlError::Extract("no such page".to_string()));
            }
            Ok(format!(
                "<html><head><title>Page {path}</title></head><body><article>\
                 <p>Long enough paragraph about {path} to survive readability \
                 scoring, with several clauses and no markup tricks at all, \
                 repeated once more about {path} for good measure.</p>\
                 </article></body></html>",
                path = url.path()
            ))
        }
    }

    #[tokio::test]
    async fn crawl_rejects_invalid_urls() {
        let (fetcher, _) = CannedFetcher::new();
        let crawler = Crawler::with_fetcher(Box::new(fetcher));
        let err = crawler.crawl("not a url").await.unwrap_err();
        assert!(matches!(err, CrawlError::InvalidUrl { .. }));
    }

    #[tokio::test]
    async fn crawl_cached_fetches_once() {
        let (fetcher, calls) = CannedFetcher::new();
        let crawler = Crawler::with_fetcher(Box::new(fetcher));

        let first = crawler.crawl_cached("https://example.com/a").await.unwrap();
        let second = crawler.crawl_cached("https://example.com/a").await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(crawler.cache().len(), 1);
    }

    #[tokio::test]
    async fn crawl_many_preserves_order_and_isolates_failures() {
        let (fetcher, _) = CannedFetcher::new();
        let crawler = Crawler::with_fetcher(Box::new(fetcher));
        let urls = vec![
            "https://example.com/a".to_string(),
            "https://example.com/missing".to_string(),
            "https://example.com/b".to_string(),
        ];

        let results = crawler.crawl_many(&urls).await;
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        assert!(results[2].is_ok());

        let a = results[0].as_ref().unwrap();
        assert_eq!(a.url, "https://example.com/a");
        let b = results[2].as_ref().unwrap();
        assert_eq!(b.url, "https://example.com/b");
    }
}
