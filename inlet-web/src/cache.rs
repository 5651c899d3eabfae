//! In-memory memoization of crawled articles.
//!
//! Keyed by URL string, unbounded, never expires: the pipeline only needs to
//! dedupe repeated fetches within a run, not manage storage.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::article::Article;

#[derive(Debug, Default, Clone)]
pub struct FetchCache {
    inner: Arc<RwLock<HashMap<String, Arc<Article>>>>,
}

impl FetchCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, url: &str) -> Option<Arc<Article>> {
        self.read().get(url).cloned()
    }

    /// Insert and return the shared handle. An existing entry for the same
    /// URL is replaced.
    pub fn insert(&self, article: Article) -> Arc<Article> {
        let shared = Arc::new(article);
        self.write().insert(shared.url.clone(), Arc::clone(&shared));
        shared
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn clear(&self) {
        self.write().clear();
    }

    // A poisoned lock still holds a usable map.
    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Arc<Article>>> {
        match self.inner.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, Arc<Article>>> {
        match self.inner.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(url: &str) -> Article {
        Article {
            url: url.to_string(),
            title: "t".to_string(),
            markdown: "m".to_string(),
            html_checksum: String::new(),
        }
    }

    #[test]
    fn miss_then_hit() {
        let cache = FetchCache::new();
        assert!(cache.get("https://example.com").is_none());

        let inserted = cache.insert(article("https://example.com"));
        let hit = cache.get("https://example.com").expect("cached");
        assert!(Arc::ptr_eq(&inserted, &hit));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn clones_share_storage() {
        let cache = FetchCache::new();
        let other = cache.clone();
        cache.insert(article("https://example.com/a"));
        assert_eq!(other.len(), 1);
    }

    #[test]
    fn clear_empties() {
        let cache = FetchCache::new();
        cache.insert(article("https://example.com/a"));
        cache.clear();
        assert!(cache.is_empty());
    }
}
