//! Web-search providers behind one interface.
//!
//! Every provider normalizes its API's response into [`SearchHit`]s so the
//! rest of the pipeline never sees engine-specific schemas. The engine is
//! picked by configuration via [`provider_for`].

mod arxiv;
mod brave;
mod duckduckgo;
mod serper;
mod tavily;

pub use arxiv::ArxivProvider;
pub use brave::BraveProvider;
pub use duckduckgo::DuckDuckGoProvider;
pub use serper::SerperProvider;
pub use tavily::TavilyProvider;

use async_trait::async_trait;
use inlet_config::{SearchEngine, SearchSettings};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A normalized search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SearchHit {
    Page {
        title: String,
        url: String,
        content: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        score: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        raw_content: Option<String>,
    },
    Image {
        image_url: String,
        image_description: String,
    },
}

impl SearchHit {
    pub fn page(title: impl Into<String>, url: impl Into<String>, content: impl Into<String>) -> Self {
        Self::Page {
            title: title.into(),
            url: url.into(),
            content: content.into(),
            score: None,
            raw_content: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Http(#[from] inlet_http::HttpError),

    #[error("missing API key for {0}")]
    MissingApiKey(&'static str),

    #[error("could not decode {engine} response: {message}")]
    Decode {
        engine: &'static str,
        message: String,
    },
}

/// Uniform interface over the third-party search APIs.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchHit>, SearchError>;
}

/// Build the provider selected by `settings`, failing fast when the engine
/// needs an API key that is not configured.
pub fn provider_for(settings: &SearchSettings) -> Result<Box<dyn SearchProvider>, SearchError> {
    let key = |engine: SearchEngine, name: &'static str| {
        settings
            .api_key_for(engine)
            .map(String::from)
            .ok_or(SearchError::MissingApiKey(name))
    };

    Ok(match settings.engine {
        SearchEngine::Tavily => Box::new(TavilyProvider::new(key(SearchEngine::Tavily, "tavily")?)?),
        SearchEngine::DuckDuckGo => Box::new(DuckDuckGoProvider::new()?),
        SearchEngine::Brave => Box::new(BraveProvider::new(key(SearchEngine::Brave, "brave")?)?),
        SearchEngine::Arxiv => Box::new(ArxivProvider::new()?),
        SearchEngine::Serper => Box::new(SerperProvider::new(key(SearchEngine::Serper, "serper")?)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_for_requires_keys_for_keyed_engines() {
        let settings = SearchSettings {
            engine: SearchEngine::Brave,
            ..Default::default()
        };
        let err = provider_for(&settings).err().unwrap();
        assert!(matches!(err, SearchError::MissingApiKey("brave")));
    }

    #[test]
    fn provider_for_builds_keyless_engines() {
        for engine in [SearchEngine::DuckDuckGo, SearchEngine::Arxiv] {
            let settings = SearchSettings {
                engine,
                ..Default::default()
            };
            let provider = provider_for(&settings).expect("keyless engine");
            assert_eq!(provider.name(), engine.as_str());
        }
    }

    #[test]
    fn provider_for_matches_configured_engine() {
        let settings = SearchSettings {
            engine: SearchEngine::Serper,
            serper_api_key: Some("sk-1".into()),
            ..Default::default()
        };
        let provider = provider_for(&settings).unwrap();
        assert_eq!(provider.name(), "serper");
    }

    #[test]
    fn page_hits_serialize_with_type_tag() {
        let hit = SearchHit::page("t", "https://example.com", "c");
        let json = serde_json::to_value(&hit).unwrap();
        assert_eq!(json["type"], "page");
        assert_eq!(json["url"], "https://example.com");
        assert!(json.get("score").is_none());
    }
}
