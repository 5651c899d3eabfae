//! Brave Search API client (web vertical).

use async_trait::async_trait;
use inlet_http::{Auth, HeaderName, HeaderValue, HttpClient, HttpError, RequestOpts};

use serde::Deserialize;

use super::{SearchError, SearchHit, SearchProvider};

const BRAVE_ENDPOINT: &str = "https://api.search.brave.com";

pub struct BraveProvider {
    http: HttpClient,
    token: String,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    web: Option<WebVertical>,
}

#[derive(Deserialize)]
struct WebVertical {
    #[serde(default)]
    results: Vec<WebResult>,
}

#[derive(Deserialize)]
struct WebResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    description: String,
}

impl BraveProvider {
    pub fn new(token: impl Into<String>) -> Result<Self, SearchError> {
        Self::with_endpoint(token, BRAVE_ENDPOINT)
    }

    /// Point the client at a different endpoint (tests).
    pub fn with_endpoint(token: impl Into<String>, base: &str) -> Result<Self, SearchError> {
        Ok(Self {
            http: HttpClient::new(base)?,
            token: token.into(),
        })
    }
}

#[async_trait]
impl SearchProvider for BraveProvider {
    fn name(&self) -> &'static str {
        "brave"
    }

    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchHit>, SearchError> {
        let count = max_results.to_string();
        let response: SearchResponse = self
            .http
            .get_json(
                "res/v1/web/search",
                RequestOpts {
                    auth: Some(Auth::Header {
                        name: HeaderName::from_static("x-subscription-token"),
                        value: HeaderValue::from_str(&self.token)
                            .map_err(|e| HttpError::Build(e.to_string()))?,
                    }),
                    query: Some(vec![("q", query.into()), ("count", count.into())]),
                    ..Default::default()
                },
            )
            .await?;

        let hits: Vec<SearchHit> = response
            .web
            .map(|web| web.results)
            .unwrap_or_default()
            .into_iter()
            .filter(|r| !r.url.is_empty())
            .take(max_results)
            .map(|r| SearchHit::page(r.title, r.url, r.description))
            .collect();

        tracing::info!(
            target: "search.brave",
            query_len = query.len(),
            hit_count = hits.len(),
            "search complete"
        );
        Ok(hits)
    }
}
