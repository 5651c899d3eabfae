//! Tavily search client.
//!
//! Asks for raw page content plus images with descriptions, so one call can
//! feed both the text and the visual side of a report.

use async_trait::async_trait;
use inlet_http::{Auth, HttpClient, RequestOpts};
use serde::{Deserialize, Serialize};

use super::{SearchError, SearchHit, SearchProvider};

const TAVILY_ENDPOINT: &str = "https://api.tavily.com";

pub struct TavilyProvider {
    http: HttpClient,
    api_key: String,
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    max_results: usize,
    include_images: bool,
    include_image_descriptions: bool,
    include_raw_content: bool,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<PageResult>,
    #[serde(default)]
    images: Vec<ImageResult>,
}

#[derive(Deserialize)]
struct PageResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    score: Option<f64>,
    #[serde(default)]
    raw_content: Option<String>,
}

#[derive(Deserialize)]
struct ImageResult {
    #[serde(default)]
    url: String,
    #[serde(default)]
    description: String,
}

impl TavilyProvider {
    pub fn new(api_key: impl Into<String>) -> Result<Self, SearchError> {
        Self::with_endpoint(api_key, TAVILY_ENDPOINT)
    }

    /// Point the client at a different endpoint (tests).
    pub fn with_endpoint(api_key: impl Into<String>, base: &str) -> Result<Self, SearchError> {
        Ok(Self {
            http: HttpClient::new(base)?,
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl SearchProvider for TavilyProvider {
    fn name(&self) -> &'static str {
        "tavily"
    }

    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchHit>, SearchError> {
        let request = SearchRequest {
            query,
            max_results,
            include_images: true,
            include_image_descriptions: true,
            include_raw_content: true,
        };

        let response: SearchResponse = self
            .http
            .post_json(
                "search",
                &request,
                RequestOpts {
                    auth: Some(Auth::Bearer(&self.api_key)),
                    ..Default::default()
                },
            )
            .await?;

        let mut hits = Vec::new();
        for page in response.results.into_iter().take(max_results) {
            if page.url.is_empty() {
                continue;
            }
            hits.push(SearchHit::Page {
                title: page.title,
                url: page.url,
                content: page.content,
                score: page.score,
                raw_content: page.raw_content,
            });
        }
        for image in response.images.into_iter().take(max_results) {
            if image.url.is_empty() {
                continue;
            }
            hits.push(SearchHit::Image {
                image_url: image.url,
                image_description: image.description,
            });
        }

        tracing::info!(
            target: "search.tavily",
            query_len = query.len(),
            hit_count = hits.len(),
            "search complete"
        );
        Ok(hits)
    }
}
