//! Serper.dev client (Google Search API).
//!
//! Web search plus a separate image vertical, both behind the same API key.

use async_trait::async_trait;
use inlet_http::{Auth, HeaderName, HeaderValue, HttpClient, HttpError, RequestOpts};
use serde::{Deserialize, Serialize};

use super::{SearchError, SearchHit, SearchProvider};

const SERPER_ENDPOINT: &str = "https://google.serper.dev";

pub struct SerperProvider {
    http: HttpClient,
    api_key: String,
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    q: &'a str,
    num: usize,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    organic: Vec<OrganicResult>,
}

#[derive(Deserialize)]
struct OrganicResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
}

#[derive(Deserialize)]
struct ImagesResponse {
    #[serde(default)]
    images: Vec<ImageResult>,
}

#[derive(Deserialize)]
struct ImageResult {
    #[serde(rename = "imageUrl", default)]
    image_url: String,
    #[serde(default)]
    title: String,
}

impl SerperProvider {
    pub fn new(api_key: impl Into<String>) -> Result<Self, SearchError> {
        Self::with_endpoint(api_key, SERPER_ENDPOINT)
    }

    /// Point the client at a different endpoint (tests).
    pub fn with_endpoint(api_key: impl Into<String>, base: &str) -> Result<Self, SearchError> {
        Ok(Self {
            http: HttpClient::new(base)?,
            api_key: api_key.into(),
        })
    }

    fn auth(&self) -> Result<Auth<'_>, SearchError> {
        Ok(Auth::Header {
            name: HeaderName::from_static("x-api-key"),
            value: HeaderValue::from_str(&self.api_key)
                .map_err(|e| HttpError::Build(e.to_string()))?,
        })
    }

    /// Image vertical: same request shape against `/images`.
    pub async fn search_images(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchHit>, SearchError> {
        let response: ImagesResponse = self
            .http
            .post_json(
                "images",
                &SearchRequest {
                    q: query,
                    num: max_results,
                },
                RequestOpts {
                    auth: Some(self.auth()?),
                    ..Default::default()
                },
            )
            .await?;

        Ok(response
            .images
            .into_iter()
            .filter(|img| !img.image_url.is_empty())
            .take(max_results)
            .map(|img| SearchHit::Image {
                image_url: img.image_url,
                image_description: img.title,
            })
            .collect())
    }
}

#[async_trait]
impl SearchProvider for SerperProvider {
    fn name(&self) -> &'static str {
        "serper"
    }

    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchHit>, SearchError> {
        let response: SearchResponse = self
            .http
            .post_json(
                "search",
                &SearchRequest {
                    q: query,
                    num: max_results,
                },
                RequestOpts {
                    auth: Some(self.auth()?),
                    ..Default::default()
                },
            )
            .await?;

        let hits: Vec<SearchHit> = response
            .organic
            .into_iter()
            .filter(|r| !r.link.is_empty())
            .take(max_results)
            .map(|r| SearchHit::page(r.title, r.link, r.snippet))
            .collect();

        tracing::info!(
            target: "search.serper",
            query_len = query.len(),
            hit_count = hits.len(),
            "search complete"
        );
        Ok(hits)
    }
}
