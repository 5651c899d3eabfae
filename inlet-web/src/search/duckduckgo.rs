//! DuckDuckGo instant-answers client.
//!
//! Keyless. The instant-answer abstract becomes the lead hit and related
//! topics fill the rest; topic groups are flattened in place.

use async_trait::async_trait;
use inlet_http::{HttpClient, RequestOpts};
use serde::Deserialize;
use serde_json::Value;

use super::{SearchError, SearchHit, SearchProvider};

const DDG_ENDPOINT: &str = "https://api.duckduckgo.com";

pub struct DuckDuckGoProvider {
    http: HttpClient,
}

#[derive(Deserialize)]
struct InstantAnswer {
    #[serde(rename = "Heading", default)]
    heading: String,
    #[serde(rename = "AbstractText", default)]
    abstract_text: String,
    #[serde(rename = "AbstractURL", default)]
    abstract_url: String,
    #[serde(rename = "RelatedTopics", default)]
    related_topics: Vec<Value>,
}

impl DuckDuckGoProvider {
    pub fn new() -> Result<Self, SearchError> {
        Self::with_endpoint(DDG_ENDPOINT)
    }

    /// Point the client at a different endpoint (tests).
    pub fn with_endpoint(base: &str) -> Result<Self, SearchError> {
        Ok(Self {
            http: HttpClient::new(base)?,
        })
    }
}

/// Related topics mix plain topics with named groups that nest more topics.
fn flatten_topics<'a>(values: &'a [Value], out: &mut Vec<&'a Value>) {
    for value in values {
        match value.get("Topics").and_then(Value::as_array) {
            Some(nested) => {
                for topic in nested {
                    out.push(topic);
                }
            }
            None => out.push(value),
        }
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoProvider {
    fn name(&self) -> &'static str {
        "duckduckgo"
    }

    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchHit>, SearchError> {
        let answer: InstantAnswer = self
            .http
            .get_json(
                "/",
                RequestOpts {
                    query: Some(vec![
                        ("q", query.into()),
                        ("format", "json".into()),
                        ("no_html", "1".into()),
                        ("skip_disambig", "1".into()),
                    ]),
                    ..Default::default()
                },
            )
            .await?;

        let mut hits = Vec::new();
        if !answer.abstract_text.is_empty() && !answer.abstract_url.is_empty() {
            hits.push(SearchHit::page(
                answer.heading,
                answer.abstract_url,
                answer.abstract_text,
            ));
        }

        let mut topics = Vec::new();
        flatten_topics(&answer.related_topics, &mut topics);
        for topic in topics {
            if hits.len() >= max_results {
                break;
            }
            let text = topic.get("Text").and_then(Value::as_str).unwrap_or("");
            let url = topic.get("FirstURL").and_then(Value::as_str).unwrap_or("");
            if text.is_empty() || url.is_empty() {
                continue;
            }
            hits.push(SearchHit::page(text, url, text));
        }

        tracing::info!(
            target: "search.duckduckgo",
            query_len = query.len(),
            hit_count = hits.len(),
            "search complete"
        );
        Ok(hits)
    }
}
