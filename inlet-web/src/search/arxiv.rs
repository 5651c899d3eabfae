//! arXiv query API client.
//!
//! Keyless. The API speaks Atom XML; entries are decoded with quick-xml and
//! flattened into page hits whose content carries the publication date,
//! authors, and abstract.

use async_trait::async_trait;
use inlet_http::{HttpClient, RequestOpts};
use serde::Deserialize;

use super::{SearchError, SearchHit, SearchProvider};

const ARXIV_ENDPOINT: &str = "https://export.arxiv.org";

pub struct ArxivProvider {
    http: HttpClient,
}

#[derive(Deserialize)]
struct Feed {
    #[serde(rename = "entry", default)]
    entries: Vec<Entry>,
}

#[derive(Deserialize)]
struct Entry {
    #[serde(default)]
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    published: String,
    #[serde(rename = "author", default)]
    authors: Vec<Author>,
}

#[derive(Deserialize)]
struct Author {
    #[serde(default)]
    name: String,
}

impl ArxivProvider {
    pub fn new() -> Result<Self, SearchError> {
        Self::with_endpoint(ARXIV_ENDPOINT)
    }

    /// Point the client at a different endpoint (tests).
    pub fn with_endpoint(base: &str) -> Result<Self, SearchError> {
        Ok(Self {
            http: HttpClient::new(base)?,
        })
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl Entry {
    fn into_hit(self) -> Option<SearchHit> {
        if self.id.is_empty() {
            return None;
        }
        let authors = self
            .authors
            .iter()
            .map(|a| a.name.as_str())
            .filter(|n| !n.is_empty())
            .collect::<Vec<_>>()
            .join(", ");
        let content = format!(
            "Published: {}\nAuthors: {}\nSummary: {}",
            self.published,
            authors,
            collapse_whitespace(&self.summary)
        );
        Some(SearchHit::page(
            collapse_whitespace(&self.title),
            self.id,
            content,
        ))
    }
}

#[async_trait]
impl SearchProvider for ArxivProvider {
    fn name(&self) -> &'static str {
        "arxiv"
    }

    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchHit>, SearchError> {
        let search_query = format!("all:{query}");
        let max = max_results.to_string();
        let xml = self
            .http
            .get_text(
                "api/query",
                RequestOpts {
                    query: Some(vec![
                        ("search_query", search_query.as_str().into()),
                        ("start", "0".into()),
                        ("max_results", max.as_str().into()),
                    ]),
                    ..Default::default()
                },
            )
            .await?;

        let feed: Feed = quick_xml::de::from_str(&xml).map_err(|e| SearchError::Decode {
            engine: "arxiv",
            message: e.to_string(),
        })?;

        let hits: Vec<SearchHit> = feed
            .entries
            .into_iter()
            .take(max_results)
            .filter_map(Entry::into_hit)
            .collect();

        tracing::info!(
            target: "search.arxiv",
            query_len = query.len(),
            hit_count = hits.len(),
            "search complete"
        );
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>ArXiv Query Results</title>
  <entry>
    <id>http://arxiv.org/abs/2401.00001v1</id>
    <title>Measuring
        Crawl   Quality</title>
    <summary>  We study the
        quality of web crawls.  </summary>
    <published>2024-01-01T00:00:00Z</published>
    <author><name>A. Researcher</name></author>
    <author><name>B. Author</name></author>
  </entry>
</feed>"#;

    #[test]
    fn decodes_atom_entries() {
        let feed: Feed = quick_xml::de::from_str(FEED).unwrap();
        assert_eq!(feed.entries.len(), 1);

        let hit = feed.entries.into_iter().next().unwrap().into_hit().unwrap();
        match hit {
            SearchHit::Page {
                title,
                url,
                content,
                ..
            } => {
                assert_eq!(title, "Measuring Crawl Quality");
                assert_eq!(url, "http://arxiv.org/abs/2401.00001v1");
                assert!(content.contains("A. Researcher, B. Author"));
                assert!(content.contains("We study the quality of web crawls."));
            }
            other => panic!("expected page hit, got {other:?}"),
        }
    }

    #[test]
    fn entry_without_id_is_dropped() {
        let entry = Entry {
            id: String::new(),
            title: "t".into(),
            summary: "s".into(),
            published: String::new(),
            authors: vec![],
        };
        assert!(entry.into_hit().is_none());
    }
}
