//! Readability extraction: raw HTML in, [`Article`] out.
//!
//! The heavy lifting is delegated to the `readability` crate (content
//! scoring) and `html2md` (markdown conversion). Image tags survive both
//! passes as markdown image syntax, which is what [`Article::blocks`] splits
//! on.

use url::Url;

use crate::article::Article;
use crate::error::CrawlError;

/// Extract the readable article from `html`.
///
/// A page with no scoring content yields an article with empty markdown —
/// that is a valid result, not an error.
pub fn extract_article(html: &str, url: &Url) -> Result<Article, CrawlError> {
    let product = readability::extractor::extract(&mut html.as_bytes(), url)
        .map_err(|e| CrawlError::Extract(format!("{e:?}")))?;

    let markdown = html2md::parse_html(&product.content);

    tracing::debug!(
        target: "crawl.extract",
        url = %url,
        title = %product.title,
        markdown_len = markdown.len(),
        "article extracted"
    );

    Ok(Article {
        url: url.to_string(),
        title: product.title,
        markdown: markdown.trim().to_string(),
        html_checksum: blake3::hash(html.as_bytes()).to_hex().to_string(),
    })
}
