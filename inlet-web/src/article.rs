//! Normalized output of the crawl pipeline.
//!
//! An [`Article`] carries the page URL, the extracted title, and the readable
//! content as markdown. Downstream consumers that want one unified message
//! can split the markdown into interleaved text and image blocks with
//! [`Article::blocks`].

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

/// One piece of article content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Block {
    Text { text: String },
    Image { image_url: String },
}

/// A crawled page reduced to its readable content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub url: String,
    pub title: String,
    /// Readable content as markdown, image syntax preserved.
    pub markdown: String,
    /// blake3 of the raw HTML the article was extracted from, for cheap
    /// change detection by callers that re-crawl.
    pub html_checksum: String,
}

fn image_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"!\[[^\]]*\]\(([^)]+)\)").expect("image pattern compiles"))
}

impl Article {
    /// Render as a standalone markdown document.
    pub fn to_markdown(&self) -> String {
        format!("# {}\n\n{}", self.title, self.markdown)
    }

    /// Whether extraction found any readable content.
    pub fn is_empty(&self) -> bool {
        self.markdown.trim().is_empty()
    }

    /// Split the markdown into alternating text and image blocks.
    ///
    /// Relative image sources are resolved against the article URL; empty
    /// text segments between adjacent images are dropped.
    pub fn blocks(&self) -> Vec<Block> {
        let base = Url::parse(&self.url).ok();
        let mut blocks = Vec::new();
        let mut cursor = 0;

        for caps in image_re().captures_iter(&self.markdown) {
            let whole = caps.get(0).expect("capture 0 always present");
            let src = caps.get(1).map(|m| m.as_str().trim()).unwrap_or_default();

            push_text(&mut blocks, &self.markdown[cursor..whole.start()]);
            if let Some(resolved) = resolve_image(base.as_ref(), src) {
                blocks.push(Block::Image {
                    image_url: resolved,
                });
            }
            cursor = whole.end();
        }
        push_text(&mut blocks, &self.markdown[cursor..]);

        blocks
    }
}

fn push_text(blocks: &mut Vec<Block>, segment: &str) {
    let trimmed = segment.trim();
    if !trimmed.is_empty() {
        blocks.push(Block::Text {
            text: trimmed.to_string(),
        });
    }
}

fn resolve_image(base: Option<&Url>, src: &str) -> Option<String> {
    // markdown allows a quoted title after the source
    let src = src.split_whitespace().next()?;
    if src.is_empty() {
        return None;
    }
    match base {
        Some(base) => base.join(src).ok().map(|u| u.to_string()),
        None => Some(src.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(markdown: &str) -> Article {
        Article {
            url: "https://example.com/posts/1".to_string(),
            title: "Title".to_string(),
            markdown: markdown.to_string(),
            html_checksum: String::new(),
        }
    }

    #[test]
    fn splits_text_and_images() {
        let a = article("intro\n\n![alt](https://cdn.example.com/a.png)\n\noutro");
        assert_eq!(
            a.blocks(),
            vec![
                Block::Text {
                    text: "intro".into()
                },
                Block::Image {
                    image_url: "https://cdn.example.com/a.png".into()
                },
                Block::Text {
                    text: "outro".into()
                },
            ]
        );
    }

    #[test]
    fn resolves_relative_image_urls() {
        let a = article("![x](../img/pic.jpg)");
        assert_eq!(
            a.blocks(),
            vec![Block::Image {
                image_url: "https://example.com/img/pic.jpg".into()
            }]
        );
    }

    #[test]
    fn drops_empty_segments_between_images() {
        let a = article("![a](one.png) ![b](two.png)");
        let blocks = a.blocks();
        assert_eq!(blocks.len(), 2);
        assert!(blocks
            .iter()
            .all(|b| matches!(b, Block::Image { .. })));
    }

    #[test]
    fn image_title_suffix_is_ignored() {
        let a = article(r#"![a](pic.png "caption")"#);
        assert_eq!(
            a.blocks(),
            vec![Block::Image {
                image_url: "https://example.com/posts/pic.png".into()
            }]
        );
    }

    #[test]
    fn text_only_article_is_a_single_block() {
        let a = article("just words");
        assert_eq!(
            a.blocks(),
            vec![Block::Text {
                text: "just words".into()
            }]
        );
    }

    #[test]
    fn to_markdown_prepends_title() {
        let a = article("body");
        assert_eq!(a.to_markdown(), "# Title\n\nbody");
    }

    #[test]
    fn empty_article_reports_empty() {
        assert!(article("   \n").is_empty());
        assert!(!article("content").is_empty());
    }
}
