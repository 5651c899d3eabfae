//! Downloadable-document handling: discover links on a page, fetch the
//! files, and extract their text.
//!
//! The format parsers are external capability providers: `pdf-extract` for
//! PDF, `calamine` for spreadsheets, and zip + `quick-xml` run-text
//! extraction for the OOXML formats (DOCX/PPTX are zips of XML; the visible
//! text lives in `<w:t>`/`<a:t>` runs).

use std::io::Read;
use std::path::{Path, PathBuf};

use calamine::Reader as _;
use inlet_http::{HttpClient, RequestOpts};
use quick_xml::events::Event;
use scraper::{Html, Selector};
use url::Url;

use crate::error::CrawlError;

const DOC_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx"];

/// Collect document links (`a[href]` pointing at a known extension) from
/// `html`, resolved against `base` and deduped, page order preserved.
pub fn document_links(html: &str, base: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);
    let anchors = Selector::parse("a[href]").expect("a[href] is a valid selector");

    let mut seen = std::collections::HashSet::new();
    let mut links = Vec::new();
    for element in document.select(&anchors) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        if !is_document_href(href) {
            continue;
        }
        if let Ok(resolved) = base.join(href) {
            if seen.insert(resolved.to_string()) {
                links.push(resolved);
            }
        }
    }
    links
}

fn is_document_href(href: &str) -> bool {
    // extension check on the path, ignoring query and fragment
    let path = href.split(['?', '#']).next().unwrap_or(href);
    let Some((_, ext)) = path.rsplit_once('.') else {
        return false;
    };
    let ext = ext.to_ascii_lowercase();
    DOC_EXTENSIONS.contains(&ext.as_str())
}

/// Download `url` into `dest_dir`, named after the last path segment.
pub async fn download(
    http: &HttpClient,
    url: &Url,
    dest_dir: &Path,
) -> Result<PathBuf, CrawlError> {
    tokio::fs::create_dir_all(dest_dir).await?;

    let filename = url
        .path()
        .rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .unwrap_or("download");
    let dest = dest_dir.join(filename);

    let bytes = http
        .get_bytes(
            url.as_str(),
            RequestOpts {
                allow_absolute: true,
                ..Default::default()
            },
        )
        .await?;
    tokio::fs::write(&dest, &bytes).await?;

    tracing::info!(
        target: "crawl.documents",
        url = %url,
        dest = %dest.display(),
        bytes = bytes.len(),
        "downloaded"
    );
    Ok(dest)
}

/// Extract plain text from a downloaded document, dispatching on extension.
pub fn parse_document(path: &Path) -> Result<String, CrawlError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "pdf" => pdf_text(path),
        "xls" | "xlsx" => spreadsheet_text(path),
        "doc" | "docx" => ooxml_text(path, OoxmlKind::Document),
        "ppt" | "pptx" => ooxml_text(path, OoxmlKind::Slides),
        other => Err(CrawlError::UnsupportedDocument(other.to_string())),
    }
}

fn pdf_text(path: &Path) -> Result<String, CrawlError> {
    pdf_extract::extract_text(path).map_err(|e| CrawlError::Extract(e.to_string()))
}

/// One line per row, cells joined by tabs.
fn spreadsheet_text(path: &Path) -> Result<String, CrawlError> {
    let mut workbook =
        calamine::open_workbook_auto(path).map_err(|e| CrawlError::Extract(e.to_string()))?;

    let mut out = String::new();
    for name in workbook.sheet_names().to_owned() {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|e| CrawlError::Extract(e.to_string()))?;
        for row in range.rows() {
            let line = row
                .iter()
                .map(|cell| match cell {
                    calamine::Data::Empty => String::new(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join("\t");
            out.push_str(&line);
            out.push('\n');
        }
    }
    Ok(out)
}

enum OoxmlKind {
    /// DOCX: text runs in `word/document.xml`
    Document,
    /// PPTX: text runs across `ppt/slides/slideN.xml`
    Slides,
}

fn ooxml_text(path: &Path, kind: OoxmlKind) -> Result<String, CrawlError> {
    let file = std::fs::File::open(path)?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| CrawlError::Extract(e.to_string()))?;

    match kind {
        OoxmlKind::Document => {
            let xml = read_archive_file(&mut archive, "word/document.xml")?;
            xml_run_text(&xml, b"w:t", b"w:p")
        }
        OoxmlKind::Slides => {
            let mut slides: Vec<String> = archive
                .file_names()
                .filter(|n| n.starts_with("ppt/slides/slide") && n.ends_with(".xml"))
                .map(String::from)
                .collect();
            slides.sort_by_key(|name| slide_index(name));

            let mut out = String::new();
            for slide in slides {
                let xml = read_archive_file(&mut archive, &slide)?;
                out.push_str(&xml_run_text(&xml, b"a:t", b"a:p")?);
            }
            Ok(out)
        }
    }
}

fn read_archive_file(
    archive: &mut zip::ZipArchive<std::fs::File>,
    name: &str,
) -> Result<String, CrawlError> {
    let mut entry = archive
        .by_name(name)
        .map_err(|e| CrawlError::Extract(format!("{name}: {e}")))?;
    let mut xml = String::new();
    entry.read_to_string(&mut xml)?;
    Ok(xml)
}

fn slide_index(name: &str) -> u32 {
    name.chars()
        .filter(char::is_ascii_digit)
        .collect::<String>()
        .parse()
        .unwrap_or(0)
}

/// Concatenate the character data inside `text_tag` elements, newline at
/// each closing `para_tag`.
fn xml_run_text(xml: &str, text_tag: &[u8], para_tag: &[u8]) -> Result<String, CrawlError> {
    let mut reader = quick_xml::Reader::from_str(xml);
    let mut out = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == text_tag => in_text = true,
            Ok(Event::End(e)) => {
                if e.name().as_ref() == text_tag {
                    in_text = false;
                } else if e.name().as_ref() == para_tag {
                    out.push('\n');
                }
            }
            Ok(Event::Text(t)) if in_text => {
                let text = t
                    .unescape()
                    .map_err(|e| CrawlError::Extract(e.to_string()))?;
                out.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(CrawlError::Extract(e.to_string())),
            _ => {}
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    #[test]
    fn filters_document_hrefs() {
        assert!(is_document_href("/files/report.pdf"));
        assert!(is_document_href("slides.PPTX"));
        assert!(is_document_href("/dl/data.xlsx?token=abc"));
        assert!(!is_document_href("/posts/article.html"));
        assert!(!is_document_href("/no-extension"));
        assert!(!is_document_href("https://example.com/"));
    }

    #[test]
    fn collects_and_resolves_links_in_order() {
        let html = r#"
            <html><body>
            <a href="/a/report.pdf">report</a>
            <a href="notes.docx">notes</a>
            <a href="/a/report.pdf">dup</a>
            <a href="https://other.example/deck.pptx">deck</a>
            <a href="/plain.html">page</a>
            </body></html>"#;
        let base = Url::parse("https://example.com/docs/").unwrap();

        let links = document_links(html, &base);
        let strings: Vec<String> = links.iter().map(Url::to_string).collect();
        assert_eq!(
            strings,
            vec![
                "https://example.com/a/report.pdf",
                "https://example.com/docs/notes.docx",
                "https://other.example/deck.pptx",
            ]
        );
    }

    #[test]
    fn unsupported_extension_is_an_error() {
        let err = parse_document(Path::new("archive.tar.gz")).unwrap_err();
        assert!(matches!(err, CrawlError::UnsupportedDocument(ext) if ext == "gz"));
    }

    fn write_zip(path: &Path, entries: &[(&str, &str)]) {
        let file = std::fs::File::create(path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        for (name, content) in entries {
            writer
                .start_file(name.to_string(), SimpleFileOptions::default())
                .unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
    }

    #[test]
    fn extracts_docx_paragraph_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memo.docx");
        write_zip(
            &path,
            &[(
                "word/document.xml",
                r#"<?xml version="1.0"?>
                <w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
                  <w:body>
                    <w:p><w:r><w:t>First paragraph.</w:t></w:r></w:p>
                    <w:p><w:r><w:t>Second </w:t></w:r><w:r><w:t>paragraph.</w:t></w:r></w:p>
                  </w:body>
                </w:document>"#,
            )],
        );

        let text = parse_document(&path).unwrap();
        assert_eq!(text, "First paragraph.\nSecond paragraph.\n");
    }

    #[test]
    fn extracts_pptx_slide_text_in_slide_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.pptx");
        let slide = |text: &str| {
            format!(
                r#"<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main">
                   <a:p><a:r><a:t>{text}</a:t></a:r></a:p></p:sld>"#
            )
        };
        write_zip(
            &path,
            &[
                ("ppt/slides/slide10.xml", &slide("tenth")),
                ("ppt/slides/slide2.xml", &slide("second")),
                ("ppt/slides/slide1.xml", &slide("first")),
            ],
        );

        let text = parse_document(&path).unwrap();
        assert_eq!(text, "first\nsecond\ntenth\n");
    }

    #[test]
    fn docx_missing_document_xml_is_extract_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.docx");
        write_zip(&path, &[("other.xml", "<x/>")]);

        let err = parse_document(&path).unwrap_err();
        assert!(matches!(err, CrawlError::Extract(_)));
    }
}
