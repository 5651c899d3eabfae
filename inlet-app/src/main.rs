//! `inlet` — CLI over the acquisition tools.
//!
//! Subcommands map one-to-one onto the library surface: `search` runs the
//! configured engine, `crawl` runs the fetch→extract pipeline, `docs`
//! discovers and parses downloadable documents on a page.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use inlet_common::observability::{init_logging, LogConfig};
use inlet_config::{FetchBackend, InletConfig, InletConfigLoader, SearchEngine};
use inlet_http::HttpClient;
use inlet_web::search::provider_for;
use inlet_web::{documents, Crawler, SearchHit};

#[derive(Parser)]
#[command(name = "inlet", version, about = "Web content acquisition tools")]
struct Cli {
    /// Config file (YAML); missing files fall back to defaults + env.
    #[arg(long, global = true, default_value = "inlet.yaml")]
    config: PathBuf,

    /// Duplicate logs to stderr.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a web search through the configured engine.
    Search {
        query: String,
        /// Override the configured engine.
        #[arg(long)]
        engine: Option<SearchEngine>,
        /// Override the configured result cap.
        #[arg(long)]
        max_results: Option<usize>,
        /// Emit normalized hits as JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Fetch a URL and print its extracted article.
    Crawl {
        url: String,
        /// Override the configured fetch backend.
        #[arg(long)]
        backend: Option<FetchBackend>,
        /// Emit the article (URL, title, blocks) as JSON instead of markdown.
        #[arg(long)]
        json: bool,
    },
    /// Discover, download, and parse document links on a page.
    Docs {
        url: String,
        /// Download directory; defaults to the configured one.
        #[arg(long)]
        dest: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(LogConfig {
        app_name: "inlet",
        emit_stderr: cli.verbose,
        ..Default::default()
    })?;

    let config = InletConfigLoader::new()
        .with_file(&cli.config)
        .load()
        .context("loading configuration")?;

    match cli.command {
        Commands::Search {
            query,
            engine,
            max_results,
            json,
        } => run_search(config, query, engine, max_results, json).await,
        Commands::Crawl { url, backend, json } => run_crawl(config, url, backend, json).await,
        Commands::Docs { url, dest } => run_docs(config, url, dest).await,
    }
}

async fn run_search(
    mut config: InletConfig,
    query: String,
    engine: Option<SearchEngine>,
    max_results: Option<usize>,
    json: bool,
) -> anyhow::Result<()> {
    if let Some(engine) = engine {
        config.search.engine = engine;
    }
    let max_results = max_results.unwrap_or(config.search.max_results);

    let provider = provider_for(&config.search)?;
    let hits = provider
        .search(&query, max_results)
        .await
        .with_context(|| format!("searching via {}", provider.name()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&hits)?);
        return Ok(());
    }
    for hit in &hits {
        match hit {
            SearchHit::Page {
                title,
                url,
                content,
                ..
            } => println!("{title}\n  {url}\n  {content}\n"),
            SearchHit::Image {
                image_url,
                image_description,
            } => println!("[image] {image_description}\n  {image_url}\n"),
        }
    }
    Ok(())
}

async fn run_crawl(
    mut config: InletConfig,
    url: String,
    backend: Option<FetchBackend>,
    json: bool,
) -> anyhow::Result<()> {
    if let Some(backend) = backend {
        config.crawl.backend = backend;
    }

    let crawler = Crawler::from_settings(&config.crawl)?;
    let article = crawler
        .crawl(&url)
        .await
        .with_context(|| format!("crawling {url}"))?;

    if json {
        let payload = serde_json::json!({
            "url": article.url,
            "title": article.title,
            "blocks": article.blocks(),
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        println!("{}", article.to_markdown());
    }
    Ok(())
}

async fn run_docs(
    config: InletConfig,
    url: String,
    dest: Option<PathBuf>,
) -> anyhow::Result<()> {
    let dest = dest.unwrap_or_else(|| PathBuf::from(&config.crawl.download_dir));

    let fetcher = inlet_web::fetch::fetcher_for(&config.crawl)?;
    let page_url = url::Url::parse(&url).with_context(|| format!("invalid URL `{url}`"))?;
    let html = fetcher.fetch_html(&page_url).await?;

    let links = documents::document_links(&html, &page_url);
    if links.is_empty() {
        println!("no document links found on {url}");
        return Ok(());
    }

    let http = HttpClient::new(page_url.as_str()).context("building download client")?;
    for link in links {
        let path = match documents::download(&http, &link, &dest).await {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!(target: "docs", url = %link, error = %e, "download failed");
                continue;
            }
        };
        match documents::parse_document(&path) {
            Ok(text) => {
                println!("--- {} ({} chars) ---", link, text.len());
                println!("{text}");
            }
            Err(e) => {
                tracing::warn!(target: "docs", path = %path.display(), error = %e, "parse failed")
            }
        }
    }
    Ok(())
}
