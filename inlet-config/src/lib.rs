//! Typed configuration for the Inlet toolkit.
//!
//! Settings come from an optional YAML file plus `INLET`-prefixed environment
//! variables (`__` separates nested keys, e.g. `INLET_SEARCH__ENGINE=brave`),
//! with `${VAR}` placeholders expanded recursively after the merge. Every
//! field has a default, so a zero-source load always succeeds.

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

const MAX_ENV_EXPANSION_DEPTH: usize = 8;

/// Which web-search API answers `search` requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchEngine {
    Tavily,
    DuckDuckGo,
    Brave,
    Arxiv,
    Serper,
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::Tavily
    }
}

impl SearchEngine {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tavily => "tavily",
            Self::DuckDuckGo => "duckduckgo",
            Self::Brave => "brave",
            Self::Arxiv => "arxiv",
            Self::Serper => "serper",
        }
    }
}

impl std::str::FromStr for SearchEngine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tavily" => Ok(Self::Tavily),
            "duckduckgo" => Ok(Self::DuckDuckGo),
            "brave" => Ok(Self::Brave),
            "arxiv" => Ok(Self::Arxiv),
            "serper" => Ok(Self::Serper),
            other => Err(format!(
                "unknown search engine `{other}` (expected tavily|duckduckgo|brave|arxiv|serper)"
            )),
        }
    }
}

/// How page HTML is obtained by the crawler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchBackend {
    /// Lightweight fetch through a reader endpoint (no rendering).
    Reader,
    /// Full rendering through a WebDriver-controlled browser.
    Browser,
}

impl Default for FetchBackend {
    fn default() -> Self {
        Self::Reader
    }
}

impl std::str::FromStr for FetchBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "reader" => Ok(Self::Reader),
            "browser" => Ok(Self::Browser),
            other => Err(format!(
                "unknown fetch backend `{other}` (expected reader|browser)"
            )),
        }
    }
}

/// Search-side settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub engine: SearchEngine,
    pub max_results: usize,
    pub tavily_api_key: Option<String>,
    pub brave_api_key: Option<String>,
    pub serper_api_key: Option<String>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            engine: SearchEngine::default(),
            max_results: 10,
            tavily_api_key: None,
            brave_api_key: None,
            serper_api_key: None,
        }
    }
}

impl SearchSettings {
    /// Key for the selected engine, with empty strings and unexpanded
    /// `${VAR}` placeholders treated as absent.
    pub fn api_key_for(&self, engine: SearchEngine) -> Option<&str> {
        let raw = match engine {
            SearchEngine::Tavily => self.tavily_api_key.as_deref(),
            SearchEngine::Brave => self.brave_api_key.as_deref(),
            SearchEngine::Serper => self.serper_api_key.as_deref(),
            SearchEngine::DuckDuckGo | SearchEngine::Arxiv => None,
        };
        raw.map(str::trim)
            .filter(|k| !k.is_empty() && !k.contains("${"))
    }
}

/// Crawler-side settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlSettings {
    pub backend: FetchBackend,
    pub headless: bool,
    pub timeout_ms: u64,
    /// CSS selector the browser backend waits for before taking the page
    /// source. When unset, it waits for document readiness instead.
    pub wait_for_selector: Option<String>,
    pub webdriver_url: String,
    pub reader_endpoint: String,
    pub reader_api_key: Option<String>,
    pub download_dir: String,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            backend: FetchBackend::default(),
            headless: true,
            timeout_ms: 30_000,
            wait_for_selector: None,
            webdriver_url: "http://localhost:9515".to_string(),
            reader_endpoint: "https://r.jina.ai/".to_string(),
            reader_api_key: None,
            download_dir: "./downloads".to_string(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InletConfig {
    pub search: SearchSettings,
    pub crawl: CrawlSettings,
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAX_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hiding the `config` crate wiring (YAML + env overrides).
pub struct InletConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for InletConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl InletConfigLoader {
    /// Start an empty loader. `INLET_`-prefixed env overrides are merged on
    /// top of all attached files/snippets when [`load`](Self::load) runs.
    ///
    /// ```
    /// use inlet_config::{InletConfigLoader, SearchEngine};
    ///
    /// let config = InletConfigLoader::new().load().expect("defaults load");
    /// assert_eq!(config.search.engine, SearchEngine::Tavily);
    /// assert_eq!(config.search.max_results, 10);
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a config file; the `config` crate infers format by suffix.
    /// The file may be absent — headless deployments can rely purely on
    /// environment variables.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Merge an inline YAML snippet (tests, CLI overrides).
    ///
    /// ```
    /// use inlet_config::{FetchBackend, InletConfigLoader};
    ///
    /// let config = InletConfigLoader::new()
    ///     .with_yaml_str("crawl:\n  backend: browser\n  headless: false")
    ///     .load()
    ///     .unwrap();
    /// assert_eq!(config.crawl.backend, FetchBackend::Browser);
    /// assert!(!config.crawl.headless);
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Merge sources, expand `${VAR}` placeholders, and materialise the
    /// typed config. Environment variables are merged last so they win over
    /// file-provided values.
    pub fn load(self) -> Result<InletConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix("INLET")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn expands_simple_string() {
        temp_env::with_var("FOO", Some("bar"), || {
            let mut v = json!("prefix-${FOO}-suffix");
            expand_env_in_value(&mut v);
            assert_eq!(v, json!("prefix-bar-suffix"));
        });
    }

    #[test]
    fn expands_in_nested_object() {
        temp_env::with_var("READER_KEY", Some("jina-abc"), || {
            let mut v = json!({ "crawl": { "reader_api_key": "${READER_KEY}" } });
            expand_env_in_value(&mut v);
            assert_eq!(v["crawl"]["reader_api_key"], json!("jina-abc"));
        });
    }

    #[test]
    fn expansion_terminates_on_cycles() {
        temp_env::with_vars([("A", Some("${B}")), ("B", Some("${A}"))], || {
            let mut v = json!("x=${A}-y");
            expand_env_in_value(&mut v);
            let s = v.as_str().unwrap();
            assert!(s.starts_with("x=") && s.ends_with("-y"));
            assert!(s.contains("${"));
        });
    }

    #[test]
    fn unknown_vars_are_left_as_is() {
        let mut v = json!("hi-${DOES_NOT_EXIST}");
        expand_env_in_value(&mut v);
        assert_eq!(v, json!("hi-${DOES_NOT_EXIST}"));
    }

    #[test]
    fn api_key_filters_placeholders_and_blanks() {
        let settings = SearchSettings {
            tavily_api_key: Some("${TAVILY_API_KEY}".into()),
            brave_api_key: Some("   ".into()),
            serper_api_key: Some("sk-123".into()),
            ..Default::default()
        };
        assert_eq!(settings.api_key_for(SearchEngine::Tavily), None);
        assert_eq!(settings.api_key_for(SearchEngine::Brave), None);
        assert_eq!(settings.api_key_for(SearchEngine::Serper), Some("sk-123"));
        assert_eq!(settings.api_key_for(SearchEngine::DuckDuckGo), None);
    }

    #[test]
    fn unknown_engine_is_rejected() {
        let err = InletConfigLoader::new()
            .with_yaml_str("search:\n  engine: bing")
            .load();
        assert!(err.is_err());
    }
}
