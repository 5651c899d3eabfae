use inlet_config::{FetchBackend, InletConfigLoader, SearchEngine};
use serial_test::serial;
use std::{fs, path::PathBuf};
use tempfile::TempDir;

/// Helper to write a YAML file in a temp dir and return its path.
fn write_yaml(tmp: &TempDir, name: &str, yaml: &str) -> PathBuf {
    let p = tmp.path().join(name);
    fs::write(&p, yaml).expect("write yaml");
    p
}

#[test]
#[serial]
fn load_from_file_with_env_expansion() {
    let tmp = TempDir::new().unwrap();

    let file_yaml = r#"
search:
  engine: serper
  max_results: 5
  serper_api_key: "${SERPER_API_KEY}"
crawl:
  backend: browser
  timeout_ms: 10000
  wait_for_selector: "article"
"#;
    let p = write_yaml(&tmp, "inlet.yaml", file_yaml);

    temp_env::with_var("SERPER_API_KEY", Some("sk-from-env"), || {
        let config = InletConfigLoader::new()
            .with_file(&p)
            .load()
            .expect("load config");

        assert_eq!(config.search.engine, SearchEngine::Serper);
        assert_eq!(config.search.max_results, 5);
        assert_eq!(
            config.search.api_key_for(SearchEngine::Serper),
            Some("sk-from-env")
        );
        assert_eq!(config.crawl.backend, FetchBackend::Browser);
        assert_eq!(config.crawl.timeout_ms, 10_000);
        assert_eq!(config.crawl.wait_for_selector.as_deref(), Some("article"));
    });
}

#[test]
#[serial]
fn missing_file_falls_back_to_defaults() {
    let config = InletConfigLoader::new()
        .with_file("/definitely/not/here/inlet.yaml")
        .load()
        .expect("absent file is not an error");

    assert_eq!(config.search.engine, SearchEngine::Tavily);
    assert_eq!(config.crawl.backend, FetchBackend::Reader);
    assert_eq!(config.crawl.webdriver_url, "http://localhost:9515");
}

#[test]
#[serial]
fn env_overrides_file() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(&tmp, "inlet.yaml", "search:\n  engine: brave\n");

    temp_env::with_var("INLET_SEARCH__ENGINE", Some("duckduckgo"), || {
        let config = InletConfigLoader::new()
            .with_file(&p)
            .load()
            .expect("load config");
        assert_eq!(config.search.engine, SearchEngine::DuckDuckGo);
    });
}
