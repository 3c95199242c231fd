/*!
 * Common test utilities for the blocktrans test suite
 */

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use tempfile::TempDir;

use blocktrans::app_config::Config;
use blocktrans::translate::Translator;
use blocktrans::{AdaptiveLimiter, Pipeline, Registry, Terminology};


/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Initializes logging for tests when RUST_LOG is set
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Config tuned for tests: no retry sleep, small worker pool
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.translation.retry_backoff_ms = 0;
    config.translation.retry_count = 2;
    config.concurrency.initial_workers = 4;
    config.concurrency.max_workers = 8;
    config
}

/// Pipeline wired to the given translator with the stock registry and
/// no terminology
pub fn test_pipeline(provider: Arc<dyn Translator>, config: &Config) -> Pipeline {
    Pipeline::with_components(
        Registry::standard(),
        provider,
        Arc::new(Terminology::default()),
        Arc::new(AdaptiveLimiter::new(&config.concurrency)),
        config,
    )
}

/// Content-list JSON for a small three-block document covering a plain
/// text block, a kind no registry entry knows, and an item-by-item list
pub fn sample_document_json() -> &'static str {
    r#"[
        {"type": "text", "page_idx": 0, "bbox": [10.0, 10.0, 200.0, 40.0], "text": "Hello world"},
        {"type": "unknown_future_kind", "page_idx": 0, "payload": "opaque"},
        {"type": "list", "page_idx": 1, "list_items": ["Alpha item", "Beta item"]}
    ]"#
}
