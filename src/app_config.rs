use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language name or code
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language name or code
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Translation provider config
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Adaptive concurrency config
    #[serde(default)]
    pub concurrency: ConcurrencyConfig,

    /// Common translation settings
    #[serde(default)]
    pub translation: TranslationCommonConfig,

    /// Directory holding terminology files (JSON maps or two-column TSV)
    #[serde(default)]
    pub terminology_dir: Option<String>,
}

/// Provider configuration for the OpenAI-compatible chat endpoint
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Service base URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// API key
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Temperature parameter for text generation (0.0 to 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens per completion
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: String::new(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

/// Adaptive concurrency settings for the rate limiter
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ConcurrencyConfig {
    /// Worker target at start of run
    #[serde(default = "default_initial_workers")]
    pub initial_workers: u32,

    /// Lower clamp for the worker target
    #[serde(default = "default_min_workers")]
    pub min_workers: u32,

    /// Upper clamp for the worker target
    #[serde(default = "default_max_workers")]
    pub max_workers: u32,

    /// Multiplier applied on a rate-limit signal (< 1.0)
    #[serde(default = "default_rate_limit_backoff")]
    pub rate_limit_backoff: f64,

    /// Multiplier applied on sustained success (> 1.0)
    #[serde(default = "default_rate_limit_increase")]
    pub rate_limit_increase: f64,

    /// Rolling success rate required before an increase
    #[serde(default = "default_success_threshold")]
    pub success_threshold: f64,

    /// Minimum seconds between increases
    #[serde(default = "default_increase_interval_secs")]
    pub increase_interval_secs: u64,
}

impl Default for ConcurrencyConfig {
    fn default() -> Self {
        Self {
            initial_workers: default_initial_workers(),
            min_workers: default_min_workers(),
            max_workers: default_max_workers(),
            rate_limit_backoff: default_rate_limit_backoff(),
            rate_limit_increase: default_rate_limit_increase(),
            success_threshold: default_success_threshold(),
            increase_interval_secs: default_increase_interval_secs(),
        }
    }
}

/// Common translation settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationCommonConfig {
    /// System prompt template for translation
    /// Placeholders: {source_language}, {target_language}
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Retry count for transient failures per fragment
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Backoff base for retries (in milliseconds, doubled per attempt)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl Default for TranslationCommonConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

fn default_source_language() -> String {
    "English".to_string()
}

fn default_target_language() -> String {
    "Chinese".to_string()
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_temperature() -> f32 {
    0.3
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_initial_workers() -> u32 {
    20
}

fn default_min_workers() -> u32 {
    1
}

fn default_max_workers() -> u32 {
    100
}

fn default_rate_limit_backoff() -> f64 {
    0.5
}

fn default_rate_limit_increase() -> f64 {
    1.2
}

fn default_success_threshold() -> f64 {
    0.95
}

fn default_increase_interval_secs() -> u64 {
    30
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    1000
}

fn default_system_prompt() -> String {
    "You are a professional academic document translator. Translate the \
     following text from {source_language} to {target_language}. Preserve \
     paragraph structure, keep URLs unchanged, and output only the \
     translation without prefixes or explanations."
        .to_string()
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.provider.endpoint)
            .map_err(|e| anyhow!("Invalid provider endpoint: {}", e))?;

        let c = &self.concurrency;
        if c.min_workers == 0 {
            return Err(anyhow!("min_workers must be at least 1"));
        }
        if c.min_workers > c.max_workers {
            return Err(anyhow!(
                "min_workers ({}) must not exceed max_workers ({})",
                c.min_workers,
                c.max_workers
            ));
        }
        if c.rate_limit_backoff <= 0.0 || c.rate_limit_backoff >= 1.0 {
            return Err(anyhow!("rate_limit_backoff must be in (0, 1)"));
        }
        if c.rate_limit_increase <= 1.0 {
            return Err(anyhow!("rate_limit_increase must be greater than 1"));
        }
        if !(0.0..=1.0).contains(&c.success_threshold) {
            return Err(anyhow!("success_threshold must be in [0, 1]"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            target_language: default_target_language(),
            provider: ProviderConfig::default(),
            concurrency: ConcurrencyConfig::default(),
            translation: TranslationCommonConfig::default(),
            terminology_dir: None,
        }
    }
}
