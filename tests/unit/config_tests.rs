/*!
 * Tests for application configuration functionality
 */

use crate::common::{create_temp_dir, create_test_file};
use blocktrans::app_config::Config;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.source_language, "English");
    assert_eq!(config.target_language, "Chinese");
    assert_eq!(config.provider.endpoint, "https://api.openai.com/v1");
    assert_eq!(config.provider.model, "gpt-4o-mini");
    assert_eq!(config.provider.timeout_secs, 120);

    assert_eq!(config.concurrency.initial_workers, 20);
    assert_eq!(config.concurrency.min_workers, 1);
    assert_eq!(config.concurrency.max_workers, 100);
    assert_eq!(config.concurrency.rate_limit_backoff, 0.5);
    assert_eq!(config.concurrency.rate_limit_increase, 1.2);
    assert_eq!(config.concurrency.success_threshold, 0.95);
    assert_eq!(config.concurrency.increase_interval_secs, 30);

    assert_eq!(config.translation.retry_count, 3);
    assert!(config.translation.system_prompt.contains("{source_language}"));
    assert!(config.translation.system_prompt.contains("{target_language}"));
    assert!(config.terminology_dir.is_none());

    assert!(config.validate().is_ok());
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    // Invalid endpoint
    config.provider.endpoint = "not a url".to_string();
    assert!(config.validate().is_err());
    config.provider.endpoint = "http://localhost:8080/v1".to_string();
    assert!(config.validate().is_ok());

    // Worker bounds
    config.concurrency.min_workers = 0;
    assert!(config.validate().is_err());
    config.concurrency.min_workers = 50;
    config.concurrency.max_workers = 10;
    assert!(config.validate().is_err());
    config.concurrency.min_workers = 1;
    config.concurrency.max_workers = 100;
    assert!(config.validate().is_ok());

    // Backoff must shrink, increase must grow
    config.concurrency.rate_limit_backoff = 0.0;
    assert!(config.validate().is_err());
    config.concurrency.rate_limit_backoff = 1.0;
    assert!(config.validate().is_err());
    config.concurrency.rate_limit_backoff = 0.5;
    config.concurrency.rate_limit_increase = 1.0;
    assert!(config.validate().is_err());
    config.concurrency.rate_limit_increase = 1.2;
    assert!(config.validate().is_ok());

    // Success threshold is a rate
    config.concurrency.success_threshold = 1.5;
    assert!(config.validate().is_err());
    config.concurrency.success_threshold = 0.95;
    assert!(config.validate().is_ok());
}

/// Test loading config from a JSON file with partial fields
#[test]
fn test_from_file_withPartialJson_shouldFillDefaults() {
    let temp_dir = create_temp_dir().unwrap();
    let path = create_test_file(
        temp_dir.path(),
        "config.json",
        r#"{
            "target_language": "French",
            "provider": { "api_key": "sk-test", "model": "gpt-4o" },
            "concurrency": { "initial_workers": 5 }
        }"#,
    )
    .unwrap();

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.source_language, "English");
    assert_eq!(config.target_language, "French");
    assert_eq!(config.provider.api_key, "sk-test");
    assert_eq!(config.provider.model, "gpt-4o");
    assert_eq!(config.concurrency.initial_workers, 5);
    assert_eq!(config.concurrency.max_workers, 100);
}

/// Test that loading rejects a config that fails validation
#[test]
fn test_from_file_withInvalidValues_shouldFail() {
    let temp_dir = create_temp_dir().unwrap();
    let path = create_test_file(
        temp_dir.path(),
        "config.json",
        r#"{ "concurrency": { "rate_limit_backoff": 2.0 } }"#,
    )
    .unwrap();

    assert!(Config::from_file(&path).is_err());
}

/// Test that a missing file surfaces an error
#[test]
fn test_from_file_withMissingFile_shouldFail() {
    let temp_dir = create_temp_dir().unwrap();
    assert!(Config::from_file(temp_dir.path().join("absent.json")).is_err());
}
