//! Integration tests for logging functionality
//!
//! The global subscriber can be installed once per process, so only one
//! test here calls `init_logging` successfully.

use studyferry::config::LoggingConfig;
use studyferry::logging::{init_logging, parse_log_level};
use tempfile::TempDir;

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert!(!config.local_enabled);
    assert_eq!(config.local_path, "logs");
    assert_eq!(config.local_rotation, "daily");
}

#[test]
fn test_invalid_level_is_rejected_before_install() {
    let config = LoggingConfig::default();
    assert!(init_logging("loud", &config).is_err());
    assert!(parse_log_level("loud").is_err());
}

#[test]
fn test_file_logging_creates_directory() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("nested").join("logs");

    let config = LoggingConfig {
        local_enabled: true,
        local_path: log_path.to_string_lossy().to_string(),
        local_rotation: "never".to_string(),
    };

    let guard = init_logging("debug", &config).unwrap();
    tracing::info!(test = "file_logging", "Hello from the integration test");
    drop(guard);

    assert!(log_path.is_dir());
    let files: Vec<_> = std::fs::read_dir(&log_path).unwrap().collect();
    assert!(!files.is_empty());
}
