//! Integration tests for configuration loading and validation
//!
//! Tests that modify environment variables hold ENV_MUTEX so they do not
//! interfere with each other.

use std::io::Write;
use std::sync::Mutex;
use studyferry::config::{load_config, FerryConfig};
use studyferry::domain::EngineError;
use tempfile::NamedTempFile;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn cleanup_env_vars() {
    std::env::remove_var("STUDYFERRY_APPLICATION_LOG_LEVEL");
    std::env::remove_var("STUDYFERRY_STORAGE_SETTINGS_PATH");
    std::env::remove_var("STUDYFERRY_STORAGE_POLICY_ENABLED");
    std::env::remove_var("STUDYFERRY_STORAGE_POLICY_PATH");
    std::env::remove_var("STUDYFERRY_LOGGING_LOCAL_ENABLED");
    std::env::remove_var("STUDYFERRY_LOGGING_LOCAL_ROTATION");
    std::env::remove_var("TEST_FERRY_HOME");
}

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config(
        r#"
[application]
log_level = "debug"

[storage]
settings_path = "/var/lib/studyferry/settings.toml"
policy_enabled = true
policy_path = "/etc/studyferry/site-policy.toml"

[logging]
local_enabled = true
local_path = "/var/log/studyferry"
local_rotation = "hourly"
"#,
    );

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.storage.settings_path, "/var/lib/studyferry/settings.toml");
    assert!(config.storage.policy_enabled);
    assert_eq!(config.storage.policy_path, "/etc/studyferry/site-policy.toml");
    assert!(config.logging.local_enabled);
    assert_eq!(config.logging.local_path, "/var/log/studyferry");
    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn test_empty_config_uses_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config("");
    let config = load_config(file.path()).unwrap();
    let defaults = FerryConfig::default();

    assert_eq!(config.application.log_level, defaults.application.log_level);
    assert_eq!(config.storage.settings_path, "studyferry-settings.toml");
    assert_eq!(config.storage.policy_path, "/etc/studyferry/policy.toml");
    assert!(!config.logging.local_enabled);
}

#[test]
fn test_env_var_substitution() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("TEST_FERRY_HOME", "/home/radiology");

    let file = write_config(
        r#"
# settings_path = "${TEST_FERRY_UNUSED}/ignored.toml"
[storage]
settings_path = "${TEST_FERRY_HOME}/.studyferry.toml"
policy_enabled = false
"#,
    );

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.storage.settings_path, "/home/radiology/.studyferry.toml");

    cleanup_env_vars();
}

#[test]
fn test_missing_env_var_is_reported() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config(
        r#"
[storage]
settings_path = "${TEST_FERRY_HOME}/.studyferry.toml"
"#,
    );

    match load_config(file.path()) {
        Err(EngineError::Configuration(msg)) => assert!(msg.contains("TEST_FERRY_HOME")),
        other => panic!("expected configuration error, got {other:?}"),
    }
}

#[test]
fn test_env_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("STUDYFERRY_APPLICATION_LOG_LEVEL", "warn");
    std::env::set_var("STUDYFERRY_STORAGE_POLICY_ENABLED", "false");
    std::env::set_var("STUDYFERRY_LOGGING_LOCAL_ROTATION", "never");

    let file = write_config(
        r#"
[application]
log_level = "info"

[logging]
local_rotation = "daily"
"#,
    );

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.application.log_level, "warn");
    assert!(!config.storage.policy_enabled);
    assert_eq!(config.logging.local_rotation, "never");

    cleanup_env_vars();
}

#[test]
fn test_invalid_values_fail_validation() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    for content in [
        "[application]\nlog_level = \"verbose\"\n",
        "[logging]\nlocal_rotation = \"weekly\"\n",
        "[storage]\nsettings_path = \"same.toml\"\npolicy_path = \"same.toml\"\n",
        "[storage]\nsettings_path = \"\"\n",
    ] {
        let file = write_config(content);
        assert!(
            matches!(load_config(file.path()), Err(EngineError::Configuration(_))),
            "accepted invalid config: {content}"
        );
    }
}

#[test]
fn test_malformed_toml() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config("[storage\nsettings_path = 1\n");
    assert!(matches!(
        load_config(file.path()),
        Err(EngineError::Configuration(_))
    ));
}
