//! Configuration schema types

use crate::adapters::settings::DEFAULT_POLICY_PATH;
use serde::{Deserialize, Serialize};

/// Main studyferry configuration
///
/// Root structure of `studyferry.toml`. Every section is optional and falls
/// back to its defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FerryConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Where destinations are read from and saved to
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl FerryConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.storage.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Destination storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// User-editable settings file holding the local destinations
    #[serde(default = "default_settings_path")]
    pub settings_path: String,

    /// Whether to read centrally administered destinations
    #[serde(default = "default_true")]
    pub policy_enabled: bool,

    /// Read-only policy file holding the global destinations
    #[serde(default = "default_policy_path")]
    pub policy_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            settings_path: default_settings_path(),
            policy_enabled: true,
            policy_path: default_policy_path(),
        }
    }
}

impl StorageConfig {
    fn validate(&self) -> Result<(), String> {
        if self.settings_path.trim().is_empty() {
            return Err("storage.settings_path cannot be empty".to_string());
        }
        if self.policy_enabled && self.policy_path.trim().is_empty() {
            return Err(
                "storage.policy_path cannot be empty when storage.policy_enabled = true"
                    .to_string(),
            );
        }
        if self.policy_enabled && self.policy_path == self.settings_path {
            return Err("storage.policy_path must differ from storage.settings_path".to_string());
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Write JSON logs to rolling files
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Rotation policy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err(
                "logging.local_path cannot be empty when logging.local_enabled = true".to_string(),
            );
        }
        Ok(())
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_settings_path() -> String {
    "studyferry-settings.toml".to_string()
}

fn default_true() -> bool {
    true
}

fn default_policy_path() -> String {
    DEFAULT_POLICY_PATH.to_string()
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
