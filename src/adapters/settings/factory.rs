//! Settings source factory
//!
//! Builds the settings store and policy source described by the storage
//! section of the configuration.

use super::policy::{NoPolicySource, TomlPolicySource};
use super::toml_store::TomlSettingsStore;
use super::traits::{PolicySource, SettingsStore};
use crate::config::StorageConfig;
use crate::domain::Result;

/// Opens the user-editable settings store
///
/// # Errors
///
/// Returns an error if the settings file exists but cannot be read.
pub fn create_settings_store(config: &StorageConfig) -> Result<Box<dyn SettingsStore>> {
    tracing::debug!(path = %config.settings_path, "Opening settings store");
    Ok(Box::new(TomlSettingsStore::open(&config.settings_path)?))
}

/// Creates the policy source, or an empty one when policy is disabled
pub fn create_policy_source(config: &StorageConfig) -> Box<dyn PolicySource> {
    if config.policy_enabled {
        tracing::debug!(path = %config.policy_path, "Using policy file");
        Box::new(TomlPolicySource::new(&config.policy_path))
    } else {
        Box::new(NoPolicySource)
    }
}
