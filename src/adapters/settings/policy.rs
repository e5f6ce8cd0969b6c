//! Machine-wide policy sources
//!
//! Centrally administered destinations come from a read-only file that
//! ordinary users cannot edit, by default `/etc/studyferry/policy.toml`. The
//! file uses the same layout as the user settings file. When it is missing
//! or unreadable the engine simply has no global destinations.

use super::toml_store::table_entries;
use super::traits::{PolicySource, SettingsEntry};
use crate::domain::errors::EngineError;
use crate::domain::Result;
use std::fs;
use std::path::{Path, PathBuf};
use toml::Table;

/// Default location of the machine-wide policy file
pub const DEFAULT_POLICY_PATH: &str = "/etc/studyferry/policy.toml";

/// Policy source read from a TOML file
///
/// The file is read on every call so administrators can update it without
/// a restart.
#[derive(Debug, Clone)]
pub struct TomlPolicySource {
    path: PathBuf,
}

impl TomlPolicySource {
    /// Creates a policy source for `path`
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl PolicySource for TomlPolicySource {
    fn entries(&self, namespace: &str) -> Result<Vec<SettingsEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&self.path).map_err(|e| {
            EngineError::Settings(format!(
                "Failed to read policy file {}: {}",
                self.path.display(),
                e
            ))
        })?;
        let table = contents.parse::<Table>().map_err(|e| {
            EngineError::Settings(format!(
                "Failed to parse policy file {}: {}",
                self.path.display(),
                e
            ))
        })?;

        Ok(table_entries(&table, namespace))
    }
}

/// Policy source for platforms or accounts without central policy
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPolicySource;

impl PolicySource for NoPolicySource {
    fn entries(&self, _namespace: &str) -> Result<Vec<SettingsEntry>> {
        Ok(Vec::new())
    }
}
