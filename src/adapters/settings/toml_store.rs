//! TOML-file settings store
//!
//! Each namespace is a top-level table whose keys keep their insertion
//! order:
//!
//! ```toml
//! [Destinations]
//! 1 = "Clinic A,10.0.0.5,104,AE1,US1"
//! 2 = "Archive,pacs.example.org,11112,ARCHIVE,US1"
//! ```

use super::traits::{SettingsEntry, SettingsStore};
use crate::domain::errors::EngineError;
use crate::domain::Result;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use toml::{Table, Value};

/// Settings store persisted as a TOML file
#[derive(Debug)]
pub struct TomlSettingsStore {
    path: PathBuf,
    table: Table,
}

impl TomlSettingsStore {
    /// Opens the store at `path`
    ///
    /// A missing file is an empty store; it is created on the first flush.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let table = if path.exists() {
            let contents = fs::read_to_string(&path).map_err(|e| {
                EngineError::Settings(format!(
                    "Failed to read settings file {}: {}",
                    path.display(),
                    e
                ))
            })?;
            contents.parse::<Table>().map_err(|e| {
                EngineError::Settings(format!(
                    "Failed to parse settings file {}: {}",
                    path.display(),
                    e
                ))
            })?
        } else {
            tracing::debug!(path = %path.display(), "Settings file not found, starting empty");
            Table::new()
        };

        Ok(Self { path, table })
    }

    /// Returns the backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Reads the string entries of one namespace table
pub(crate) fn table_entries(table: &Table, namespace: &str) -> Vec<SettingsEntry> {
    let Some(section) = table.get(namespace).and_then(Value::as_table) else {
        return Vec::new();
    };

    section
        .iter()
        .filter_map(|(key, value)| match value.as_str() {
            Some(text) => Some((key.clone(), text.to_string())),
            None => {
                tracing::debug!(namespace, key = %key, "Ignoring non-string settings value");
                None
            }
        })
        .collect()
}

impl SettingsStore for TomlSettingsStore {
    fn entries(&self, namespace: &str) -> Result<Vec<SettingsEntry>> {
        Ok(table_entries(&self.table, namespace))
    }

    fn delete_namespace(&mut self, namespace: &str) -> Result<()> {
        self.table.remove(namespace);
        Ok(())
    }

    fn write(&mut self, namespace: &str, key: &str, value: &str) -> Result<()> {
        let section = self
            .table
            .entry(namespace)
            .or_insert(Value::Table(Table::new()));

        if !section.is_table() {
            *section = Value::Table(Table::new());
        }
        if let Value::Table(section) = section {
            section.insert(key.to_string(), Value::String(value.to_string()));
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        let contents = toml::to_string(&self.table)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // Write beside the target and rename so a crash never leaves a truncated file.
        let staging = self.path.with_extension("toml.tmp");
        let mut file = File::create(&staging)?;
        file.write_all(contents.as_bytes())?;
        file.sync_all()?;
        fs::rename(&staging, &self.path)?;

        tracing::debug!(path = %self.path.display(), "Settings flushed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = TomlSettingsStore::open(dir.path().join("absent.toml")).unwrap();
        assert!(store.entries("Destinations").unwrap().is_empty());
    }

    #[test]
    fn test_entries_keep_file_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(
            &path,
            "[Destinations]\n2 = \"second\"\n10 = \"third\"\n1 = \"first\"\n",
        )
        .unwrap();

        let store = TomlSettingsStore::open(&path).unwrap();
        let keys: Vec<String> = store
            .entries("Destinations")
            .unwrap()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, vec!["2", "10", "1"]);
    }

    #[test]
    fn test_write_flush_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("settings.toml");

        let mut store = TomlSettingsStore::open(&path).unwrap();
        store.write("Destinations", "1", "A,h,104,AE,US").unwrap();
        store.write("Destinations", "2", "B,h,105,AE,US,X").unwrap();
        store.flush().unwrap();

        let reopened = TomlSettingsStore::open(&path).unwrap();
        assert_eq!(
            reopened.entries("Destinations").unwrap(),
            vec![
                ("1".to_string(), "A,h,104,AE,US".to_string()),
                ("2".to_string(), "B,h,105,AE,US,X".to_string()),
            ]
        );
        assert!(!path.with_extension("toml.tmp").exists());
    }

    #[test]
    fn test_delete_namespace_keeps_others() {
        let dir = TempDir::new().unwrap();
        let mut store = TomlSettingsStore::open(dir.path().join("s.toml")).unwrap();
        store.write("Destinations", "1", "x").unwrap();
        store.write("Window", "width", "800").unwrap();

        store.delete_namespace("Destinations").unwrap();

        assert!(store.entries("Destinations").unwrap().is_empty());
        assert_eq!(store.entries("Window").unwrap().len(), 1);
    }

    #[test]
    fn test_non_string_values_are_ignored() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "[Destinations]\n1 = 42\n2 = \"kept\"\n").unwrap();

        let store = TomlSettingsStore::open(&path).unwrap();
        assert_eq!(
            store.entries("Destinations").unwrap(),
            vec![("2".to_string(), "kept".to_string())]
        );
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "[Destinations\n").unwrap();

        let err = TomlSettingsStore::open(&path).unwrap_err();
        assert!(matches!(err, EngineError::Settings(_)));
    }
}
