//! In-memory settings sources
//!
//! Used by tests and by hosts that keep their settings elsewhere.
//! [`MemorySettingsStore`] clones share the same data, so a caller can hand
//! one clone to the registry and inspect what it wrote through another.

use super::traits::{PolicySource, SettingsEntry, SettingsStore};
use crate::domain::Result;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Default)]
struct MemoryState {
    namespaces: BTreeMap<String, Vec<SettingsEntry>>,
    flushes: usize,
}

/// Shared in-memory [`SettingsStore`]
#[derive(Debug, Clone, Default)]
pub struct MemorySettingsStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemorySettingsStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `values` under `namespace`, keyed "1".."n"
    pub fn with_values<I, S>(namespace: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = values
            .into_iter()
            .enumerate()
            .map(|(i, value)| ((i + 1).to_string(), value.into()))
            .collect();

        let store = Self::new();
        store.lock().namespaces.insert(namespace.to_string(), entries);
        store
    }

    /// Number of completed flushes
    pub fn flushes(&self) -> usize {
        self.lock().flushes
    }

    /// Snapshot of the raw entries under `namespace`
    pub fn snapshot(&self, namespace: &str) -> Vec<SettingsEntry> {
        self.lock()
            .namespaces
            .get(namespace)
            .cloned()
            .unwrap_or_default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SettingsStore for MemorySettingsStore {
    fn entries(&self, namespace: &str) -> Result<Vec<SettingsEntry>> {
        Ok(self.snapshot(namespace))
    }

    fn delete_namespace(&mut self, namespace: &str) -> Result<()> {
        self.lock().namespaces.remove(namespace);
        Ok(())
    }

    fn write(&mut self, namespace: &str, key: &str, value: &str) -> Result<()> {
        let mut state = self.lock();
        let entries = state.namespaces.entry(namespace.to_string()).or_default();
        match entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = value.to_string(),
            None => entries.push((key.to_string(), value.to_string())),
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.lock().flushes += 1;
        Ok(())
    }
}

/// Fixed [`PolicySource`] with entries supplied up front
#[derive(Debug, Clone, Default)]
pub struct StaticPolicySource {
    namespaces: BTreeMap<String, Vec<SettingsEntry>>,
}

impl StaticPolicySource {
    /// Creates a policy source holding `values` under `namespace`, keyed "1".."n"
    pub fn with_values<I, S>(namespace: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = values
            .into_iter()
            .enumerate()
            .map(|(i, value)| ((i + 1).to_string(), value.into()))
            .collect();

        let mut namespaces = BTreeMap::new();
        namespaces.insert(namespace.to_string(), entries);
        Self { namespaces }
    }
}

impl PolicySource for StaticPolicySource {
    fn entries(&self, namespace: &str) -> Result<Vec<SettingsEntry>> {
        Ok(self.namespaces.get(namespace).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let store = MemorySettingsStore::new();
        let mut writer = store.clone();
        writer.write("Destinations", "1", "a").unwrap();
        writer.flush().unwrap();

        assert_eq!(store.snapshot("Destinations").len(), 1);
        assert_eq!(store.flushes(), 1);
    }

    #[test]
    fn test_write_replaces_existing_key_in_place() {
        let mut store = MemorySettingsStore::with_values("Destinations", ["a", "b"]);
        store.write("Destinations", "1", "c").unwrap();

        assert_eq!(
            store.entries("Destinations").unwrap(),
            vec![
                ("1".to_string(), "c".to_string()),
                ("2".to_string(), "b".to_string()),
            ]
        );
    }

    #[test]
    fn test_static_policy_unknown_namespace_is_empty() {
        let policy = StaticPolicySource::with_values("Destinations", ["a"]);
        assert!(policy.entries("Other").unwrap().is_empty());
        assert_eq!(policy.entries("Destinations").unwrap().len(), 1);
    }
}
