//! Destination registry
//!
//! Keeps two ordered lists: global destinations from the policy source and
//! local destinations from the user-editable settings store. Global entries
//! come first in the combined index space and can never be written back.

use crate::adapters::settings::{
    create_policy_source, create_settings_store, PolicySource, SettingsEntry, SettingsStore,
};
use crate::config::StorageConfig;
use crate::domain::errors::EngineError;
use crate::domain::{DestinationEntry, Result};
use serde::Serialize;

/// Settings namespace holding destination records
pub const DESTINATIONS_NAMESPACE: &str = "Destinations";

/// Where a destination was loaded from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DestinationOrigin {
    /// Centrally administered, read-only
    Global,
    /// User-editable
    Local,
}

/// A destination together with its combined index
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressedDestination<'a> {
    pub index: usize,
    pub origin: DestinationOrigin,
    #[serde(flatten)]
    pub entry: &'a DestinationEntry,
}

/// In-memory destination lists backed by injected storage
pub struct DestinationRegistry {
    store: Box<dyn SettingsStore>,
    policy: Box<dyn PolicySource>,
    global: Vec<DestinationEntry>,
    local: Vec<DestinationEntry>,
}

impl DestinationRegistry {
    /// Creates an empty registry; nothing is read until a load is requested
    pub fn new(store: Box<dyn SettingsStore>, policy: Box<dyn PolicySource>) -> Self {
        Self {
            store,
            policy,
            global: Vec::new(),
            local: Vec::new(),
        }
    }

    /// Opens the configured stores and loads global, then local destinations
    ///
    /// # Errors
    ///
    /// Returns an error if the settings store cannot be opened or read.
    pub fn open(storage: &StorageConfig) -> Result<Self> {
        let store = create_settings_store(storage)?;
        let policy = create_policy_source(storage);

        let mut registry = Self::new(store, policy);
        let global = registry.load_global();
        let local = registry.load_local()?;
        tracing::info!(global, local, "Destination registry loaded");
        Ok(registry)
    }

    /// Appends every parseable record of the settings store to the local list
    ///
    /// Records are taken in store enumeration order. Malformed records are
    /// skipped. The list is not cleared first, so calling this twice loads
    /// every record twice; use [`DestinationRegistry::reload_local`] to
    /// replace the list instead.
    ///
    /// Returns the number of destinations appended.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings store cannot be read.
    pub fn load_local(&mut self) -> Result<usize> {
        let entries = self.store.entries(DESTINATIONS_NAMESPACE)?;
        let loaded = append_parsed(&mut self.local, entries, DestinationOrigin::Local);

        tracing::debug!(loaded, total = self.local.len(), "Loaded local destinations");
        Ok(loaded)
    }

    /// Replaces the local list with the settings store contents
    pub fn reload_local(&mut self) -> Result<usize> {
        self.local.clear();
        self.load_local()
    }

    /// Appends every parseable record of the policy source to the global list
    ///
    /// An unavailable policy source leaves the list unchanged and is not an
    /// error. Accumulates like [`DestinationRegistry::load_local`].
    pub fn load_global(&mut self) -> usize {
        let entries = match self.policy.entries(DESTINATIONS_NAMESPACE) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!(error = %e, "Policy source unavailable, no global destinations");
                return 0;
            }
        };

        let loaded = append_parsed(&mut self.global, entries, DestinationOrigin::Global);
        tracing::debug!(loaded, total = self.global.len(), "Loaded global destinations");
        loaded
    }

    /// Writes the local list back to the settings store
    ///
    /// The namespace is emptied first and the entries are written under keys
    /// "1".."n" in list order, then the store is flushed before returning.
    ///
    /// # Errors
    ///
    /// Returns an error if any write or the flush fails.
    pub fn save_local(&mut self) -> Result<()> {
        self.store.delete_namespace(DESTINATIONS_NAMESPACE)?;
        for (i, entry) in self.local.iter().enumerate() {
            self.store
                .write(DESTINATIONS_NAMESPACE, &(i + 1).to_string(), &entry.to_record())?;
        }
        self.store.flush()?;

        tracing::info!(count = self.local.len(), "Saved local destinations");
        Ok(())
    }

    /// Resolves a combined index, global destinations first
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::IndexOutOfRange`] if `index` is not below
    /// [`DestinationRegistry::len`].
    pub fn resolve(&self, index: usize) -> Result<&DestinationEntry> {
        let global_len = self.global.len();
        let entry = if index < global_len {
            self.global.get(index)
        } else {
            self.local.get(index - global_len)
        };

        entry.ok_or(EngineError::IndexOutOfRange {
            index,
            len: self.len(),
        })
    }

    /// Centrally administered destinations
    pub fn global(&self) -> &[DestinationEntry] {
        &self.global
    }

    /// User-editable destinations
    pub fn local(&self) -> &[DestinationEntry] {
        &self.local
    }

    /// Number of addressable destinations
    pub fn len(&self) -> usize {
        self.global.len() + self.local.len()
    }

    /// Returns `true` if no destination is addressable
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every addressable destination in combined index order
    pub fn combined(&self) -> impl Iterator<Item = AddressedDestination<'_>> {
        let globals = self
            .global
            .iter()
            .map(|entry| (DestinationOrigin::Global, entry));
        let locals = self
            .local
            .iter()
            .map(|entry| (DestinationOrigin::Local, entry));

        globals
            .chain(locals)
            .enumerate()
            .map(|(index, (origin, entry))| AddressedDestination {
                index,
                origin,
                entry,
            })
    }

    /// Appends a local destination and returns its combined index
    ///
    /// The list is only changed in memory; call
    /// [`DestinationRegistry::save_local`] to persist it.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidDestination`] if the entry would not
    /// survive a save/load round trip.
    pub fn add_local(&mut self, entry: DestinationEntry) -> Result<usize> {
        entry.validate().map_err(EngineError::InvalidDestination)?;
        self.local.push(entry);
        Ok(self.len() - 1)
    }

    /// Replaces the local destination at combined `index`
    pub fn replace_local(&mut self, index: usize, entry: DestinationEntry) -> Result<()> {
        entry.validate().map_err(EngineError::InvalidDestination)?;
        let position = self.local_position(index)?;
        self.local[position] = entry;
        Ok(())
    }

    /// Removes and returns the local destination at combined `index`
    pub fn remove_local(&mut self, index: usize) -> Result<DestinationEntry> {
        let position = self.local_position(index)?;
        Ok(self.local.remove(position))
    }

    fn local_position(&self, index: usize) -> Result<usize> {
        if index >= self.len() {
            return Err(EngineError::IndexOutOfRange {
                index,
                len: self.len(),
            });
        }
        index.checked_sub(self.global.len()).ok_or_else(|| {
            EngineError::InvalidDestination(format!(
                "destination {index} is centrally managed and cannot be changed"
            ))
        })
    }
}

fn append_parsed(
    target: &mut Vec<DestinationEntry>,
    entries: Vec<SettingsEntry>,
    origin: DestinationOrigin,
) -> usize {
    let before = target.len();
    for (key, value) in entries {
        match DestinationEntry::parse_record(&value) {
            Ok(entry) => target.push(entry),
            Err(e) => {
                tracing::debug!(key = %key, origin = ?origin, error = %e, "Skipping malformed destination record");
            }
        }
    }
    target.len() - before
}

impl std::fmt::Debug for DestinationRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DestinationRegistry")
            .field("global", &self.global)
            .field("local", &self.local)
            .finish_non_exhaustive()
    }
}
