//! Settings storage traits
//!
//! Destinations are persisted as string values under a namespace. Two
//! sources exist: the user-editable store, which the engine reads and
//! rewrites, and a centrally administered policy source, which it only reads.

use crate::domain::Result;

/// A namespace entry: key and raw value
pub type SettingsEntry = (String, String);

/// User-editable, ordered key/value storage
///
/// Implementations must enumerate entries in a stable order; the registry
/// keeps destinations in that order.
pub trait SettingsStore: Send {
    /// Returns every entry under `namespace`, in enumeration order
    ///
    /// A namespace that does not exist yields no entries.
    fn entries(&self, namespace: &str) -> Result<Vec<SettingsEntry>>;

    /// Removes `namespace` and all of its entries
    fn delete_namespace(&mut self, namespace: &str) -> Result<()>;

    /// Writes one entry, creating the namespace when needed
    fn write(&mut self, namespace: &str, key: &str, value: &str) -> Result<()>;

    /// Persists pending writes to durable media before returning
    fn flush(&mut self) -> Result<()>;
}

/// Read-only, machine-wide policy storage
///
/// Errors mean the source is unavailable; callers treat that the same as an
/// empty namespace.
pub trait PolicySource: Send {
    /// Returns every entry under `namespace`, in enumeration order
    fn entries(&self, namespace: &str) -> Result<Vec<SettingsEntry>>;
}
