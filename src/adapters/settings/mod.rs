//! Destination settings storage
//!
//! Trait-based access to the user-editable settings store and the read-only
//! policy source, with file-backed and in-memory implementations.

pub mod factory;
pub mod memory;
pub mod policy;
pub mod toml_store;
pub mod traits;

pub use factory::{create_policy_source, create_settings_store};
pub use memory::{MemorySettingsStore, StaticPolicySource};
pub use policy::{NoPolicySource, TomlPolicySource, DEFAULT_POLICY_PATH};
pub use toml_store::TomlSettingsStore;
pub use traits::{PolicySource, SettingsEntry, SettingsStore};
