//! Volatile image catalog
//!
//! One row per discovered image, keyed by SOP instance UID. The catalog is
//! owned by the [`crate::core::jobs::Orchestrator`]; jobs receive a
//! [`CatalogHandle`] clone.

pub mod store;

pub use store::{Catalog, CatalogHandle};
