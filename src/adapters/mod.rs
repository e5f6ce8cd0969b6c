//! Storage integrations for StudyFerry.
//!
//! - [`catalog`] - In-memory SQLite catalog of discovered images
//! - [`settings`] - Destination settings store and policy source (trait-based)
//!
//! # Design Pattern
//!
//! Adapters isolate storage details behind small types and traits so the
//! core can be tested with in-memory implementations.
//!
//! ```rust
//! use studyferry::adapters::catalog::Catalog;
//! use studyferry::domain::ImageRecord;
//!
//! # fn example() -> studyferry::domain::Result<()> {
//! let catalog = Catalog::open_in_memory()?;
//! catalog.insert(&ImageRecord::new("1.2.3", "/media/IMG0001").with_patient("DOE^JANE", "P1", "19700101"))?;
//! assert_eq!(catalog.patients()?.len(), 1);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod catalog;
pub mod settings;
