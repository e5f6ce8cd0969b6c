//! Domain models and types for studyferry.
//!
//! The domain layer provides:
//! - **Catalog rows** ([`ImageRecord`], [`PatientSummary`])
//! - **Transfer destinations** ([`DestinationEntry`]) and their persisted record format
//! - **Error types** ([`EngineError`], [`RecordParseError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, EngineError>`]:
//!
//! ```rust
//! use studyferry::domain::{DestinationEntry, EngineError, Result};
//!
//! fn first_destination(entries: &[DestinationEntry]) -> Result<&DestinationEntry> {
//!     entries
//!         .first()
//!         .ok_or(EngineError::IndexOutOfRange { index: 0, len: entries.len() })
//! }
//! ```

pub mod destination;
pub mod errors;
pub mod image;
pub mod result;

pub use destination::DestinationEntry;
pub use errors::{EngineError, RecordParseError};
pub use image::{ImageRecord, PatientSummary};
pub use result::Result;
