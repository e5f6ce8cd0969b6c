//! Domain error types
//!
//! This module defines the error hierarchy for studyferry. Third-party error
//! types (SQLite, TOML, JSON) are converted into domain errors at the edge so
//! callers never depend on them.

use thiserror::Error;

/// Main engine error type
///
/// Every fallible engine operation returns this type. Only
/// [`EngineError::StoreCreation`] is fatal; everything else is reported to
/// the immediate caller and leaves the engine usable.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The in-memory catalog could not be created
    #[error("Can't create catalog database: {0}")]
    StoreCreation(String),

    /// A catalog statement failed
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// A combined destination index does not address any destination
    #[error("Destination index {index} is out of range ({len} destinations available)")]
    IndexOutOfRange {
        /// Requested combined index
        index: usize,
        /// Number of addressable destinations
        len: usize,
    },

    /// A background job could not be handed to a worker
    #[error("Failed to launch {job} job: {reason}")]
    JobLaunch {
        /// Job kind ("scan" or "send")
        job: &'static str,
        /// Why the launch failed
        reason: String,
    },

    /// The job slot already holds an active job
    #[error("A {0} job is already active")]
    Busy(&'static str),

    /// A destination cannot be stored in the five-field record format
    #[error("Invalid destination: {0}")]
    InvalidDestination(String),

    /// The user-editable settings store failed
    #[error("Settings store error: {0}")]
    Settings(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

/// Why a persisted destination record was rejected
///
/// Registry loads drop these silently; [`std::str::FromStr`] on
/// [`crate::domain::DestinationEntry`] surfaces them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordParseError {
    /// Fewer than five comma-separated fields
    #[error("expected 5 fields, found {0}")]
    FieldCount(usize),

    /// The port field is not a base-10 integer in range
    #[error("invalid port '{0}'")]
    InvalidPort(String),
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::Io(err.to_string())
    }
}

impl From<rusqlite::Error> for EngineError {
    fn from(err: rusqlite::Error) -> Self {
        EngineError::Catalog(err.to_string())
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for EngineError {
    fn from(err: toml::de::Error) -> Self {
        EngineError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<toml::ser::Error> for EngineError {
    fn from(err: toml::ser::Error) -> Self {
        EngineError::Serialization(format!("TOML write error: {err}"))
    }
}
