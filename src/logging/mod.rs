//! Logging and observability
//!
//! Structured logging with:
//! - Console output
//! - Optional JSON file logs with daily, hourly or no rotation
//! - Level from configuration, overridable through `RUST_LOG`
//!
//! # Example
//!
//! ```no_run
//! use studyferry::logging::init_logging;
//! use studyferry::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, parse_log_level, LoggingGuard};

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use studyferry::log_error_with_context;
/// use studyferry::domain::EngineError;
///
/// let error = EngineError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
