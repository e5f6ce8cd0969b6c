//! Configuration management for studyferry.
//!
//! studyferry reads a TOML configuration file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `STUDYFERRY_<SECTION>_<KEY>` environment overrides
//! - Default values for every setting
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use studyferry::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("studyferry.toml")?;
//! println!("Destinations file: {}", config.storage.settings_path);
//! # Ok(())
//! # }
//! ```
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [storage]
//! settings_path = "${HOME}/.config/studyferry/settings.toml"
//! policy_enabled = true
//! policy_path = "/etc/studyferry/policy.toml"
//!
//! [logging]
//! local_enabled = true
//! local_path = "/var/log/studyferry"
//! local_rotation = "daily"
//! ```

pub mod loader;
pub mod schema;

pub use loader::load_config;
pub use schema::{ApplicationConfig, FerryConfig, LoggingConfig, StorageConfig};
