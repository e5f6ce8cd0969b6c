//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the StudyFerry configuration file.

use crate::config::load_config;
use crate::core::registry::DestinationRegistry;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        if let Err(e) = config.validate() {
            println!("❌ Configuration validation failed");
            println!("   Error: {e}");
            println!();
            return Ok(2);
        }
        println!("✅ Configuration is valid");

        let registry = match DestinationRegistry::open(&config.storage) {
            Ok(registry) => registry,
            Err(e) => {
                println!("❌ Failed to read destinations");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Settings File: {}", config.storage.settings_path);
        if config.storage.policy_enabled {
            println!("  Policy File: {}", config.storage.policy_path);
        } else {
            println!("  Policy File: disabled");
        }
        println!("  Global Destinations: {}", registry.global().len());
        println!("  Local Destinations: {}", registry.local().len());
        if config.logging.local_enabled {
            println!(
                "  File Logging: {} ({})",
                config.logging.local_path, config.logging.local_rotation
            );
        } else {
            println!("  File Logging: disabled");
        }
        println!();
        Ok(0)
    }
}
