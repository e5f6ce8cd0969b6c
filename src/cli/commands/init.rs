//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "studyferry.toml")]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing StudyFerry configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Add a destination:");
                println!("     studyferry destinations add \"Clinic A,10.0.0.5,104,PACS,FERRY\"");
                println!("  3. Validate configuration: studyferry validate-config");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5) // Fatal error exit code
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# StudyFerry Configuration File

[application]
log_level = "info"

[storage]
settings_path = "studyferry-settings.toml"
policy_enabled = true
policy_path = "/etc/studyferry/policy.toml"

[logging]
local_enabled = false
local_path = "logs"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# StudyFerry Configuration File
#
# Every value below can be overridden with an environment variable named
# STUDYFERRY_<SECTION>_<KEY>, e.g. STUDYFERRY_STORAGE_SETTINGS_PATH.
# Values may reference environment variables with ${VAR} syntax.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# Destination Storage
# ============================================================================
[storage]
# User-editable file holding local destinations. Each entry in its
# [Destinations] table is a record: "name,host,port,destination AE,our AE"
settings_path = "studyferry-settings.toml"

# Read centrally administered destinations from a policy file. They are
# listed before local destinations and cannot be edited from here.
policy_enabled = true

# Machine-wide policy file, same format as the settings file
policy_path = "/etc/studyferry/policy.toml"

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Enable JSON file logging
local_enabled = false

# Directory for log files
local_path = "logs"

# Log rotation (daily, hourly or never)
local_rotation = "daily"
"#
        .to_string()
    }
}
