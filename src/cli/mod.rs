//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for StudyFerry using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// StudyFerry - imaging study transfer utility
#[derive(Parser, Debug)]
#[command(name = "studyferry")]
#[command(version, about, long_about = None)]
#[command(author = "StudyFerry Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "studyferry.toml", env = "STUDYFERRY_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "STUDYFERRY_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List or edit transfer destinations
    Destinations(commands::destinations::DestinationsArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
