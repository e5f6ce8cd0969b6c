// StudyFerry - Imaging Study Transfer Utility
// Copyright (c) 2025 StudyFerry Contributors
// Licensed under the MIT License

//! # StudyFerry - Imaging Study Transfer Core
//!
//! StudyFerry collects medical image files found on removable media or a
//! local directory, groups them by patient and sends a chosen patient's
//! study to a network destination.
//!
//! ## Overview
//!
//! This library provides the orchestration core:
//! - **Cataloguing** discovered images in a volatile in-memory store
//! - **Managing** transfer destinations from a read-only policy file and a
//!   user-editable settings file
//! - **Running** scan and send jobs in the background with cooperative
//!   cancellation
//! - **Querying** the distinct patients found by the last scan
//!
//! Reading image files and the network transfer protocol are supplied by
//! the host through the [`core::jobs::Scanner`] and
//! [`core::jobs::StudySender`] traits.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Destination registry and job orchestration
//! - [`adapters`] - Catalog store and settings storage
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Destinations
//!
//! Destinations are addressed by a combined index: global (policy)
//! destinations first, then local ones.
//!
//! ```rust,no_run
//! use studyferry::config::StorageConfig;
//! use studyferry::core::registry::DestinationRegistry;
//! use studyferry::domain::DestinationEntry;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut registry = DestinationRegistry::open(&StorageConfig::default())?;
//! let index = registry.add_local(DestinationEntry::new("Clinic A", "10.0.0.5", 104, "AE1", "US1"))?;
//! registry.save_local()?;
//!
//! println!("{}", registry.resolve(index)?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Every fallible operation returns [`domain::Result`], carrying a
//! [`domain::EngineError`]. Jobs never return errors to the caller; a
//! failing job is logged and its slot returns to idle.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
