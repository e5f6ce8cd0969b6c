//! Core orchestration for StudyFerry.
//!
//! # Modules
//!
//! - [`registry`] - Global and local destination lists, combined indexing
//! - [`jobs`] - Scan and send job orchestration with cooperative cancellation
//!
//! # Workflow
//!
//! 1. **Load destinations**: global from the policy source, then local
//! 2. **Scan**: clear the catalog and fill it from a directory tree
//! 3. **Browse**: list the distinct patients found
//! 4. **Send**: transfer one patient's images to a destination by index
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use studyferry::adapters::catalog::CatalogHandle;
//! use studyferry::config::load_config;
//! use studyferry::core::jobs::{CancelToken, Orchestrator, PatientOverrides, Scanner, SendRequest, StudySender};
//!
//! struct MyScanner;
//! impl Scanner for MyScanner {
//!     fn scan(&self, _: CatalogHandle, _: &Path, _: &CancelToken) -> studyferry::domain::Result<()> {
//!         Ok(())
//!     }
//! }
//!
//! struct MySender;
//! impl StudySender for MySender {
//!     fn send(&self, _: CatalogHandle, _: &SendRequest, _: &CancelToken) -> studyferry::domain::Result<()> {
//!         Ok(())
//!     }
//! }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("studyferry.toml")?;
//! let orchestrator = Orchestrator::from_config(&config.storage, Arc::new(MyScanner), Arc::new(MySender))?;
//!
//! orchestrator.start_scan("/media/cdrom")?;
//! // ... poll orchestrator.scan_state() ...
//! for patient in orchestrator.patients()? {
//!     println!("{} ({})", patient.name, patient.patient_id);
//! }
//! orchestrator.start_send("DOE^JANE", PatientOverrides::default(), 0)?;
//! # Ok(())
//! # }
//! ```

pub mod jobs;
pub mod registry;
