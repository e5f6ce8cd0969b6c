//! Background jobs
//!
//! - [`orchestrator`] - Catalog owner, launches and cancels scan and send jobs
//! - [`slot`] - One-job-at-a-time slots and their observable state
//! - [`cancel`] - Cooperative cancellation tokens
//! - [`traits`] - Contracts implemented by the scan and send algorithms

pub mod cancel;
pub mod orchestrator;
pub mod slot;
pub mod traits;

pub use cancel::{cancel_pair, CancelHandle, CancelToken};
pub use orchestrator::Orchestrator;
pub use slot::{JobKind, JobState};
pub use traits::{PatientOverrides, Scanner, SendRequest, StudySender};
