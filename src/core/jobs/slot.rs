//! Single-job slots
//!
//! Each slot holds at most one active job. Claiming a slot yields a
//! [`SlotLease`] that travels with the job; dropping the lease (when the job
//! returns, fails or unwinds) puts the slot back to idle.

use super::cancel::{cancel_pair, CancelHandle, CancelToken};
use crate::domain::errors::EngineError;
use crate::domain::Result;
use serde::Serialize;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// The two kinds of background job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobKind {
    Scan,
    Send,
}

impl JobKind {
    /// Lowercase name used in logs and errors
    pub fn as_str(&self) -> &'static str {
        match self {
            JobKind::Scan => "scan",
            JobKind::Send => "send",
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Observable state of a job slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    /// No job is active
    Idle,
    /// A job is active and has not been asked to stop
    Running,
    /// Cancellation was requested; the job has not returned yet
    CancelRequested,
}

#[derive(Debug, Default)]
struct SlotInner {
    generation: u64,
    active: Option<CancelHandle>,
}

/// A slot admitting one job at a time
#[derive(Debug, Clone)]
pub(crate) struct JobSlot {
    kind: JobKind,
    inner: Arc<Mutex<SlotInner>>,
}

impl JobSlot {
    pub(crate) fn new(kind: JobKind) -> Self {
        Self {
            kind,
            inner: Arc::new(Mutex::new(SlotInner::default())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SlotInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn state(&self) -> JobState {
        match &self.lock().active {
            None => JobState::Idle,
            Some(handle) if handle.is_cancelled() => JobState::CancelRequested,
            Some(_) => JobState::Running,
        }
    }

    /// Marks the slot active
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Busy`] while a previous job has not returned,
    /// including after its cancellation was requested.
    pub(crate) fn claim(&self) -> Result<(SlotLease, CancelToken)> {
        let mut inner = self.lock();
        if inner.active.is_some() {
            return Err(EngineError::Busy(self.kind.as_str()));
        }

        let (handle, token) = cancel_pair();
        inner.generation += 1;
        inner.active = Some(handle);

        let lease = SlotLease {
            slot: self.clone(),
            generation: inner.generation,
        };
        Ok((lease, token))
    }

    /// Requests cancellation of the active job
    ///
    /// Returns `false` when the slot is idle.
    pub(crate) fn request_cancel(&self) -> bool {
        match &self.lock().active {
            Some(handle) => {
                handle.cancel();
                true
            }
            None => false,
        }
    }

    fn release(&self, generation: u64) {
        let mut inner = self.lock();
        if inner.generation == generation {
            inner.active = None;
        }
    }
}

/// Proof of an active claim; releases the slot on drop
#[derive(Debug)]
pub(crate) struct SlotLease {
    slot: JobSlot,
    generation: u64,
}

impl Drop for SlotLease {
    fn drop(&mut self) {
        self.slot.release(self.generation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_transitions() {
        let slot = JobSlot::new(JobKind::Scan);
        assert_eq!(slot.state(), JobState::Idle);

        let (lease, token) = slot.claim().unwrap();
        assert_eq!(slot.state(), JobState::Running);

        assert!(slot.request_cancel());
        assert!(token.is_cancelled());
        assert_eq!(slot.state(), JobState::CancelRequested);

        drop(lease);
        assert_eq!(slot.state(), JobState::Idle);
    }

    #[test]
    fn test_second_claim_is_busy() {
        let slot = JobSlot::new(JobKind::Send);
        let (_lease, _token) = slot.claim().unwrap();

        match slot.claim() {
            Err(EngineError::Busy(kind)) => assert_eq!(kind, "send"),
            other => panic!("expected Busy, got {other:?}"),
        }
    }

    #[test]
    fn test_cancel_requested_is_still_busy() {
        let slot = JobSlot::new(JobKind::Scan);
        let (_lease, _token) = slot.claim().unwrap();
        slot.request_cancel();
        assert!(slot.claim().is_err());
    }

    #[test]
    fn test_cancel_idle_slot_is_noop() {
        let slot = JobSlot::new(JobKind::Scan);
        assert!(!slot.request_cancel());
        assert_eq!(slot.state(), JobState::Idle);
    }

    #[test]
    fn test_slot_reusable_after_release() {
        let slot = JobSlot::new(JobKind::Scan);
        let (lease, first) = slot.claim().unwrap();
        slot.request_cancel();
        drop(lease);

        let (_lease, second) = slot.claim().unwrap();
        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
        assert_eq!(slot.state(), JobState::Running);
    }

    #[test]
    fn test_lease_released_on_unwind() {
        let slot = JobSlot::new(JobKind::Scan);
        let (lease, _token) = slot.claim().unwrap();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
            let _lease = lease;
            panic!("job crashed");
        }));

        assert!(result.is_err());
        assert_eq!(slot.state(), JobState::Idle);
    }
}
