//! Job orchestrator - owns the catalog and launches scan and send jobs
//!
//! Each job runs detached on a blocking worker of the tokio runtime. The
//! orchestrator keeps one slot per job kind holding only the cancellation
//! handle, so starting, stopping and state inspection never block on a job.

use super::cancel::CancelToken;
use super::slot::{JobKind, JobSlot, JobState, SlotLease};
use super::traits::{PatientOverrides, Scanner, SendRequest, StudySender};
use crate::adapters::catalog::{Catalog, CatalogHandle};
use crate::config::StorageConfig;
use crate::core::registry::DestinationRegistry;
use crate::domain::errors::EngineError;
use crate::domain::{PatientSummary, Result};
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::time::Instant;
use tokio::runtime::Handle;

/// Owner of the catalog, the destination registry and both job slots
pub struct Orchestrator {
    catalog: CatalogHandle,
    registry: DestinationRegistry,
    scanner: Arc<dyn Scanner>,
    sender: Arc<dyn StudySender>,
    runtime: Option<Handle>,
    scan_slot: JobSlot,
    send_slot: JobSlot,
}

impl Orchestrator {
    /// Creates an orchestrator with a fresh, empty catalog
    ///
    /// The registry is taken as-is; load it before or after construction.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::StoreCreation`] if the catalog cannot be
    /// created. No orchestrator exists without a catalog.
    pub fn new(
        registry: DestinationRegistry,
        scanner: Arc<dyn Scanner>,
        sender: Arc<dyn StudySender>,
    ) -> Result<Self> {
        let catalog = Catalog::open_in_memory()?.into_handle();
        tracing::debug!("Catalog created");

        Ok(Self {
            catalog,
            registry,
            scanner,
            sender,
            runtime: None,
            scan_slot: JobSlot::new(JobKind::Scan),
            send_slot: JobSlot::new(JobKind::Send),
        })
    }

    /// Creates an orchestrator whose registry is loaded from configured storage
    ///
    /// Global destinations are loaded before local ones.
    pub fn from_config(
        storage: &StorageConfig,
        scanner: Arc<dyn Scanner>,
        sender: Arc<dyn StudySender>,
    ) -> Result<Self> {
        let registry = DestinationRegistry::open(storage)?;
        Self::new(registry, scanner, sender)
    }

    /// Runs jobs on `runtime` instead of the runtime current at launch time
    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Shared handle to the catalog, for queries
    pub fn catalog(&self) -> &CatalogHandle {
        &self.catalog
    }

    pub fn registry(&self) -> &DestinationRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut DestinationRegistry {
        &mut self.registry
    }

    /// Clears the catalog and launches a scan of `root`
    ///
    /// Returns once a blocking worker has picked the job up. The catalog is
    /// cleared only after that, so a runtime that cannot run the job leaves
    /// it intact.
    ///
    /// # Errors
    ///
    /// - [`EngineError::JobLaunch`] if no runtime is available or it is
    ///   shut down
    /// - [`EngineError::Busy`] if a scan has not returned yet
    /// - [`EngineError::Catalog`] if clearing the catalog fails
    ///
    /// On any error no job is started and the catalog is left untouched,
    /// except for a failed clear which may have removed rows.
    pub fn start_scan(&self, root: impl Into<PathBuf>) -> Result<()> {
        let root = root.into();
        let runtime = self.runtime_for(JobKind::Scan)?;
        let (lease, cancel) = self.scan_slot.claim()?;

        let catalog = Arc::clone(&self.catalog);
        let scanner = Arc::clone(&self.scanner);
        let job_root = root.clone();
        let gate = launch(&runtime, JobKind::Scan, lease, cancel, move |cancel| {
            scanner.scan(catalog, &job_root, cancel)
        })?;

        // Dropping the gate on error abandons the parked job
        let cleared = self.catalog.clear()?;
        tracing::info!(root = %root.display(), cleared, "Starting scan job");
        gate.open();
        Ok(())
    }

    /// Requests cancellation of the running scan
    ///
    /// Does nothing when no scan is running. Returns whether a request was
    /// made.
    pub fn stop_scan(&self) -> bool {
        let requested = self.scan_slot.request_cancel();
        if requested {
            tracing::info!("Scan cancellation requested");
        }
        requested
    }

    /// Launches a send of one patient's images to a registered destination
    ///
    /// `destination_index` is a combined index, global destinations first.
    ///
    /// # Errors
    ///
    /// - [`EngineError::IndexOutOfRange`] if the index addresses nothing
    /// - [`EngineError::JobLaunch`] if no runtime is available or it is
    ///   shut down
    /// - [`EngineError::Busy`] if a send has not returned yet
    ///
    /// On any error no job is started and a running send is not disturbed.
    pub fn start_send(
        &self,
        source_patient_name: &str,
        overrides: PatientOverrides,
        destination_index: usize,
    ) -> Result<()> {
        let destination = self.registry.resolve(destination_index)?.clone();
        let runtime = self.runtime_for(JobKind::Send)?;
        let (lease, cancel) = self.send_slot.claim()?;

        let request = SendRequest {
            source_patient_name: source_patient_name.to_string(),
            overrides,
            destination,
        };
        tracing::info!(
            destination = %request.destination,
            index = destination_index,
            reidentified = !request.overrides.is_empty(),
            "Starting send job"
        );

        let catalog = Arc::clone(&self.catalog);
        let sender = Arc::clone(&self.sender);
        launch(&runtime, JobKind::Send, lease, cancel, move |cancel| {
            sender.send(catalog, &request, cancel)
        })?
        .open();
        Ok(())
    }

    /// Requests cancellation of the running send; see [`Orchestrator::stop_scan`]
    pub fn stop_send(&self) -> bool {
        let requested = self.send_slot.request_cancel();
        if requested {
            tracing::info!("Send cancellation requested");
        }
        requested
    }

    pub fn scan_state(&self) -> JobState {
        self.scan_slot.state()
    }

    pub fn send_state(&self) -> JobState {
        self.send_slot.state()
    }

    /// Distinct patients in the catalog, ascending
    pub fn patients(&self) -> Result<Vec<PatientSummary>> {
        self.catalog.patients()
    }

    /// Calls `visitor` once per distinct patient, ascending
    ///
    /// Returns the number of invocations.
    pub fn for_each_patient<F>(&self, visitor: F) -> Result<usize>
    where
        F: FnMut(&PatientSummary),
    {
        self.catalog.for_each_patient(visitor)
    }

    fn runtime_for(&self, kind: JobKind) -> Result<Handle> {
        if let Some(runtime) = &self.runtime {
            return Ok(runtime.clone());
        }
        Handle::try_current().map_err(|e| EngineError::JobLaunch {
            job: kind.as_str(),
            reason: e.to_string(),
        })
    }
}

impl Drop for Orchestrator {
    fn drop(&mut self) {
        // Running jobs keep their catalog handle; ask them to wind down.
        self.scan_slot.request_cancel();
        self.send_slot.request_cancel();
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("catalog", &self.catalog)
            .field("registry", &self.registry)
            .field("scan", &self.scan_state())
            .field("send", &self.send_state())
            .finish_non_exhaustive()
    }
}

/// Releases a job parked by [`launch`]; dropping it abandons the job instead
struct LaunchGate {
    open: mpsc::SyncSender<()>,
}

impl LaunchGate {
    fn open(self) {
        // A closed channel means the worker already gave up on the job
        let _ = self.open.send(());
    }
}

/// Hands a job to a blocking worker of `runtime` and waits until it starts
///
/// The worker parks until the returned gate is opened. A shut-down runtime
/// drops the task without running it, which shows up here as a closed
/// channel; the lease travels with the task, so the slot is already idle
/// again by the time the error is returned.
fn launch<F>(
    runtime: &Handle,
    kind: JobKind,
    lease: SlotLease,
    cancel: CancelToken,
    job: F,
) -> Result<LaunchGate>
where
    F: FnOnce(&CancelToken) -> Result<()> + Send + 'static,
{
    let (started_tx, started_rx) = mpsc::sync_channel::<()>(1);
    let (open_tx, open_rx) = mpsc::sync_channel::<()>(1);

    runtime.spawn_blocking(move || {
        let _ = started_tx.send(());
        if open_rx.recv().is_err() {
            tracing::debug!(job = %kind, "Job abandoned before start");
            drop(lease);
            return;
        }
        run_detached(kind, lease, &cancel, || job(&cancel));
    });

    started_rx.recv().map_err(|_| EngineError::JobLaunch {
        job: kind.as_str(),
        reason: "runtime is shut down".to_string(),
    })?;
    Ok(LaunchGate { open: open_tx })
}

/// Runs a job body on the current worker and releases its slot afterwards
///
/// Failures end the job quietly; they are logged here and go no further.
fn run_detached<F>(kind: JobKind, lease: SlotLease, cancel: &CancelToken, job: F)
where
    F: FnOnce() -> Result<()>,
{
    let _lease = lease;
    let started = Instant::now();
    let outcome = job();
    let duration_ms = started.elapsed().as_millis() as u64;

    match outcome {
        Ok(()) if cancel.is_cancelled() => {
            tracing::info!(job = %kind, duration_ms, "Job cancelled");
        }
        Ok(()) => {
            tracing::info!(job = %kind, duration_ms, "Job finished");
        }
        Err(e) => {
            tracing::warn!(job = %kind, duration_ms, error = %e, "Job failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::settings::{MemorySettingsStore, StaticPolicySource};
    use crate::core::registry::DESTINATIONS_NAMESPACE;
    use crate::domain::ImageRecord;
    use std::path::Path;
    use std::time::Duration;

    struct NoopScanner;

    impl Scanner for NoopScanner {
        fn scan(&self, _: CatalogHandle, _: &Path, _: &CancelToken) -> Result<()> {
            Ok(())
        }
    }

    /// Blocks until cancelled
    struct WaitingJob;

    impl Scanner for WaitingJob {
        fn scan(&self, _: CatalogHandle, _: &Path, cancel: &CancelToken) -> Result<()> {
            wait_for_cancel(cancel);
            Ok(())
        }
    }

    impl StudySender for WaitingJob {
        fn send(&self, _: CatalogHandle, _: &SendRequest, cancel: &CancelToken) -> Result<()> {
            wait_for_cancel(cancel);
            Ok(())
        }
    }

    struct FailingScanner;

    impl Scanner for FailingScanner {
        fn scan(&self, catalog: CatalogHandle, _: &Path, _: &CancelToken) -> Result<()> {
            catalog.insert(&ImageRecord::new("1.2.3", "/a.dcm").with_patient("A", "1", ""))?;
            Err(EngineError::Io("unreadable directory".to_string()))
        }
    }

    fn wait_for_cancel(cancel: &CancelToken) {
        while !cancel.is_cancelled() {
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    fn registry() -> DestinationRegistry {
        let store = MemorySettingsStore::with_values(DESTINATIONS_NAMESPACE, ["Local,l,104,AE,US"]);
        let policy = StaticPolicySource::with_values(DESTINATIONS_NAMESPACE, ["Global,g,104,AE,US"]);
        let mut registry = DestinationRegistry::new(Box::new(store), Box::new(policy));
        registry.load_global();
        registry.load_local().unwrap();
        registry
    }

    fn orchestrator(scanner: Arc<dyn Scanner>) -> Orchestrator {
        Orchestrator::new(registry(), scanner, Arc::new(WaitingJob)).unwrap()
    }

    async fn wait_idle(state: impl Fn() -> JobState) {
        for _ in 0..200 {
            if state() == JobState::Idle {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("job did not return to idle");
    }

    #[test]
    fn test_start_without_runtime_is_launch_error() {
        let orchestrator = orchestrator(Arc::new(NoopScanner));
        orchestrator
            .catalog()
            .insert(&ImageRecord::new("1.2.3", "/a.dcm"))
            .unwrap();

        assert!(matches!(
            orchestrator.start_scan("/data"),
            Err(EngineError::JobLaunch { job: "scan", .. })
        ));
        assert_eq!(orchestrator.catalog().image_count().unwrap(), 1);
        assert_eq!(orchestrator.scan_state(), JobState::Idle);
    }

    #[test]
    fn test_shut_down_runtime_is_launch_error() {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .build()
            .unwrap();
        let handle = runtime.handle().clone();
        drop(runtime);

        let orchestrator = orchestrator(Arc::new(NoopScanner)).with_runtime(handle);
        orchestrator
            .catalog()
            .insert(&ImageRecord::new("1.2.3", "/a.dcm"))
            .unwrap();

        assert!(matches!(
            orchestrator.start_scan("/x"),
            Err(EngineError::JobLaunch { job: "scan", .. })
        ));
        assert_eq!(orchestrator.catalog().image_count().unwrap(), 1);
        assert_eq!(orchestrator.scan_state(), JobState::Idle);

        assert!(matches!(
            orchestrator.start_send("A", PatientOverrides::default(), 0),
            Err(EngineError::JobLaunch { job: "send", .. })
        ));
        assert_eq!(orchestrator.send_state(), JobState::Idle);

        // The slots were released, so the same error repeats instead of Busy
        assert!(matches!(
            orchestrator.start_scan("/x"),
            Err(EngineError::JobLaunch { job: "scan", .. })
        ));
    }

    #[test]
    fn test_stop_idle_slots_is_noop() {
        let orchestrator = orchestrator(Arc::new(NoopScanner));
        assert!(!orchestrator.stop_scan());
        assert!(!orchestrator.stop_send());
        assert_eq!(orchestrator.scan_state(), JobState::Idle);
        assert_eq!(orchestrator.send_state(), JobState::Idle);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_scan_clears_catalog_and_returns_to_idle() {
        let orchestrator = orchestrator(Arc::new(NoopScanner));
        orchestrator
            .catalog()
            .insert(&ImageRecord::new("1.2.3", "/a.dcm"))
            .unwrap();

        orchestrator.start_scan("/data").unwrap();
        assert_eq!(orchestrator.catalog().image_count().unwrap(), 0);

        wait_idle(|| orchestrator.scan_state()).await;
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_busy_scan_keeps_catalog() {
        let orchestrator = orchestrator(Arc::new(WaitingJob));
        orchestrator.start_scan("/data").unwrap();
        orchestrator
            .catalog()
            .insert(&ImageRecord::new("1.2.3", "/a.dcm"))
            .unwrap();

        assert!(matches!(
            orchestrator.start_scan("/other"),
            Err(EngineError::Busy("scan"))
        ));
        assert_eq!(orchestrator.catalog().image_count().unwrap(), 1);

        assert!(orchestrator.stop_scan());
        wait_idle(|| orchestrator.scan_state()).await;
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_failed_job_releases_slot() {
        let orchestrator = orchestrator(Arc::new(FailingScanner));
        orchestrator.start_scan("/data").unwrap();
        wait_idle(|| orchestrator.scan_state()).await;

        assert_eq!(orchestrator.catalog().image_count().unwrap(), 1);
        orchestrator.start_scan("/data").unwrap();
        wait_idle(|| orchestrator.scan_state()).await;
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_bad_index_leaves_running_send_alone() {
        let orchestrator = orchestrator(Arc::new(NoopScanner));
        orchestrator
            .start_send("A", PatientOverrides::default(), 1)
            .unwrap();

        assert!(matches!(
            orchestrator.start_send("A", PatientOverrides::default(), 2),
            Err(EngineError::IndexOutOfRange { index: 2, len: 2 })
        ));
        assert_eq!(orchestrator.send_state(), JobState::Running);

        orchestrator.stop_send();
        wait_idle(|| orchestrator.send_state()).await;
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_explicit_runtime_handle() {
        let orchestrator = orchestrator(Arc::new(NoopScanner)).with_runtime(Handle::current());
        orchestrator.start_scan("/data").unwrap();
        wait_idle(|| orchestrator.scan_state()).await;
    }
}
