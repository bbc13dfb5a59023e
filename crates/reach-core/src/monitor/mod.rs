//! Host reachability monitor
//!
//! The ReachabilityMonitor owns the state for one monitored host:
//! - The last observed flag set (optimistically `REACHABLE` at first)
//! - The probe session, present exactly while monitoring is started
//! - The user callback, fixed at construction
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐                  ┌───────────────────────┐
//! │ ReachabilityProbe│── FlagsChange ──▶│                       │
//! └──────────────────┘      Event       │    MonitorWorker      │
//!                                       │  (dedicated task,     │
//! ┌──────────────────┐                  │   owns all state)     │
//! │ start/stop/flags │── Command ──────▶│                       │
//! │ (any caller)     │◀─ oneshot reply ─│                       │
//! └──────────────────┘                  └──────────┬────────────┘
//!                                                  │
//!                                                  ▼
//!                                       callback(reachable, flags)
//! ```
//!
//! ## Serialization
//!
//! All state access runs on one dedicated worker task. Public
//! operations are messages on a bounded command channel, answered via
//! oneshot replies, so they execute in strict FIFO order and never
//! concurrently with each other or with callback delivery. Two
//! monitors never share a worker, so independent instances proceed
//! fully in parallel.

use crate::config::MonitorConfig;
use crate::flags::ReachabilityFlags;
use crate::traits::{FlagsChangeEvent, FlagsStream, ReachabilityProbe};
use tokio::sync::{mpsc, oneshot};
use tokio_stream::StreamExt;
use tracing::debug;

/// Callback invoked with `(is_reachable, flags)` on every flag change
/// delivered while the monitor is started.
pub type ReachabilityCallback = Box<dyn Fn(bool, ReachabilityFlags) + Send + 'static>;

/// A consistent view of a monitor's state, read in one step on the
/// worker task. The pair `(flags, is_reachable)` is never torn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReachabilitySnapshot {
    /// Last observed flag set
    pub flags: ReachabilityFlags,
    /// Whether the flag set has the reachable bit
    pub is_reachable: bool,
    /// Whether a probe session is currently open
    pub is_started: bool,
}

impl Default for ReachabilitySnapshot {
    /// Matches a freshly constructed monitor: optimistic flags, stopped.
    fn default() -> Self {
        Self {
            flags: ReachabilityFlags::default(),
            is_reachable: true,
            is_started: false,
        }
    }
}

/// Commands handled by the worker task, in arrival order
enum Command {
    Start(oneshot::Sender<bool>),
    Stop(oneshot::Sender<()>),
    Snapshot(oneshot::Sender<ReachabilitySnapshot>),
    Shutdown(oneshot::Sender<()>),
}

/// Monitors reachability of a single host
///
/// Observes the probe's flag change events and publishes the latest
/// state both on demand (accessors) and via the callback supplied at
/// construction.
///
/// ## Lifecycle
///
/// 1. Create with [`ReachabilityMonitor::new()`] (spawns the worker;
///    requires a Tokio runtime)
/// 2. [`start()`](Self::start) / [`stop()`](Self::stop) any number of
///    times; both are idempotent
/// 3. [`shutdown()`](Self::shutdown) for deterministic teardown
///
/// ## Failure semantics
///
/// All operations are best-effort and silent on failure. If the probe
/// cannot open a session, `start()` leaves the monitor stopped and the
/// accessors keep reporting the last-known (or default reachable)
/// state; check [`is_started()`](Self::is_started) rather than expect
/// an error.
///
/// ## Teardown
///
/// `shutdown()` runs a stop on the worker and then waits for the
/// worker task to finish, so no callback invocation can begin after it
/// returns. Dropping a monitor without calling `shutdown()` aborts the
/// worker instead; an in-flight callback on another runtime thread may
/// then still be completing while the drop returns. Prefer `shutdown()`
/// whenever the callback's referents are about to go away.
pub struct ReachabilityMonitor {
    /// Monitored host (hostname or address), fixed at construction
    host: String,

    /// Command channel into the worker task
    cmd_tx: mpsc::Sender<Command>,

    /// Worker task handle; taken by shutdown()
    worker: Option<tokio::task::JoinHandle<()>>,
}

impl ReachabilityMonitor {
    /// Create a monitor for `host` with the given probe and callback
    ///
    /// The worker task starts immediately, but no probe session is
    /// opened until [`start()`](Self::start) is called.
    pub fn new(
        host: impl Into<String>,
        probe: Box<dyn ReachabilityProbe>,
        callback: impl Fn(bool, ReachabilityFlags) + Send + 'static,
    ) -> Self {
        Self::with_config(host, probe, callback, &MonitorConfig::default())
    }

    /// Create a monitor with explicit [`MonitorConfig`] settings
    pub fn with_config(
        host: impl Into<String>,
        probe: Box<dyn ReachabilityProbe>,
        callback: impl Fn(bool, ReachabilityFlags) + Send + 'static,
        config: &MonitorConfig,
    ) -> Self {
        let host = host.into();
        let (cmd_tx, cmd_rx) = mpsc::channel(config.command_channel_capacity);

        let worker = MonitorWorker {
            host: host.clone(),
            probe,
            callback: Box::new(callback),
            flags: ReachabilityFlags::default(),
            session: None,
            cmd_rx,
        };

        let handle = tokio::spawn(worker.run());

        Self {
            host,
            cmd_tx,
            worker: Some(handle),
        }
    }

    /// The monitored host
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Start monitoring
    ///
    /// Idempotent: a no-op if already started. If the probe cannot
    /// open a session the monitor stays stopped; this is not reported
    /// as an error (see the type-level docs).
    pub async fn start(&self) {
        let (tx, rx) = oneshot::channel();
        if self.cmd_tx.send(Command::Start(tx)).await.is_ok() {
            let _ = rx.await;
        }
    }

    /// Stop monitoring
    ///
    /// Idempotent: a no-op if already stopped. When this returns, the
    /// probe session has been released and no further callback will be
    /// delivered until the next `start()`.
    pub async fn stop(&self) {
        let (tx, rx) = oneshot::channel();
        if self.cmd_tx.send(Command::Stop(tx)).await.is_ok() {
            let _ = rx.await;
        }
    }

    /// Read a consistent `(flags, is_reachable, is_started)` snapshot
    ///
    /// Safe to call from any task at any time; the read executes on
    /// the worker, serialized with all mutation.
    pub async fn snapshot(&self) -> ReachabilitySnapshot {
        let (tx, rx) = oneshot::channel();
        if self.cmd_tx.send(Command::Snapshot(tx)).await.is_ok()
            && let Ok(snapshot) = rx.await
        {
            return snapshot;
        }

        // Worker gone (monitor dropped mid-flight elsewhere); report
        // the same state a fresh monitor would.
        debug!(host = %self.host, "monitor worker gone, reporting default state");
        ReachabilitySnapshot::default()
    }

    /// The last observed flag set
    pub async fn flags(&self) -> ReachabilityFlags {
        self.snapshot().await.flags
    }

    /// Whether the last observed flag set has the reachable bit
    pub async fn is_reachable(&self) -> bool {
        self.snapshot().await.is_reachable
    }

    /// Whether monitoring is currently active
    pub async fn is_started(&self) -> bool {
        self.snapshot().await.is_started
    }

    /// Tear the monitor down deterministically
    ///
    /// Stops monitoring, terminates the worker task, and waits for it
    /// to finish. When this returns, the callback has been dropped and
    /// can never be invoked again. Consuming `self` makes any further
    /// use a compile error.
    pub async fn shutdown(mut self) {
        let (tx, rx) = oneshot::channel();
        if self.cmd_tx.send(Command::Shutdown(tx)).await.is_ok() {
            let _ = rx.await;
        }

        if let Some(worker) = self.worker.take() {
            let _ = worker.await;
        }
    }
}

impl Drop for ReachabilityMonitor {
    fn drop(&mut self) {
        // Backstop for monitors dropped without shutdown(): abort the
        // worker so the probe session and callback get released.
        if let Some(worker) = self.worker.take() {
            worker.abort();
        }
    }
}

/// The worker task: exclusive owner of all mutable monitor state
struct MonitorWorker {
    host: String,
    probe: Box<dyn ReachabilityProbe>,
    callback: ReachabilityCallback,
    flags: ReachabilityFlags,
    session: Option<FlagsStream>,
    cmd_rx: mpsc::Receiver<Command>,
}

impl MonitorWorker {
    async fn run(mut self) {
        loop {
            tokio::select! {
                cmd = self.cmd_rx.recv() => match cmd {
                    Some(Command::Start(reply)) => {
                        self.open_session();
                        let _ = reply.send(self.session.is_some());
                    }
                    Some(Command::Stop(reply)) => {
                        self.close_session();
                        let _ = reply.send(());
                    }
                    Some(Command::Snapshot(reply)) => {
                        let _ = reply.send(self.snapshot());
                    }
                    Some(Command::Shutdown(reply)) => {
                        self.close_session();
                        let _ = reply.send(());
                        break;
                    }
                    // All senders gone: the monitor handle was dropped.
                    None => {
                        self.close_session();
                        break;
                    }
                },
                event = next_event(&mut self.session) => match event {
                    Some(event) => self.deliver(event),
                    None => {
                        // The probe's feeding task exited on its own.
                        // Treat as stopped; the next start() reopens.
                        debug!(host = %self.host, "probe session ended");
                        self.session = None;
                    }
                },
            }
        }
    }

    /// Open a probe session if none is active (idempotent)
    fn open_session(&mut self) {
        if self.session.is_some() {
            return;
        }

        match self.probe.watch(&self.host) {
            Ok(session) => {
                debug!(host = %self.host, probe = self.probe.probe_name(), "monitoring started");
                self.session = Some(session);
            }
            Err(e) => {
                // Capability unavailable: absorbed, monitor stays stopped.
                debug!(host = %self.host, error = %e, "probe unavailable, monitor stays stopped");
            }
        }
    }

    /// Release the probe session if one is active (idempotent)
    fn close_session(&mut self) {
        if self.session.take().is_some() {
            debug!(host = %self.host, "monitoring stopped");
        }
    }

    fn snapshot(&self) -> ReachabilitySnapshot {
        ReachabilitySnapshot {
            flags: self.flags,
            is_reachable: self.flags.is_reachable(),
            is_started: self.session.is_some(),
        }
    }

    /// Record a probe observation and invoke the user callback
    fn deliver(&mut self, event: FlagsChangeEvent) {
        self.flags = event.new_flags;
        let reachable = self.flags.is_reachable();
        debug!(host = %self.host, reachable, flags = ?self.flags, "reachability changed");
        (self.callback)(reachable, self.flags);
    }
}

/// Wait for the next session event; pends forever while stopped so the
/// worker only reacts to commands.
async fn next_event(session: &mut Option<FlagsStream>) -> Option<FlagsChangeEvent> {
    match session.as_mut() {
        Some(stream) => stream.next().await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use async_trait::async_trait;

    /// A probe whose capability is unavailable
    struct UnavailableProbe;

    #[async_trait]
    impl ReachabilityProbe for UnavailableProbe {
        async fn check(&self, _host: &str) -> Result<ReachabilityFlags> {
            Err(crate::Error::probe("unavailable"))
        }

        fn watch(&self, _host: &str) -> Result<FlagsStream> {
            Err(crate::Error::probe("unavailable"))
        }

        fn probe_name(&self) -> &'static str {
            "unavailable"
        }
    }

    #[tokio::test]
    async fn test_initial_state_is_optimistic() {
        let monitor = ReachabilityMonitor::new("example.org", Box::new(UnavailableProbe), |_, _| {});

        let snapshot = monitor.snapshot().await;
        assert!(snapshot.is_reachable);
        assert!(snapshot.flags.contains(ReachabilityFlags::REACHABLE));
        assert!(!snapshot.is_started);

        monitor.shutdown().await;
    }

    #[tokio::test]
    async fn test_start_with_unavailable_probe_stays_stopped() {
        let monitor = ReachabilityMonitor::new("example.org", Box::new(UnavailableProbe), |_, _| {});

        monitor.start().await;
        assert!(!monitor.is_started().await);

        // State unchanged: still the optimistic default
        assert!(monitor.is_reachable().await);

        monitor.shutdown().await;
    }
}
