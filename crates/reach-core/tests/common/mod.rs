//! Test doubles and common utilities for architecture contract tests
//!
//! This module provides minimal probe doubles that verify the monitor's
//! contracts without touching a real network.

use reach_core::error::Result;
use reach_core::traits::{FlagsChangeEvent, FlagsStream, ReachabilityProbe};
use reach_core::{Error, ReachabilityFlags};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::broadcast;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;

/// A controlled probe that emits flag changes on demand
///
/// Every `watch()` call subscribes a fresh session to the same
/// broadcast channel, so the probe survives stop/start cycles.
pub struct ControlledProbe {
    tx: broadcast::Sender<FlagsChangeEvent>,
    watch_call_count: Arc<AtomicUsize>,
}

/// Test-side handle for driving a [`ControlledProbe`]
#[derive(Clone)]
pub struct ProbeHandle {
    tx: broadcast::Sender<FlagsChangeEvent>,
    watch_call_count: Arc<AtomicUsize>,
}

impl ControlledProbe {
    /// Create a controlled probe and its driving handle
    pub fn new() -> (Self, ProbeHandle) {
        let (tx, _) = broadcast::channel(64);
        let watch_call_count = Arc::new(AtomicUsize::new(0));

        let probe = Self {
            tx: tx.clone(),
            watch_call_count: Arc::clone(&watch_call_count),
        };
        let handle = ProbeHandle {
            tx,
            watch_call_count,
        };

        (probe, handle)
    }
}

impl ProbeHandle {
    /// Emit a flag change into every open session
    pub fn emit(&self, flags: ReachabilityFlags) {
        let _ = self.tx.send(FlagsChangeEvent::new(flags, None));
    }

    /// Number of sessions currently open (receivers alive)
    pub fn open_sessions(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Number of times watch() was called
    pub fn watch_call_count(&self) -> usize {
        self.watch_call_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ReachabilityProbe for ControlledProbe {
    async fn check(&self, _host: &str) -> Result<ReachabilityFlags> {
        Ok(ReachabilityFlags::REACHABLE)
    }

    fn watch(&self, _host: &str) -> Result<FlagsStream> {
        self.watch_call_count.fetch_add(1, Ordering::SeqCst);

        let rx = self.tx.subscribe();
        // Lagged sessions just skip ahead; contract tests never rely on
        // delivery of every event, only on state coherence.
        let stream = BroadcastStream::new(rx).filter_map(|item| item.ok());
        Ok(Box::pin(stream))
    }

    fn probe_name(&self) -> &'static str {
        "controlled"
    }
}

/// A probe that opens sessions which never emit (for idle testing)
pub struct IdleProbe;

#[async_trait::async_trait]
impl ReachabilityProbe for IdleProbe {
    async fn check(&self, _host: &str) -> Result<ReachabilityFlags> {
        Ok(ReachabilityFlags::REACHABLE)
    }

    fn watch(&self, _host: &str) -> Result<FlagsStream> {
        // Create a channel but never send anything
        let (_tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let stream = tokio_stream::wrappers::UnboundedReceiverStream::new(rx);
        Ok(Box::pin(stream))
    }

    fn probe_name(&self) -> &'static str {
        "idle"
    }
}

/// A probe whose underlying capability is unavailable
pub struct UnavailableProbe;

#[async_trait::async_trait]
impl ReachabilityProbe for UnavailableProbe {
    async fn check(&self, _host: &str) -> Result<ReachabilityFlags> {
        Err(Error::probe("capability unavailable"))
    }

    fn watch(&self, _host: &str) -> Result<FlagsStream> {
        Err(Error::probe("capability unavailable"))
    }

    fn probe_name(&self) -> &'static str {
        "unavailable"
    }
}

/// A callback that appends `(reachable, flags)` pairs to a shared log
/// and notifies a channel on each delivery, so tests can await delivery
/// instead of sleeping.
pub struct CallbackLog {
    entries: Arc<std::sync::Mutex<Vec<(bool, ReachabilityFlags)>>>,
    notify_rx: tokio::sync::mpsc::UnboundedReceiver<()>,
}

impl CallbackLog {
    /// Create the log and the callback writing into it
    pub fn new() -> (Self, impl Fn(bool, ReachabilityFlags) + Send + 'static) {
        let entries = Arc::new(std::sync::Mutex::new(Vec::new()));
        let (notify_tx, notify_rx) = tokio::sync::mpsc::unbounded_channel();

        let log = Self {
            entries: Arc::clone(&entries),
            notify_rx,
        };

        let callback = move |reachable: bool, flags: ReachabilityFlags| {
            entries.lock().unwrap().push((reachable, flags));
            let _ = notify_tx.send(());
        };

        (log, callback)
    }

    /// Wait until the next callback delivery (5s safety timeout)
    pub async fn next_delivery(&mut self) {
        tokio::time::timeout(std::time::Duration::from_secs(5), self.notify_rx.recv())
            .await
            .expect("callback delivery within timeout")
            .expect("callback sender alive");
    }

    /// Snapshot of the delivered entries
    pub fn entries(&self) -> Vec<(bool, ReachabilityFlags)> {
        self.entries.lock().unwrap().clone()
    }

    /// Number of deliveries so far
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}
