// # Reachability Probe Trait
//
// Defines the interface for observing reachability changes for a host.
//
// ## Implementations
//
// - Socket-connect based: `reach-probe-tcp` crate
// - Future: platform network-status APIs (Netlink link state, SystemConfiguration)
//
// ## Usage
//
// ```rust,ignore
// use reach_core::ReachabilityProbe;
// use tokio_stream::StreamExt;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let probe = /* ReachabilityProbe implementation */;
//
//     // One-shot check
//     let flags = probe.check("example.org").await?;
//
//     // Open a session and watch for changes
//     let mut session = probe.watch("example.org")?;
//     while let Some(change) = session.next().await {
//         println!("reachability changed: {:?}", change);
//     }
//
//     Ok(())
// }
// ```

use crate::flags::ReachabilityFlags;
use async_trait::async_trait;
use std::pin::Pin;
use tokio_stream::Stream;

/// A session stream yielding reachability flag changes for one host.
///
/// Dropping the stream closes the session: the probe must release any
/// background resources promptly (see the task spawning rules below).
pub type FlagsStream = Pin<Box<dyn Stream<Item = FlagsChangeEvent> + Send + 'static>>;

/// Represents a detected reachability flag change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagsChangeEvent {
    /// The newly observed flag set
    pub new_flags: ReachabilityFlags,
    /// The previously observed flag set (if any observation was made before)
    pub previous_flags: Option<ReachabilityFlags>,
}

impl FlagsChangeEvent {
    /// Create a new flag change event
    ///
    /// This constructor is public for use in:
    /// - `ReachabilityProbe` implementations
    /// - Contract tests within reach-core
    /// - External testing code
    pub fn new(new_flags: ReachabilityFlags, previous_flags: Option<ReachabilityFlags>) -> Self {
        Self {
            new_flags,
            previous_flags,
        }
    }

    /// Whether the new flag set has the reachable bit
    pub fn is_reachable(&self) -> bool {
        self.new_flags.is_reachable()
    }
}

/// Trait for reachability probe implementations
///
/// This trait defines two core capabilities:
/// 1. **check()**: One-shot reachability observation for a host
/// 2. **watch()**: Open a session yielding flag change events for a host
///
/// Implementations must be thread-safe and usable across async tasks.
/// A probe is an **observer**: it reports what it sees and makes no
/// decisions about lifecycle, retries, or callback delivery — those
/// belong to [`ReachabilityMonitor`](crate::ReachabilityMonitor).
///
/// ## Session Semantics
///
/// `watch()` is the "create session" operation of the underlying
/// capability. It fails with an error exactly when the capability is
/// unavailable; the monitor absorbs that failure and stays stopped.
/// A probe never holds a reference back to its caller — the returned
/// stream is the only link, and dropping it tears the session down.
///
/// ## Task Spawning Rules
///
/// If an implementation spawns a task to feed the session stream:
/// - The task MUST exit promptly once the stream is dropped
///   (cancellation-safe; no leaked tasks after a monitor stops)
/// - The task MUST emit an event only when the observed flags change,
///   plus one initial event for the first observation
#[async_trait]
pub trait ReachabilityProbe: Send + Sync {
    /// Observe the current reachability of `host` once
    ///
    /// This method should return promptly with the flags as observed
    /// right now, without waiting for any change.
    ///
    /// # Returns
    ///
    /// - `Ok(ReachabilityFlags)`: The observed flag set
    /// - `Err(Error)`: If the probe cannot observe this host at all
    async fn check(&self, host: &str) -> Result<ReachabilityFlags, crate::Error>;

    /// Open a monitoring session for `host`
    ///
    /// Returns a stream that yields a [`FlagsChangeEvent`] whenever the
    /// observed flag set changes. The stream runs until dropped.
    ///
    /// # Behavior
    ///
    /// - Yields the first observation as an initial event
    /// - Yields subsequent events only when the flags actually change
    /// - Must be cancellation-safe (dropping the stream cleans up)
    ///
    /// # Errors
    ///
    /// Fails iff the underlying capability is unavailable for `host`
    /// (e.g. the target cannot be expressed for this probe type).
    fn watch(&self, host: &str) -> Result<FlagsStream, crate::Error>;

    /// Human-readable probe type name, used in logs
    fn probe_name(&self) -> &'static str;
}

/// Helper trait for constructing probes from configuration
pub trait ProbeFactory: Send + Sync {
    /// Create a probe instance from configuration
    ///
    /// # Parameters
    ///
    /// - `config`: Configuration specific to this probe type
    ///
    /// # Returns
    ///
    /// A boxed probe trait object
    fn create(
        &self,
        config: &crate::config::ProbeConfig,
    ) -> Result<Box<dyn ReachabilityProbe>, crate::Error>;
}
