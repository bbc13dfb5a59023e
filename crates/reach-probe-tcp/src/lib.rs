// # TCP Reachability Probe
//
// This crate provides a socket-connect reachability probe.
//
// ## Purpose
//
// A portable substitute for platform reachability APIs: the host is
// considered reachable when a TCP connection to a configured port can
// be established within a timeout. Works anywhere Tokio does, with no
// platform-specific capability required.
//
// ## Architecture
//
// `watch()` spawns a task that attempts a connect at a configurable
// interval and emits a flag change event only when the observation
// differs from the previous one (plus one initial event). The task
// exits as soon as the session stream is dropped.
//
// ## Flag Mapping
//
// - Connect succeeded: `REACHABLE` (plus `IS_LOCAL_ADDRESS` when the
//   peer is a loopback address)
// - Connect failed or timed out: empty flag set

use reach_core::ProbeRegistry;
use reach_core::config::ProbeConfig;
use reach_core::traits::{FlagsChangeEvent, FlagsStream, ProbeFactory, ReachabilityProbe};
use reach_core::{Error, ReachabilityFlags, Result};

use std::time::Duration;

use tokio::net::TcpStream;
use tokio_stream::wrappers::UnboundedReceiverStream;

/// Default port to connect to
const DEFAULT_PORT: u16 = 443;

/// Default connect timeout
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default interval between connect attempts
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Socket-connect reachability probe
pub struct TcpProbe {
    /// Port to connect to
    port: u16,

    /// Timeout for a single connect attempt
    connect_timeout: Duration,

    /// Interval between connect attempts
    poll_interval: Duration,
}

impl TcpProbe {
    /// Create a probe with the default port, timeout, and interval
    pub fn new() -> Self {
        Self {
            port: DEFAULT_PORT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Create a probe with explicit settings
    pub fn with_settings(port: u16, connect_timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            port,
            connect_timeout,
            poll_interval,
        }
    }

    fn target(&self, host: &str) -> Result<String> {
        if host.is_empty() {
            return Err(Error::invalid_input("host cannot be empty"));
        }

        // Bracket IPv6 literals so host:port parses unambiguously
        if host.parse::<std::net::Ipv6Addr>().is_ok() {
            Ok(format!("[{}]:{}", host, self.port))
        } else {
            Ok(format!("{}:{}", host, self.port))
        }
    }
}

impl Default for TcpProbe {
    fn default() -> Self {
        Self::new()
    }
}

/// One connect attempt, mapped onto reachability flags
async fn probe_once(target: &str, connect_timeout: Duration) -> ReachabilityFlags {
    match tokio::time::timeout(connect_timeout, TcpStream::connect(target)).await {
        Ok(Ok(stream)) => {
            let mut flags = ReachabilityFlags::REACHABLE;
            if let Ok(peer) = stream.peer_addr()
                && peer.ip().is_loopback()
            {
                flags |= ReachabilityFlags::IS_LOCAL_ADDRESS;
            }
            flags
        }
        Ok(Err(e)) => {
            tracing::trace!(target, error = %e, "connect failed");
            ReachabilityFlags::empty()
        }
        Err(_) => {
            tracing::trace!(target, "connect timed out");
            ReachabilityFlags::empty()
        }
    }
}

#[async_trait::async_trait]
impl ReachabilityProbe for TcpProbe {
    async fn check(&self, host: &str) -> Result<ReachabilityFlags> {
        let target = self.target(host)?;
        Ok(probe_once(&target, self.connect_timeout).await)
    }

    fn watch(&self, host: &str) -> Result<FlagsStream> {
        let target = self.target(host)?;
        let connect_timeout = self.connect_timeout;
        let poll_interval = self.poll_interval;

        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();

        tokio::spawn(async move {
            tracing::debug!(target, interval = ?poll_interval, "starting TCP reachability session");

            let mut last_flags: Option<ReachabilityFlags> = None;

            loop {
                let flags = probe_once(&target, connect_timeout).await;

                if last_flags != Some(flags) {
                    let event = FlagsChangeEvent::new(flags, last_flags);
                    if tx.send(event).is_err() {
                        break;
                    }
                    last_flags = Some(flags);
                }

                // Sleep until the next attempt, but wake immediately if
                // the session is dropped so no task outlives its stream.
                tokio::select! {
                    _ = tx.closed() => break,
                    _ = tokio::time::sleep(poll_interval) => {}
                }
            }

            tracing::debug!(target, "TCP reachability session closed");
        });

        Ok(Box::pin(UnboundedReceiverStream::new(rx)))
    }

    fn probe_name(&self) -> &'static str {
        "tcp"
    }
}

/// Factory for creating TCP probes
pub struct TcpProbeFactory;

impl ProbeFactory for TcpProbeFactory {
    fn create(&self, config: &ProbeConfig) -> Result<Box<dyn ReachabilityProbe>> {
        match config {
            ProbeConfig::Tcp {
                port,
                connect_timeout_secs,
                poll_interval_secs,
            } => Ok(Box::new(TcpProbe::with_settings(
                *port,
                Duration::from_secs(*connect_timeout_secs),
                Duration::from_secs(*poll_interval_secs),
            ))),
            _ => Err(Error::config("Invalid config for TCP probe")),
        }
    }
}

/// Register the TCP probe with a registry
pub fn register(registry: &ProbeRegistry) {
    registry.register_probe("tcp", Box::new(TcpProbeFactory));
}
