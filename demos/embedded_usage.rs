//! Minimal embedding example for reach-core
//!
//! This example demonstrates using reach-core as a library in a custom
//! application: a scripted probe drives a monitor whose callback pauses
//! or resumes a (pretend) sync pipeline.

use reach_core::traits::{FlagsChangeEvent, FlagsStream, ReachabilityProbe};
use reach_core::{ReachabilityFlags, ReachabilityMonitor, Result};
use std::time::Duration;

/// Custom probe for embedded usage: replays a fixed flag script
struct ScriptedProbe {
    script: Vec<ReachabilityFlags>,
    step_delay: Duration,
}

#[async_trait::async_trait]
impl ReachabilityProbe for ScriptedProbe {
    async fn check(&self, _host: &str) -> Result<ReachabilityFlags> {
        Ok(self.script.first().copied().unwrap_or_default())
    }

    fn watch(&self, _host: &str) -> Result<FlagsStream> {
        let script = self.script.clone();
        let step_delay = self.step_delay;
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();

        tokio::spawn(async move {
            let mut previous = None;
            for flags in script {
                tokio::time::sleep(step_delay).await;
                if tx.send(FlagsChangeEvent::new(flags, previous)).is_err() {
                    break;
                }
                previous = Some(flags);
            }
        });

        Ok(Box::pin(
            tokio_stream::wrappers::UnboundedReceiverStream::new(rx),
        ))
    }

    fn probe_name(&self) -> &'static str {
        "scripted"
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().init();

    let probe = ScriptedProbe {
        script: vec![
            ReachabilityFlags::REACHABLE,
            ReachabilityFlags::empty(),
            ReachabilityFlags::REACHABLE | ReachabilityFlags::CONNECTION_ON_TRAFFIC,
        ],
        step_delay: Duration::from_millis(300),
    };

    // The callback is where a host application reacts: pausing uploads,
    // flushing queues, flipping an offline banner, and so on.
    let monitor = ReachabilityMonitor::new("sync.example.org", Box::new(probe), |reachable, flags| {
        if reachable {
            println!("[embedded] resuming sync (flags: {:?})", flags);
        } else {
            println!("[embedded] pausing sync (flags: {:?})", flags);
        }
    });

    monitor.start().await;
    println!(
        "[embedded] monitoring {} (initially reachable: {})",
        monitor.host(),
        monitor.is_reachable().await
    );

    // Let the script play out
    tokio::time::sleep(Duration::from_millis(1200)).await;

    println!(
        "[embedded] final state: reachable={} flags={:?}",
        monitor.is_reachable().await,
        monitor.flags().await
    );

    // Deterministic teardown before the process exits
    monitor.shutdown().await;
}
