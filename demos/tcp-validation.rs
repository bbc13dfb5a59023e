//! Live validation for the TCP probe
//!
//! Monitors a real host for a short window and prints every transition.
//! Useful for eyeballing probe behavior against actual networks; not a
//! substitute for the contract tests.
//!
//! Usage:
//!
//! ```bash
//! cargo run --bin tcp_validation -- example.org 443
//! ```

use reach_core::ReachabilityMonitor;
use reach_probe_tcp::TcpProbe;
use std::time::Duration;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().init();

    let mut args = std::env::args().skip(1);
    let host = args.next().unwrap_or_else(|| "example.org".to_string());
    let port: u16 = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(443);

    let probe = TcpProbe::with_settings(port, Duration::from_secs(3), Duration::from_secs(5));

    let monitor = ReachabilityMonitor::new(host.clone(), Box::new(probe), move |reachable, flags| {
        println!("{}: reachable={} flags={:?}", host, reachable, flags);
    });

    monitor.start().await;
    if !monitor.is_started().await {
        eprintln!("probe unavailable for this host");
        return;
    }

    // Watch for 30 seconds, then tear down
    tokio::time::sleep(Duration::from_secs(30)).await;
    monitor.shutdown().await;
}
