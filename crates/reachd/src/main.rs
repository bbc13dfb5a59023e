// # reachd - Reachability Daemon
//
// Thin integration layer over reach-core:
// 1. Reading configuration from environment variables
// 2. Initializing the runtime
// 3. Registering probes and building one monitor per host
// 4. Logging reachability transitions until a shutdown signal arrives
//
// All monitoring logic lives in reach-core; this binary only wires it up.
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// ### Hosts
// - `REACH_HOSTS`: Comma-separated list of hosts to monitor
//
// ### Probe
// - `REACH_PROBE_TYPE`: Probe type (tcp)
// - `REACH_PROBE_PORT`: Port for the TCP probe (default 443)
// - `REACH_PROBE_TIMEOUT_SECS`: Connect timeout in seconds (default 5)
// - `REACH_PROBE_INTERVAL_SECS`: Interval between probes in seconds (default 30)
//
// ### Logging
// - `REACH_LOG_LEVEL`: trace, debug, info, warn, error (default info)
//
// ## Example
//
// ```bash
// export REACH_HOSTS=example.org,www.example.org
// export REACH_PROBE_TYPE=tcp
// export REACH_PROBE_PORT=443
// export REACH_PROBE_INTERVAL_SECS=30
//
// reachd
// ```

use anyhow::Result;
use std::env;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum ReachExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<ReachExitCode> for ExitCode {
    fn from(code: ReachExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct Config {
    hosts: Vec<String>,
    probe_type: String,
    probe_port: u16,
    probe_timeout_secs: u64,
    probe_interval_secs: u64,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Ok(Self {
            hosts: env::var("REACH_HOSTS")
                .unwrap_or_default()
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            probe_type: env::var("REACH_PROBE_TYPE").unwrap_or_else(|_| "tcp".to_string()),
            probe_port: env::var("REACH_PROBE_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(443),
            probe_timeout_secs: env::var("REACH_PROBE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
            probe_interval_secs: env::var("REACH_PROBE_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
            log_level: env::var("REACH_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Validate the configuration
    ///
    /// This performs comprehensive validation including:
    /// - Required field presence
    /// - Host name validation
    /// - Numeric range validation
    /// - Type enumeration validation
    fn validate(&self) -> Result<()> {
        if self.hosts.is_empty() {
            anyhow::bail!(
                "REACH_HOSTS must contain at least one host. \
                Set it via: export REACH_HOSTS=example.org,www.example.org"
            );
        }

        for host in &self.hosts {
            reach_core::config::validate_host(host)
                .map_err(|e| anyhow::anyhow!("REACH_HOSTS entry '{}' is invalid: {}", host, e))?;
        }

        // Validate probe type
        match self.probe_type.as_str() {
            "tcp" => {}
            _ => anyhow::bail!(
                "REACH_PROBE_TYPE '{}' is not supported. Supported types: tcp",
                self.probe_type
            ),
        }

        // Validate numeric ranges
        if self.probe_port == 0 {
            anyhow::bail!("REACH_PROBE_PORT must be between 1 and 65535");
        }

        if !(1..=60).contains(&self.probe_timeout_secs) {
            anyhow::bail!(
                "REACH_PROBE_TIMEOUT_SECS must be between 1 and 60 seconds. Got: {}",
                self.probe_timeout_secs
            );
        }

        if !(1..=3600).contains(&self.probe_interval_secs) {
            anyhow::bail!(
                "REACH_PROBE_INTERVAL_SECS must be between 1 and 3600 seconds. Got: {}",
                self.probe_interval_secs
            );
        }

        // Validate log level
        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "REACH_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }

    /// Build the probe configuration for reach-core
    fn probe_config(&self) -> reach_core::ProbeConfig {
        reach_core::ProbeConfig::Tcp {
            port: self.probe_port,
            connect_timeout_secs: self.probe_timeout_secs,
            poll_interval_secs: self.probe_interval_secs,
        }
    }
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ReachExitCode::ConfigError.into();
        }
    };

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return ReachExitCode::ConfigError.into();
    }

    // Initialize tracing
    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return ReachExitCode::ConfigError.into();
    }

    info!("Starting reachd daemon");
    info!("Configuration loaded: {} host(s)", config.hosts.len());

    // Enter tokio runtime
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return ReachExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run_daemon(config).await {
            error!("Daemon error: {}", e);
            ReachExitCode::RuntimeError
        } else {
            ReachExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Run the daemon
async fn run_daemon(config: Config) -> Result<()> {
    // Create probe registry and register built-in probes
    let registry = reach_core::ProbeRegistry::new();

    #[cfg(feature = "tcp")]
    {
        info!("Registering TCP probe");
        reach_probe_tcp::register(&registry);
    }

    let probe_config = config.probe_config();

    // One monitor per host, each with its own probe instance and a
    // callback that logs transitions
    let mut monitors = Vec::with_capacity(config.hosts.len());
    for host in &config.hosts {
        let probe = registry
            .create_probe(&probe_config)
            .map_err(|e| anyhow::anyhow!("Failed to create probe for {}: {}", host, e))?;

        let log_host = host.clone();
        let monitor = reach_core::ReachabilityMonitor::new(host.clone(), probe, move |reachable, flags| {
            if reachable {
                info!(host = %log_host, ?flags, "host reachable");
            } else {
                info!(host = %log_host, ?flags, "host unreachable");
            }
        });

        monitor.start().await;
        if monitor.is_started().await {
            info!("Monitoring host: {}", host);
        } else {
            // Best-effort per core semantics: log and keep going
            tracing::warn!("Probe unavailable for host: {}", host);
        }

        monitors.push(monitor);
    }

    // Wait for shutdown signal
    let signal_name = wait_for_shutdown().await?;
    info!("Received shutdown signal: {}", signal_name);
    info!("Shutting down daemon");

    // Deterministic teardown: no callback fires after this loop
    for monitor in monitors {
        monitor.shutdown().await;
    }

    Ok(())
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
///
/// # Returns
///
/// Returns the name of the signal received.
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    let name = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    };

    Ok(name)
}

/// Wait for shutdown signals (SIGINT only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}
