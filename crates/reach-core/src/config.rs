//! Configuration types for the reachability system
//!
//! This module defines all configuration structures used throughout the crate.

use serde::{Deserialize, Serialize};

/// Main reachability configuration
///
/// Describes a set of hosts to monitor with a shared probe type.
/// Each host gets its own monitor instance; monitors never share
/// probe sessions or state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReachConfig {
    /// Hosts to monitor (hostname or address, one monitor each)
    pub hosts: Vec<String>,

    /// Probe configuration
    pub probe: ProbeConfig,

    /// Optional monitor settings
    #[serde(default)]
    pub monitor: MonitorConfig,
}

impl ReachConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self {
            hosts: Vec::new(),
            probe: ProbeConfig::default(),
            monitor: MonitorConfig::default(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.hosts.is_empty() {
            return Err(crate::Error::config("No hosts configured"));
        }

        for host in &self.hosts {
            validate_host(host)?;
        }

        self.probe.validate()?;
        self.monitor.validate()?;

        Ok(())
    }
}

impl Default for ReachConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Probe configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProbeConfig {
    /// Socket-connect probe (polls a TCP connect against the host)
    Tcp {
        /// Port to connect to
        #[serde(default = "default_tcp_port")]
        port: u16,
        /// Connect timeout in seconds
        #[serde(default = "default_connect_timeout_secs")]
        connect_timeout_secs: u64,
        /// Interval between connect attempts in seconds
        #[serde(default = "default_poll_interval_secs")]
        poll_interval_secs: u64,
    },

    /// Custom probe
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl ProbeConfig {
    /// Validate the probe configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            ProbeConfig::Tcp {
                port,
                connect_timeout_secs,
                poll_interval_secs,
            } => {
                if *port == 0 {
                    return Err(crate::Error::config("TCP probe port cannot be 0"));
                }
                if *connect_timeout_secs == 0 {
                    return Err(crate::Error::config("TCP probe connect timeout must be > 0"));
                }
                if *poll_interval_secs == 0 {
                    return Err(crate::Error::config("TCP probe poll interval must be > 0"));
                }
                Ok(())
            }
            ProbeConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(crate::Error::config("Custom probe factory cannot be empty"));
                }
                if config.is_null() {
                    return Err(crate::Error::config("Custom probe config cannot be null"));
                }
                Ok(())
            }
        }
    }

    /// Get the probe type name
    pub fn type_name(&self) -> &str {
        match self {
            ProbeConfig::Tcp { .. } => "tcp",
            ProbeConfig::Custom { factory, .. } => factory,
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        ProbeConfig::Tcp {
            port: default_tcp_port(),
            connect_timeout_secs: default_connect_timeout_secs(),
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

/// Monitor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Capacity of the monitor's command channel
    ///
    /// Commands (start, stop, snapshot reads) queue here in FIFO order.
    /// Callers await their reply, so the queue only grows when many
    /// tasks hammer the same monitor at once.
    #[serde(default = "default_command_channel_capacity")]
    pub command_channel_capacity: usize,
}

impl MonitorConfig {
    /// Validate the monitor configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.command_channel_capacity == 0 {
            return Err(crate::Error::config(
                "Monitor command channel capacity must be > 0",
            ));
        }
        Ok(())
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            command_channel_capacity: default_command_channel_capacity(),
        }
    }
}

/// Validate that a string is a plausible host identifier
///
/// Accepts DNS names (basic RFC 1035 label rules) and IP address
/// literals. Not comprehensive, but catches common configuration
/// errors before a monitor is built for a hopeless target.
pub fn validate_host(host: &str) -> Result<(), crate::Error> {
    if host.is_empty() {
        return Err(crate::Error::config("Host cannot be empty"));
    }

    // IP literals are always acceptable
    if host.parse::<std::net::IpAddr>().is_ok() {
        return Ok(());
    }

    // RFC 1035: 253 chars max
    if host.len() > 253 {
        return Err(crate::Error::config(format!(
            "Host name too long: {} chars (max 253)",
            host.len()
        )));
    }

    for label in host.split('.') {
        if label.is_empty() {
            return Err(crate::Error::config(format!(
                "Host name has empty label: '{}'",
                host
            )));
        }
        if label.len() > 63 {
            return Err(crate::Error::config(format!(
                "Host label too long: {} chars (max 63). Label: '{}'",
                label.len(),
                label
            )));
        }
        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(crate::Error::config(format!(
                "Host label contains invalid characters. Label: '{}'",
                label
            )));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(crate::Error::config(format!(
                "Host label cannot start or end with hyphen. Label: '{}'",
                label
            )));
        }
    }

    Ok(())
}

fn default_tcp_port() -> u16 {
    443
}

fn default_connect_timeout_secs() -> u64 {
    5
}

fn default_poll_interval_secs() -> u64 {
    30
}

fn default_command_channel_capacity() -> usize {
    32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_probe_config_is_valid() {
        let config = ProbeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.type_name(), "tcp");
    }

    #[test]
    fn test_tcp_probe_config_rejects_zero_values() {
        let config = ProbeConfig::Tcp {
            port: 0,
            connect_timeout_secs: 5,
            poll_interval_secs: 30,
        };
        assert!(config.validate().is_err());

        let config = ProbeConfig::Tcp {
            port: 443,
            connect_timeout_secs: 0,
            poll_interval_secs: 30,
        };
        assert!(config.validate().is_err());

        let config = ProbeConfig::Tcp {
            port: 443,
            connect_timeout_secs: 5,
            poll_interval_secs: 0,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_reach_config_requires_hosts() {
        let config = ReachConfig::new();
        assert!(config.validate().is_err());

        let mut config = ReachConfig::new();
        config.hosts.push("example.org".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_host() {
        assert!(validate_host("example.org").is_ok());
        assert!(validate_host("sub.example.org").is_ok());
        assert!(validate_host("192.0.2.7").is_ok());
        assert!(validate_host("::1").is_ok());

        assert!(validate_host("").is_err());
        assert!(validate_host("bad..label").is_err());
        assert!(validate_host("-leading.example.org").is_err());
        assert!(validate_host("under_score.example.org").is_err());
        assert!(validate_host(&"a".repeat(64)).is_err());
    }

    #[test]
    fn test_probe_config_serde_round_trip() {
        let json = r#"{"type": "tcp", "port": 80}"#;
        let config: ProbeConfig = serde_json::from_str(json).unwrap();
        match config {
            ProbeConfig::Tcp {
                port,
                connect_timeout_secs,
                poll_interval_secs,
            } => {
                assert_eq!(port, 80);
                assert_eq!(connect_timeout_secs, 5);
                assert_eq!(poll_interval_secs, 30);
            }
            _ => panic!("expected tcp probe config"),
        }
    }
}
