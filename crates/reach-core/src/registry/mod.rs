//! Plugin-based probe registry
//!
//! The registry allows reachability probes to be registered dynamically
//! at runtime, avoiding hardcoded if-else chains.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use reach_core::registry::ProbeRegistry;
//! use reach_core::config::ProbeConfig;
//!
//! // Create a registry
//! let registry = ProbeRegistry::new();
//!
//! // Register probes
//! registry.register_probe("tcp", Box::new(tcp_factory));
//!
//! // Create probe from config
//! let config = ProbeConfig::Tcp { .. };
//! let probe = registry.create_probe(&config)?;
//! ```
//!
//! ## Registration
//!
//! Implementations should register themselves during initialization:
//!
//! ```rust,ignore
//! # use reach_core::registry::ProbeRegistry;
//!
//! // In reach-probe-tcp crate
//! pub fn register(registry: &ProbeRegistry) {
//!     registry.register_probe("tcp", Box::new(TcpProbeFactory));
//! }
//! ```

use crate::config::ProbeConfig;
use crate::error::{Error, Result};
use crate::traits::{ProbeFactory, ReachabilityProbe};
use std::collections::HashMap;
use std::sync::RwLock;

/// Probe registry for plugin-based probe creation
///
/// The registry maintains a map of probe type names to factory objects,
/// allowing dynamic instantiation of probes based on configuration.
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes.
#[derive(Default)]
pub struct ProbeRegistry {
    /// Registered probe factories
    probes: RwLock<HashMap<String, Box<dyn ProbeFactory>>>,
}

impl ProbeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a probe factory
    ///
    /// # Parameters
    ///
    /// - `name`: Probe type name (e.g., "tcp")
    /// - `factory`: Factory object for creating probe instances
    pub fn register_probe(&self, name: impl Into<String>, factory: Box<dyn ProbeFactory>) {
        let name = name.into();
        let mut probes = self.probes.write().unwrap();
        probes.insert(name, factory);
    }

    /// Create a probe from configuration
    ///
    /// # Parameters
    ///
    /// - `config`: Probe configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn ReachabilityProbe>)`: Created probe instance
    /// - `Err(Error)`: If the probe type is not registered or creation fails
    pub fn create_probe(&self, config: &ProbeConfig) -> Result<Box<dyn ReachabilityProbe>> {
        let probe_type = config.type_name();
        let probes = self.probes.read().unwrap();

        let factory = probes
            .get(probe_type)
            .ok_or_else(|| Error::config(format!("Unknown probe type: {}", probe_type)))?;

        factory.create(config)
    }

    /// List all registered probe types
    pub fn list_probes(&self) -> Vec<String> {
        let probes = self.probes.read().unwrap();
        probes.keys().cloned().collect()
    }

    /// Check if a probe type is registered
    pub fn has_probe(&self, name: &str) -> bool {
        let probes = self.probes.read().unwrap();
        probes.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockProbeFactory;

    impl ProbeFactory for MockProbeFactory {
        fn create(&self, _config: &ProbeConfig) -> Result<Box<dyn ReachabilityProbe>> {
            Err(Error::probe("mock probe not implemented"))
        }
    }

    #[test]
    fn test_registry_registration() {
        let registry = ProbeRegistry::new();

        // Initially empty
        assert!(!registry.has_probe("mock"));

        // Register
        registry.register_probe("mock", Box::new(MockProbeFactory));

        // Now present
        assert!(registry.has_probe("mock"));
        assert!(registry.list_probes().contains(&"mock".to_string()));
    }

    #[test]
    fn test_unknown_probe_type_fails() {
        let registry = ProbeRegistry::new();
        let config = ProbeConfig::default();

        let result = registry.create_probe(&config);
        assert!(result.is_err());
    }
}
