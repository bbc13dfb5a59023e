// # reach-core
//
// Core library for host reachability monitoring.
//
// ## Architecture Overview
//
// This library provides the core functionality for reachability monitoring:
// - **ReachabilityFlags**: Bitmask describing a host's connectivity
// - **ReachabilityProbe**: Trait for observing reachability changes
// - **ReachabilityMonitor**: Per-host monitor with safe lifecycle and
//   thread-safe state publication
// - **ProbeRegistry**: Plugin-based registry for probe implementations
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Probes observe; the monitor owns
//    lifecycle, state, and callback delivery
// 2. **Serialized State**: Each monitor funnels every read, write, and
//    callback through one dedicated worker task
// 3. **Plugin-Based**: Probes are registered dynamically, no hard-coded if-else
// 4. **Best-Effort**: A missing probe capability leaves a monitor
//    stopped, never panicking or erroring into the host application

pub mod config;
pub mod error;
pub mod flags;
pub mod monitor;
pub mod registry;
pub mod traits;

// Re-export core types for convenience
pub use config::{MonitorConfig, ProbeConfig, ReachConfig};
pub use error::{Error, Result};
pub use flags::ReachabilityFlags;
pub use monitor::{ReachabilityMonitor, ReachabilitySnapshot};
pub use registry::ProbeRegistry;
pub use traits::{FlagsChangeEvent, FlagsStream, ReachabilityProbe};
