//! Core traits for the reachability system
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`ReachabilityProbe`]: Observe reachability changes for a host

pub mod probe;

pub use probe::{FlagsChangeEvent, FlagsStream, ProbeFactory, ReachabilityProbe};
