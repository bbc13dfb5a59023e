//! Reachability flag set
//!
//! A bitmask describing the connectivity characteristics last reported
//! by a probe: whether the host is reachable, whether a connection must
//! be established first, transport hints, and so on. The bit layout
//! mirrors the flag sets exposed by platform reachability APIs so that
//! probes can map their observations onto a common vocabulary.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

/// Bitmask describing the reachability of a host.
///
/// The default value is `REACHABLE`: a monitor reports the host as
/// reachable until the first real observation arrives. Downstream
/// consumers may depend on this optimistic default, so it is part of
/// the contract rather than an implementation detail.
///
/// # Example
///
/// ```rust
/// use reach_core::ReachabilityFlags;
///
/// let flags = ReachabilityFlags::REACHABLE | ReachabilityFlags::CONNECTION_REQUIRED;
/// assert!(flags.contains(ReachabilityFlags::REACHABLE));
/// assert!(!flags.contains(ReachabilityFlags::IS_LOCAL_ADDRESS));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReachabilityFlags(u32);

impl ReachabilityFlags {
    /// The host can be reached with the current network configuration.
    pub const REACHABLE: Self = Self(1 << 0);

    /// A connection must be established before traffic can flow.
    pub const CONNECTION_REQUIRED: Self = Self(1 << 1);

    /// A connection will be established on the first outbound traffic.
    pub const CONNECTION_ON_TRAFFIC: Self = Self(1 << 2);

    /// A connection will be established on demand by the session layer.
    pub const CONNECTION_ON_DEMAND: Self = Self(1 << 3);

    /// User intervention (e.g. entering credentials) is required first.
    pub const INTERVENTION_REQUIRED: Self = Self(1 << 4);

    /// The connection to the host is transient (e.g. dial-up style).
    pub const TRANSIENT_CONNECTION: Self = Self(1 << 5);

    /// The target resolves to an address local to this machine.
    pub const IS_LOCAL_ADDRESS: Self = Self(1 << 6);

    /// Traffic reaches the host without going through a gateway.
    pub const IS_DIRECT: Self = Self(1 << 7);

    /// The empty flag set (host not reachable, nothing else known).
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Whether no flags are set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Whether all bits of `other` are set in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether the `REACHABLE` bit is set.
    pub const fn is_reachable(self) -> bool {
        self.contains(Self::REACHABLE)
    }

    /// Set the bits of `other`.
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Clear the bits of `other`.
    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    /// The raw bit representation.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Construct from a raw bit representation. Unknown bits are kept
    /// as-is so that platform-specific probes can carry extra state.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }
}

impl Default for ReachabilityFlags {
    /// Optimistic default: reachable until a probe reports otherwise.
    fn default() -> Self {
        Self::REACHABLE
    }
}

impl BitOr for ReachabilityFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ReachabilityFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for ReachabilityFlags {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl fmt::Debug for ReachabilityFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: &[(ReachabilityFlags, &str)] = &[
            (ReachabilityFlags::REACHABLE, "REACHABLE"),
            (ReachabilityFlags::CONNECTION_REQUIRED, "CONNECTION_REQUIRED"),
            (ReachabilityFlags::CONNECTION_ON_TRAFFIC, "CONNECTION_ON_TRAFFIC"),
            (ReachabilityFlags::CONNECTION_ON_DEMAND, "CONNECTION_ON_DEMAND"),
            (ReachabilityFlags::INTERVENTION_REQUIRED, "INTERVENTION_REQUIRED"),
            (ReachabilityFlags::TRANSIENT_CONNECTION, "TRANSIENT_CONNECTION"),
            (ReachabilityFlags::IS_LOCAL_ADDRESS, "IS_LOCAL_ADDRESS"),
            (ReachabilityFlags::IS_DIRECT, "IS_DIRECT"),
        ];

        if self.is_empty() {
            return write!(f, "(empty)");
        }

        let mut first = true;
        let mut rest = self.0;
        for (flag, name) in NAMES {
            if self.contains(*flag) {
                if !first {
                    write!(f, " | ")?;
                }
                write!(f, "{}", name)?;
                rest &= !flag.0;
                first = false;
            }
        }
        if rest != 0 {
            if !first {
                write!(f, " | ")?;
            }
            write!(f, "{:#x}", rest)?;
        }
        Ok(())
    }
}
