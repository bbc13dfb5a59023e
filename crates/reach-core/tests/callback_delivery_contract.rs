//! Architectural Contract Test: Callback Delivery and State Publication
//!
//! This test verifies the monitor's observable state and callback
//! behavior against delivered probe events.
//!
//! Constraints verified:
//! - Before any event, the state is the optimistic default (reachable)
//! - After an event delivering flags F: flags() == F exactly and
//!   is_reachable() is true iff F contains the reachable bit
//! - The callback receives exactly (F contains reachable, F)
//! - No event is delivered while the monitor is stopped

mod common;

use common::*;
use reach_core::{ReachabilityFlags, ReachabilityMonitor};
use std::time::Duration;

#[tokio::test]
async fn default_optimistic_until_first_event() {
    let monitor = ReachabilityMonitor::new("example.org", Box::new(IdleProbe), |_, _| {});

    monitor.start().await;

    // Started, but no observation yet: still the optimistic default
    assert!(monitor.is_reachable().await);
    assert_eq!(monitor.flags().await, ReachabilityFlags::REACHABLE);

    monitor.shutdown().await;
}

#[tokio::test]
async fn delivered_flags_are_published_exactly() {
    let (probe, handle) = ControlledProbe::new();
    let (mut log, callback) = CallbackLog::new();
    let monitor = ReachabilityMonitor::new("example.org", Box::new(probe), callback);

    monitor.start().await;

    let flags = ReachabilityFlags::REACHABLE | ReachabilityFlags::IS_DIRECT;
    handle.emit(flags);
    log.next_delivery().await;

    assert_eq!(monitor.flags().await, flags);
    assert!(monitor.is_reachable().await);
    assert_eq!(log.entries(), vec![(true, flags)]);

    monitor.shutdown().await;
}

#[tokio::test]
async fn unreachable_flags_clear_the_reachable_state() {
    let (probe, handle) = ControlledProbe::new();
    let (mut log, callback) = CallbackLog::new();
    let monitor = ReachabilityMonitor::new("example.org", Box::new(probe), callback);

    monitor.start().await;

    let flags = ReachabilityFlags::CONNECTION_REQUIRED;
    handle.emit(flags);
    log.next_delivery().await;

    assert_eq!(monitor.flags().await, flags);
    assert!(!monitor.is_reachable().await);
    assert_eq!(log.entries(), vec![(false, flags)]);

    monitor.shutdown().await;
}

#[tokio::test]
async fn last_observation_survives_stop() {
    let (probe, handle) = ControlledProbe::new();
    let (mut log, callback) = CallbackLog::new();
    let monitor = ReachabilityMonitor::new("example.org", Box::new(probe), callback);

    monitor.start().await;
    handle.emit(ReachabilityFlags::empty());
    log.next_delivery().await;
    monitor.stop().await;

    // Stopped monitors keep reporting the last-known state
    assert!(!monitor.is_reachable().await);
    assert_eq!(monitor.flags().await, ReachabilityFlags::empty());

    monitor.shutdown().await;
}

/// The end-to-end scenario: start, observe one change, stop, and
/// verify a later change is not delivered.
#[tokio::test]
async fn scenario_start_observe_stop() {
    let (probe, handle) = ControlledProbe::new();
    let (mut log, callback) = CallbackLog::new();
    let monitor = ReachabilityMonitor::new("example.org", Box::new(probe), callback);

    monitor.start().await;

    handle.emit(ReachabilityFlags::REACHABLE);
    log.next_delivery().await;

    assert_eq!(log.entries(), vec![(true, ReachabilityFlags::REACHABLE)]);
    assert!(monitor.is_reachable().await);

    monitor.stop().await;

    // A change after stop() must not reach the callback
    handle.emit(ReachabilityFlags::empty());
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(log.len(), 1, "no delivery after stop()");
    assert!(monitor.is_reachable().await, "state frozen at last delivery");

    monitor.shutdown().await;
}
