//! Simulation observer trait and the records it receives.

use rd_core::{Position, TargetId, Tick, VehicleId};
use rd_fleet::{VehicleRegistry, VehicleState};

/// One vehicle's rendered state for one tick.
///
/// This is everything a renderer needs; it never sees lifecycle state.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionUpdate {
    pub vehicle_id: VehicleId,
    pub position:   Position,
    /// Radians, 0 = north, clockwise.
    pub heading:    f64,
}

/// Audit record of a committed dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchRecord {
    pub vehicle_id:   VehicleId,
    pub target_id:    TargetId,
    /// Simulated wall-clock time of the commit, Unix milliseconds.
    pub timestamp_ms: i64,
    pub tick:         Tick,
}

/// Callbacks invoked by [`Simulation`][crate::Simulation] as it runs.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: dispatch counter
///
/// ```rust,ignore
/// struct Counter(usize);
///
/// impl SimObserver for Counter {
///     fn on_dispatch(&mut self, _record: &DispatchRecord) {
///         self.0 += 1;
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called once per tick with every vehicle's position, in registry order.
    fn on_positions(&mut self, _tick: Tick, _updates: &[PositionUpdate]) {}

    /// Called for every committed dispatch.
    fn on_dispatch(&mut self, _record: &DispatchRecord) {}

    /// Called whenever a vehicle changes lifecycle state.
    fn on_transition(
        &mut self,
        _tick:    Tick,
        _vehicle: &VehicleId,
        _from:    VehicleState,
        _to:      VehicleState,
    ) {}

    /// Called every `config.snapshot_interval_ticks` ticks with read access
    /// to the whole fleet.
    fn on_snapshot(&mut self, _tick: Tick, _fleet: &VehicleRegistry) {}

    /// Called once when the simulation is stopped.
    fn on_stop(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
