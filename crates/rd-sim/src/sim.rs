//! The `Simulation` struct and its clock.

use std::collections::HashMap;

use rd_core::{Position, SimClock, SimConfig, TargetId, Tick, VehicleId};
use rd_fleet::{Step, VehicleRegistry, VehicleState};
use rd_path::{Route, RouteProvider};
use rd_targets::{FeedResult, Target, TargetBoard};
use tracing::debug;

use crate::{PositionUpdate, SimObserver};

// ── Per-tick outputs ──────────────────────────────────────────────────────────

/// A vehicle whose dwell has elapsed and needs a route home before it can
/// leave the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnRequest {
    pub vehicle: VehicleId,
    pub from:    Position,
    pub to:      Position,
}

/// What one [`Simulation::advance`] call produced.
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub tick:            Tick,
    /// One entry per vehicle, registry order.
    pub positions:       Vec<PositionUpdate>,
    pub return_requests: Vec<ReturnRequest>,
}

// ── Simulation ────────────────────────────────────────────────────────────────

/// Owns the fleet, the target board, and the clock.
///
/// Every vehicle mutation happens through a `&mut self` method here, so a
/// single owner (the runtime task, or a test) is the only writer.  Route
/// fetches are the only suspension points; they are split into a
/// synchronous *plan*, an async fetch the caller runs, and a synchronous
/// *commit*.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Simulation {
    pub(crate) config:      SimConfig,
    pub(crate) clock:       SimClock,
    pub(crate) fleet:       VehicleRegistry,
    pub(crate) board:       TargetBoard,
    pub(crate) dwell_ticks: u64,

    /// Vehicles with a dispatch route fetch in flight, and the target each
    /// was planned against.  Reserved vehicles are skipped by later plans.
    pub(crate) reserved:    HashMap<VehicleId, TargetId>,
    pub(crate) dispatches:  u64,
}

impl Simulation {
    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    #[inline]
    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    #[inline]
    pub fn now(&self) -> Tick {
        self.clock.current_tick
    }

    #[inline]
    pub fn fleet(&self) -> &VehicleRegistry {
        &self.fleet
    }

    #[inline]
    pub fn board(&self) -> &TargetBoard {
        &self.board
    }

    /// Total dispatches committed so far.
    #[inline]
    pub fn dispatch_count(&self) -> u64 {
        self.dispatches
    }

    /// `true` while `vehicle` has a dispatch route fetch in flight.
    pub fn is_reserved(&self, vehicle: &VehicleId) -> bool {
        self.reserved.contains_key(vehicle)
    }

    // ── Clock ─────────────────────────────────────────────────────────────

    /// Advance every vehicle by `delta` ticks.
    ///
    /// Vehicles are stepped in registry order.  Transitions and positions
    /// are reported to `observer`; vehicles that need a route home are
    /// returned in the report for the caller to fetch and
    /// [`commit_return`](Self::commit_return).
    pub fn advance<O: SimObserver>(&mut self, delta: u64, observer: &mut O) -> TickReport {
        self.clock.advance(delta);
        let now = self.clock.current_tick;

        let mut return_requests = Vec::new();
        for vehicle in self.fleet.iter_mut() {
            match vehicle.advance(delta, now, self.dwell_ticks) {
                Step::Moved => {}
                Step::Transition { from, to } => {
                    observer.on_transition(now, vehicle.id(), from, to);
                }
                Step::ReturnRouteNeeded { from, to } => {
                    debug!(vehicle = %vehicle.id(), tick = %now, "dwell elapsed; requesting route home");
                    return_requests.push(ReturnRequest { vehicle: vehicle.id().clone(), from, to });
                }
            }
        }

        let positions: Vec<PositionUpdate> = self
            .fleet
            .iter()
            .map(|v| PositionUpdate {
                vehicle_id: v.id().clone(),
                position:   v.position(),
                heading:    v.heading(),
            })
            .collect();
        observer.on_positions(now, &positions);

        let every = self.config.snapshot_interval_ticks;
        if every > 0 && now.0 % every == 0 {
            observer.on_snapshot(now, &self.fleet);
        }

        TickReport { tick: now, positions, return_requests }
    }

    /// Send `vehicle` home along `route`.
    ///
    /// Returns `false` (and does nothing) if the vehicle is gone or not
    /// waiting for a return route.
    pub fn commit_return<O: SimObserver>(
        &mut self,
        vehicle:  &VehicleId,
        route:    Route,
        observer: &mut O,
    ) -> bool {
        let now = self.clock.current_tick;
        let Some(v) = self.fleet.get_mut(vehicle) else {
            debug!(vehicle = %vehicle, "return route for unknown vehicle discarded");
            return false;
        };
        if !v.begin_return(route) {
            return false;
        }
        observer.on_transition(now, vehicle, VehicleState::OnScene, VehicleState::Returning);
        true
    }

    /// Fetch routes for `requests` one at a time and commit each.
    ///
    /// Convenience for synchronous drivers; the runtime fetches
    /// concurrently instead.
    pub async fn complete_returns<P, O>(
        &mut self,
        requests: Vec<ReturnRequest>,
        provider: &P,
        observer: &mut O,
    ) where
        P: RouteProvider,
        O: SimObserver,
    {
        for request in requests {
            let route = provider.fetch_route(request.from, request.to).await;
            self.commit_return(&request.vehicle, route, observer);
        }
    }

    /// Re-arm every vehicle waiting on scene for a route home that will
    /// never arrive (an aborted fetch, or a dropped [`ReturnRequest`]).
    /// The next [`advance`](Self::advance) requests those routes again.
    ///
    /// Returns the number of vehicles re-armed.
    pub fn rearm_returns(&mut self) -> usize {
        let mut rearmed = 0;
        for vehicle in self.fleet.iter_mut() {
            if vehicle.rearm_return() {
                debug!(vehicle = %vehicle.id(), "pending return route dropped; re-armed");
                rearmed += 1;
            }
        }
        rearmed
    }

    // ── Targets ───────────────────────────────────────────────────────────

    /// Fold a feed poll into the target board.  A failed poll keeps the
    /// previous targets.
    pub fn apply_feed(&mut self, result: FeedResult<Vec<Target>>) -> bool {
        self.board.apply_poll(result)
    }

    /// Notify `observer` that the run is over.
    pub fn stop<O: SimObserver>(&mut self, observer: &mut O) {
        observer.on_stop(self.clock.current_tick);
    }
}
