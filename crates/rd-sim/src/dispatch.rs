//! The dispatch orchestrator: pairs the first idle vehicle with the
//! highest-priority target.
//!
//! A dispatch happens in three steps so the route fetch can run without
//! holding the simulation:
//!
//! | Step                              | Sync? | Effect                                   |
//! |-----------------------------------|-------|------------------------------------------|
//! | [`Simulation::plan_dispatch`]     | yes   | choose vehicle + target, reserve vehicle |
//! | `RouteProvider::fetch_route`      | async | route from current position to target    |
//! | [`Simulation::commit_dispatch`]   | yes   | idle → responding, emit `DispatchRecord` |
//!
//! At most one plan is produced per orchestrator tick.

use std::collections::HashSet;

use rd_core::{Position, TargetId, VehicleId};
use rd_path::{Route, RouteProvider};
use rd_targets::select_target_where;
use tracing::{debug, info};

use crate::{DispatchRecord, SimObserver, Simulation};

/// A dispatch decision waiting for its route.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchPlan {
    pub vehicle: VehicleId,
    pub target:  TargetId,
    /// The vehicle's position when planned (not its home base).
    ///
    /// A reserved vehicle keeps patrolling while the route is fetched, so
    /// on commit it restarts from this point rather than from wherever the
    /// patrol took it in the meantime.
    pub from:    Position,
    pub to:      Position,
}

impl Simulation {
    /// Pick the next dispatch, if any, and reserve its vehicle.
    ///
    /// Returns `None` (a normal outcome, logged at debug) when there is no
    /// idle unreserved vehicle or no eligible target.
    pub fn plan_dispatch(&mut self) -> Option<DispatchPlan> {
        let now = self.clock.current_tick;

        let Some(vehicle) = self.fleet.first_idle_where(|v| !self.reserved.contains_key(v.id())) else {
            debug!(tick = %now, "dispatch tick: no idle vehicle");
            return None;
        };

        let plan = {
            let taken: HashSet<&TargetId> = if self.config.one_unit_per_target {
                self.fleet
                    .iter()
                    .filter_map(|v| v.assigned_target())
                    .chain(self.reserved.values())
                    .collect()
            } else {
                HashSet::new()
            };
            let Some(target) = select_target_where(self.board.targets(), |t| !taken.contains(&t.id)) else {
                debug!(tick = %now, targets = self.board.targets().len(), "dispatch tick: no eligible target");
                return None;
            };
            debug!(
                vehicle = %vehicle.id(),
                target = %target.id,
                severity = %target.severity,
                "dispatch planned; fetching route"
            );
            DispatchPlan {
                vehicle: vehicle.id().clone(),
                target:  target.id.clone(),
                from:    vehicle.position(),
                to:      target.position,
            }
        };
        self.reserved.insert(plan.vehicle.clone(), plan.target.clone());
        Some(plan)
    }

    /// Commit `plan` with its fetched `route`.
    ///
    /// Releases the reservation either way.  Returns `None` if the vehicle
    /// has left the registry or is no longer idle.
    pub fn commit_dispatch<O: SimObserver>(
        &mut self,
        plan:     DispatchPlan,
        route:    Route,
        observer: &mut O,
    ) -> Option<DispatchRecord> {
        self.reserved.remove(&plan.vehicle);
        let now = self.clock.current_tick;

        let Some(vehicle) = self.fleet.get_mut(&plan.vehicle) else {
            debug!(vehicle = %plan.vehicle, "route for unknown vehicle discarded");
            return None;
        };
        let from_state = vehicle.state();
        if !vehicle.dispatch(plan.target.clone(), route) {
            debug!(vehicle = %plan.vehicle, state = %from_state, "vehicle no longer idle; dispatch dropped");
            return None;
        }

        let record = DispatchRecord {
            vehicle_id:   plan.vehicle,
            target_id:    plan.target,
            timestamp_ms: self.clock.current_unix_ms(),
            tick:         now,
        };
        self.dispatches += 1;
        info!(
            vehicle = %record.vehicle_id,
            target = %record.target_id,
            timestamp_ms = record.timestamp_ms,
            tick = %now,
            "dispatch committed"
        );
        observer.on_transition(now, &record.vehicle_id, from_state, vehicle.state());
        observer.on_dispatch(&record);
        Some(record)
    }

    /// Drop the reservation for `vehicle` without dispatching it.
    pub fn release(&mut self, vehicle: &VehicleId) -> bool {
        self.reserved.remove(vehicle).is_some()
    }

    /// One orchestrator tick run to completion: plan, fetch, commit.
    ///
    /// Synchronous drivers use this; the runtime splits the steps so the
    /// clock keeps running during the fetch.
    pub async fn dispatch_tick<P, O>(&mut self, provider: &P, observer: &mut O) -> Option<DispatchRecord>
    where
        P: RouteProvider,
        O: SimObserver,
    {
        let plan = self.plan_dispatch()?;
        let route = provider.fetch_route(plan.from, plan.to).await;
        self.commit_dispatch(plan, route, observer)
    }
}
