//! The `Vehicle` record and its transition functions.

use std::f64::consts::PI;

use rd_core::{Position, TargetId, Tick, VehicleId, VehicleKind};
use rd_path::{PathSample, Route, sample};
use tracing::info;

use crate::{Direction, FleetError, FleetResult, VehicleState};

/// Progress within this distance of a bound snaps onto it.  Summing a
/// per-tick step that is not exactly representable (0.1, 0.05) would
/// otherwise land a hair short of 1.0 and cost an extra tick.
pub(crate) const PROGRESS_EPSILON: f64 = 1e-9;

/// What a single [`Vehicle::advance`] call changed, if anything the caller
/// must react to.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Moved (or stood still) without changing state.
    Moved,
    /// The vehicle changed lifecycle state this tick.
    Transition { from: VehicleState, to: VehicleState },
    /// Dwell has elapsed; a route from `from` to `to` (home base) is needed
    /// before the vehicle can leave the scene.  Reported exactly once per
    /// on-scene visit.
    ReturnRouteNeeded { from: Position, to: Position },
}

/// One response unit.
///
/// Fields are private; every mutation goes through [`dispatch`],
/// [`advance`] or [`begin_return`], which keep `state`, `route`,
/// `progress` and `assigned_target` consistent with each other:
///
/// - `progress` is always in `[0, 1]`.
/// - `assigned_target` is `Some` exactly when `state != Idle`.
/// - `direction` is `Backward` only while idle.
///
/// [`dispatch`]: Vehicle::dispatch
/// [`advance`]: Vehicle::advance
/// [`begin_return`]: Vehicle::begin_return
#[derive(Debug, Clone)]
pub struct Vehicle {
    id:               VehicleId,
    kind:             VehicleKind,
    home_base:        Position,
    /// Fraction of the route length covered per tick.
    speed:            f64,
    patrol:           Route,

    route:            Route,
    progress:         f64,
    direction:        Direction,
    state:            VehicleState,
    assigned_target:  Option<TargetId>,
    /// Last known travel heading, radians.  Kept when the current sample has
    /// no direction (degenerate route, vehicle parked on scene).
    heading:          f64,
    dwell_until:      Option<Tick>,
    return_requested: bool,
}

impl Vehicle {
    /// Create an idle vehicle at the start of `patrol`.
    ///
    /// # Errors
    ///
    /// [`FleetError::InvalidSpeed`] unless `speed` is finite and positive,
    /// [`FleetError::InvalidHome`] if `home_base` is not finite.
    pub fn new(
        id:        VehicleId,
        kind:      VehicleKind,
        home_base: Position,
        speed:     f64,
        patrol:    Route,
    ) -> FleetResult<Self> {
        if !(speed.is_finite() && speed > 0.0) {
            return Err(FleetError::InvalidSpeed { vehicle: id, speed });
        }
        if !home_base.is_finite() {
            return Err(FleetError::InvalidHome(id));
        }
        let heading = sample(&patrol, 0.0).heading.unwrap_or(0.0);
        Ok(Self {
            id,
            kind,
            home_base,
            speed,
            route: patrol.clone(),
            patrol,
            progress: 0.0,
            direction: Direction::Forward,
            state: VehicleState::Idle,
            assigned_target: None,
            heading,
            dwell_until: None,
            return_requested: false,
        })
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    #[inline] pub fn id(&self) -> &VehicleId { &self.id }
    #[inline] pub fn kind(&self) -> VehicleKind { self.kind }
    #[inline] pub fn home_base(&self) -> Position { self.home_base }
    #[inline] pub fn speed(&self) -> f64 { self.speed }
    #[inline] pub fn patrol_route(&self) -> &Route { &self.patrol }
    #[inline] pub fn route(&self) -> &Route { &self.route }
    #[inline] pub fn progress(&self) -> f64 { self.progress }
    #[inline] pub fn direction(&self) -> Direction { self.direction }
    #[inline] pub fn state(&self) -> VehicleState { self.state }
    #[inline] pub fn assigned_target(&self) -> Option<&TargetId> { self.assigned_target.as_ref() }
    #[inline] pub fn dwell_until(&self) -> Option<Tick> { self.dwell_until }

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.state.is_idle()
    }

    /// Current position on the current route.
    pub fn position(&self) -> Position {
        sample(&self.route, self.progress).position
    }

    /// Current heading in radians (0 = north, clockwise).
    #[inline]
    pub fn heading(&self) -> f64 {
        self.heading
    }

    /// Position plus the effective heading.
    pub fn sample(&self) -> PathSample {
        PathSample { position: self.position(), heading: Some(self.heading) }
    }

    // ── Transitions ──────────────────────────────────────────────────────────

    /// Send an idle vehicle to `target` along `route`.
    ///
    /// Returns `false` and changes nothing if the vehicle is not idle.
    pub fn dispatch(&mut self, target: TargetId, route: Route) -> bool {
        if !self.is_idle() {
            return false;
        }
        info!(vehicle = %self.id, target = %target, "idle -> responding");
        self.route = route;
        self.progress = 0.0;
        self.direction = Direction::Forward;
        self.state = VehicleState::Responding;
        self.assigned_target = Some(target);
        self.refresh_heading();
        true
    }

    /// Leave the scene along `route` (the resolved route home).
    ///
    /// Only legal on scene after [`Step::ReturnRouteNeeded`] was reported;
    /// returns `false` and changes nothing otherwise.
    pub fn begin_return(&mut self, route: Route) -> bool {
        if self.state != VehicleState::OnScene || !self.return_requested {
            return false;
        }
        info!(vehicle = %self.id, "on_scene -> returning");
        self.route = route;
        self.progress = 0.0;
        self.state = VehicleState::Returning;
        self.dwell_until = None;
        self.return_requested = false;
        self.refresh_heading();
        true
    }

    /// Forget a reported [`Step::ReturnRouteNeeded`] whose route will never
    /// be committed, so the next [`advance`](Self::advance) reports it again.
    ///
    /// Returns `true` if a pending request was cleared.
    pub fn rearm_return(&mut self) -> bool {
        if self.state != VehicleState::OnScene || !self.return_requested {
            return false;
        }
        self.return_requested = false;
        true
    }

    /// Advance by `delta` ticks ending at `now`.
    ///
    /// `dwell_ticks` is how long a vehicle stays on scene after arriving.
    pub fn advance(&mut self, delta: u64, now: Tick, dwell_ticks: u64) -> Step {
        let step = self.speed * delta as f64;
        match self.state {
            VehicleState::Idle => {
                self.patrol_step(step);
                Step::Moved
            }
            VehicleState::Responding | VehicleState::Returning => {
                if self.route.is_degenerate() {
                    self.progress = 1.0;
                } else {
                    self.progress = snap(self.progress + step);
                }
                self.refresh_heading();
                if self.progress < 1.0 {
                    return Step::Moved;
                }
                self.arrive(now, dwell_ticks)
            }
            VehicleState::OnScene => {
                let elapsed = self.dwell_until.is_none_or(|until| now >= until);
                if elapsed && !self.return_requested {
                    self.return_requested = true;
                    return Step::ReturnRouteNeeded { from: self.route.last(), to: self.home_base };
                }
                Step::Moved
            }
        }
    }

    fn patrol_step(&mut self, step: f64) {
        self.progress = snap(self.progress + step * self.direction.sign());
        match self.direction {
            Direction::Forward if self.progress >= 1.0 => self.direction = Direction::Backward,
            Direction::Backward if self.progress <= 0.0 => self.direction = Direction::Forward,
            _ => {}
        }
        self.refresh_heading();
    }

    fn arrive(&mut self, now: Tick, dwell_ticks: u64) -> Step {
        let from = self.state;
        match from {
            VehicleState::Responding => {
                self.state = VehicleState::OnScene;
                self.dwell_until = Some(now + dwell_ticks);
                self.return_requested = false;
            }
            VehicleState::Returning => {
                self.state = VehicleState::Idle;
                self.assigned_target = None;
                self.route = self.patrol.clone();
                self.progress = 0.0;
                self.direction = Direction::Forward;
                self.refresh_heading();
            }
            VehicleState::Idle | VehicleState::OnScene => return Step::Moved,
        }
        info!(vehicle = %self.id, tick = %now, "{from} -> {}", self.state);
        Step::Transition { from, to: self.state }
    }

    /// Update the last known heading from the current sample.  Idle
    /// vehicles heading back along the patrol face the other way.
    fn refresh_heading(&mut self) {
        if let Some(h) = sample(&self.route, self.progress).heading {
            self.heading = match self.direction {
                Direction::Forward  => h,
                Direction::Backward => (h + PI).rem_euclid(std::f64::consts::TAU),
            };
        }
    }
}

/// Clamp to `[0, 1]`, snapping values within [`PROGRESS_EPSILON`] of a bound.
fn snap(p: f64) -> f64 {
    if p >= 1.0 - PROGRESS_EPSILON {
        1.0
    } else if p <= PROGRESS_EPSILON {
        0.0
    } else {
        p
    }
}
