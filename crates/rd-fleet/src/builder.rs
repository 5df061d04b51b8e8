//! Fluent builder that seeds a [`VehicleRegistry`] from vehicle specs.
//!
//! # Usage
//!
//! ```rust
//! use rd_core::{Position, VehicleKind};
//! use rd_fleet::{FleetBuilder, VehicleSpec};
//!
//! let home = Position::new(-0.1276, 51.5072);
//! let fleet = FleetBuilder::new(/*seed=*/ 42)
//!     .patrol_radius(0.01)
//!     .vehicle(VehicleSpec::new("amb-1", VehicleKind::Ambulance, home, 0.002))
//!     .vehicle(VehicleSpec::new("fire-1", VehicleKind::Firetruck, home, 0.0015))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(fleet.len(), 2);
//! assert!(fleet.iter().all(|v| v.patrol_route().first() == home));
//! ```

use std::f64::consts::TAU;

use rd_core::{Position, VehicleId, VehicleKind, VehicleRng};
use rd_path::Route;

use crate::{FleetError, FleetResult, Vehicle, VehicleRegistry};

/// Default patrol radius, degrees (roughly 1 km at mid latitudes).
pub const DEFAULT_PATROL_RADIUS: f64 = 0.01;

/// Description of one vehicle to create.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct VehicleSpec {
    pub id:     VehicleId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub kind:   VehicleKind,
    pub home:   Position,
    /// Fraction of the current route covered per tick.
    pub speed:  f64,
    /// Explicit patrol polyline.  Generated from the run seed when absent.
    #[cfg_attr(feature = "serde", serde(default))]
    pub patrol: Option<Vec<Position>>,
}

impl VehicleSpec {
    pub fn new(id: impl Into<VehicleId>, kind: VehicleKind, home: Position, speed: f64) -> Self {
        Self { id: id.into(), kind, home, speed, patrol: None }
    }

    /// Use `points` as the patrol route instead of generating one.
    pub fn with_patrol(mut self, points: Vec<Position>) -> Self {
        self.patrol = Some(points);
        self
    }
}

/// Fluent builder for a [`VehicleRegistry`].
///
/// Vehicles are registered in the order added.  Generated patrol routes use
/// a [`VehicleRng`] keyed by the run seed and the vehicle's registry index,
/// so the same seed and spec list always produce the same fleet.
pub struct FleetBuilder {
    seed:          u64,
    patrol_radius: f64,
    specs:         Vec<VehicleSpec>,
}

impl FleetBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed, patrol_radius: DEFAULT_PATROL_RADIUS, specs: Vec::new() }
    }

    /// Maximum distance (degrees) from home base of a generated patrol
    /// route's far end.
    pub fn patrol_radius(mut self, radius: f64) -> Self {
        self.patrol_radius = radius;
        self
    }

    pub fn vehicle(mut self, spec: VehicleSpec) -> Self {
        self.specs.push(spec);
        self
    }

    pub fn vehicles(mut self, specs: impl IntoIterator<Item = VehicleSpec>) -> Self {
        self.specs.extend(specs);
        self
    }

    /// Create every vehicle, idle at its home base.
    ///
    /// # Errors
    ///
    /// The first [`FleetError`] hit: duplicate id, invalid speed or home
    /// base, or an explicit patrol route that is empty or non-finite.
    pub fn build(self) -> FleetResult<VehicleRegistry> {
        let mut registry = VehicleRegistry::new();
        for (index, spec) in self.specs.into_iter().enumerate() {
            if !spec.home.is_finite() {
                return Err(FleetError::InvalidHome(spec.id));
            }
            let patrol = match spec.patrol {
                Some(mut points) => {
                    // Patrols start at home so returning to idle never jumps.
                    if points.first().is_some_and(|&first| first != spec.home) {
                        points.insert(0, spec.home);
                    }
                    Route::new(points).map_err(|source| FleetError::InvalidPatrol {
                        vehicle: spec.id.clone(),
                        source,
                    })?
                }
                None => {
                    let mut rng = VehicleRng::new(self.seed, index as u32);
                    generate_patrol(spec.home, self.patrol_radius, &mut rng)
                }
            };
            let vehicle = Vehicle::new(spec.id, spec.kind, spec.home, spec.speed, patrol)?;
            registry.insert(vehicle)?;
        }
        Ok(registry)
    }
}

/// Two-point patrol route from `home` to a point at a random bearing, between
/// half of and the full `radius` away.
pub fn generate_patrol(home: Position, radius: f64, rng: &mut VehicleRng) -> Route {
    let radius = radius.abs();
    if radius == 0.0 || !radius.is_finite() {
        return Route::point(home);
    }
    let bearing: f64 = rng.gen_range(0.0..TAU);
    let distance: f64 = rng.gen_range(radius * 0.5..=radius);
    let far = Position::new(
        home.lng + distance * bearing.sin(),
        home.lat + distance * bearing.cos(),
    );
    Route::straight(home, far)
}
