//! `rd-fleet` — response units and their mission lifecycle.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                       |
//! |--------------|----------------------------------------------------------------|
//! | [`state`]    | `VehicleState`, `Direction`                                    |
//! | [`vehicle`]  | `Vehicle` — per-unit data and the named transition functions   |
//! | [`registry`] | `VehicleRegistry` — insertion-ordered, id-indexed storage      |
//! | [`builder`]  | `FleetBuilder`, `VehicleSpec` — seeding with patrol routes     |
//! | [`error`]    | `FleetError`, `FleetResult<T>`                                 |
//!
//! # Lifecycle
//!
//! ```text
//!   idle ──dispatch──▶ responding ──arrive──▶ on_scene
//!    ▲                                           │ dwell elapses,
//!    └────────arrive──── returning ◀─route home──┘ return route resolved
//! ```
//!
//! While idle a vehicle ping-pongs along its patrol route.  There is no
//! terminal state.  Every field change goes through a method on
//! [`Vehicle`]; callers never write fields directly.

pub mod builder;
pub mod error;
pub mod registry;
pub mod state;
pub mod vehicle;


pub use builder::{FleetBuilder, VehicleSpec};
pub use error::{FleetError, FleetResult};
pub use registry::VehicleRegistry;
pub use state::{Direction, VehicleState};
pub use vehicle::{Step, Vehicle};
