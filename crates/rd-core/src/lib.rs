//! `rd-core` — foundational types for the `rapid_dispatch` simulation.
//!
//! This crate is a dependency of every other `rd-*` crate.  It has
//! no `rd-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`ids`]     | `VehicleId`, `TargetId`                                   |
//! | [`geo`]     | `Position`, planar + haversine distance, heading          |
//! | [`time`]    | `Tick`, `SimClock`, `SimConfig`                           |
//! | [`rng`]     | `VehicleRng` (per-vehicle, seeded from the run seed)     |
//! | [`kind`]    | `VehicleKind` enum                                        |
//! | [`error`]   | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod kind;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::Position;
pub use ids::{TargetId, VehicleId};
pub use kind::VehicleKind;
pub use rng::VehicleRng;
pub use time::{SimClock, SimConfig, Tick};
