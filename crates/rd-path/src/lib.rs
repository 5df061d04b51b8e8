//! `rd-path` — routes, interpolation, and route providers.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                |
//! |-----------------|---------------------------------------------------------|
//! | [`route`]       | `Route` — non-empty polyline with cached lengths        |
//! | [`interpolate`] | `position_at`, `sample`, `PathSample`                   |
//! | [`provider`]    | `RouteProvider` trait, `StraightLineProvider`           |
//! | [`directions`]  | `DirectionsClient` (HTTP), `DirectionsConfig`           |
//! | [`error`]       | `RouteError`, `RouteResult<T>`                          |
//!
//! # Failure model
//!
//! [`RouteProvider::fetch_route`] never fails.  Providers that talk to an
//! external service resolve any failure to the straight line
//! `[start, end]`; `RouteError` only surfaces from constructors and from
//! the internal request path of [`DirectionsClient`].

pub mod directions;
pub mod error;
pub mod interpolate;
pub mod provider;
pub mod route;


pub use directions::{DirectionsClient, DirectionsConfig};
pub use error::{RouteError, RouteResult};
pub use interpolate::{PathSample, position_at, sample};
pub use provider::{RouteProvider, StraightLineProvider};
pub use route::Route;
