//! Route provider trait and the offline straight-line provider.
//!
//! # Pluggability
//!
//! `rd-sim` resolves every mission path through the [`RouteProvider`]
//! trait, so applications can swap the HTTP [`DirectionsClient`] for a
//! local router, a recorded fixture, or [`StraightLineProvider`] without
//! touching the dispatch core.
//!
//! [`DirectionsClient`]: crate::DirectionsClient

use std::future::Future;

use rd_core::Position;

use crate::Route;

/// Resolves a travel path between two points.
///
/// # Contract
///
/// The returned future always resolves to a route starting at (or snapped
/// near) `start` and ending at (or near) `end`.  It never fails: providers
/// recover from any error by returning [`Route::straight`]`(start, end)`.
/// Calls are independent; no caching or retry is implied.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` and their futures `Send` so that
/// fetches can run as spawned tasks while the tick loop keeps running.
pub trait RouteProvider: Send + Sync + 'static {
    fn fetch_route(&self, start: Position, end: Position) -> impl Future<Output = Route> + Send;
}

/// Always answers with the straight line `[start, end]`.
///
/// Useful offline and as the behaviour every provider degrades to.
#[derive(Debug, Clone, Copy, Default)]
pub struct StraightLineProvider;

impl RouteProvider for StraightLineProvider {
    async fn fetch_route(&self, start: Position, end: Position) -> Route {
        Route::straight(start, end)
    }
}
