//! `rd-sim` — dispatch orchestration and the simulation clock.
//!
//! # Tick model
//!
//! ```text
//! every frame (tick_ms):
//!   ① Clock     — advance every vehicle in registry order; arrivals and
//!                 dwell expiry fire state transitions.
//!   ② Returns   — vehicles whose dwell elapsed ask for a route home.
//!   ③ Publish   — one PositionUpdate per vehicle, in registry order.
//!
//! every dispatch interval (after warm-up):
//!   ① Plan      — first idle vehicle × highest-priority active target.
//!   ② Fetch     — route from the vehicle's *current* position (async).
//!   ③ Commit    — idle → responding, DispatchRecord emitted.
//! ```
//!
//! [`Simulation`] is the single owner of all vehicle state.  Synchronous
//! drivers (tests, batch tools) call its methods directly; the [`runtime`]
//! module wraps it in a tokio task that owns it exclusively and feeds it
//! timer ticks, route replies, and feed polls.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! let fleet = FleetBuilder::new(seed).vehicles(specs).build()?;
//! let sim = SimBuilder::new(config, fleet).build()?;
//! let handle = runtime::spawn(sim, DirectionsClient::new(&dirs)?, feed, NoopObserver);
//! // ...
//! let (sim, _observer) = handle.shutdown().await?;
//! ```

pub mod builder;
pub mod dispatch;
pub mod error;
pub mod observer;
pub mod runtime;
pub mod sim;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use dispatch::DispatchPlan;
pub use error::{SimError, SimResult};
pub use observer::{DispatchRecord, NoopObserver, PositionUpdate, SimObserver};
pub use runtime::{PositionFrame, SimulationHandle};
pub use sim::{ReturnRequest, Simulation, TickReport};
