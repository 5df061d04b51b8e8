//! Tokio tick source: a task that owns a [`Simulation`] and drives it.
//!
//! # Timers and replies
//!
//! | Source          | Period                      | Action                              |
//! |-----------------|-----------------------------|-------------------------------------|
//! | frame interval  | `tick_ms`                   | `advance(1)`, publish positions     |
//! | dispatch timer  | warm-up, then interval      | `plan_dispatch`, spawn route fetch  |
//! | feed interval   | `feed_poll_secs`            | spawn feed poll (one at a time)     |
//! | route replies   | on completion               | `commit_dispatch` / `commit_return` |
//! | feed replies    | on completion               | `apply_feed`                        |
//!
//! Fetches and polls run as spawned tasks; only their results come back to
//! the owning task, which is the single writer of vehicle state.  On
//! [`SimulationHandle::shutdown`] the loop exits, pending tasks are aborted
//! and their results discarded, and the simulation is handed back with no
//! reservations and every pending return re-armed.

use std::sync::Arc;
use std::time::Duration;

use rd_core::{Position, Tick, VehicleId};
use rd_path::{Route, RouteProvider};
use rd_targets::{FeedResult, Target, TargetFeed};
use tokio::sync::broadcast;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{Instant, MissedTickBehavior, interval, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{DispatchPlan, PositionUpdate, SimObserver, SimResult, Simulation};

/// Capacity of the position broadcast channel, in frames.  Slow
/// subscribers skip frames rather than stall the loop.
pub const POSITION_CHANNEL_FRAMES: usize = 64;

/// Every vehicle's position for one tick, as published to subscribers.
#[derive(Debug, Clone)]
pub struct PositionFrame {
    pub tick:      Tick,
    pub positions: Arc<[PositionUpdate]>,
}

/// Handle to a running simulation task.
pub struct SimulationHandle<O> {
    cancel:    CancellationToken,
    positions: broadcast::Sender<PositionFrame>,
    task:      JoinHandle<(Simulation, O)>,
}

impl<O> SimulationHandle<O> {
    /// Receive every position frame published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<PositionFrame> {
        self.positions.subscribe()
    }

    /// Token that stops the simulation when cancelled.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Stop the loop and wait for the simulation and observer to be handed
    /// back.  In-flight fetches are dropped.
    pub async fn shutdown(self) -> SimResult<(Simulation, O)> {
        self.cancel.cancel();
        Ok(self.task.await?)
    }
}

/// Spawn the simulation on the current tokio runtime.
pub fn spawn<P, F, O>(sim: Simulation, provider: P, feed: F, observer: O) -> SimulationHandle<O>
where
    P: RouteProvider,
    F: TargetFeed,
    O: SimObserver + Send + 'static,
{
    let cancel = CancellationToken::new();
    let (positions, _) = broadcast::channel(POSITION_CHANNEL_FRAMES);
    let actor = Actor {
        sim,
        observer,
        provider:  Arc::new(provider),
        feed:      Arc::new(feed),
        positions: positions.clone(),
        fetches:   JoinSet::new(),
        polls:     JoinSet::new(),
    };
    let task = tokio::spawn(actor.run(cancel.clone()));
    SimulationHandle { cancel, positions, task }
}

// ── Actor ─────────────────────────────────────────────────────────────────────

enum Fetch {
    Dispatch(DispatchPlan),
    Return(VehicleId),
}

struct Actor<P, F, O> {
    sim:       Simulation,
    observer:  O,
    provider:  Arc<P>,
    feed:      Arc<F>,
    positions: broadcast::Sender<PositionFrame>,
    fetches:   JoinSet<(Fetch, Route)>,
    polls:     JoinSet<FeedResult<Vec<Target>>>,
}

impl<P, F, O> Actor<P, F, O>
where
    P: RouteProvider,
    F: TargetFeed,
    O: SimObserver + Send + 'static,
{
    async fn run(mut self, cancel: CancellationToken) -> (Simulation, O) {
        let config = self.sim.config().clone();

        let mut frames = interval(Duration::from_millis(config.tick_ms as u64));
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let warmup = secs(config.dispatch_warmup_secs);
        let mut dispatches = interval_at(Instant::now() + warmup, period(config.dispatch_interval_secs));
        dispatches.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut feed_polls = interval(period(config.feed_poll_secs));
        feed_polls.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            vehicles = self.sim.fleet().len(),
            tick_ms = config.tick_ms,
            "simulation started"
        );

        loop {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => break,

                _ = frames.tick() => self.on_frame(),

                _ = dispatches.tick() => {
                    if let Some(plan) = self.sim.plan_dispatch() {
                        let (from, to) = (plan.from, plan.to);
                        self.spawn_fetch(Fetch::Dispatch(plan), from, to);
                    }
                }

                _ = feed_polls.tick() => {
                    if self.polls.is_empty() {
                        let feed = Arc::clone(&self.feed);
                        self.polls.spawn(async move { feed.poll().await });
                    } else {
                        debug!("previous feed poll still running; skipping");
                    }
                }

                Some(joined) = self.fetches.join_next() => match joined {
                    Ok((Fetch::Dispatch(plan), route)) => {
                        self.sim.commit_dispatch(plan, route, &mut self.observer);
                    }
                    Ok((Fetch::Return(vehicle), route)) => {
                        self.sim.commit_return(&vehicle, route, &mut self.observer);
                    }
                    Err(err) => warn!(error = %err, "route fetch task failed"),
                },

                Some(joined) = self.polls.join_next() => match joined {
                    Ok(result) => {
                        self.sim.apply_feed(result);
                    }
                    Err(err) => warn!(error = %err, "feed poll task failed"),
                },
            }
        }

        self.fetches.abort_all();
        self.polls.abort_all();
        // Aborted fetches never commit.
        self.sim.reserved.clear();
        self.sim.rearm_returns();
        self.sim.stop(&mut self.observer);
        info!(
            tick = %self.sim.now(),
            dispatches = self.sim.dispatch_count(),
            "simulation stopped"
        );
        (self.sim, self.observer)
    }

    fn on_frame(&mut self) {
        let report = self.sim.advance(1, &mut self.observer);
        for request in report.return_requests {
            self.spawn_fetch(Fetch::Return(request.vehicle), request.from, request.to);
        }
        // No subscribers is fine.
        let _ = self.positions.send(PositionFrame {
            tick:      report.tick,
            positions: report.positions.into(),
        });
    }

    /// Fetch a route on a separate task.  A fetch that panics still yields
    /// the straight-line route, so a vehicle is never left waiting.
    fn spawn_fetch(&mut self, kind: Fetch, from: Position, to: Position) {
        let provider = Arc::clone(&self.provider);
        self.fetches.spawn(async move {
            let fetch = tokio::spawn(async move { provider.fetch_route(from, to).await });
            let route = match fetch.await {
                Ok(route) => route,
                Err(err) => {
                    warn!(error = %err, "route fetch panicked; using straight line");
                    Route::straight(from, to)
                }
            };
            (kind, route)
        });
    }
}

// ── Durations ─────────────────────────────────────────────────────────────────

/// Longest timer the runtime will arm (one year).
const MAX_TIMER: Duration = Duration::from_secs(365 * 86_400);

fn secs(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or(Duration::ZERO).min(MAX_TIMER)
}

/// Like [`secs`] but never zero: tokio intervals reject a zero period.
fn period(value: f64) -> Duration {
    secs(value).max(Duration::from_millis(1))
}
