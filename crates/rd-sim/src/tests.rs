//! Integration tests for rd-sim.

use rd_core::{Position, SimConfig, Tick, VehicleId, VehicleKind};
use rd_fleet::{Vehicle, VehicleRegistry, VehicleState};
use rd_path::Route;
use rd_targets::{Severity, Target};

use crate::{DispatchRecord, PositionUpdate, SimBuilder, SimObserver, Simulation};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn p(lng: f64, lat: f64) -> Position {
    Position::new(lng, lat)
}

/// One-second ticks, 2-tick dwell, no snapshots.
fn test_config() -> SimConfig {
    SimConfig {
        tick_ms:                 1_000,
        dwell_secs:              2.0,
        snapshot_interval_ticks: 0,
        ..SimConfig::default()
    }
}

/// `n` vehicles `v0..`, all based at the origin, patrolling north to (0, 1)
/// at 0.1 per tick.
fn fleet(n: usize) -> VehicleRegistry {
    let mut fleet = VehicleRegistry::new();
    for i in 0..n {
        let patrol = Route::straight(p(0.0, 0.0), p(0.0, 1.0));
        let v = Vehicle::new(
            VehicleId::new(format!("v{i}")),
            VehicleKind::Ambulance,
            p(0.0, 0.0),
            0.1,
            patrol,
        )
        .unwrap();
        fleet.insert(v).unwrap();
    }
    fleet
}

fn target(id: &str, severity: i64, at: Position) -> Target {
    Target::new(id, at, Severity::new(severity).unwrap(), true)
}

fn sim(vehicles: usize, targets: Vec<Target>) -> Simulation {
    SimBuilder::new(test_config(), fleet(vehicles)).targets(targets).build().unwrap()
}

#[derive(Default)]
struct Recorder {
    positions:   Vec<(Tick, Vec<PositionUpdate>)>,
    dispatches:  Vec<DispatchRecord>,
    transitions: Vec<(Tick, VehicleId, VehicleState, VehicleState)>,
    snapshots:   Vec<Tick>,
    stopped:     Option<Tick>,
}

impl Recorder {
    fn count(&self, from: VehicleState, to: VehicleState) -> usize {
        self.transitions.iter().filter(|t| t.2 == from && t.3 == to).count()
    }
}

impl SimObserver for Recorder {
    fn on_positions(&mut self, tick: Tick, updates: &[PositionUpdate]) {
        self.positions.push((tick, updates.to_vec()));
    }

    fn on_dispatch(&mut self, record: &DispatchRecord) {
        self.dispatches.push(record.clone());
    }

    fn on_transition(&mut self, tick: Tick, vehicle: &VehicleId, from: VehicleState, to: VehicleState) {
        self.transitions.push((tick, vehicle.clone(), from, to));
    }

    fn on_snapshot(&mut self, tick: Tick, _fleet: &VehicleRegistry) {
        self.snapshots.push(tick);
    }

    fn on_stop(&mut self, final_tick: Tick) {
        self.stopped = Some(final_tick);
    }
}

// ── SimBuilder validation ─────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;
    use crate::SimError;

    #[test]
    fn builds_at_tick_zero() {
        let sim = sim(2, vec![]);
        assert_eq!(sim.now(), Tick::ZERO);
        assert_eq!(sim.fleet().len(), 2);
        assert!(sim.board().targets().is_empty());
        assert_eq!(sim.dispatch_count(), 0);
    }

    #[test]
    fn zero_tick_period_is_rejected() {
        let config = SimConfig { tick_ms: 0, ..SimConfig::default() };
        let result = SimBuilder::new(config, fleet(1)).build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn non_positive_dispatch_interval_is_rejected() {
        let config = SimConfig { dispatch_interval_secs: 0.0, ..SimConfig::default() };
        assert!(SimBuilder::new(config, fleet(1)).build().is_err());
    }
}

// ── Clock ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod clock {
    use super::*;
    use crate::NoopObserver;

    #[test]
    fn one_position_per_vehicle_per_tick_in_registry_order() {
        let mut sim = sim(3, vec![]);
        let mut rec = Recorder::default();
        for _ in 0..4 {
            sim.advance(1, &mut rec);
        }
        assert_eq!(rec.positions.len(), 4);
        for (i, (tick, updates)) in rec.positions.iter().enumerate() {
            assert_eq!(*tick, Tick(i as u64 + 1));
            let ids: Vec<&str> = updates.iter().map(|u| u.vehicle_id.as_str()).collect();
            assert_eq!(ids, ["v0", "v1", "v2"]);
        }
    }

    #[test]
    fn idle_vehicles_patrol() {
        let mut sim = sim(1, vec![]);
        let report = sim.advance(3, &mut NoopObserver);
        assert_eq!(report.tick, Tick(3));
        let pos = report.positions[0].position;
        assert!((pos.lat - 0.3).abs() < 1e-12);
        assert!(report.return_requests.is_empty());
    }

    #[test]
    fn snapshots_follow_interval() {
        let config = SimConfig { snapshot_interval_ticks: 5, ..test_config() };
        let mut sim = SimBuilder::new(config, fleet(1)).build().unwrap();
        let mut rec = Recorder::default();
        for _ in 0..12 {
            sim.advance(1, &mut rec);
        }
        assert_eq!(rec.snapshots, vec![Tick(5), Tick(10)]);
    }

    #[test]
    fn stop_reports_final_tick() {
        let mut sim = sim(1, vec![]);
        let mut rec = Recorder::default();
        sim.advance(7, &mut rec);
        sim.stop(&mut rec);
        assert_eq!(rec.stopped, Some(Tick(7)));
    }
}

// ── Dispatch orchestrator ─────────────────────────────────────────────────────

#[cfg(test)]
mod dispatch {
    use rd_path::StraightLineProvider;
    use rd_targets::FeedError;

    use super::*;
    use crate::DispatchPlan;

    #[test]
    fn no_target_is_a_no_op() {
        let mut sim = sim(2, vec![]);
        assert!(sim.plan_dispatch().is_none());
        assert!(!sim.is_reserved(&"v0".into()));
    }

    #[test]
    fn inactive_targets_are_ignored() {
        let mut t = target("t", 5, p(1.0, 1.0));
        t.is_active = false;
        let mut sim = sim(1, vec![t]);
        assert!(sim.plan_dispatch().is_none());
    }

    #[test]
    fn no_vehicle_is_a_no_op() {
        let mut sim = sim(0, vec![target("t", 5, p(1.0, 1.0))]);
        assert!(sim.plan_dispatch().is_none());
    }

    #[tokio::test]
    async fn highest_severity_target_wins() {
        let targets = vec![
            target("sev2", 2, p(1.0, 0.0)),
            target("sev5", 5, p(2.0, 0.0)),
            target("sev4", 4, p(3.0, 0.0)),
        ];
        let mut sim = sim(1, targets);
        let record = sim.dispatch_tick(&StraightLineProvider, &mut Recorder::default()).await.unwrap();
        assert_eq!(record.target_id.as_str(), "sev5");
        assert_eq!(record.vehicle_id.as_str(), "v0");
    }

    #[tokio::test]
    async fn equal_severity_goes_to_earliest_listed() {
        let targets = vec![target("newer", 5, p(1.0, 0.0)), target("older", 5, p(2.0, 0.0))];
        let mut sim = sim(1, targets);
        let record = sim.dispatch_tick(&StraightLineProvider, &mut Recorder::default()).await.unwrap();
        assert_eq!(record.target_id.as_str(), "newer");
    }

    #[tokio::test]
    async fn dispatch_starts_from_current_position_not_home() {
        // Feed delivers one severity-5 target at tick N; dispatch at N+1.
        let mut sim = sim(1, vec![]);
        let mut rec = Recorder::default();
        sim.advance(3, &mut rec);
        sim.apply_feed(Ok(vec![target("t", 5, p(1.0, 1.0))]));
        sim.advance(1, &mut rec);

        let before = sim.fleet().iter().next().unwrap().position();
        assert_ne!(before, p(0.0, 0.0));

        let record = sim.dispatch_tick(&StraightLineProvider, &mut rec).await.unwrap();
        assert_eq!(record.tick, Tick(4));

        let v = sim.fleet().get(&"v0".into()).unwrap();
        assert_eq!(v.state(), VehicleState::Responding);
        assert_eq!(v.route().first(), before);
        assert_eq!(v.route().last(), p(1.0, 1.0));
        assert_eq!(v.assigned_target().map(|t| t.as_str()), Some("t"));
    }

    #[tokio::test]
    async fn record_carries_sim_time() {
        let config = SimConfig { start_unix_ms: 1_700_000_000_000, ..test_config() };
        let mut sim = SimBuilder::new(config, fleet(1))
            .targets(vec![target("t", 3, p(1.0, 0.0))])
            .build()
            .unwrap();
        sim.advance(5, &mut Recorder::default());
        let mut rec = Recorder::default();
        let record = sim.dispatch_tick(&StraightLineProvider, &mut rec).await.unwrap();
        assert_eq!(record.timestamp_ms, 1_700_000_005_000);
        assert_eq!(rec.dispatches, vec![record]);
        assert_eq!(rec.count(VehicleState::Idle, VehicleState::Responding), 1);
    }

    #[test]
    fn reserved_vehicle_is_not_planned_twice() {
        let mut sim = sim(2, vec![target("t", 5, p(1.0, 1.0))]);
        let first = sim.plan_dispatch().unwrap();
        let second = sim.plan_dispatch().unwrap();
        assert_eq!(first.vehicle.as_str(), "v0");
        assert_eq!(second.vehicle.as_str(), "v1");
        assert!(sim.plan_dispatch().is_none(), "both vehicles reserved");

        assert!(sim.release(&first.vehicle));
        assert_eq!(sim.plan_dispatch().unwrap().vehicle.as_str(), "v0");
    }

    #[test]
    fn committed_route_starts_where_the_plan_was_made() {
        let mut sim = sim(1, vec![target("t", 5, p(1.0, 1.0))]);
        let mut rec = Recorder::default();
        sim.advance(2, &mut rec);
        let plan = sim.plan_dispatch().unwrap();
        assert_eq!(plan.from, p(0.0, 0.2));

        // Still patrolling while the fetch is in flight.
        sim.advance(3, &mut rec);
        let v = sim.fleet().get(&"v0".into()).unwrap();
        assert!(v.is_idle());
        assert!(sim.is_reserved(&"v0".into()));
        assert_ne!(v.position(), plan.from);

        let route = Route::straight(plan.from, plan.to);
        assert!(sim.commit_dispatch(plan, route, &mut rec).is_some());
        let v = sim.fleet().get(&"v0".into()).unwrap();
        assert_eq!(v.position(), p(0.0, 0.2));
        assert_eq!(v.progress(), 0.0);
    }

    #[test]
    fn stale_plan_for_busy_vehicle_is_dropped() {
        let mut sim = sim(1, vec![target("t", 5, p(1.0, 1.0))]);
        let mut rec = Recorder::default();
        let stale = sim.plan_dispatch().unwrap();
        sim.release(&stale.vehicle);
        let fresh = sim.plan_dispatch().unwrap();

        let route = Route::straight(fresh.from, fresh.to);
        assert!(sim.commit_dispatch(fresh, route.clone(), &mut rec).is_some());
        assert!(sim.commit_dispatch(stale, route, &mut rec).is_none());
        assert_eq!(sim.dispatch_count(), 1);
        assert_eq!(rec.dispatches.len(), 1);
        assert!(!sim.is_reserved(&"v0".into()));
    }

    #[test]
    fn plan_for_unknown_vehicle_is_discarded() {
        let mut sim = sim(1, vec![target("t", 5, p(1.0, 1.0))]);
        let ghost = DispatchPlan {
            vehicle: "ghost".into(),
            target:  "t".into(),
            from:    p(0.0, 0.0),
            to:      p(1.0, 1.0),
        };
        let route = Route::straight(ghost.from, ghost.to);
        assert!(sim.commit_dispatch(ghost, route, &mut Recorder::default()).is_none());
        assert_eq!(sim.dispatch_count(), 0);
    }

    #[tokio::test]
    async fn at_most_one_dispatch_per_tick() {
        let targets = vec![target("a", 5, p(1.0, 1.0)), target("b", 4, p(-1.0, 1.0))];
        let mut sim = sim(3, targets);
        let mut rec = Recorder::default();
        for _ in 0..40 {
            let before = rec.count(VehicleState::Idle, VehicleState::Responding);
            sim.dispatch_tick(&StraightLineProvider, &mut rec).await;
            let after = rec.count(VehicleState::Idle, VehicleState::Responding);
            assert!(after - before <= 1);

            let report = sim.advance(1, &mut rec);
            sim.complete_returns(report.return_requests, &StraightLineProvider, &mut rec).await;

            for v in sim.fleet() {
                assert_eq!(v.is_idle(), v.assigned_target().is_none());
            }
        }
        assert!(sim.dispatch_count() >= 3);
    }

    #[tokio::test]
    async fn one_unit_per_target_spreads_the_fleet() {
        let targets = vec![target("a", 5, p(1.0, 1.0)), target("b", 3, p(-1.0, 1.0))];

        let mut shared = sim(2, targets.clone());
        let mut rec = Recorder::default();
        shared.dispatch_tick(&StraightLineProvider, &mut rec).await.unwrap();
        shared.dispatch_tick(&StraightLineProvider, &mut rec).await.unwrap();
        let ids: Vec<&str> = rec.dispatches.iter().map(|r| r.target_id.as_str()).collect();
        assert_eq!(ids, ["a", "a"]);

        let config = SimConfig { one_unit_per_target: true, ..test_config() };
        let mut exclusive = SimBuilder::new(config, fleet(3)).targets(targets).build().unwrap();
        let mut rec = Recorder::default();
        for _ in 0..3 {
            exclusive.dispatch_tick(&StraightLineProvider, &mut rec).await;
        }
        let ids: Vec<&str> = rec.dispatches.iter().map(|r| r.target_id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[test]
    fn exclusive_mode_skips_reserved_targets() {
        let config = SimConfig { one_unit_per_target: true, ..test_config() };
        let mut sim = SimBuilder::new(config, fleet(2))
            .targets(vec![target("only", 5, p(1.0, 1.0))])
            .build()
            .unwrap();
        assert!(sim.plan_dispatch().is_some());
        assert!(sim.plan_dispatch().is_none());
    }

    #[test]
    fn failed_feed_poll_keeps_targets() {
        let mut sim = sim(1, vec![target("t", 5, p(1.0, 1.0))]);
        assert!(!sim.apply_feed(Err(FeedError::Status(503))));
        assert_eq!(sim.board().targets().len(), 1);
        assert!(sim.board().is_stale());
        assert!(sim.plan_dispatch().is_some());
    }
}

// ── Lifecycle ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod lifecycle {
    use rd_path::StraightLineProvider;

    use super::*;

    #[tokio::test]
    async fn dispatched_vehicle_returns_to_idle() {
        let mut sim = sim(1, vec![target("t", 5, p(0.5, 0.0))]);
        let mut rec = Recorder::default();
        sim.dispatch_tick(&StraightLineProvider, &mut rec).await.unwrap();

        let mut ticks = 0;
        while !sim.fleet().get(&"v0".into()).unwrap().is_idle() {
            let report = sim.advance(1, &mut rec);
            sim.complete_returns(report.return_requests, &StraightLineProvider, &mut rec).await;
            ticks += 1;
            assert!(ticks < 100, "vehicle never came home");
        }
        // 10 out, 2 dwell, 10 back (plus the tick that notices the dwell).
        assert!(ticks <= 24, "took {ticks} ticks");

        let v = sim.fleet().get(&"v0".into()).unwrap();
        assert!(v.assigned_target().is_none());
        assert_eq!(v.position(), v.home_base());

        let states: Vec<(VehicleState, VehicleState)> =
            rec.transitions.iter().map(|t| (t.2, t.3)).collect();
        assert_eq!(states, vec![
            (VehicleState::Idle,       VehicleState::Responding),
            (VehicleState::Responding, VehicleState::OnScene),
            (VehicleState::OnScene,    VehicleState::Returning),
            (VehicleState::Returning,  VehicleState::Idle),
        ]);
    }

    #[tokio::test]
    async fn vehicle_waits_on_scene_until_route_home_arrives() {
        let mut sim = sim(1, vec![target("t", 5, p(0.0, 0.0))]);
        let mut rec = Recorder::default();
        sim.dispatch_tick(&StraightLineProvider, &mut rec).await.unwrap();

        // Degenerate route: arrives on the first tick, then dwells 2 ticks.
        let mut pending = Vec::new();
        for _ in 0..6 {
            pending.extend(sim.advance(1, &mut rec).return_requests);
        }
        assert_eq!(pending.len(), 1);
        let v = sim.fleet().get(&"v0".into()).unwrap();
        assert_eq!(v.state(), VehicleState::OnScene);

        let request = pending.remove(0);
        assert!(sim.commit_return(&request.vehicle, Route::straight(request.from, request.to), &mut rec));
        assert_eq!(sim.fleet().get(&"v0".into()).unwrap().state(), VehicleState::Returning);
        assert!(!sim.commit_return(&request.vehicle, Route::point(request.to), &mut rec));
    }

    #[tokio::test]
    async fn dropped_return_request_is_rearmed() {
        let mut sim = sim(1, vec![target("t", 5, p(0.0, 0.0))]);
        let mut rec = Recorder::default();
        sim.dispatch_tick(&StraightLineProvider, &mut rec).await.unwrap();

        // The driver loses the request instead of fetching the route.
        let mut dropped = 0;
        for _ in 0..10 {
            dropped += sim.advance(1, &mut rec).return_requests.len();
        }
        assert_eq!(dropped, 1);
        assert_eq!(sim.fleet().get(&"v0".into()).unwrap().state(), VehicleState::OnScene);

        assert_eq!(sim.rearm_returns(), 1);
        assert_eq!(sim.rearm_returns(), 0);

        let mut ticks = 0;
        while !sim.fleet().get(&"v0".into()).unwrap().is_idle() {
            let report = sim.advance(1, &mut rec);
            sim.complete_returns(report.return_requests, &StraightLineProvider, &mut rec).await;
            ticks += 1;
            assert!(ticks < 100, "vehicle never came home");
        }
        assert!(sim.fleet().get(&"v0".into()).unwrap().assigned_target().is_none());
    }
}

// ── Runtime ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod runtime {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use rd_path::RouteProvider;
    use rd_targets::StaticFeed;
    use tokio::sync::broadcast::error::TryRecvError;

    use super::*;
    use crate::runtime::spawn;

    /// Straight-line provider that takes `delay` to answer.
    #[derive(Clone, Default)]
    struct DelayedProvider {
        delay: Duration,
        calls: Arc<AtomicUsize>,
    }

    impl RouteProvider for DelayedProvider {
        async fn fetch_route(&self, start: Position, end: Position) -> Route {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            Route::straight(start, end)
        }
    }

    fn runtime_config() -> SimConfig {
        SimConfig {
            tick_ms:                 100,
            dwell_secs:              0.5,
            dispatch_warmup_secs:    1.0,
            dispatch_interval_secs:  45.0,
            feed_poll_secs:          30.0,
            snapshot_interval_ticks: 0,
            ..SimConfig::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn dispatches_after_warmup() {
        let sim = SimBuilder::new(runtime_config(), fleet(2)).build().unwrap();
        let feed = StaticFeed::new(vec![target("t", 5, p(1.0, 1.0))]);
        let provider = DelayedProvider { delay: Duration::from_millis(50), ..Default::default() };
        let calls = Arc::clone(&provider.calls);

        let handle = spawn(sim, provider, feed, Recorder::default());
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 0, "warm-up not over");

        tokio::time::sleep(Duration::from_millis(1_000)).await;
        let (sim, rec) = handle.shutdown().await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(sim.dispatch_count(), 1);
        assert_eq!(rec.dispatches.len(), 1);
        assert_eq!(rec.dispatches[0].vehicle_id.as_str(), "v0");
        assert!(rec.dispatches[0].tick >= Tick(10));
        assert_eq!(sim.board().successful_polls(), 1);
        assert!(!sim.fleet().get(&"v0".into()).unwrap().is_idle());
        assert!(sim.fleet().get(&"v1".into()).unwrap().is_idle());
        assert!(rec.stopped.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn full_mission_under_the_runtime() {
        let sim = SimBuilder::new(runtime_config(), fleet(1)).build().unwrap();
        let feed = StaticFeed::new(vec![target("t", 5, p(0.0, 0.5))]);
        let provider = DelayedProvider { delay: Duration::from_millis(20), ..Default::default() };
        let calls = Arc::clone(&provider.calls);

        let handle = spawn(sim, provider, feed, Recorder::default());
        // 1 s warm-up, ~1 s out, 0.5 s dwell, ~1 s back.
        tokio::time::sleep(Duration::from_secs(6)).await;
        let (sim, rec) = handle.shutdown().await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2, "one route out, one home");
        assert_eq!(rec.count(VehicleState::Returning, VehicleState::Idle), 1);
        let v = sim.fleet().get(&"v0".into()).unwrap();
        assert!(v.is_idle());
        assert!(v.assigned_target().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_discards_in_flight_fetch() {
        let config = SimConfig { dispatch_warmup_secs: 0.0, ..runtime_config() };
        let sim = SimBuilder::new(config, fleet(1))
            .targets(vec![target("t", 5, p(1.0, 1.0))])
            .build()
            .unwrap();
        let provider = DelayedProvider { delay: Duration::from_secs(60), ..Default::default() };
        let calls = Arc::clone(&provider.calls);

        let handle = spawn(sim, provider, StaticFeed::default(), Recorder::default());
        tokio::time::sleep(Duration::from_secs(2)).await;
        let (sim, rec) = handle.shutdown().await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(sim.dispatch_count(), 0);
        assert!(rec.dispatches.is_empty());
        assert!(sim.fleet().get(&"v0".into()).unwrap().is_idle());
        assert!(!sim.is_reserved(&"v0".into()));
    }

    /// Answers the first fetch at once and never answers later ones.
    #[derive(Clone, Default)]
    struct FirstCallOnly {
        calls: Arc<AtomicUsize>,
    }

    impl RouteProvider for FirstCallOnly {
        async fn fetch_route(&self, start: Position, end: Position) -> Route {
            if self.calls.fetch_add(1, Ordering::SeqCst) > 0 {
                std::future::pending::<()>().await;
            }
            Route::straight(start, end)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_rearms_pending_return() {
        let sim = SimBuilder::new(runtime_config(), fleet(1)).build().unwrap();
        let feed = StaticFeed::new(vec![target("t", 5, p(0.0, 0.5))]);
        let provider = FirstCallOnly::default();
        let calls = Arc::clone(&provider.calls);

        let handle = spawn(sim, provider, feed, Recorder::default());
        tokio::time::sleep(Duration::from_secs(5)).await;
        let (mut sim, mut rec) = handle.shutdown().await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2, "route out, then the lost route home");
        assert_eq!(sim.fleet().get(&"v0".into()).unwrap().state(), VehicleState::OnScene);

        // A synchronous driver can finish the mission.
        let mut ticks = 0;
        while !sim.fleet().get(&"v0".into()).unwrap().is_idle() {
            let report = sim.advance(1, &mut rec);
            sim.complete_returns(report.return_requests, &rd_path::StraightLineProvider, &mut rec).await;
            ticks += 1;
            assert!(ticks < 100, "vehicle stuck {}", sim.fleet().get(&"v0".into()).unwrap().state());
        }
        assert!(sim.fleet().get(&"v0".into()).unwrap().assigned_target().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_token_stops_the_loop() {
        let sim = SimBuilder::new(runtime_config(), fleet(1)).build().unwrap();
        let handle = spawn(sim, DelayedProvider::default(), StaticFeed::default(), Recorder::default());
        let mut frames = handle.subscribe();
        frames.recv().await.unwrap();

        handle.cancel_token().cancel();
        tokio::time::sleep(Duration::from_millis(500)).await;
        while frames.try_recv().is_ok() {}

        // No frames once the loop has exited.
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(matches!(frames.try_recv(), Err(TryRecvError::Empty)));

        let (_, rec) = handle.shutdown().await.unwrap();
        assert!(rec.stopped.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn publishes_position_frames() {
        let sim = SimBuilder::new(runtime_config(), fleet(3)).build().unwrap();
        let handle = spawn(sim, DelayedProvider::default(), StaticFeed::default(), Recorder::default());
        let mut frames = handle.subscribe();

        let frame = frames.recv().await.unwrap();
        let ids: Vec<&str> = frame.positions.iter().map(|u| u.vehicle_id.as_str()).collect();
        assert_eq!(ids, ["v0", "v1", "v2"]);

        let next = frames.recv().await.unwrap();
        assert_eq!(next.tick, frame.tick + 1);

        let (_, rec) = handle.shutdown().await.unwrap();
        assert!(rec.positions.len() >= 2);
    }
}
