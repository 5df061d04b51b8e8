//! dispatch-demo — runs the rapid_dispatch engine against a configured
//! fleet and target feed in real time.
//!
//! Usage: `dispatch-demo [config.json]`.  Without an argument the bundled
//! `config.json` (five London units, four danger zones) is used.  Routes
//! come from the directions service when an API key is configured (or set
//! in `ORS_API_KEY`), otherwise vehicles drive straight lines.
//!
//! Logging honours `RUST_LOG` (default `info`).

mod config;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use rd_core::Position;
use rd_fleet::FleetBuilder;
use rd_output::{CsvWriter, SimOutputObserver};
use rd_path::{DirectionsClient, Route, RouteProvider, StraightLineProvider};
use rd_sim::{SimBuilder, runtime};
use rd_targets::{CsvTargetFeed, FeedResult, HttpTargetFeed, StaticFeed, Target, TargetFeed};

use config::{DemoConfig, FeedConfig};

// ── Provider / feed selection ─────────────────────────────────────────────────

/// Directions service when configured, straight lines otherwise.
enum Provider {
    Directions(DirectionsClient),
    Straight(StraightLineProvider),
}

impl RouteProvider for Provider {
    async fn fetch_route(&self, start: Position, end: Position) -> Route {
        match self {
            Provider::Directions(client) => client.fetch_route(start, end).await,
            Provider::Straight(straight) => straight.fetch_route(start, end).await,
        }
    }
}

enum Feed {
    Static(StaticFeed),
    Csv(CsvTargetFeed),
    Http(HttpTargetFeed),
}

impl TargetFeed for Feed {
    async fn poll(&self) -> FeedResult<Vec<Target>> {
        match self {
            Feed::Static(feed) => feed.poll().await,
            Feed::Csv(feed)    => feed.poll().await,
            Feed::Http(feed)   => feed.poll().await,
        }
    }
}

fn build_feed(config: &FeedConfig) -> Result<Feed> {
    Ok(match config {
        FeedConfig::Static { targets } => {
            let targets = targets.iter().map(|t| t.to_target()).collect::<Result<Vec<_>>>()?;
            Feed::Static(StaticFeed::new(targets))
        }
        FeedConfig::Csv { path } => Feed::Csv(CsvTargetFeed::new(path)),
        FeedConfig::Http { url, timeout_ms } => {
            let timeout = std::time::Duration::from_millis(*timeout_ms);
            Feed::Http(HttpTargetFeed::new(url.as_str(), timeout)?)
        }
    })
}

// ── main ──────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // 1. Load configuration.
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = DemoConfig::load(config_path.as_deref())?;

    println!("=== dispatch-demo — rapid_dispatch ===");
    println!(
        "Vehicles: {}  |  Run: {} s  |  Seed: {}",
        config.fleet.vehicles.len(),
        config.run_secs,
        config.sim.seed
    );
    println!();

    // 2. Seed the fleet.
    let fleet = FleetBuilder::new(config.sim.seed)
        .patrol_radius(config.fleet.patrol_radius)
        .vehicles(config.fleet.vehicles.iter().cloned())
        .build()
        .context("building fleet")?;

    // 3. Route provider and target feed.
    let provider = if config.directions.api_key.is_some() {
        info!(base_url = %config.directions.base_url, profile = %config.directions.profile, "using directions service");
        Provider::Directions(DirectionsClient::new(&config.directions)?)
    } else {
        info!("no directions API key; vehicles will drive straight lines");
        Provider::Straight(StraightLineProvider)
    };
    let feed = build_feed(&config.feed)?;

    // 4. Build the simulation.
    let sim = SimBuilder::new(config.sim.clone(), fleet).build()?;

    // 5. Set up output.
    std::fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("creating {}", config.output_dir.display()))?;
    let observer = SimOutputObserver::new(CsvWriter::new(&config.output_dir)?);

    // 6. Run until the configured duration elapses or Ctrl-C.
    let t0 = Instant::now();
    let handle = runtime::spawn(sim, provider, feed, observer);

    let mut frames = handle.subscribe();
    let frame_counter = tokio::spawn(async move {
        let mut seen = 0u64;
        loop {
            match frames.recv().await {
                Ok(_) => seen += 1,
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
        seen
    });

    // Ctrl-C cancels the simulation directly; the timeout goes through shutdown.
    let cancel = handle.cancel_token();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("interrupted");
                interrupt.cancel();
            }
            Err(e) => warn!(error = %e, "cannot listen for Ctrl-C"),
        }
    });

    tokio::select! {
        _ = tokio::time::sleep(config.run_duration()) => {}
        _ = cancel.cancelled() => {}
    }

    // 7. Shut down and collect.
    let (sim, mut observer) = handle.shutdown().await?;
    let elapsed = t0.elapsed();
    let frames_seen = frame_counter.await.unwrap_or(0);

    if let Some(e) = observer.take_error() {
        eprintln!("output error: {e}");
    }

    // 8. Summary.
    println!();
    println!("Simulation stopped after {:.1} s at {}", elapsed.as_secs_f64(), sim.clock());
    println!("  dispatches          : {}", sim.dispatch_count());
    println!("  position frames     : {frames_seen}");
    println!("  dispatch_log.csv    : {} rows", observer.dispatches_written());
    println!("  positions.csv       : {} rows", observer.position_rows_written());
    println!("  targets on board    : {}", sim.board().targets().len());
    println!();

    // 9. Final fleet table.
    println!("{:<10} {:<10} {:<11} {:<14} {:<24}", "Vehicle", "Kind", "State", "Target", "Position");
    println!("{}", "-".repeat(72));
    for v in sim.fleet() {
        println!(
            "{:<10} {:<10} {:<11} {:<14} {:<24}",
            v.id().as_str(),
            v.kind().as_str(),
            v.state().as_str(),
            v.assigned_target().map_or("-", |t| t.as_str()),
            v.position().to_string(),
        );
    }

    Ok(())
}
