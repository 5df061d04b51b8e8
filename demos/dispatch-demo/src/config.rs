//! JSON run configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use rd_core::{Position, SimConfig};
use rd_fleet::VehicleSpec;
use rd_path::DirectionsConfig;
use rd_targets::{Severity, Target};
use serde::Deserialize;

/// Environment variable that overrides `directions.api_key`.
pub const API_KEY_ENV: &str = "ORS_API_KEY";

/// Used when no config path is given on the command line.
const DEFAULT_CONFIG: &str = include_str!("../config.json");

#[derive(Debug, Deserialize)]
pub struct DemoConfig {
    /// Wall-clock seconds to run before shutting down.
    #[serde(default = "default_run_secs")]
    pub run_secs:   u64,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub sim:        SimConfig,
    #[serde(default)]
    pub directions: DirectionsConfig,
    pub feed:       FeedConfig,
    pub fleet:      FleetConfig,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeedConfig {
    /// Fixed targets listed inline.
    Static { targets: Vec<TargetSpec> },
    /// `id,lng,lat,severity,is_active` file, re-read every poll.
    Csv { path: PathBuf },
    /// Danger-zone listing endpoint.
    Http {
        url: String,
        #[serde(default = "default_feed_timeout_ms")]
        timeout_ms: u64,
    },
}

#[derive(Debug, Deserialize)]
pub struct TargetSpec {
    pub id:        String,
    pub lng:       f64,
    pub lat:       f64,
    pub severity:  i64,
    #[serde(default = "yes")]
    pub is_active: bool,
}

#[derive(Debug, Deserialize)]
pub struct FleetConfig {
    #[serde(default = "default_patrol_radius")]
    pub patrol_radius: f64,
    pub vehicles:      Vec<VehicleSpec>,
}

fn default_run_secs() -> u64 { 120 }
fn default_output_dir() -> PathBuf { PathBuf::from("output/dispatch-demo") }
fn default_feed_timeout_ms() -> u64 { 5_000 }
fn default_patrol_radius() -> f64 { rd_fleet::builder::DEFAULT_PATROL_RADIUS }
fn yes() -> bool { true }

impl DemoConfig {
    /// Read `path`, or the bundled config when `None`, then apply the
    /// environment override for the API key.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config: DemoConfig = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
            }
            None => serde_json::from_str(DEFAULT_CONFIG).context("parsing bundled config")?,
        };
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                config.directions.api_key = Some(key);
            }
        }
        Ok(config)
    }

    pub fn run_duration(&self) -> Duration {
        Duration::from_secs(self.run_secs)
    }
}

impl TargetSpec {
    pub fn to_target(&self) -> Result<Target> {
        let severity = Severity::new(self.severity).with_context(|| format!("target {}", self.id))?;
        Ok(Target::new(
            self.id.as_str(),
            Position::new(self.lng, self.lat),
            severity,
            self.is_active,
        ))
    }
}
