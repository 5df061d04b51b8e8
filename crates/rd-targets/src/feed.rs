//! Target feeds.
//!
//! A [`TargetFeed`] is polled on a fixed period by the runtime; each poll
//! returns the full current target list.  Failures are reported, not
//! hidden; [`TargetBoard`](crate::TargetBoard) decides to keep stale data.

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use rd_core::{Position, TargetId};
use serde::Deserialize;
use tracing::warn;

use crate::{FeedError, FeedResult, Severity, Target, load_targets_reader};

/// A source of dispatch targets.
pub trait TargetFeed: Send + Sync + 'static {
    /// Fetch the current target list, in priority tie-break order.
    fn poll(&self) -> impl Future<Output = FeedResult<Vec<Target>>> + Send;
}

// ── StaticFeed ────────────────────────────────────────────────────────────────

/// Always returns the same list.
#[derive(Debug, Clone, Default)]
pub struct StaticFeed {
    targets: Vec<Target>,
}

impl StaticFeed {
    pub fn new(targets: Vec<Target>) -> Self {
        Self { targets }
    }
}

impl TargetFeed for StaticFeed {
    async fn poll(&self) -> FeedResult<Vec<Target>> {
        Ok(self.targets.clone())
    }
}

// ── CsvTargetFeed ─────────────────────────────────────────────────────────────

/// Re-reads a CSV file on every poll, so edits show up on the next cycle.
///
/// The file is read through `tokio::fs`, off the runtime's worker threads.
#[derive(Debug, Clone)]
pub struct CsvTargetFeed {
    path: PathBuf,
}

impl CsvTargetFeed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TargetFeed for CsvTargetFeed {
    async fn poll(&self) -> FeedResult<Vec<Target>> {
        let bytes = tokio::fs::read(&self.path).await?;
        load_targets_reader(bytes.as_slice())
    }
}

// ── HttpTargetFeed ────────────────────────────────────────────────────────────

/// Polls a danger-zone listing over HTTP.
///
/// The endpoint returns either a bare JSON array of zone records or an
/// object with a `danger_zones` array:
///
/// ```json
/// [{"zone_id": "z1", "severity": 4, "lat": 51.50, "lon": -0.12,
///   "is_active": true, "category": "natural", "disaster_type": "flood"}]
/// ```
#[derive(Debug, Clone)]
pub struct HttpTargetFeed {
    http: reqwest::Client,
    url:  String,
}

impl HttpTargetFeed {
    /// # Errors
    ///
    /// [`FeedError::Http`] if the HTTP client cannot be created.
    pub fn new(url: impl Into<String>, timeout: Duration) -> FeedResult<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, url: url.into() })
    }
}

impl TargetFeed for HttpTargetFeed {
    async fn poll(&self) -> FeedResult<Vec<Target>> {
        let response = self
            .http
            .get(&self.url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        parse_zone_listing(&body)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ZoneListing {
    Bare(Vec<ZoneRecord>),
    Wrapped { danger_zones: Vec<ZoneRecord> },
}

#[derive(Deserialize)]
struct ZoneRecord {
    zone_id:       String,
    severity:      i64,
    lat:           f64,
    lon:           f64,
    #[serde(default = "default_active")]
    is_active:     bool,
    #[serde(default)]
    category:      Option<String>,
    #[serde(default)]
    disaster_type: Option<String>,
    #[serde(default)]
    description:   Option<String>,
}

fn default_active() -> bool {
    true
}

impl ZoneRecord {
    fn into_target(self) -> FeedResult<Target> {
        let id = TargetId::parse(self.zone_id)
            .map_err(|e| FeedError::InvalidRecord(e.to_string()))?;
        let position = Position::new(self.lon, self.lat);
        if !position.is_finite() {
            return Err(FeedError::InvalidRecord(format!("zone {id}: non-finite position")));
        }
        let label = match (self.disaster_type, self.description) {
            (_, Some(d)) if !d.is_empty() => Some(d),
            (Some(t), _) if !t.is_empty() => Some(t),
            _ => None,
        };
        Ok(Target {
            id,
            position,
            severity: Severity::new(self.severity)?,
            is_active: self.is_active,
            category: self.category,
            label,
        })
    }
}

/// Decode a danger-zone listing, preserving its order.
///
/// Records with invalid ids, positions, or severities are dropped with a
/// warning; a payload that is not a listing at all is an error.
pub fn parse_zone_listing(body: &[u8]) -> FeedResult<Vec<Target>> {
    let records = match serde_json::from_slice::<ZoneListing>(body)? {
        ZoneListing::Bare(records) => records,
        ZoneListing::Wrapped { danger_zones } => danger_zones,
    };

    let mut targets = Vec::with_capacity(records.len());
    for record in records {
        match record.into_target() {
            Ok(target) => targets.push(target),
            Err(err) => warn!(error = %err, "skipping danger zone record"),
        }
    }
    Ok(targets)
}
