//! HTTP directions client (OpenRouteService-compatible).
//!
//! # Request
//!
//! ```text
//! GET {base_url}/v2/directions/{profile}?api_key=KEY&start=LNG,LAT&end=LNG,LAT
//! ```
//!
//! # Response
//!
//! A GeoJSON `FeatureCollection`; the polyline is
//! `features[0].geometry.coordinates`, a list of `[lng, lat]` pairs (extra
//! elements such as elevation are ignored).
//!
//! Any transport error, non-2xx status, undecodable body, or empty
//! coordinate list is logged and answered with the straight line.

use std::time::Duration;

use rd_core::Position;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{Route, RouteError, RouteProvider, RouteResult};

/// Connection settings for [`DirectionsClient`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DirectionsConfig {
    /// Service root, without the `/v2/...` path.
    pub base_url:   String,
    /// Routing profile, e.g. `driving-car`.
    pub profile:    String,
    /// API key sent as the `api_key` query parameter when present.
    pub api_key:    Option<String>,
    /// Per-request timeout.
    pub timeout_ms: u64,
}

impl Default for DirectionsConfig {
    fn default() -> Self {
        Self {
            base_url:   "https://api.openrouteservice.org".to_owned(),
            profile:    "driving-car".to_owned(),
            api_key:    None,
            timeout_ms: 10_000,
        }
    }
}

impl DirectionsConfig {
    fn endpoint(&self) -> String {
        format!(
            "{}/v2/directions/{}",
            self.base_url.trim_end_matches('/'),
            self.profile
        )
    }
}

/// [`RouteProvider`] backed by an external directions service.
#[derive(Debug, Clone)]
pub struct DirectionsClient {
    http:     reqwest::Client,
    endpoint: String,
    api_key:  Option<String>,
}

impl DirectionsClient {
    /// Build a client from `config`.
    ///
    /// # Errors
    ///
    /// [`RouteError::Http`] if the underlying HTTP client cannot be created
    /// (TLS backend initialisation).
    pub fn new(config: &DirectionsConfig) -> RouteResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self {
            http,
            endpoint: config.endpoint(),
            api_key:  config.api_key.clone(),
        })
    }

    /// One request, no fallback.
    async fn request(&self, start: Position, end: Position) -> RouteResult<Route> {
        let mut query = vec![
            ("start", format!("{},{}", start.lng, start.lat)),
            ("end", format!("{},{}", end.lng, end.lat)),
        ];
        if let Some(key) = &self.api_key {
            query.push(("api_key", key.clone()));
        }

        let response = self
            .http
            .get(&self.endpoint)
            .header(reqwest::header::ACCEPT, "application/json, application/geo+json")
            .query(&query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RouteError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        parse_directions(&body)
    }
}

impl RouteProvider for DirectionsClient {
    async fn fetch_route(&self, start: Position, end: Position) -> Route {
        match self.request(start, end).await {
            Ok(route) => {
                debug!(points = route.len(), "directions route resolved");
                route
            }
            Err(err) => {
                warn!(%start, %end, error = %err, "directions unavailable; using straight line");
                Route::straight(start, end)
            }
        }
    }
}

// ── Payload decoding ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    geometry: Geometry,
}

#[derive(Deserialize)]
struct Geometry {
    #[serde(default)]
    coordinates: Vec<Vec<f64>>,
}

/// Decode a directions response body into a route.
///
/// # Errors
///
/// [`RouteError::Decode`] for invalid JSON or shape, [`RouteError::NoRoute`]
/// for an empty feature list, empty coordinates, or a coordinate with fewer
/// than two components, [`RouteError::NonFinite`] for NaN/inf coordinates.
pub fn parse_directions(body: &[u8]) -> RouteResult<Route> {
    let collection: FeatureCollection = serde_json::from_slice(body)?;
    let feature = collection.features.into_iter().next().ok_or(RouteError::NoRoute)?;

    let points = feature
        .geometry
        .coordinates
        .into_iter()
        .map(|pair| match pair.as_slice() {
            [lng, lat, ..] => Ok(Position::new(*lng, *lat)),
            _ => Err(RouteError::NoRoute),
        })
        .collect::<RouteResult<Vec<_>>>()?;

    if points.is_empty() {
        return Err(RouteError::NoRoute);
    }
    Route::new(points)
}
