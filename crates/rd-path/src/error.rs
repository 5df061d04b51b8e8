//! Route error type.

use thiserror::Error;

/// Errors produced by `rd-path`.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("a route needs at least one point")]
    Empty,

    #[error("route point {index} is not a finite coordinate")]
    NonFinite { index: usize },

    #[error("directions request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("directions service answered with status {0}")]
    Status(u16),

    #[error("malformed directions payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("directions service returned no route")]
    NoRoute,
}

pub type RouteResult<T> = Result<T, RouteError>;
