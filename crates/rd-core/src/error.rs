//! Core error type.
//!
//! Sub-crates define their own error enums and convert `CoreError` into them
//! where it can surface (configuration validation).

use thiserror::Error;

/// The top-level error type for `rd-core`.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid identifier: {0:?}")]
    InvalidId(String),
}

/// Shorthand result type for `rd-core`.
pub type CoreResult<T> = Result<T, CoreError>;
