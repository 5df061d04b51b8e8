use thiserror::Error;

/// Errors raised while polling or decoding a target feed.
///
/// All of them are transient from the simulation's point of view: the
/// [`TargetBoard`](crate::TargetBoard) keeps its previous targets.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("severity {0} outside 1..=5")]
    InvalidSeverity(i64),

    #[error("invalid target record: {0}")]
    InvalidRecord(String),

    #[error("feed request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("feed answered with status {0}")]
    Status(u16),

    #[error("malformed feed payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type FeedResult<T> = Result<T, FeedError>;
