use rd_core::CoreError;
use rd_fleet::FleetError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(#[from] CoreError),

    #[error("fleet error: {0}")]
    Fleet(#[from] FleetError),

    #[error("simulation task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type SimResult<T> = Result<T, SimError>;
