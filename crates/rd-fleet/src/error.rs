use rd_core::VehicleId;
use rd_path::RouteError;
use thiserror::Error;

/// Errors raised while building a fleet.
///
/// Runtime transitions never fail; an illegal transition request is a
/// silent no-op reported through the method's `bool` result.
#[derive(Debug, Error)]
pub enum FleetError {
    #[error("vehicle {0} registered twice")]
    DuplicateVehicle(VehicleId),

    #[error("vehicle {vehicle}: speed {speed} must be finite and positive")]
    InvalidSpeed { vehicle: VehicleId, speed: f64 },

    #[error("vehicle {0}: home base is not a finite coordinate")]
    InvalidHome(VehicleId),

    #[error("vehicle {vehicle}: invalid patrol route: {source}")]
    InvalidPatrol {
        vehicle: VehicleId,
        #[source]
        source:  RouteError,
    },
}

pub type FleetResult<T> = Result<T, FleetError>;
