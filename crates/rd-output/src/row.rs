//! Plain data row types written by output backends.

use rd_fleet::Vehicle;
use rd_sim::DispatchRecord;

/// One committed dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchLogRow {
    pub vehicle_id:   String,
    pub target_id:    String,
    pub timestamp_ms: i64,
    pub tick:         u64,
}

impl From<&DispatchRecord> for DispatchLogRow {
    fn from(record: &DispatchRecord) -> Self {
        Self {
            vehicle_id:   record.vehicle_id.as_str().to_owned(),
            target_id:    record.target_id.as_str().to_owned(),
            timestamp_ms: record.timestamp_ms,
            tick:         record.tick.0,
        }
    }
}

/// A snapshot of one vehicle at a given tick.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionRow {
    pub tick:        u64,
    pub vehicle_id:  String,
    pub lng:         f64,
    pub lat:         f64,
    pub heading_rad: f64,
    /// Lifecycle state label (`idle`, `responding`, `on_scene`, `returning`).
    pub state:       &'static str,
}

impl PositionRow {
    pub fn of(tick: u64, vehicle: &Vehicle) -> Self {
        let position = vehicle.position();
        Self {
            tick,
            vehicle_id:  vehicle.id().as_str().to_owned(),
            lng:         position.lng,
            lat:         position.lat,
            heading_rad: vehicle.heading(),
            state:       vehicle.state().as_str(),
        }
    }
}
