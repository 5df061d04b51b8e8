//! Vehicle kind, informational only: dispatch logic never branches on it.

/// The type of response unit.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum VehicleKind {
    Firetruck,
    #[default]
    Ambulance,
    Police,
    Rescue,
}

impl VehicleKind {
    /// Human-readable label, useful for CSV column values.
    pub fn as_str(self) -> &'static str {
        match self {
            VehicleKind::Firetruck => "firetruck",
            VehicleKind::Ambulance => "ambulance",
            VehicleKind::Police    => "police",
            VehicleKind::Rescue    => "rescue",
        }
    }
}

impl std::fmt::Display for VehicleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
