//! `VehicleRegistry` — the fleet in registration order.

use std::collections::HashMap;

use rd_core::VehicleId;

use crate::{FleetError, FleetResult, Vehicle};

/// Every vehicle in the simulation, iterated in the order registered.
///
/// Registration order is observable: dispatch picks the *first* idle vehicle
/// and position updates are emitted in this order, so it must be stable.
/// The id index is a lookup aid only.
#[derive(Debug, Default, Clone)]
pub struct VehicleRegistry {
    vehicles: Vec<Vehicle>,
    index:    HashMap<VehicleId, usize>,
}

impl VehicleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `vehicle`.
    ///
    /// # Errors
    ///
    /// [`FleetError::DuplicateVehicle`] if the id is already registered.
    pub fn insert(&mut self, vehicle: Vehicle) -> FleetResult<()> {
        if self.index.contains_key(vehicle.id()) {
            return Err(FleetError::DuplicateVehicle(vehicle.id().clone()));
        }
        self.index.insert(vehicle.id().clone(), self.vehicles.len());
        self.vehicles.push(vehicle);
        Ok(())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    pub fn get(&self, id: &VehicleId) -> Option<&Vehicle> {
        self.index.get(id).map(|&i| &self.vehicles[i])
    }

    pub fn get_mut(&mut self, id: &VehicleId) -> Option<&mut Vehicle> {
        self.index.get(id).map(|&i| &mut self.vehicles[i])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Vehicle> {
        self.vehicles.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Vehicle> {
        self.vehicles.iter_mut()
    }

    /// The first idle vehicle in registration order.
    pub fn first_idle(&self) -> Option<&Vehicle> {
        self.first_idle_where(|_| true)
    }

    /// The first idle vehicle in registration order accepted by `eligible`.
    pub fn first_idle_where<F>(&self, mut eligible: F) -> Option<&Vehicle>
    where
        F: FnMut(&Vehicle) -> bool,
    {
        self.vehicles.iter().find(|v| v.is_idle() && eligible(v))
    }

    /// Number of vehicles currently idle.
    pub fn idle_count(&self) -> usize {
        self.vehicles.iter().filter(|v| v.is_idle()).count()
    }
}

impl<'a> IntoIterator for &'a VehicleRegistry {
    type Item = &'a Vehicle;
    type IntoIter = std::slice::Iter<'a, Vehicle>;

    fn into_iter(self) -> Self::IntoIter {
        self.vehicles.iter()
    }
}
