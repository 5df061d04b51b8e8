//! Fluent builder for constructing a [`Simulation`].

use std::collections::HashMap;

use rd_core::SimConfig;
use rd_fleet::VehicleRegistry;
use rd_targets::{Target, TargetBoard};

use crate::{SimResult, Simulation};

/// Fluent builder for [`Simulation`].
///
/// # Required inputs
///
/// - [`SimConfig`]: tick period, dwell, dispatch cadence, …
/// - [`VehicleRegistry`]: from [`rd_fleet::FleetBuilder`]
///
/// # Optional inputs (have defaults)
///
/// | Method         | Default                              |
/// |----------------|--------------------------------------|
/// | `.targets(v)`  | Empty board, filled by the first poll |
///
/// # Example
///
/// ```rust,ignore
/// let fleet = FleetBuilder::new(config.seed).vehicles(specs).build()?;
/// let mut sim = SimBuilder::new(config, fleet).targets(initial).build()?;
/// sim.advance(1, &mut NoopObserver);
/// ```
pub struct SimBuilder {
    config:  SimConfig,
    fleet:   VehicleRegistry,
    targets: Option<Vec<Target>>,
}

impl SimBuilder {
    pub fn new(config: SimConfig, fleet: VehicleRegistry) -> Self {
        Self { config, fleet, targets: None }
    }

    /// Seed the target board before the first feed poll.
    pub fn targets(mut self, targets: Vec<Target>) -> Self {
        self.targets = Some(targets);
        self
    }

    /// Validate the configuration and return a ready-to-run [`Simulation`]
    /// at tick 0.
    pub fn build(self) -> SimResult<Simulation> {
        self.config.validate()?;

        let board = match self.targets {
            Some(t) => TargetBoard::with_targets(t),
            None    => TargetBoard::new(),
        };

        Ok(Simulation {
            clock:       self.config.make_clock(),
            dwell_ticks: self.config.dwell_ticks(),
            config:      self.config,
            fleet:       self.fleet,
            board,
            reserved:    HashMap::new(),
            dispatches:  0,
        })
    }
}
