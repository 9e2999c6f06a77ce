//! Economic tick engine.
//!
//! One tick runs a fixed pipeline of systems over the simulation state:
//! yield aggregation, probabilistic upgrades, population flow, treasury and
//! day bookkeeping, goal re-evaluation. The land-value field is computed
//! once per tick and shared read-only by every system. The engine owns no
//! timer: the host invokes `tick` at whatever cadence it chooses.

use std::time::Instant;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::Catalog;
use crate::land_value::LandValueField;
use crate::rng::{RngManager, SystemRng};
use crate::systems::{
    GoalSystem, PopulationSystem, TreasurySystem, UpgradeSystem, YieldSystem,
};
use crate::world::{SimulationState, TickLedger};

fn default_upgrade_probability() -> f64 {
    0.05
}

fn default_upgrade_land_value_threshold() -> f64 {
    0.8
}

fn default_upgrade_income_bonus() -> i64 {
    50
}

fn default_residential_capacity() -> u64 {
    50
}

fn default_emigration_per_tick() -> u64 {
    5
}

fn default_max_level() -> u32 {
    5
}

fn default_demolition_refund_fraction() -> f64 {
    0.5
}

/// Tunable simulation constants. These are configuration, not law: scenario
/// files may override any of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    #[serde(default = "default_upgrade_probability")]
    pub upgrade_probability: f64,
    #[serde(default = "default_upgrade_land_value_threshold")]
    pub upgrade_land_value_threshold: f64,
    #[serde(default = "default_upgrade_income_bonus")]
    pub upgrade_income_bonus: i64,
    #[serde(default = "default_residential_capacity")]
    pub residential_capacity: u64,
    #[serde(default = "default_emigration_per_tick")]
    pub emigration_per_tick: u64,
    #[serde(default = "default_max_level")]
    pub max_level: u32,
    #[serde(default = "default_demolition_refund_fraction")]
    pub demolition_refund_fraction: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            upgrade_probability: default_upgrade_probability(),
            upgrade_land_value_threshold: default_upgrade_land_value_threshold(),
            upgrade_income_bonus: default_upgrade_income_bonus(),
            residential_capacity: default_residential_capacity(),
            emigration_per_tick: default_emigration_per_tick(),
            max_level: default_max_level(),
            demolition_refund_fraction: default_demolition_refund_fraction(),
        }
    }
}

/// Read-only context shared by every system within one tick.
pub struct TickContext<'a> {
    pub day: u64,
    pub tuning: &'a Tuning,
    pub catalog: &'a Catalog,
    pub land_value: &'a LandValueField,
}

pub trait System {
    fn name(&self) -> &'static str;
    fn run(
        &mut self,
        ctx: &TickContext<'_>,
        state: &mut SimulationState,
        rng: &mut SystemRng<'_>,
    ) -> Result<()>;
}

#[derive(Clone, Debug)]
pub struct SystemRunReport {
    pub name: &'static str,
    pub duration_ms: f64,
}

#[derive(Clone, Debug)]
pub struct TickSummary {
    pub day: u64,
    pub income: i64,
    pub population: u64,
    pub reports: Vec<SystemRunReport>,
}

pub struct EngineBuilder {
    tuning: Tuning,
    systems: Vec<Box<dyn System>>,
}

impl EngineBuilder {
    pub fn new(tuning: Tuning) -> Self {
        Self {
            tuning,
            systems: Vec::new(),
        }
    }

    pub fn with_system(mut self, system: impl System + 'static) -> Self {
        self.systems.push(Box::new(system));
        self
    }

    pub fn build(self) -> Engine {
        Engine {
            tuning: self.tuning,
            systems: self.systems,
        }
    }
}

pub struct Engine {
    tuning: Tuning,
    systems: Vec<Box<dyn System>>,
}

impl Engine {
    /// The full tick pipeline in contract order.
    pub fn standard(tuning: Tuning) -> Self {
        EngineBuilder::new(tuning)
            .with_system(YieldSystem::new())
            .with_system(UpgradeSystem::new())
            .with_system(PopulationSystem::new())
            .with_system(TreasurySystem::new())
            .with_system(GoalSystem::new())
            .build()
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn tick(
        &mut self,
        state: &mut SimulationState,
        catalog: &Catalog,
        rng: &mut RngManager,
    ) -> Result<TickSummary> {
        state.ledger = TickLedger::default();
        let land_value = LandValueField::compute(&state.grid, catalog.amenity_radius());
        let ctx = TickContext {
            day: state.stats.day,
            tuning: &self.tuning,
            catalog,
            land_value: &land_value,
        };

        let mut reports = Vec::with_capacity(self.systems.len());
        for system in self.systems.iter_mut() {
            let start = Instant::now();
            let mut stream = rng.stream(system.name());
            system.run(&ctx, state, &mut stream)?;
            let duration_ms = start.elapsed().as_secs_f64() * 1_000.0;
            debug!(system = system.name(), duration_ms, "system ran");
            reports.push(SystemRunReport {
                name: system.name(),
                duration_ms,
            });
        }

        Ok(TickSummary {
            day: state.stats.day,
            income: state.ledger.income,
            population: state.stats.population,
            reports,
        })
    }
}
