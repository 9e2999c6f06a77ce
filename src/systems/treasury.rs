use anyhow::Result;

use crate::{
    engine::{System, TickContext},
    rng::SystemRng,
    world::SimulationState,
};

const HAPPINESS_BASELINE: f64 = 50.0;
const HAPPINESS_LAND_VALUE_WEIGHT: f64 = 30.0;
const OVERCROWDING_PENALTY: f64 = 15.0;

/// Applies the tick ledger to the treasury, advances the calendar, and
/// refreshes the happiness index.
pub struct TreasurySystem;

impl TreasurySystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TreasurySystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for TreasurySystem {
    fn name(&self) -> &'static str {
        "treasury"
    }

    fn run(
        &mut self,
        ctx: &TickContext<'_>,
        state: &mut SimulationState,
        _rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let residential = state.grid.residential_count() as u64;
        let capacity = residential * ctx.tuning.residential_capacity;
        let stats = &mut state.stats;

        stats.money += state.ledger.income;
        stats.day += 1;

        let crowded = capacity > 0 && stats.population >= capacity;
        let mut happiness =
            HAPPINESS_BASELINE + ctx.land_value.average() * HAPPINESS_LAND_VALUE_WEIGHT;
        if crowded {
            happiness -= OVERCROWDING_PENALTY;
        }
        stats.happiness = (happiness.round() as i32).clamp(0, 100);
        Ok(())
    }
}
