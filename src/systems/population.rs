use anyhow::Result;

use crate::{
    engine::{System, TickContext},
    rng::SystemRng,
    world::SimulationState,
};

/// Applies population growth against housing capacity.
///
/// Capacity is `residential_count * residential_capacity`. A city with no
/// housing at all bleeds residents at a fixed emigration rate instead of
/// dropping to zero instantly.
pub struct PopulationSystem;

impl PopulationSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PopulationSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for PopulationSystem {
    fn name(&self) -> &'static str {
        "population"
    }

    fn run(
        &mut self,
        ctx: &TickContext<'_>,
        state: &mut SimulationState,
        _rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let residential = state.grid.residential_count() as u64;
        let stats = &mut state.stats;

        if residential == 0 {
            if stats.population > 0 {
                stats.population = stats
                    .population
                    .saturating_sub(ctx.tuning.emigration_per_tick);
            }
            return Ok(());
        }

        let capacity = residential * ctx.tuning.residential_capacity;
        let grown = (stats.population as i64 + state.ledger.population_growth).max(0) as u64;
        stats.population = grown.min(capacity);
        Ok(())
    }
}
