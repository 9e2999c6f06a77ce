use anyhow::Result;

use crate::{
    engine::{System, TickContext},
    rng::SystemRng,
    world::SimulationState,
};

/// Sums catalog income and population yields over every occupied tile into
/// the tick ledger. Runs first so later systems can add windfalls on top.
pub struct YieldSystem;

impl YieldSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for YieldSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for YieldSystem {
    fn name(&self) -> &'static str {
        "yields"
    }

    fn run(
        &mut self,
        ctx: &TickContext<'_>,
        state: &mut SimulationState,
        _rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let mut income = 0_i64;
        let mut growth = 0_i64;
        for tile in state.grid.tiles() {
            if !tile.kind.is_occupied() {
                continue;
            }
            let entry = ctx.catalog.entry(tile.kind);
            income += entry.income_yield;
            growth += entry.population_yield;
        }
        state.ledger.income = income;
        state.ledger.population_growth = growth;
        Ok(())
    }
}
