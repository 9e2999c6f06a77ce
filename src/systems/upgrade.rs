use anyhow::Result;
use rand::Rng;

use crate::{
    engine::{System, TickContext},
    rng::SystemRng,
    world::{Coord, SimulationState},
};

/// Probabilistic level-ups for residential tiles in high-desirability spots.
///
/// A miss this tick is not retried; the same tile simply rolls again on a
/// future tick. Candidates are visited in row-major order so a fixed seed
/// replays the same upgrades.
pub struct UpgradeSystem;

impl UpgradeSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for UpgradeSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for UpgradeSystem {
    fn name(&self) -> &'static str {
        "upgrade"
    }

    fn run(
        &mut self,
        ctx: &TickContext<'_>,
        state: &mut SimulationState,
        rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let candidates: Vec<Coord> = state
            .grid
            .tiles()
            .filter(|tile| tile.kind.is_residential() && tile.level < ctx.tuning.max_level)
            .map(|tile| tile.coord())
            .collect();

        for coord in candidates {
            let desirability = ctx.land_value.value_or_zero(coord);
            if desirability <= ctx.tuning.upgrade_land_value_threshold {
                continue;
            }
            if rng.gen::<f64>() < ctx.tuning.upgrade_probability {
                state.grid.raise_level(coord);
                // Tax windfall from the denser block.
                state.ledger.income += ctx.tuning.upgrade_income_bonus;
            }
        }
        Ok(())
    }
}
