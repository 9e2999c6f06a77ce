use anyhow::Result;

use crate::{
    engine::{System, TickContext},
    quest,
    rng::SystemRng,
    world::SimulationState,
};

/// Re-evaluates the active goal and every quest against the post-tick world.
/// Evaluation only moves progress counters; rewards wait for the explicit
/// claim command.
pub struct GoalSystem;

impl GoalSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GoalSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for GoalSystem {
    fn name(&self) -> &'static str {
        "goal"
    }

    fn run(
        &mut self,
        _ctx: &TickContext<'_>,
        state: &mut SimulationState,
        _rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let (grid, stats) = (&state.grid, &state.stats);
        if let Some(goal) = state.goal.as_mut() {
            quest::evaluate(goal, grid, stats);
        }
        for goal in state.quests.iter_mut() {
            quest::evaluate(goal, grid, stats);
        }
        Ok(())
    }
}
