//! Player-facing command surface over the simulation core.
//!
//! Every mutating command validates fully before touching state, so a
//! rejection leaves grid, stats, and history exactly as they were. Each
//! player mutation pushes an undo snapshot; engine ticks do not (undo is a
//! player-action timeline, not a tick log).

use anyhow::Result;
use rand::Rng;
use thiserror::Error;

use crate::catalog::Catalog;
use crate::cost;
use crate::engine::{Engine, TickSummary, Tuning};
use crate::history::{History, HistorySnapshot, DEFAULT_HISTORY_LIMIT};
use crate::land_value::{LandValueCache, LandValueField};
use crate::path;
use crate::quest::{self, Goal};
use crate::rng::RngManager;
use crate::world::{BuildingKind, CityStats, Coord, Decoration, Rgb, SimulationState};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("coordinate ({x}, {y}) is outside the grid")]
    OutOfBounds { x: u32, y: u32 },
    #[error("tile ({x}, {y}) is already occupied")]
    Occupied { x: u32, y: u32 },
    #[error("tile ({x}, {y}) is empty")]
    TileEmpty { x: u32, y: u32 },
    #[error("{0:?} buildings cannot be upgraded")]
    NotUpgradable(BuildingKind),
    #[error("tile ({x}, {y}) is already at the maximum level")]
    MaxLevel { x: u32, y: u32 },
    #[error("need {needed} but only {available} in the treasury")]
    InsufficientFunds { needed: i64, available: i64 },
    #[error("no completed goal to claim")]
    NoCompletedGoal,
    #[error("no completed quest with id {0}")]
    NoCompletedQuest(u64),
}

/// Result of a successful mutating command. `money_delta` is negative for
/// spending and positive for refunds and rewards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandOutcome {
    pub money_delta: i64,
    pub stats: CityStats,
}

/// One city: state, rules, engine, undo history, and RNG streams, serialized
/// behind `&mut self` exactly as the concurrency contract requires.
pub struct Session {
    state: SimulationState,
    catalog: Catalog,
    engine: Engine,
    history: History,
    land_value: LandValueCache,
    rng: RngManager,
    next_goal_id: u64,
}

impl Session {
    pub fn new(grid_side: u32, catalog: Catalog, tuning: Tuning, seed: u64) -> Self {
        Self::from_state(SimulationState::new(grid_side), catalog, tuning, seed)
    }

    /// Adopt an existing state, e.g. one restored from a save file. The
    /// initial state is pushed so the first command can be undone.
    pub fn from_state(
        state: SimulationState,
        catalog: Catalog,
        tuning: Tuning,
        seed: u64,
    ) -> Self {
        let next_goal_id = state
            .quests
            .iter()
            .chain(state.goal.as_ref())
            .map(|goal| goal.id + 1)
            .max()
            .unwrap_or(1);
        let mut history = History::new(DEFAULT_HISTORY_LIMIT);
        history.push(HistorySnapshot::capture(&state));
        Self {
            state,
            catalog,
            engine: Engine::standard(tuning),
            history,
            land_value: LandValueCache::new(),
            rng: RngManager::new(seed),
            next_goal_id,
        }
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn stats(&self) -> CityStats {
        self.state.stats
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Current land-value field, recomputed only when the grid has changed.
    pub fn land_value(&mut self) -> &LandValueField {
        self.land_value
            .field(&self.state.grid, self.catalog.amenity_radius())
    }

    /// Quoted price to place `kind` at `(x, y)` right now.
    pub fn quote_placement(&mut self, kind: BuildingKind, x: u32, y: u32) -> u64 {
        let coord = Coord::new(x, y);
        let radius = self.catalog.amenity_radius();
        let field = self.land_value.field(&self.state.grid, radius);
        cost::placement_cost(
            kind,
            coord,
            &self.state.grid,
            field,
            &self.catalog,
            self.state.stats.money,
        )
    }

    pub fn place(
        &mut self,
        kind: BuildingKind,
        x: u32,
        y: u32,
    ) -> Result<CommandOutcome, CommandError> {
        if kind == BuildingKind::Empty {
            return self.demolish(x, y);
        }
        let coord = Coord::new(x, y);
        let tile = self
            .state
            .grid
            .tile(coord)
            .ok_or(CommandError::OutOfBounds { x, y })?;
        if tile.kind.is_occupied() {
            return Err(CommandError::Occupied { x, y });
        }
        let price = self.quote_placement(kind, x, y) as i64;
        if price > self.state.stats.money {
            return Err(CommandError::InsufficientFunds {
                needed: price,
                available: self.state.stats.money,
            });
        }

        let (decoration, color) = self.roll_appearance(kind);
        self.state.grid.set_building(coord, kind, decoration, color);
        self.state.stats.money -= price;
        self.finish_mutation();
        Ok(CommandOutcome {
            money_delta: -price,
            stats: self.state.stats,
        })
    }

    pub fn demolish(&mut self, x: u32, y: u32) -> Result<CommandOutcome, CommandError> {
        let coord = Coord::new(x, y);
        let tile = self
            .state
            .grid
            .tile(coord)
            .ok_or(CommandError::OutOfBounds { x, y })?;
        if !tile.kind.is_occupied() {
            return Err(CommandError::TileEmpty { x, y });
        }
        let entry = self.catalog.entry(tile.kind);
        let refund = (entry.base_cost as f64 * self.engine.tuning().demolition_refund_fraction)
            .round() as i64;

        self.state.grid.clear(coord);
        self.state.stats.money += refund;
        self.finish_mutation();
        Ok(CommandOutcome {
            money_delta: refund,
            stats: self.state.stats,
        })
    }

    pub fn upgrade(&mut self, x: u32, y: u32) -> Result<CommandOutcome, CommandError> {
        let coord = Coord::new(x, y);
        let tile = self
            .state
            .grid
            .tile(coord)
            .ok_or(CommandError::OutOfBounds { x, y })?;
        if !tile.kind.is_occupied() {
            return Err(CommandError::TileEmpty { x, y });
        }
        if !tile.kind.is_upgradable() {
            return Err(CommandError::NotUpgradable(tile.kind));
        }
        if tile.level >= self.engine.tuning().max_level {
            return Err(CommandError::MaxLevel { x, y });
        }
        let (kind, level) = (tile.kind, tile.level);
        let radius = self.catalog.amenity_radius();
        let field = self.land_value.field(&self.state.grid, radius);
        let price = cost::upgrade_cost(
            kind,
            level,
            coord,
            &self.state.grid,
            field,
            &self.catalog,
            self.state.stats.money,
        ) as i64;
        if price > self.state.stats.money {
            return Err(CommandError::InsufficientFunds {
                needed: price,
                available: self.state.stats.money,
            });
        }

        self.state.grid.raise_level(coord);
        self.state.stats.money -= price;
        self.finish_mutation();
        Ok(CommandOutcome {
            money_delta: -price,
            stats: self.state.stats,
        })
    }

    /// Advance simulated time by one step.
    pub fn tick(&mut self) -> Result<TickSummary> {
        self.engine
            .tick(&mut self.state, &self.catalog, &mut self.rng)
    }

    /// Restore the previous snapshot. Returns false when already at the
    /// oldest state (a reported no-op, not an error).
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(snapshot) => {
                let snapshot = snapshot.clone();
                snapshot.restore(&mut self.state);
                // The restored grid reuses old revision numbers.
                self.land_value.invalidate();
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(snapshot) => {
                let snapshot = snapshot.clone();
                snapshot.restore(&mut self.state);
                self.land_value.invalidate();
                true
            }
            None => false,
        }
    }

    pub fn find_path(&self, start: Coord, goal: Coord) -> Option<Vec<Coord>> {
        path::find_path(&self.state.grid, start, goal)
    }

    /// Collect the reward of the completed active goal and discard the goal
    /// so the host can install a replacement.
    pub fn claim_goal_reward(&mut self) -> Result<CommandOutcome, CommandError> {
        match self.state.goal.take() {
            Some(goal) if goal.completed => {
                self.state.stats.money += goal.reward_money;
                self.refresh_goals();
                Ok(CommandOutcome {
                    money_delta: goal.reward_money,
                    stats: self.state.stats,
                })
            }
            other => {
                self.state.goal = other;
                Err(CommandError::NoCompletedGoal)
            }
        }
    }

    /// Collect the reward of a completed quest and remove it from the list.
    pub fn claim_quest_reward(&mut self, id: u64) -> Result<CommandOutcome, CommandError> {
        let index = self
            .state
            .quests
            .iter()
            .position(|quest| quest.id == id && quest.completed)
            .ok_or(CommandError::NoCompletedQuest(id))?;
        let quest = self.state.quests.remove(index);
        self.state.stats.money += quest.reward_money;
        self.refresh_goals();
        Ok(CommandOutcome {
            money_delta: quest.reward_money,
            stats: self.state.stats,
        })
    }

    /// Install a host-supplied objective as the active goal, evaluated
    /// immediately against the current world.
    pub fn set_goal(&mut self, mut goal: Goal) {
        goal.id = self.allocate_goal_id(goal.id);
        quest::evaluate(&mut goal, &self.state.grid, &self.state.stats);
        self.state.goal = Some(goal);
    }

    pub fn add_quest(&mut self, mut goal: Goal) {
        goal.id = self.allocate_goal_id(goal.id);
        quest::evaluate(&mut goal, &self.state.grid, &self.state.stats);
        self.state.quests.push(goal);
    }

    fn allocate_goal_id(&mut self, requested: u64) -> u64 {
        if requested >= self.next_goal_id {
            self.next_goal_id = requested + 1;
            requested
        } else {
            let id = self.next_goal_id;
            self.next_goal_id += 1;
            id
        }
    }

    /// Scenario setup: overwrite the starting stats before play begins.
    pub(crate) fn seed_stats(&mut self, money: i64, population: u64, happiness: i32) {
        self.state.stats.money = money;
        self.state.stats.population = population;
        self.state.stats.happiness = happiness.clamp(0, 100);
    }

    /// Scenario setup: place a building without charging or recording undo.
    pub(crate) fn seed_building(&mut self, coord: Coord, kind: BuildingKind, decoration: Decoration) {
        self.state
            .grid
            .set_building(coord, kind, decoration, kind.palette()[0]);
    }

    /// Scenario setup: make the seeded world the undo baseline.
    pub(crate) fn reset_history(&mut self) {
        self.history = History::new(DEFAULT_HISTORY_LIMIT);
        self.history.push(HistorySnapshot::capture(&self.state));
        self.land_value.invalidate();
    }

    fn roll_appearance(&mut self, kind: BuildingKind) -> (Decoration, Rgb) {
        let mut stream = self.rng.stream("placement");
        let palette = kind.palette();
        let color = palette[stream.gen_range(0..palette.len())];
        let decoration = if kind.is_amenity() {
            match stream.gen_range(0..3) {
                0 => Decoration::Trees,
                1 => Decoration::Garden,
                _ => Decoration::Plaza,
            }
        } else {
            Decoration::None
        };
        (decoration, color)
    }

    /// Re-evaluate objectives and record an undo snapshot after a mutation.
    fn finish_mutation(&mut self) {
        self.refresh_goals();
        self.history.push(HistorySnapshot::capture(&self.state));
    }

    fn refresh_goals(&mut self) {
        let (grid, stats) = (&self.state.grid, &self.state.stats);
        if let Some(goal) = self.state.goal.as_mut() {
            quest::evaluate(goal, grid, stats);
        }
        for goal in self.state.quests.iter_mut() {
            quest::evaluate(goal, grid, stats);
        }
    }
}
