//! Bounded linear undo/redo over full state snapshots.
//!
//! Snapshots are deep copies; restoring one hands back an independent clone.
//! Pushing while the cursor sits mid-history discards the redo tail, and the
//! oldest entry is evicted once the bound is exceeded.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::quest::Goal;
use crate::world::{CityStats, Grid, SimulationState};

pub const DEFAULT_HISTORY_LIMIT: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySnapshot {
    pub grid: Grid,
    pub stats: CityStats,
    pub quests: Vec<Goal>,
    pub goal: Option<Goal>,
}

impl HistorySnapshot {
    pub fn capture(state: &SimulationState) -> Self {
        Self {
            grid: state.grid.clone(),
            stats: state.stats,
            quests: state.quests.clone(),
            goal: state.goal.clone(),
        }
    }

    pub fn restore(&self, state: &mut SimulationState) {
        state.grid = self.grid.clone();
        state.stats = self.stats;
        state.quests = self.quests.clone();
        state.goal = self.goal.clone();
    }
}

#[derive(Debug)]
pub struct History {
    snapshots: VecDeque<HistorySnapshot>,
    cursor: usize,
    limit: usize,
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            snapshots: VecDeque::new(),
            cursor: 0,
            limit: limit.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn push(&mut self, snapshot: HistorySnapshot) {
        // Drop the redo tail past the cursor.
        if !self.snapshots.is_empty() {
            self.snapshots.truncate(self.cursor + 1);
        }
        self.snapshots.push_back(snapshot);
        if self.snapshots.len() > self.limit {
            self.snapshots.pop_front();
        }
        self.cursor = self.snapshots.len() - 1;
    }

    /// Step back one snapshot, or report a no-op at the oldest entry.
    pub fn undo(&mut self) -> Option<&HistorySnapshot> {
        if self.cursor == 0 || self.snapshots.is_empty() {
            return None;
        }
        self.cursor -= 1;
        self.snapshots.get(self.cursor)
    }

    /// Step forward one snapshot, or report a no-op at the newest entry.
    pub fn redo(&mut self) -> Option<&HistorySnapshot> {
        if self.snapshots.is_empty() || self.cursor + 1 >= self.snapshots.len() {
            return None;
        }
        self.cursor += 1;
        self.snapshots.get(self.cursor)
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}
