//! Versioned load/save boundary and periodic snapshot writer.
//!
//! The version tag is the grid side length. A mismatched version means "no
//! usable save": the caller gets `Ok(None)` and starts a fresh world. Saves
//! are never auto-migrated. The `extras` value carries opaque host content
//! (news items, narrative text) that the core round-trips untouched.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::quest::Goal;
use crate::world::{CityStats, Grid, SimulationState};

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("save encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SaveGame {
    pub version: u32,
    pub saved_at: String,
    pub grid: Grid,
    pub stats: CityStats,
    pub quests: Vec<Goal>,
    pub goal: Option<Goal>,
    #[serde(default)]
    pub extras: serde_json::Value,
}

impl SaveGame {
    pub fn from_state(state: &SimulationState, extras: serde_json::Value) -> Self {
        Self {
            version: state.grid.side(),
            saved_at: chrono::Utc::now().to_rfc3339(),
            grid: state.grid.clone(),
            stats: state.stats,
            quests: state.quests.clone(),
            goal: state.goal.clone(),
            extras,
        }
    }

    pub fn into_state(self) -> SimulationState {
        SimulationState {
            grid: self.grid,
            stats: self.stats,
            quests: self.quests,
            goal: self.goal,
            ledger: Default::default(),
        }
    }
}

pub fn write_save(path: impl AsRef<Path>, state: &SimulationState) -> Result<(), SaveError> {
    write_save_with_extras(path, state, serde_json::Value::Null)
}

pub fn write_save_with_extras(
    path: impl AsRef<Path>,
    state: &SimulationState,
    extras: serde_json::Value,
) -> Result<(), SaveError> {
    let save = SaveGame::from_state(state, extras);
    let json = serde_json::to_string_pretty(&save)?;
    fs::write(path, json)?;
    Ok(())
}

/// Load a save for a world of side `expected_side`. A missing file or a
/// version mismatch is "no usable save" (`Ok(None)`), not an error.
pub fn read_save(
    path: impl AsRef<Path>,
    expected_side: u32,
) -> Result<Option<SimulationState>, SaveError> {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    let save: SaveGame = serde_json::from_str(&data)?;
    if save.version != expected_side {
        return Ok(None);
    }
    Ok(Some(save.into_state()))
}

/// Writes a full save on a fixed tick interval, for headless runs.
pub struct SnapshotWriter {
    dir: PathBuf,
    interval: u64,
}

impl SnapshotWriter {
    pub fn new(dir: impl AsRef<Path>, interval: u64) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            interval,
        }
    }

    pub fn maybe_write(
        &self,
        state: &SimulationState,
    ) -> Result<Option<PathBuf>, SaveError> {
        if self.interval == 0 || state.stats.day == 0 || state.stats.day % self.interval != 0 {
            return Ok(None);
        }
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(format!("day_{:06}.json", state.stats.day));
        write_save(&path, state)?;
        Ok(Some(path))
    }
}
