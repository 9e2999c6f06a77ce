//! YAML scenario files: world size, seed, starting stats, tuning overrides,
//! pre-placed buildings, and host-authored objectives. Missing fields fall
//! back to serde defaults so a scenario only states what it changes.

use std::collections::BTreeMap;
use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::catalog::{Catalog, CatalogEntry};
use crate::engine::Tuning;
use crate::quest::{Goal, GoalTarget};
use crate::session::Session;
use crate::world::{BuildingKind, Coord, Decoration};

fn default_seed() -> u64 {
    7
}

fn default_grid_side() -> u32 {
    20
}

fn default_starting_money() -> i64 {
    1_500
}

fn default_starting_happiness() -> i32 {
    50
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub description: Option<String>,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_grid_side")]
    pub grid_side: u32,
    #[serde(default = "default_starting_money")]
    pub starting_money: i64,
    #[serde(default)]
    pub starting_population: u64,
    #[serde(default = "default_starting_happiness")]
    pub starting_happiness: i32,
    #[serde(default)]
    pub ticks: Option<u64>,
    #[serde(default)]
    pub snapshot_interval_ticks: u64,
    #[serde(default)]
    pub tuning: Tuning,
    #[serde(default)]
    pub catalog_overrides: BTreeMap<BuildingKind, CatalogEntry>,
    #[serde(default)]
    pub buildings: Vec<PrePlacedBuilding>,
    #[serde(default)]
    pub goal: Option<ScenarioGoal>,
    #[serde(default)]
    pub quests: Vec<ScenarioGoal>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PrePlacedBuilding {
    pub x: u32,
    pub y: u32,
    pub kind: BuildingKind,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioGoal {
    pub target: GoalTarget,
    pub target_value: i64,
    pub reward_money: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl ScenarioGoal {
    fn into_goal(self, id: u64) -> Goal {
        Goal::new(id, self.target, self.target_value, self.reward_money)
            .with_text(self.title, self.description)
    }
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let scenario: Scenario = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(scenario)
    }
}

impl Scenario {
    /// Catalog with scenario overrides applied, validated before use.
    pub fn build_catalog(&self) -> Result<Catalog> {
        let mut catalog = Catalog::standard();
        for (kind, entry) in &self.catalog_overrides {
            catalog.override_entry(*kind, entry.clone());
        }
        catalog
            .validate()
            .with_context(|| format!("Invalid catalog in scenario '{}'", self.name))?;
        Ok(catalog)
    }

    pub fn build_session(&self) -> Result<Session> {
        let catalog = self.build_catalog()?;
        let mut session = Session::new(
            self.grid_side,
            catalog,
            self.tuning.clone(),
            self.seed,
        );
        session.seed_world(self)?;
        Ok(session)
    }

    pub fn ticks(&self, override_ticks: Option<u64>) -> u64 {
        override_ticks.or(self.ticks).unwrap_or(120)
    }
}

impl Session {
    /// Apply a scenario's starting stats, pre-placed buildings, and
    /// objectives to a freshly created session.
    pub(crate) fn seed_world(&mut self, scenario: &Scenario) -> Result<()> {
        self.seed_stats(
            scenario.starting_money,
            scenario.starting_population,
            scenario.starting_happiness,
        );
        for placed in &scenario.buildings {
            let coord = Coord::new(placed.x, placed.y);
            anyhow::ensure!(
                placed.x < scenario.grid_side && placed.y < scenario.grid_side,
                "pre-placed {:?} at ({}, {}) is outside the {}x{} grid",
                placed.kind,
                placed.x,
                placed.y,
                scenario.grid_side,
                scenario.grid_side,
            );
            self.seed_building(coord, placed.kind, Decoration::None);
        }
        for (index, quest) in scenario.quests.iter().enumerate() {
            self.add_quest(quest.clone().into_goal(index as u64 + 1));
        }
        if let Some(goal) = &scenario.goal {
            self.set_goal(goal.clone().into_goal(scenario.quests.len() as u64 + 1));
        }
        self.reset_history();
        Ok(())
    }
}
