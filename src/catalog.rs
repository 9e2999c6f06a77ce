//! Static per-building-kind economic parameters.
//!
//! The catalog is read-only at runtime and validated at startup: a kind the
//! simulation cannot price is a configuration fault, not a recoverable
//! runtime condition.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::world::BuildingKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub base_cost: u64,
    pub cost_scaling_factor: f64,
    pub population_yield: i64,
    pub income_yield: i64,
    #[serde(default)]
    pub effect_radius: Option<u32>,
}

#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("catalog has no entry for building kind {0:?}")]
    MissingEntry(BuildingKind),
    #[error("cost scaling factor {factor} for {kind:?} must be at least 1.0")]
    InvalidScaling { kind: BuildingKind, factor: f64 },
    #[error("effect radius on {0:?} is only meaningful for amenities")]
    UnexpectedRadius(BuildingKind),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    entries: BTreeMap<BuildingKind, CatalogEntry>,
}

impl Catalog {
    /// The stock ruleset. Negative income yields are upkeep (roads, parks).
    pub fn standard() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(
            BuildingKind::Empty,
            CatalogEntry {
                base_cost: 0,
                cost_scaling_factor: 1.0,
                population_yield: 0,
                income_yield: 0,
                effect_radius: None,
            },
        );
        entries.insert(
            BuildingKind::Road,
            CatalogEntry {
                base_cost: 20,
                cost_scaling_factor: 1.02,
                population_yield: 0,
                income_yield: -1,
                effect_radius: None,
            },
        );
        entries.insert(
            BuildingKind::Highway,
            CatalogEntry {
                base_cost: 60,
                cost_scaling_factor: 1.03,
                population_yield: 0,
                income_yield: -2,
                effect_radius: None,
            },
        );
        entries.insert(
            BuildingKind::Park,
            CatalogEntry {
                base_cost: 50,
                cost_scaling_factor: 1.05,
                population_yield: 0,
                income_yield: -5,
                effect_radius: Some(10),
            },
        );
        entries.insert(
            BuildingKind::House,
            CatalogEntry {
                base_cost: 100,
                cost_scaling_factor: 1.15,
                population_yield: 10,
                income_yield: 10,
                effect_radius: None,
            },
        );
        entries.insert(
            BuildingKind::Apartment,
            CatalogEntry {
                base_cost: 250,
                cost_scaling_factor: 1.18,
                population_yield: 30,
                income_yield: 18,
                effect_radius: None,
            },
        );
        entries.insert(
            BuildingKind::Shop,
            CatalogEntry {
                base_cost: 150,
                cost_scaling_factor: 1.12,
                population_yield: 0,
                income_yield: 25,
                effect_radius: None,
            },
        );
        entries.insert(
            BuildingKind::Factory,
            CatalogEntry {
                base_cost: 300,
                cost_scaling_factor: 1.10,
                population_yield: 0,
                income_yield: 40,
                effect_radius: None,
            },
        );
        Self { entries }
    }

    /// Build a catalog from explicit entries, failing fast on gaps or bad
    /// scaling. Scenario files use this to override the stock ruleset.
    pub fn from_entries(
        entries: BTreeMap<BuildingKind, CatalogEntry>,
    ) -> Result<Self, CatalogError> {
        let catalog = Self { entries };
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        for kind in BuildingKind::ALL {
            let entry = self
                .entries
                .get(&kind)
                .ok_or(CatalogError::MissingEntry(kind))?;
            if entry.cost_scaling_factor < 1.0 {
                return Err(CatalogError::InvalidScaling {
                    kind,
                    factor: entry.cost_scaling_factor,
                });
            }
            if entry.effect_radius.is_some() && !kind.is_amenity() {
                return Err(CatalogError::UnexpectedRadius(kind));
            }
        }
        Ok(())
    }

    pub fn entry(&self, kind: BuildingKind) -> &CatalogEntry {
        self.entries
            .get(&kind)
            .expect("catalog validated at construction")
    }

    /// Diffusion radius of the amenity kind, used by the land-value field.
    pub fn amenity_radius(&self) -> u32 {
        BuildingKind::ALL
            .into_iter()
            .filter(|kind| kind.is_amenity())
            .filter_map(|kind| self.entry(kind).effect_radius)
            .max()
            .unwrap_or(10)
    }

    pub fn override_entry(&mut self, kind: BuildingKind, entry: CatalogEntry) {
        self.entries.insert(kind, entry);
    }
}
