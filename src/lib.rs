pub mod catalog;
pub mod cost;
pub mod engine;
pub mod history;
pub mod land_value;
pub mod path;
pub mod quest;
pub mod rng;
pub mod save;
pub mod scenario;
pub mod session;
pub mod systems;
pub mod world;

pub use catalog::{Catalog, CatalogEntry, CatalogError};
pub use engine::{Engine, EngineBuilder, TickSummary, Tuning};
pub use quest::{Goal, GoalTarget};
pub use session::{CommandError, CommandOutcome, Session};
pub use world::{BuildingKind, CityStats, Coord, Grid, SimulationState};
