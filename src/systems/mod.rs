mod goal;
mod population;
mod treasury;
mod upgrade;
mod yields;

pub use goal::GoalSystem;
pub use population::PopulationSystem;
pub use treasury::TreasurySystem;
pub use upgrade::UpgradeSystem;
pub use yields::YieldSystem;
