// Service exports
pub mod memory;
pub mod sources;

pub use memory::{InMemoryLedger, InMemoryProfiles};
pub use sources::{DecisionHistorySource, DecisionLedger, ProfileSource};
