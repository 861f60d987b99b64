pub mod bet_simulator;
pub mod fixture_loader;
pub mod rate_cache;
pub mod rate_refresher;

pub use bet_simulator::{BetSimulator, SimulationError, SimulationReceipt};
pub use rate_cache::{RateCache, RateError};
