pub mod bet;
pub mod football_match;
pub mod outcome;
pub mod rate;

pub use bet::SimulatedBet;
pub use football_match::{Match, MatchWithOutcomes};
pub use outcome::ScoreOutcome;
pub use rate::{RateReading, RateSnapshot};
