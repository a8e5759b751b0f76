//! Data structures for the seeding round: rounds, history, thresholds, brackets, stats.

mod bracket;
mod history;
mod round;
mod stats;
mod thresholds;

pub use bracket::{Bracket, BracketError, RetryStats, TABLE_SIZE};
pub use history::History;
pub use round::{Byes, Matchup, Player, Round, Team};
pub use stats::{Aggregate, Divergence, Metric, StatsTable};
pub use thresholds::ThresholdPolicy;
