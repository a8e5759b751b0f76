//! Seeding round bracket generator: library with models and construction logic.
//!
//! Generates conflict-bounded schedules of two-player partnerships and
//! head-to-head matchups across a fixed number of rounds, evaluates how evenly
//! and broadly players interact (including second-level interactions), and
//! searches best-of-N candidates for the strongest schedule.

pub mod logic;
pub mod models;

pub use logic::{
    best_bracket, build, build_bracket, build_round, evaluate, evaluate_with, pick_byes,
    pick_matchups, pick_teams, EvalOptions, SearchOutcome, BRACKET_RETRY_BUDGET,
    MATCHUP_RETRY_BUDGET, TEAM_RETRY_BUDGET,
};
pub use models::{
    Aggregate, Bracket, BracketError, Byes, Divergence, History, Matchup, Metric, Player,
    RetryStats, Round, StatsTable, Team, ThresholdPolicy, TABLE_SIZE,
};
