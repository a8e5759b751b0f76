//! Bracket construction, evaluation, and search logic.

mod build;
mod evaluate;
mod rounds;
mod search;

pub use build::build;
pub use evaluate::{evaluate, evaluate_with, EvalOptions};
pub use rounds::{
    build_round, pick_byes, pick_matchups, pick_teams, MATCHUP_RETRY_BUDGET, TEAM_RETRY_BUDGET,
};
pub use search::{best_bracket, build_bracket, SearchOutcome, BRACKET_RETRY_BUDGET};
