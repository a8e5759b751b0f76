//! Bracket: per-round counts, round records, history, and diagnostics.

use crate::models::history::History;
use crate::models::round::{Player, Round, Team};
use crate::models::stats::StatsTable;
use crate::models::thresholds::ThresholdPolicy;
use std::collections::BTreeSet;

/// Players per table (two teams of two).
pub const TABLE_SIZE: usize = 4;

/// Errors that can occur while constructing, loading, or evaluating a bracket.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BracketError {
    /// nplayers or nrounds is zero.
    InvalidCounts { nplayers: usize, nrounds: usize },
    /// Precondition `nplayers > nrounds` violated (bye and partner histories
    /// rely on it).
    TooManyRounds { nplayers: usize, nrounds: usize },
    /// Team picking exhausted its retry budget for one round.
    TeamsExhausted { rnd: usize, team_idx: usize },
    /// Matchup picking exhausted its retry budget for one round.
    MatchupsExhausted { rnd: usize, matchup_idx: usize },
    /// An externally produced round failed validation on load.
    InvalidRound { rnd: usize, reason: &'static str },
    /// `evaluate` called on an already-evaluated bracket.
    AlreadyEvaluated,
    /// Candidate search exhausted every attempt without a conforming bracket.
    NoBracketFound { attempts: usize },
}

impl std::fmt::Display for BracketError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BracketError::InvalidCounts { nplayers, nrounds } => {
                write!(f, "Player and round counts must be positive (got {} players, {} rounds)", nplayers, nrounds)
            }
            BracketError::TooManyRounds { nplayers, nrounds } => {
                write!(f, "Need more players than rounds (got {} players, {} rounds)", nplayers, nrounds)
            }
            BracketError::TeamsExhausted { rnd, team_idx } => {
                write!(f, "Unable to pick teams (round {}, team idx {})", rnd, team_idx)
            }
            BracketError::MatchupsExhausted { rnd, matchup_idx } => {
                write!(f, "Unable to pick matchups (round {}, matchup idx {})", rnd, matchup_idx)
            }
            BracketError::InvalidRound { rnd, reason } => {
                write!(f, "Invalid round {} on load: {}", rnd, reason)
            }
            BracketError::AlreadyEvaluated => write!(f, "Bracket has already been evaluated"),
            BracketError::NoBracketFound { attempts } => {
                write!(f, "No conforming bracket found in {} attempts", attempts)
            }
        }
    }
}

impl std::error::Error for BracketError {}

/// Retry diagnostics for one round of one picking phase.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RetryStats {
    pub rnd: usize,
    pub count: usize,
    /// Mean team/matchup index at the dead ends. High counts with a mean just
    /// below the maximum index signal low headroom under the active thresholds.
    pub mean_idx: f64,
}

/// One candidate schedule: round records plus the history and diagnostics
/// accumulated while building them.
///
/// Rounds and (after evaluation) stats are the output contract; rendering and
/// export collaborators consume those and nothing else.
#[derive(Clone, Debug)]
pub struct Bracket {
    pub nplayers: usize,
    pub nrounds: usize,

    // numbers for each round
    pub nbyes: usize,
    pub nseats: usize,
    pub nteams: usize,
    pub nmatchups: usize,

    /// Completed round records, in build order.
    pub rounds: Vec<Round>,

    pub(crate) history: History,
    pub(crate) thresholds: ThresholdPolicy,
    pub(crate) stats: Option<StatsTable>,

    /// Per round, the team index at each dead end during team picking.
    pub(crate) retry_teams: Vec<Vec<usize>>,
    /// Per round, the matchup index at each dead end during matchup picking.
    pub(crate) retry_matchups: Vec<Vec<usize>>,
}

impl Bracket {
    /// Create an empty bracket for `nplayers` and `nrounds`.
    ///
    /// Rejects non-positive counts and `nplayers <= nrounds` before any
    /// construction begins.
    pub fn new(nplayers: usize, nrounds: usize) -> Result<Self, BracketError> {
        if nplayers == 0 || nrounds == 0 {
            return Err(BracketError::InvalidCounts { nplayers, nrounds });
        }
        if nplayers <= nrounds {
            return Err(BracketError::TooManyRounds { nplayers, nrounds });
        }
        let nbyes = nplayers % TABLE_SIZE;
        let nseats = nplayers - nbyes;
        let nteams = nseats / 2;
        Ok(Self {
            nplayers,
            nrounds,
            nbyes,
            nseats,
            nteams,
            nmatchups: nteams / 2,
            rounds: Vec::with_capacity(nrounds),
            history: History::new(nplayers),
            thresholds: ThresholdPolicy::for_rounds(nrounds),
            stats: None,
            retry_teams: vec![Vec::new(); nrounds],
            retry_matchups: vec![Vec::new(); nrounds],
        })
    }

    /// Read access to the accumulated bye/partner/opponent history.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Evaluation statistics, once `evaluate` has run.
    pub fn stats(&self) -> Option<&StatsTable> {
        self.stats.as_ref()
    }

    /// Rounds where team picking dead-ended.
    pub fn team_retry_summary(&self) -> Vec<RetryStats> {
        summarize_retries(&self.retry_teams)
    }

    /// Rounds where matchup picking dead-ended.
    pub fn matchup_retry_summary(&self) -> Vec<RetryStats> {
        summarize_retries(&self.retry_matchups)
    }

    /// Replay an externally produced round (e.g. parsed from a CSV export by
    /// an import collaborator) into this bracket, so that a previously
    /// generated schedule can be evaluated.
    ///
    /// The round is validated against the round-shape invariants and the
    /// accumulated history before anything is committed.
    pub fn load_round(&mut self, round: Round) -> Result<(), BracketError> {
        let rnd = self.rounds.len();
        let invalid = |reason| BracketError::InvalidRound { rnd, reason };

        if rnd >= self.nrounds {
            return Err(invalid("more rounds than the bracket allows"));
        }
        if round.byes.len() != self.nbyes {
            return Err(invalid("wrong number of byes"));
        }
        if round.teams.len() != self.nteams {
            return Err(invalid("wrong number of teams"));
        }
        if round.matchups.len() != self.nmatchups {
            return Err(invalid("wrong number of matchups"));
        }

        // every player appears exactly once across byes and teams
        let nplayers = self.nplayers;
        let mut seen = vec![false; nplayers];
        let mut mark = |p: Player| -> Result<(), BracketError> {
            if p >= nplayers {
                return Err(BracketError::InvalidRound { rnd, reason: "player out of range" });
            }
            if seen[p] {
                return Err(BracketError::InvalidRound { rnd, reason: "player appears twice" });
            }
            seen[p] = true;
            Ok(())
        };
        for &p in &round.byes {
            mark(p)?;
        }
        for team in &round.teams {
            for p in team.players() {
                mark(p)?;
            }
        }
        if seen.iter().any(|&s| !s) {
            return Err(invalid("player missing from round"));
        }

        if round.byes.iter().any(|&p| self.history.had_bye(p)) {
            return Err(invalid("player already had a bye"));
        }
        for team in &round.teams {
            if self.history.were_partners(team.first(), team.second()) {
                return Err(invalid("repeated partnership"));
            }
        }

        // matchups must pair this round's teams, each team in exactly one
        let team_set: BTreeSet<Team> = round.teams.iter().copied().collect();
        let mut paired: BTreeSet<Team> = BTreeSet::new();
        for matchup in &round.matchups {
            for team in matchup.teams() {
                if !team_set.contains(&team) {
                    return Err(invalid("matchup references a team not in the round"));
                }
                if !paired.insert(team) {
                    return Err(invalid("team appears in two matchups"));
                }
            }
        }

        self.history.record_round(&round.byes, &round.teams, &round.matchups);
        self.rounds.push(round);
        Ok(())
    }
}

fn summarize_retries(retries: &[Vec<usize>]) -> Vec<RetryStats> {
    retries
        .iter()
        .enumerate()
        .filter(|(_, r)| !r.is_empty())
        .map(|(rnd, r)| RetryStats {
            rnd,
            count: r.len(),
            mean_idx: r.iter().sum::<usize>() as f64 / r.len() as f64,
        })
        .collect()
}
