//! Best-of-N candidate search over independently built brackets.

use crate::logic::build::build;
use crate::logic::evaluate::evaluate;
use crate::models::{Bracket, BracketError, Metric};
use rand::Rng;
use std::cmp::Ordering;

/// Fresh bracket attempts per `build_bracket` call before giving up.
pub const BRACKET_RETRY_BUDGET: usize = 20;

/// Outcome of a best-of-N search.
#[derive(Debug)]
pub struct SearchOutcome {
    /// Best evaluated bracket, or `None` if every iteration failed.
    pub best: Option<Bracket>,
    /// Iterations whose per-attempt budget was exhausted.
    pub failures: usize,
}

/// Build and evaluate one conforming bracket, discarding and retrying fresh
/// brackets on round-builder failures, up to [`BRACKET_RETRY_BUDGET`] attempts.
pub fn build_bracket<R: Rng>(
    nplayers: usize,
    nrounds: usize,
    rng: &mut R,
) -> Result<Bracket, BracketError> {
    for attempt in 0..BRACKET_RETRY_BUDGET {
        let mut bracket = Bracket::new(nplayers, nrounds)?;
        match build(&mut bracket, rng) {
            Ok(()) => {
                evaluate(&mut bracket)?;
                return Ok(bracket);
            }
            Err(err) => log::debug!("discarding bracket attempt {attempt}: {err}"),
        }
    }
    Err(BracketError::NoBracketFound { attempts: BRACKET_RETRY_BUDGET })
}

/// Run `build_bracket` for `iterations` independent candidates and keep the
/// best. Failed iterations are counted and reported in the outcome; only
/// precondition violations abort the search.
pub fn best_bracket<R: Rng>(
    nplayers: usize,
    nrounds: usize,
    iterations: usize,
    rng: &mut R,
) -> Result<SearchOutcome, BracketError> {
    let mut best: Option<Bracket> = None;
    let mut failures = 0;
    for _ in 0..iterations {
        match build_bracket(nplayers, nrounds, rng) {
            Ok(candidate) => {
                if best.as_ref().map_or(true, |b| prefer(&candidate, b)) {
                    best = Some(candidate);
                }
            }
            Err(BracketError::NoBracketFound { .. }) => failures += 1,
            Err(err) => return Err(err),
        }
    }
    if failures > 0 {
        log::info!("bracket search: {failures}/{iterations} iterations failed");
    }
    Ok(SearchOutcome { best, failures })
}

/// Lexicographic comparator: higher minimum distinct-interaction count, then
/// higher mean distinct-interaction count, then lower mean second-level
/// interaction spread. Ties keep the incumbent.
fn prefer(candidate: &Bracket, incumbent: &Bracket) -> bool {
    let (ca, cb) = match (candidate.stats(), incumbent.stats()) {
        (Some(a), Some(b)) => (a, b),
        // search only compares evaluated brackets
        _ => return false,
    };
    let ints_a = ca.get(Metric::DistinctInteractions);
    let ints_b = cb.get(Metric::DistinctInteractions);
    match ints_a.min.total_cmp(&ints_b.min) {
        Ordering::Greater => return true,
        Ordering::Less => return false,
        Ordering::Equal => {}
    }
    match ints_a.mean.total_cmp(&ints_b.mean) {
        Ordering::Greater => return true,
        Ordering::Less => return false,
        Ordering::Equal => {}
    }
    let spread_a = ca.get(Metric::SpreadInteractions2).mean;
    let spread_b = cb.get(Metric::SpreadInteractions2).mean;
    spread_a.total_cmp(&spread_b) == Ordering::Less
}
