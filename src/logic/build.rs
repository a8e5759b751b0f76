//! Bracket orchestration: build all rounds, strictly in order.

use crate::logic::rounds::build_round;
use crate::models::{Bracket, BracketError};
use rand::Rng;

/// Build the whole bracket.
///
/// Rounds are built strictly in order because history is round-order
/// dependent. Any round failure fails the bracket; callers discard it rather
/// than salvage a partial schedule.
pub fn build<R: Rng>(bracket: &mut Bracket, rng: &mut R) -> Result<(), BracketError> {
    for rnd in 0..bracket.nrounds {
        build_round(bracket, rnd, rng)?;
    }
    Ok(())
}
