//! Round construction: bye rotation, team picking, matchup picking.
//!
//! Team and matchup picking use uniform random choice among currently eligible
//! candidates, not backtracking search: a dead end abandons the whole round's
//! partial picks and restarts, up to a fixed retry budget. History is only
//! committed once the entire round validates.

use crate::models::{Bracket, BracketError, Byes, Matchup, Player, Round, Team};
use rand::Rng;

/// Attempts at picking a full team set for one round before giving up.
pub const TEAM_RETRY_BUDGET: usize = 10;
/// Attempts at picking a full matchup set for one round before giving up.
pub const MATCHUP_RETRY_BUDGET: usize = 100;

/// Byes for a round: the next `nbyes` players in a fixed rotation, so byes
/// spread evenly and (given `nplayers > nrounds`) never repeat.
pub fn pick_byes(bracket: &Bracket, rnd: usize) -> Byes {
    let start = rnd * bracket.nbyes;
    let byes: Byes = (start..start + bracket.nbyes)
        .map(|x| x % bracket.nplayers)
        .collect();
    assert_eq!(byes.len(), bracket.nbyes);
    assert!(
        byes.iter().all(|&p| !bracket.history().had_bye(p)),
        "bye rotation repeated a player"
    );
    byes
}

/// Teams for a round: random partner picks excluding previous partners, plus
/// opponents already faced at-or-above the active threshold, so partnerships
/// keep drawing from untouched players while the threshold is strict and
/// loosen with it as rounds advance.
pub fn pick_teams<R: Rng>(
    bracket: &mut Bracket,
    rnd: usize,
    byes: &Byes,
    rng: &mut R,
) -> Result<Vec<Team>, BracketError> {
    pick_teams_with_budget(bracket, rnd, byes, TEAM_RETRY_BUDGET, rng)
}

pub(crate) fn pick_teams_with_budget<R: Rng>(
    bracket: &mut Bracket,
    rnd: usize,
    byes: &Byes,
    budget: usize,
    rng: &mut R,
) -> Result<Vec<Team>, BracketError> {
    let seats: Vec<Player> = (0..bracket.nplayers).filter(|p| !byes.contains(p)).collect();
    debug_assert_eq!(seats.len(), bracket.nseats);
    let thresh = bracket.thresholds.active(rnd);

    for _ in 0..budget {
        if let Some(teams) = try_pick_teams(bracket, rnd, &seats, thresh, rng) {
            return Ok(teams);
        }
    }
    let team_idx = bracket.retry_teams[rnd].last().copied().unwrap_or(0);
    log::debug!("team picking exhausted (round {rnd}, team idx {team_idx})");
    Err(BracketError::TeamsExhausted { rnd, team_idx })
}

/// One pass over the seats; `None` on a dead end (recorded as a retry).
fn try_pick_teams<R: Rng>(
    bracket: &mut Bracket,
    rnd: usize,
    seats: &[Player],
    thresh: u32,
    rng: &mut R,
) -> Option<Vec<Team>> {
    let mut available = seats.to_vec();
    let mut teams = Vec::with_capacity(bracket.nteams);
    while !available.is_empty() {
        let player = available.swap_remove(rng.gen_range(0..available.len()));
        let picklist: Vec<Player> = available
            .iter()
            .copied()
            .filter(|&q| {
                !bracket.history.were_partners(player, q)
                    && bracket.history.opp_count(player, q) < thresh
            })
            .collect();
        if picklist.is_empty() {
            log::debug!("retry picking teams (round {rnd}, team idx {})", teams.len());
            bracket.retry_teams[rnd].push(teams.len());
            return None;
        }
        let partner = picklist[rng.gen_range(0..picklist.len())];
        available.retain(|&q| q != partner);
        teams.push(Team::new(player, partner));
    }
    Some(teams)
}

/// Matchups for a round: random opposing-team picks excluding teams with a
/// previous partner of either player, or with an opponent already faced
/// at-or-above the active threshold.
pub fn pick_matchups<R: Rng>(
    bracket: &mut Bracket,
    rnd: usize,
    teams: &[Team],
    rng: &mut R,
) -> Result<Vec<Matchup>, BracketError> {
    pick_matchups_with_budget(bracket, rnd, teams, MATCHUP_RETRY_BUDGET, rng)
}

pub(crate) fn pick_matchups_with_budget<R: Rng>(
    bracket: &mut Bracket,
    rnd: usize,
    teams: &[Team],
    budget: usize,
    rng: &mut R,
) -> Result<Vec<Matchup>, BracketError> {
    let thresh = bracket.thresholds.active(rnd);
    for _ in 0..budget {
        if let Some(matchups) = try_pick_matchups(bracket, rnd, teams, thresh, rng) {
            return Ok(matchups);
        }
    }
    let matchup_idx = bracket.retry_matchups[rnd].last().copied().unwrap_or(0);
    log::debug!("matchup picking exhausted (round {rnd}, matchup idx {matchup_idx})");
    Err(BracketError::MatchupsExhausted { rnd, matchup_idx })
}

fn try_pick_matchups<R: Rng>(
    bracket: &mut Bracket,
    rnd: usize,
    teams: &[Team],
    thresh: u32,
    rng: &mut R,
) -> Option<Vec<Matchup>> {
    let mut available = teams.to_vec();
    let mut matchups = Vec::with_capacity(bracket.nmatchups);
    while !available.is_empty() {
        let team = available.swap_remove(rng.gen_range(0..available.len()));
        let picklist: Vec<Team> = available
            .iter()
            .copied()
            .filter(|&opp| qualifies(bracket, team, opp, thresh))
            .collect();
        if picklist.is_empty() {
            log::debug!("retry picking matchup (round {rnd}, matchup idx {})", matchups.len());
            bracket.retry_matchups[rnd].push(matchups.len());
            return None;
        }
        let opp = picklist[rng.gen_range(0..picklist.len())];
        available.retain(|&t| t != opp);
        matchups.push(Matchup::new(team, opp));
    }
    Some(matchups)
}

/// An opposing team qualifies when neither of its members has ever partnered
/// either of `team`'s members, and no cross pair has hit the opponent threshold.
fn qualifies(bracket: &Bracket, team: Team, opp: Team, thresh: u32) -> bool {
    team.players().into_iter().all(|p| {
        opp.players().into_iter().all(|q| {
            !bracket.history.were_partners(p, q) && bracket.history.opp_count(p, q) < thresh
        })
    })
}

/// Build one round: byes, then teams, then matchups. History and the round
/// record are committed only after all three phases validate; a failure leaves
/// history untouched (the bracket is only good for discarding anyway).
pub fn build_round<R: Rng>(
    bracket: &mut Bracket,
    rnd: usize,
    rng: &mut R,
) -> Result<(), BracketError> {
    let byes = pick_byes(bracket, rnd);
    let teams = pick_teams(bracket, rnd, &byes, rng)?;
    let matchups = pick_matchups(bracket, rnd, &teams, rng)?;
    bracket.history.record_round(&byes, &teams, &matchups);
    bracket.rounds.push(Round { byes, teams, matchups });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeSet;

    #[test]
    fn bye_rotation_is_sequential_and_wraps() {
        let bracket = Bracket::new(6, 2).unwrap(); // nbyes = 2
        assert_eq!(pick_byes(&bracket, 0), [0, 1].into_iter().collect::<Byes>());
        assert_eq!(pick_byes(&bracket, 1), [2, 3].into_iter().collect::<Byes>());

        let bracket = Bracket::new(33, 8).unwrap(); // nbyes = 1
        for rnd in 0..8 {
            assert_eq!(pick_byes(&bracket, rnd), [rnd].into_iter().collect::<Byes>());
        }
    }

    #[test]
    fn exhausted_team_budget_fails_with_round_error() {
        // Adversarial history: every pair has already partnered, so every
        // attempt dead-ends immediately on the first team.
        let mut bracket = Bracket::new(8, 3).unwrap();
        let all_pairs: Vec<Team> = (0..8)
            .flat_map(|a| (a + 1..8).map(move |b| Team::new(a, b)))
            .collect();
        bracket.history.record_round(&BTreeSet::new(), &all_pairs, &[]);

        let mut rng = StdRng::seed_from_u64(7);
        let byes = Byes::new();
        let err = pick_teams_with_budget(&mut bracket, 0, &byes, 1, &mut rng).unwrap_err();
        assert_eq!(err, BracketError::TeamsExhausted { rnd: 0, team_idx: 0 });
        assert_eq!(bracket.retry_teams[0].len(), 1);
        assert_eq!(bracket.team_retry_summary().len(), 1);
        assert_eq!(bracket.team_retry_summary()[0].count, 1);
    }

    #[test]
    fn exhausted_matchup_budget_fails_with_round_error() {
        // Two teams whose members have all partnered across: the only
        // possible matchup is disqualified every attempt.
        let mut bracket = Bracket::new(4, 1).unwrap();
        let teams = vec![Team::new(0, 1), Team::new(2, 3)];
        let cross = vec![Team::new(0, 2), Team::new(1, 3)];
        bracket.history.record_round(&BTreeSet::new(), &cross, &[]);

        let mut rng = StdRng::seed_from_u64(7);
        let err = pick_matchups_with_budget(&mut bracket, 0, &teams, 3, &mut rng).unwrap_err();
        assert_eq!(err, BracketError::MatchupsExhausted { rnd: 0, matchup_idx: 0 });
        assert_eq!(bracket.retry_matchups[0].len(), 3);
    }

    /// One table of (0,1) vs (2,3): afterwards every pair among the four is
    /// either a prior partnership or a once-faced opposition.
    fn saturate_one_table(bracket: &mut Bracket) {
        let t1 = Team::new(0, 1);
        let t2 = Team::new(2, 3);
        bracket
            .history
            .record_round(&BTreeSet::new(), &[t1, t2], &[Matchup::new(t1, t2)]);
    }

    #[test]
    fn team_picking_excludes_faced_opponents_at_threshold() {
        // round 0 allows one meeting, so the once-faced cross pairs are
        // disqualified along with the partnerships: dead end every attempt
        let mut bracket = Bracket::new(4, 1).unwrap();
        saturate_one_table(&mut bracket);

        let mut rng = StdRng::seed_from_u64(13);
        let byes = Byes::new();
        let err = pick_teams_with_budget(&mut bracket, 0, &byes, 2, &mut rng).unwrap_err();
        assert_eq!(err, BracketError::TeamsExhausted { rnd: 0, team_idx: 0 });
        assert_eq!(bracket.retry_teams[0].len(), 2);
    }

    #[test]
    fn team_picking_allows_faced_opponents_below_threshold() {
        // same history, but round 1 allows two meetings: the once-faced
        // cross pairs qualify again and only the partnerships stay excluded
        let mut bracket = Bracket::new(4, 2).unwrap();
        saturate_one_table(&mut bracket);

        let mut rng = StdRng::seed_from_u64(13);
        let byes = Byes::new();
        for _ in 0..10 {
            let teams = pick_teams(&mut bracket, 1, &byes, &mut rng).unwrap();
            assert_eq!(teams.len(), 2);
            for team in &teams {
                assert_ne!(*team, Team::new(0, 1), "repeated partnership");
                assert_ne!(*team, Team::new(2, 3), "repeated partnership");
            }
        }
    }

    #[test]
    #[should_panic(expected = "bye rotation repeated a player")]
    fn bye_overlap_is_a_defensive_failure() {
        // 7 players over 5 rounds needs 15 bye slots, so the rotation must
        // eventually wrap into players who already sat out
        let mut bracket = Bracket::new(7, 5).unwrap();
        let byes = pick_byes(&bracket, 0);
        bracket.history.record_round(&byes, &[], &[]);
        let byes = pick_byes(&bracket, 1);
        bracket.history.record_round(&byes, &[], &[]);
        pick_byes(&bracket, 2);
    }
}
