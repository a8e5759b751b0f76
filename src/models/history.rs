//! Cross-round interaction history: byes, partners, and opponent counts.

use crate::models::round::{Byes, Matchup, Player, Team};
use std::collections::BTreeSet;

/// Bye, partner, and opponent state accumulated across built rounds.
///
/// Read access is public; updates happen only through [`History::record_round`],
/// which the round builder (and `Bracket::load_round`) invokes after a round's
/// picks are fully validated. No partial round is ever reflected here.
#[derive(Clone, Debug)]
pub struct History {
    /// Players who have already had a bye. At most one bye per player across
    /// the run, guaranteed by `nplayers > nrounds` plus the bye rotation.
    byes: BTreeSet<Player>,
    /// Per player, everyone they have ever been teamed with.
    partners: Vec<BTreeSet<Player>>,
    /// Symmetric player x player count of oppositions.
    opponents: Vec<Vec<u32>>,
}

impl History {
    pub(crate) fn new(nplayers: usize) -> Self {
        Self {
            byes: BTreeSet::new(),
            partners: vec![BTreeSet::new(); nplayers],
            opponents: vec![vec![0; nplayers]; nplayers],
        }
    }

    pub fn had_bye(&self, player: Player) -> bool {
        self.byes.contains(&player)
    }

    pub fn byes(&self) -> &BTreeSet<Player> {
        &self.byes
    }

    pub fn partners(&self, player: Player) -> &BTreeSet<Player> {
        &self.partners[player]
    }

    pub fn were_partners(&self, a: Player, b: Player) -> bool {
        self.partners[a].contains(&b)
    }

    /// Times `a` and `b` have faced each other across teams.
    pub fn opp_count(&self, a: Player, b: Player) -> u32 {
        self.opponents[a][b]
    }

    /// Full opposition-count row for one player.
    pub fn opp_row(&self, player: Player) -> &[u32] {
        &self.opponents[player]
    }

    /// Commit one fully validated round. Each matchup increments 8 opponent
    /// entries (4 players x 2 opposing players, symmetric).
    pub(crate) fn record_round(&mut self, byes: &Byes, teams: &[Team], matchups: &[Matchup]) {
        self.byes.extend(byes.iter().copied());
        for team in teams {
            self.partners[team.first()].insert(team.second());
            self.partners[team.second()].insert(team.first());
        }
        for matchup in matchups {
            let [a, b] = matchup.teams();
            for p in a.players() {
                for q in b.players() {
                    self.opponents[p][q] += 1;
                    self.opponents[q][p] += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_round_updates_all_three_histories() {
        let mut h = History::new(6);
        let byes: Byes = [4, 5].into_iter().collect();
        let teams = vec![Team::new(0, 1), Team::new(2, 3)];
        let matchups = vec![Matchup::new(teams[0], teams[1])];
        h.record_round(&byes, &teams, &matchups);

        assert!(h.had_bye(4) && h.had_bye(5));
        assert!(!h.had_bye(0));
        assert!(h.were_partners(0, 1) && h.were_partners(1, 0));
        assert!(!h.were_partners(0, 2));

        // one matchup increments 8 entries, symmetrically
        for (p, q) in [(0, 2), (0, 3), (1, 2), (1, 3)] {
            assert_eq!(h.opp_count(p, q), 1);
            assert_eq!(h.opp_count(q, p), 1);
        }
        assert_eq!(h.opp_count(0, 1), 0);
        assert_eq!(h.opp_count(2, 3), 0);
    }
}
