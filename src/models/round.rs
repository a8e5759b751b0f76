//! Round data structures: players, byes, teams, matchups.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;

/// A player: an index in `[0, nplayers)`, fixed for the run.
pub type Player = usize;

/// Players sitting out a round.
pub type Byes = BTreeSet<Player>;

/// A two-player partnership for one round.
///
/// Stored normalized (lower id first) so the same unordered pair always
/// compares and hashes equal; the same pair may appear as a team in at most
/// one round across the whole run.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Team(Player, Player);

// Deserialized pairs go through `new` so external data is normalized and
// checked for distinctness, same as pairs built in-process.
impl<'de> Deserialize<'de> for Team {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let [a, b] = <[Player; 2]>::deserialize(deserializer)?;
        if a == b {
            return Err(D::Error::custom("team members must be distinct"));
        }
        Ok(Team::new(a, b))
    }
}

impl Team {
    /// Team of two distinct players, in either order.
    pub fn new(a: Player, b: Player) -> Self {
        debug_assert_ne!(a, b);
        if a < b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }

    pub fn first(&self) -> Player {
        self.0
    }

    pub fn second(&self) -> Player {
        self.1
    }

    pub fn players(&self) -> [Player; 2] {
        [self.0, self.1]
    }

    pub fn contains(&self, player: Player) -> bool {
        self.0 == player || self.1 == player
    }
}

/// Two teams from the same round competing at one table.
///
/// Stored normalized (lower team first); the order carries no meaning.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Matchup(Team, Team);

impl<'de> Deserialize<'de> for Matchup {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let [a, b] = <[Team; 2]>::deserialize(deserializer)?;
        if a == b {
            return Err(D::Error::custom("matchup teams must be distinct"));
        }
        Ok(Matchup::new(a, b))
    }
}

impl Matchup {
    pub fn new(a: Team, b: Team) -> Self {
        if a < b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }

    pub fn teams(&self) -> [Team; 2] {
        [self.0, self.1]
    }
}

/// One round's record: byes, teams, and matchups.
///
/// Appended once per successfully built round and never mutated afterwards.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub byes: Byes,
    pub teams: Vec<Team>,
    pub matchups: Vec<Matchup>,
}
