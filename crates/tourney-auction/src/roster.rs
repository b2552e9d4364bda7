//! Players up for auction and the teams bidding on them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tourney_protocol::{PlayerId, UserId};

/// Highest value a skill rating can take.
pub const MAX_SKILL: u8 = 100;

/// A player up for auction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Display initial.
    pub avatar: String,
    /// Attribute name to rating in `0..=100`.
    pub skills: BTreeMap<String, u8>,
}

impl Player {
    /// A player with no skills and the first letter of `name` as avatar.
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        let name = name.into();
        let avatar = name
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_default();
        Self {
            id,
            name,
            avatar,
            skills: BTreeMap::new(),
        }
    }

    /// Adds a skill rating, capped at [`MAX_SKILL`].
    pub fn with_skill(mut self, skill: impl Into<String>, rating: u8) -> Self {
        self.skills.insert(skill.into(), rating.min(MAX_SKILL));
        self
    }

    pub fn skill(&self, skill: &str) -> Option<u8> {
        self.skills.get(skill).copied()
    }
}

/// A team bidding in the auction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Unique within an auction.
    pub name: String,
    /// Remaining spend.
    pub budget: u64,
    /// Players won, in purchase order.
    pub acquired_players: Vec<Player>,
    pub captain: Option<UserId>,
}

impl Team {
    pub fn new(name: impl Into<String>, budget: u64) -> Self {
        Self {
            name: name.into(),
            budget,
            acquired_players: Vec::new(),
            captain: None,
        }
    }

    pub fn with_captain(mut self, captain: UserId) -> Self {
        self.captain = Some(captain);
        self
    }

    pub fn can_afford(&self, amount: u64) -> bool {
        amount <= self.budget
    }
}

/// Supplies the players and teams an auction starts from.
pub trait RosterSource {
    /// Players in auction order.
    fn players(&self) -> Vec<Player>;

    /// Participating teams with their starting budgets.
    fn teams(&self) -> Vec<Team>;
}

/// A [`RosterSource`] over fixed lists.
#[derive(Debug, Clone, Default)]
pub struct StaticRoster {
    players: Vec<Player>,
    teams: Vec<Team>,
}

impl StaticRoster {
    pub fn new(players: Vec<Player>, teams: Vec<Team>) -> Self {
        Self { players, teams }
    }

    /// Four rated players and two 5000-budget teams captained by the
    /// seeded host and player accounts.
    pub fn demo() -> Self {
        let players = vec![
            Player::new(PlayerId(3), "Alex Smith")
                .with_skill("batting", 85)
                .with_skill("bowling", 65)
                .with_skill("fielding", 75),
            Player::new(PlayerId(4), "Emma Johnson")
                .with_skill("batting", 70)
                .with_skill("bowling", 90)
                .with_skill("fielding", 80),
            Player::new(PlayerId(5), "Michael Brown")
                .with_skill("batting", 90)
                .with_skill("bowling", 60)
                .with_skill("fielding", 85),
            Player::new(PlayerId(6), "Olivia Davis")
                .with_skill("batting", 65)
                .with_skill("bowling", 85)
                .with_skill("fielding", 90),
        ];
        let teams = vec![
            Team::new("Team Alpha", 5000).with_captain(UserId(1)),
            Team::new("Team Beta", 5000).with_captain(UserId(2)),
        ];
        Self { players, teams }
    }
}

impl RosterSource for StaticRoster {
    fn players(&self) -> Vec<Player> {
        self.players.clone()
    }

    fn teams(&self) -> Vec<Team> {
        self.teams.clone()
    }
}
