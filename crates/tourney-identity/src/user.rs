//! User records and identity configuration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tourney_protocol::{TournamentId, UserId};

// ---------------------------------------------------------------------------
// IdentityConfig
// ---------------------------------------------------------------------------

/// Settings applied to newly registered accounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Virtual money credited to a new account.
    pub starting_virtual_money: u64,
    /// Points awarded per recorded win.
    pub points_per_win: u32,
    /// Load the host/player fixture accounts at construction.
    pub seed_fixtures: bool,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            starting_virtual_money: 10_000,
            points_per_win: 10,
            seed_fixtures: true,
        }
    }
}

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// What an account may do. Hosts create tournaments and run auctions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Host,
    Player,
}

/// Win/loss record shown on the profile page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    pub wins: u32,
    pub losses: u32,
    pub points: u32,
    pub achievements: Vec<String>,
}

/// A signed-in (or sign-in-able) account, without its password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    /// Tournaments the user hosts or has joined.
    pub tournaments: Vec<TournamentId>,
    pub stats: UserStats,
    pub virtual_money: u64,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_host(&self) -> bool {
        self.role == Role::Host
    }
}

/// Input to [`IdentityProvider::register`](crate::IdentityProvider::register).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl Registration {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            role,
        }
    }
}

/// Result of a finished match, from one user's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcome {
    Win,
    Loss,
}

/// Derived statistics for the profile view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileStats {
    pub matches_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub points: u32,
    /// Wins over matches played, in `0.0..=1.0`. `0.0` with no matches.
    pub win_rate: f64,
    pub tournaments: usize,
    pub achievements: Vec<String>,
}

impl ProfileStats {
    pub fn from_user(user: &User) -> Self {
        let played = user.stats.wins + user.stats.losses;
        let win_rate = if played == 0 {
            0.0
        } else {
            user.stats.wins as f64 / played as f64
        };
        Self {
            matches_played: played,
            wins: user.stats.wins,
            losses: user.stats.losses,
            points: user.stats.points,
            win_rate,
            tournaments: user.tournaments.len(),
            achievements: user.stats.achievements.clone(),
        }
    }
}
