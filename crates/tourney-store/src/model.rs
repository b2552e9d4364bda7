//! Tournament, sport, and match records.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tourney_protocol::{MatchId, SportId, TournamentId, UserId};

// ---------------------------------------------------------------------------
// TournamentStatus
// ---------------------------------------------------------------------------

/// Lifecycle of a tournament.
///
/// ```text
/// Upcoming → Live → Completed
/// ```
///
/// - **Upcoming**: accepting joins and sport registrations.
/// - **Live**: matches are being played; joins are still allowed but
///   sports can no longer be added.
/// - **Completed**: read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    Upcoming,
    Live,
    Completed,
}

impl TournamentStatus {
    /// The next status, or `None` from `Completed`.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Upcoming => Some(Self::Live),
            Self::Live => Some(Self::Completed),
            Self::Completed => None,
        }
    }

    pub fn can_transition_to(self, target: Self) -> bool {
        self.next() == Some(target)
    }

    /// Whether users may still join.
    pub fn is_joinable(self) -> bool {
        !matches!(self, Self::Completed)
    }
}

impl fmt::Display for TournamentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Upcoming => write!(f, "upcoming"),
            Self::Live => write!(f, "live"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tournament
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantStatus {
    Registered,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub user: UserId,
    pub status: ParticipantStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub host: UserId,
    /// Short code other users enter to join. Unique within a store.
    pub join_code: String,
    /// Names of the sports the tournament offers.
    pub sports: Vec<String>,
    /// In join order; the host is always first.
    pub participants: Vec<Participant>,
    pub status: TournamentStatus,
    pub rules: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Tournament {
    pub fn is_participant(&self, user: UserId) -> bool {
        self.participants.iter().any(|p| p.user == user)
    }

    pub fn is_host(&self, user: UserId) -> bool {
        self.host == user
    }
}

/// Input to [`TournamentStore::create_tournament`](crate::TournamentStore::create_tournament).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TournamentDraft {
    pub name: String,
    pub sports: Vec<String>,
    pub rules: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl TournamentDraft {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Sport
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SportKind {
    /// Played by teams; eligible for a player auction.
    Team,
    Individual,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sport {
    pub id: SportId,
    pub tournament: TournamentId,
    pub name: String,
    pub kind: SportKind,
    /// Players per side.
    pub max_players: u32,
    /// Registered users, in registration order.
    pub participants: Vec<UserId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SportDraft {
    pub name: String,
    pub kind: SportKind,
    pub max_players: u32,
}

// ---------------------------------------------------------------------------
// Match
// ---------------------------------------------------------------------------

/// One side of a match: a named team or a single user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Team(String),
    User(UserId),
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Team(name) => write!(f, "{name}"),
            Self::User(id) => write!(f, "{id}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Pending,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub tournament: TournamentId,
    pub sport: SportId,
    pub home: Side,
    pub away: Side,
    /// Free-form score, e.g. `"120-115"`.
    pub score: Option<String>,
    /// `None` for a draw or an unplayed match.
    pub winner: Option<Side>,
    pub scheduled_for: DateTime<Utc>,
    pub status: MatchStatus,
    pub created_at: DateTime<Utc>,
}

impl Match {
    pub fn involves(&self, side: &Side) -> bool {
        &self.home == side || &self.away == side
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchDraft {
    pub sport: SportId,
    pub home: Side,
    pub away: Side,
    pub scheduled_for: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_next_follows_strict_order() {
        assert_eq!(TournamentStatus::Upcoming.next(), Some(TournamentStatus::Live));
        assert_eq!(TournamentStatus::Live.next(), Some(TournamentStatus::Completed));
        assert_eq!(TournamentStatus::Completed.next(), None);
    }

    #[test]
    fn test_status_can_transition_to() {
        assert!(TournamentStatus::Upcoming.can_transition_to(TournamentStatus::Live));
        assert!(!TournamentStatus::Upcoming.can_transition_to(TournamentStatus::Completed));
        assert!(!TournamentStatus::Completed.can_transition_to(TournamentStatus::Upcoming));
    }

    #[test]
    fn test_status_is_joinable() {
        assert!(TournamentStatus::Upcoming.is_joinable());
        assert!(TournamentStatus::Live.is_joinable());
        assert!(!TournamentStatus::Completed.is_joinable());
    }

    #[test]
    fn test_side_display() {
        assert_eq!(Side::Team("Team Alpha".into()).to_string(), "Team Alpha");
        assert_eq!(Side::User(UserId(2)).to_string(), "U-2");
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&TournamentStatus::Upcoming).unwrap();
        assert_eq!(json, "\"upcoming\"");
    }
}
