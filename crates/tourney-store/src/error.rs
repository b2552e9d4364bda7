//! Error types for the store layer.

use tourney_protocol::{MatchId, SportId, TournamentId, UserId};

use crate::TournamentStatus;

/// Errors returned by [`TournamentStore`](crate::TournamentStore) operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No tournament has this id.
    #[error("tournament {0} not found")]
    TournamentNotFound(TournamentId),

    /// No tournament has this join code.
    #[error("invalid tournament code `{0}`")]
    InvalidJoinCode(String),

    /// The user is already a participant.
    #[error("user {0} is already participating in tournament {1}")]
    AlreadyParticipating(UserId, TournamentId),

    /// The user must join the tournament first.
    #[error("user {0} is not a participant of tournament {1}")]
    NotParticipant(UserId, TournamentId),

    /// The tournament's status does not allow this operation.
    #[error("tournament {id} is {status}: {reason}")]
    InvalidState {
        id: TournamentId,
        status: TournamentStatus,
        reason: String,
    },

    /// No sport has this id.
    #[error("sport {0} not found")]
    SportNotFound(SportId),

    /// The user is already registered for the sport.
    #[error("user {0} is already registered for sport {1}")]
    AlreadyRegistered(UserId, SportId),

    /// No match has this id.
    #[error("match {0} not found")]
    MatchNotFound(MatchId),

    /// The match already has a final score.
    #[error("match {0} is already completed")]
    MatchAlreadyCompleted(MatchId),

    /// The named winner is not one of the match's sides.
    #[error("winner is not a side of match {0}")]
    InvalidWinner(MatchId),

    /// A draft failed validation.
    #[error("invalid input: {0}")]
    InvalidDraft(String),
}

impl StoreError {
    /// Short machine-readable code for `error:<reason>` notifications.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::TournamentNotFound(_) => "tournament_not_found",
            Self::InvalidJoinCode(_) => "invalid_join_code",
            Self::AlreadyParticipating(..) => "already_participating",
            Self::NotParticipant(..) => "not_participant",
            Self::InvalidState { .. } => "invalid_state",
            Self::SportNotFound(_) => "sport_not_found",
            Self::AlreadyRegistered(..) => "already_registered",
            Self::MatchNotFound(_) => "match_not_found",
            Self::MatchAlreadyCompleted(_) => "match_already_completed",
            Self::InvalidWinner(_) => "invalid_winner",
            Self::InvalidDraft(_) => "invalid_draft",
        }
    }
}
