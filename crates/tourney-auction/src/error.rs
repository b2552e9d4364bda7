//! Error types for the auction layer.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Phase;

/// A state-changing auction operation, named in
/// [`AuctionError::InvalidTransition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    StartBidding,
    PlaceBid,
    ForceSold,
    ConfirmSale,
    Skip,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartBidding => write!(f, "start bidding"),
            Self::PlaceBid => write!(f, "place a bid"),
            Self::ForceSold => write!(f, "close bidding"),
            Self::ConfirmSale => write!(f, "confirm the sale"),
            Self::Skip => write!(f, "skip the player"),
        }
    }
}

/// Errors returned by auction operations.
///
/// A rejected operation never changes the session. The last three
/// variants only come from construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuctionError {
    /// The operation is not allowed in the current phase.
    #[error("cannot {op} while the auction is {phase}")]
    InvalidTransition { op: Operation, phase: Phase },

    /// The bid does not beat the current highest bid (or the reserve).
    #[error("bid of {amount} is too low, the minimum is {minimum} (highest bid {highest})")]
    BidTooLow {
        amount: u64,
        highest: u64,
        minimum: u64,
    },

    /// The team cannot cover the bid.
    #[error("{team} cannot afford {amount}, budget is {budget}")]
    InsufficientBudget {
        team: String,
        amount: u64,
        budget: u64,
    },

    /// Every player has already been sold or skipped.
    #[error("all players have been auctioned")]
    RosterExhausted,

    /// No team with this name takes part in the auction.
    #[error("unknown team `{0}`")]
    UnknownTeam(String),

    /// The actor's command channel is closed.
    #[error("auction is no longer running")]
    Unavailable,

    /// The roster has no players.
    #[error("cannot run an auction with no players")]
    EmptyRoster,

    /// Two teams share a name.
    #[error("team `{0}` appears more than once")]
    DuplicateTeam(String),

    /// The configuration does not fit the roster.
    #[error("invalid auction setup: {0}")]
    InvalidConfig(String),
}

impl AuctionError {
    /// Short machine-readable code, used as `error:<reason>` in
    /// notifications.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "invalid_transition",
            Self::BidTooLow { .. } => "bid_too_low",
            Self::InsufficientBudget { .. } => "insufficient_budget",
            Self::RosterExhausted => "roster_exhausted",
            Self::UnknownTeam(_) => "unknown_team",
            Self::Unavailable => "unavailable",
            Self::EmptyRoster => "empty_roster",
            Self::DuplicateTeam(_) => "duplicate_team",
            Self::InvalidConfig(_) => "invalid_config",
        }
    }
}
