//! Unified error type for Tourney.

use tourney_auction::AuctionError;
use tourney_identity::IdentityError;
use tourney_protocol::{ProtocolError, SportId, TournamentId, UserId};
use tourney_store::StoreError;

use crate::config::ConfigError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each wrapping variant lets `?` convert
/// sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum TourneyError {
    /// Encoding or decoding failed.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Sign-in, registration, or profile lookup failed.
    #[error(transparent)]
    Identity(#[from] IdentityError),

    /// A tournament, sport, or match operation was rejected.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// An auction operation was rejected.
    #[error(transparent)]
    Auction(#[from] AuctionError),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Only host accounts may create tournaments.
    #[error("user {0} is not a host account")]
    HostAccountRequired(UserId),

    /// Only the tournament's host may do this.
    #[error("user {user} is not the host of tournament {tournament}")]
    NotHost {
        user: UserId,
        tournament: TournamentId,
    },

    /// Auctions are only held for team sports.
    #[error("sport {0} is not a team sport")]
    NotTeamSport(SportId),
}

impl TourneyError {
    /// Short machine-readable code for `error:<reason>` notifications.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Protocol(_) => "codec",
            Self::Identity(e) => e.reason(),
            Self::Store(e) => e.reason(),
            Self::Auction(e) => e.reason(),
            Self::Config(_) => "invalid_config",
            Self::HostAccountRequired(_) => "host_account_required",
            Self::NotHost { .. } => "not_host",
            Self::NotTeamSport(_) => "not_team_sport",
        }
    }
}
