//! # Tourney
//!
//! Tournament management core: accounts, tournaments joined by code,
//! sport registration, match scores, and timer-driven player auctions.
//!
//! The [`Tourney`] application ties the layers together and reports every
//! result as a toast-style [`Notification`](tourney_protocol::Notification):
//!
//! ```text
//! Tourney (this crate)         ← permissions, notifications, config, logging
//!     ↕
//! Identity / Store / Auction   ← accounts, tournaments, auction sessions
//!     ↕
//! Tick / Protocol              ← countdown timer, ids, notifications, codec
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tourney::prelude::*;
//!
//! # async fn run() -> Result<(), TourneyError> {
//! let config = TourneyConfig::default();
//! let mut app = Tourney::new(config, Arc::new(TracingSink));
//! app.login("host@example.com", "password123")?;
//!
//! let (auction, _task) = app.open_auction(SportId(1), &StaticRoster::demo())?;
//! auction.start_bidding().await?;
//! auction.place_bid("Team Beta", 1500).await?;
//! # Ok(())
//! # }
//! ```

mod app;
pub mod config;
mod error;
pub mod logging;

pub use app::{RunningAuction, Tourney};
pub use config::{ConfigError, LogConfig, TourneyConfig};
pub use error::TourneyError;

pub use tourney_auction as auction;
pub use tourney_identity as identity;
pub use tourney_protocol as protocol;
pub use tourney_store as store;
pub use tourney_tick as tick;

/// The types most programs need.
pub mod prelude {
    pub use crate::{ConfigError, RunningAuction, Tourney, TourneyConfig, TourneyError};
    pub use tourney_auction::{
        AuctionConfig, AuctionError, AuctionHandle, AuctionSession, AuctionSnapshot, Outcome,
        Phase, Player, RosterSource, StaticRoster, Team, spawn_auction,
    };
    pub use tourney_identity::{
        IdentityError, IdentityProvider, MemoryCache, ProfileStats, Registration, Role, User,
    };
    pub use tourney_protocol::{
        MatchId, NoticeKind, NoticeLevel, Notification, NotificationSink, NullSink, PlayerId,
        SportId, TournamentId, TracingSink, UserId,
    };
    pub use tourney_store::{
        Match, MatchDraft, MatchStatus, Side, Sport, SportDraft, SportKind, StoreError,
        Tournament, TournamentDraft, TournamentStatus,
    };
}
