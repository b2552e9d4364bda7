//! Player auctions for Tourney team sports.
//!
//! Teams bid on a fixed roster of players one at a time. Each player goes
//! through `Standby → Active → Sold`, a countdown closes bidding, and every
//! accepted bid restarts the countdown so a last-second bid can be
//! answered.
//!
//! # Key types
//!
//! - [`AuctionSession`]: the synchronous state machine
//! - [`AuctionHandle`] / [`spawn_auction`]: run a session in its own task
//!   with a live countdown
//! - [`RosterSource`] / [`StaticRoster`]: where players and teams come from
//! - [`AuctionConfig`] / [`Phase`]: settings and lifecycle

mod actor;
mod config;
mod error;
mod roster;
mod session;

pub use actor::{AuctionHandle, spawn_auction};
pub use config::{AuctionConfig, Phase};
pub use error::{AuctionError, Operation};
pub use roster::{MAX_SKILL, Player, RosterSource, StaticRoster, Team};
pub use session::{AuctionSession, AuctionSnapshot, Outcome};
