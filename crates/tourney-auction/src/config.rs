//! Auction configuration and phase machine.

use std::fmt;

use serde::{Deserialize, Serialize};
use tourney_tick::TickConfig;

// ---------------------------------------------------------------------------
// AuctionConfig
// ---------------------------------------------------------------------------

/// Configuration for an [`AuctionSession`](crate::AuctionSession).
///
/// Every countdown value is in timer ticks. With the default 1 Hz
/// [`TickConfig`] a tick is one second; a faster rate speeds the whole
/// auction up, which the demo uses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuctionConfig {
    /// Opening bid placed by `opening_bidder` when bidding starts. With no
    /// opening bidder it is the floor for the first bid instead.
    pub starting_bid: u64,

    /// Team credited with the opening bid. Off by default; when set it
    /// must name a team in the session.
    pub opening_bidder: Option<String>,

    /// Countdown when bidding opens on a player.
    pub opening_secs: u32,

    /// Countdown after every accepted bid.
    pub extension_secs: u32,

    /// Increment used by [`AuctionSession::suggested_bid`](crate::AuctionSession::suggested_bid).
    pub bid_step: u64,

    /// Timer driving the countdown inside the auction actor.
    pub tick: TickConfig,

    /// Capacity of the actor's command channel.
    pub channel_size: usize,
}

impl Default for AuctionConfig {
    fn default() -> Self {
        Self {
            starting_bid: 1000,
            opening_bidder: None,
            opening_secs: 30,
            extension_secs: 15,
            bid_step: 100,
            tick: TickConfig::default(),
            channel_size: 32,
        }
    }
}

impl AuctionConfig {
    /// Raises zero countdowns, step, and channel size to 1.
    pub fn validated(mut self) -> Self {
        fn at_least_one<T>(field: &str, value: &mut T)
        where
            T: Copy + PartialEq + From<u8>,
        {
            if *value == T::from(0) {
                tracing::warn!(field, "auction config value is 0, using 1");
                *value = T::from(1);
            }
        }

        at_least_one("opening_secs", &mut self.opening_secs);
        at_least_one("extension_secs", &mut self.extension_secs);
        at_least_one("bid_step", &mut self.bid_step);
        if self.channel_size == 0 {
            tracing::warn!(field = "channel_size", "auction config value is 0, using 1");
            self.channel_size = 1;
        }
        self.tick = self.tick.validated();
        self
    }

    /// Credits `team` with `starting_bid` whenever bidding opens.
    pub fn with_opening_bidder(mut self, team: impl Into<String>) -> Self {
        self.opening_bidder = Some(team.into());
        self
    }

    /// Opens with no bidder; `starting_bid` becomes a reserve.
    pub fn without_opening_bidder(mut self) -> Self {
        self.opening_bidder = None;
        self
    }
}

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// Where the auction is for the current player.
///
/// ```text
/// Standby → Active → Sold → Standby (next player)
///                         → Complete (roster exhausted)
/// ```
///
/// `skip` leaves `Standby` or `Active` for the next player's `Standby`,
/// or `Complete` after the last player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// A player is up but bidding has not opened.
    Standby,
    /// Accepting bids; the countdown runs.
    Active,
    /// Bidding closed; waiting for the sale to be confirmed.
    Sold,
    /// Every player has been sold or skipped.
    Complete,
}

impl Phase {
    pub fn accepts_bids(self) -> bool {
        matches!(self, Self::Active)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Complete)
    }

    /// Returns `true` if moving to `target` is a legal step.
    pub fn can_transition_to(self, target: Self) -> bool {
        use Phase::*;
        matches!(
            (self, target),
            (Standby, Active)
                | (Standby, Standby)
                | (Standby, Complete)
                | (Active, Sold)
                | (Active, Standby)
                | (Active, Complete)
                | (Sold, Standby)
                | (Sold, Complete)
        )
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standby => write!(f, "standby"),
            Self::Active => write!(f, "active"),
            Self::Sold => write!(f, "sold"),
            Self::Complete => write!(f, "complete"),
        }
    }
}
