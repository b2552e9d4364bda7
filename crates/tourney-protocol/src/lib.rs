//! Shared vocabulary for Tourney.
//!
//! Every other crate in the workspace speaks in terms of the types
//! defined here:
//!
//! - **Identifiers** ([`UserId`], [`PlayerId`], [`TournamentId`], ...):
//!   newtype wrappers so a sport id can never be passed where a match id
//!   is expected.
//! - **Notifications** ([`Notification`], [`NotificationSink`]): the
//!   toast-style messages that stores and the auction emit for display.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how snapshots and the
//!   cached session user are turned into bytes.
//! - **Errors** ([`ProtocolError`]): what can go wrong while encoding or
//!   decoding.
//!
//! ```text
//! Stores / Auction (above)  ← emit notifications, expose snapshots
//!     ↕
//! Protocol (this crate)     ← ids, notifications, codecs
//! ```

mod codec;
mod error;
mod notify;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use notify::{
    NoticeKind, NoticeLevel, Notification, NotificationSink, NullSink, TracingSink,
};
pub use types::{MatchId, PlayerId, SportId, TournamentId, UserId};
