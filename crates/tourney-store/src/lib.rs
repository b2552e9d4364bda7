//! Tournament records for Tourney.
//!
//! The [`TournamentStore`] owns every tournament, sport, and match. It is
//! a plain in-memory structure: callers hold it (behind a lock if they
//! share it) and mutate it through its methods, which enforce the rules
//! below.
//!
//! # Key types
//!
//! - [`TournamentStore`]: create/join tournaments, sports, matches
//! - [`Tournament`] / [`TournamentStatus`]: a tournament and its
//!   `Upcoming → Live → Completed` lifecycle
//! - [`Sport`], [`Match`]: registration and score entry
//! - [`StoreConfig`]: join code length, fixture seeding

mod code;
mod config;
mod error;
mod fixtures;
mod model;
mod store;

pub use code::{JOIN_CODE_ALPHABET, normalize_join_code};
pub use config::StoreConfig;
pub use error::StoreError;
pub use model::{
    Match, MatchDraft, MatchStatus, Participant, ParticipantStatus, Side, Sport, SportDraft,
    SportKind, Tournament, TournamentDraft, TournamentStatus,
};
pub use store::TournamentStore;
