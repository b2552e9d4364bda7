//! Identifier types shared across the workspace.
//!
//! All identifiers are `u64` newtypes. `#[serde(transparent)]` keeps them
//! as bare numbers when a snapshot is encoded, so `UserId(2)` becomes `2`
//! in JSON rather than `{ "0": 2 }`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A registered account (host or player).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U-{}", self.0)
    }
}

/// A player that can be put up for auction.
///
/// Distinct from [`UserId`]: the auction roster is supplied by a roster
/// source and its players need not have accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// A tournament record in the tournament store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TournamentId(pub u64);

impl fmt::Display for TournamentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T-{}", self.0)
    }
}

/// A sport registered under a tournament.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SportId(pub u64);

impl fmt::Display for SportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S-{}", self.0)
    }
}

/// A scheduled match between two sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(pub u64);

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "M-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes_distinguish_id_kinds() {
        assert_eq!(UserId(1).to_string(), "U-1");
        assert_eq!(PlayerId(3).to_string(), "P-3");
        assert_eq!(TournamentId(7).to_string(), "T-7");
        assert_eq!(SportId(2).to_string(), "S-2");
        assert_eq!(MatchId(9).to_string(), "M-9");
    }

    #[test]
    fn test_ids_serialize_as_bare_numbers() {
        let json = serde_json::to_string(&TournamentId(42)).unwrap();
        assert_eq!(json, "42");
        let back: UserId = serde_json::from_str("5").unwrap();
        assert_eq!(back, UserId(5));
    }
}
