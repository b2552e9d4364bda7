//! Store configuration.

use serde::{Deserialize, Serialize};

/// Configuration for a [`TournamentStore`](crate::TournamentStore).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Length of generated join codes. Clamped to `4..=12`.
    pub join_code_len: usize,
    /// Load the fixture tournaments, sports, and matches at construction.
    pub seed_fixtures: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            join_code_len: 6,
            seed_fixtures: true,
        }
    }
}

impl StoreConfig {
    pub const MIN_CODE_LEN: usize = 4;
    pub const MAX_CODE_LEN: usize = 12;

    /// Clamps `join_code_len` into its supported range.
    pub fn validated(mut self) -> Self {
        let clamped = self.join_code_len.clamp(Self::MIN_CODE_LEN, Self::MAX_CODE_LEN);
        if clamped != self.join_code_len {
            tracing::warn!(
                requested = self.join_code_len,
                used = clamped,
                "join_code_len out of range, clamping"
            );
            self.join_code_len = clamped;
        }
        self
    }
}
