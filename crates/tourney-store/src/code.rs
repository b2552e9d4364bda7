//! Join code generation.

use rand::Rng;

/// Characters a join code is drawn from.
pub const JOIN_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Draws a random code of `len` characters from [`JOIN_CODE_ALPHABET`].
///
/// Uniqueness is the caller's concern; see
/// [`TournamentStore::create_tournament`](crate::TournamentStore::create_tournament).
pub(crate) fn random_code(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| JOIN_CODE_ALPHABET[rng.random_range(0..JOIN_CODE_ALPHABET.len())] as char)
        .collect()
}

/// Canonical form used for lookups: trimmed and upper-cased.
pub fn normalize_join_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}
