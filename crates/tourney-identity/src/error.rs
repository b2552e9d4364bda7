//! Error types for the identity layer.

use tourney_protocol::{ProtocolError, UserId};

/// Errors returned by an [`IdentityProvider`](crate::IdentityProvider).
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// Unknown email or wrong password. The two are not distinguished.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// An account with this email already exists.
    #[error("an account for {0} already exists")]
    AlreadyRegistered(String),

    /// The operation needs a signed-in user and there is none.
    #[error("no user is signed in")]
    NotSignedIn,

    /// A registration field is missing or malformed.
    #[error("invalid registration: {0}")]
    InvalidRegistration(String),

    /// No account has this id.
    #[error("user {0} not found")]
    UnknownUser(UserId),

    /// The cached user could not be encoded or decoded.
    #[error("session cache: {0}")]
    Cache(#[from] ProtocolError),
}

impl IdentityError {
    /// Short machine-readable code for `error:<reason>` notifications.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "invalid_credentials",
            Self::AlreadyRegistered(_) => "already_registered",
            Self::NotSignedIn => "not_signed_in",
            Self::InvalidRegistration(_) => "invalid_registration",
            Self::UnknownUser(_) => "unknown_user",
            Self::Cache(_) => "session_cache",
        }
    }
}
