//! Identity for Tourney: who is signed in.
//!
//! 1. **Directory**: the in-memory account list, seeded with fixtures
//! 2. **Sign-in**: register / login / logout through the
//!    [`IdentityProvider`] trait
//! 3. **Session cache**: the signed-in user is written to a
//!    [`SessionCache`] and restored the next time a provider is built over
//!    the same cache
//!
//! ```text
//! Facade (above)          ← reports sign-in results as notifications
//!     ↕
//! Identity (this crate)   ← accounts, current user, profile stats
//!     ↕
//! Protocol (below)        ← UserId, Codec
//! ```
//!
//! There is no password hashing and no token scheme. Passwords are kept in
//! the directory only so that `login` can compare them; they never appear
//! on a [`User`].

mod cache;
mod error;
mod provider;
mod user;

pub use cache::{MemoryCache, SessionCache};
pub use error::IdentityError;
pub use provider::{IdentityProvider, LocalIdentity};
pub use user::{IdentityConfig, MatchOutcome, ProfileStats, Registration, Role, User, UserStats};
