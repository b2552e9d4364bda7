//! The identity provider: account directory plus the current session.
//!
//! ## Lifecycle
//!
//! ```text
//! new(cache) ──→ [restored user?] ──→ login()/register() ──→ logout()
//!                                          │                    │
//!                                          ▼                    ▼
//!                                   cache.store(user)      cache.clear()
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tourney_protocol::{Codec, JsonCodec, TournamentId, UserId};

use crate::{
    IdentityConfig, IdentityError, MatchOutcome, ProfileStats, Registration, Role, SessionCache,
    User, UserStats,
};

/// Supplies the current user and the sign-in operations.
pub trait IdentityProvider {
    /// The signed-in user, if any.
    fn current_user(&self) -> Option<&User>;

    /// Signs in with email and password, replacing any current user.
    ///
    /// # Errors
    /// [`IdentityError::InvalidCredentials`] for an unknown email or a
    /// wrong password.
    fn login(&mut self, email: &str, password: &str) -> Result<&User, IdentityError>;

    /// Creates an account and signs it in.
    ///
    /// # Errors
    /// - [`IdentityError::AlreadyRegistered`]: the email is taken
    /// - [`IdentityError::InvalidRegistration`]: empty name/password or
    ///   an email without `@`
    fn register(&mut self, registration: Registration) -> Result<&User, IdentityError>;

    /// Signs out.
    ///
    /// # Errors
    /// [`IdentityError::NotSignedIn`] if nobody is signed in.
    fn logout(&mut self) -> Result<(), IdentityError>;
}

/// A directory entry. The password never leaves this struct.
#[derive(Debug, Clone)]
struct Account {
    user: User,
    password: String,
}

/// In-memory [`IdentityProvider`] backed by a [`SessionCache`].
pub struct LocalIdentity<C: SessionCache, K: Codec = JsonCodec> {
    /// All accounts, keyed by id.
    accounts: HashMap<UserId, Account>,
    /// Lower-cased email → id. Kept in sync with `accounts`.
    emails: HashMap<String, UserId>,
    current: Option<UserId>,
    next_id: u64,
    config: IdentityConfig,
    cache: C,
    codec: K,
}

impl<C: SessionCache> LocalIdentity<C, JsonCodec> {
    /// Builds a provider over `cache` using JSON for the cached record.
    pub fn new(config: IdentityConfig, cache: C) -> Self {
        Self::with_codec(config, cache, JsonCodec)
    }
}

impl<C: SessionCache, K: Codec> LocalIdentity<C, K> {
    /// Builds a provider, seeding fixtures if configured and restoring a
    /// cached user.
    ///
    /// A cached record that does not decode, or that names an account not
    /// in the directory, is discarded.
    pub fn with_codec(config: IdentityConfig, cache: C, codec: K) -> Self {
        let mut provider = Self {
            accounts: HashMap::new(),
            emails: HashMap::new(),
            current: None,
            next_id: 1,
            config,
            cache,
            codec,
        };
        if provider.config.seed_fixtures {
            for (user, password) in fixture_accounts() {
                provider.insert(user, password);
            }
        }
        provider.restore();
        provider
    }

    fn insert(&mut self, user: User, password: String) {
        self.next_id = self.next_id.max(user.id.0 + 1);
        self.emails.insert(normalize_email(&user.email), user.id);
        self.accounts.insert(user.id, Account { user, password });
    }

    fn restore(&mut self) {
        let Some(record) = self.cache.load() else {
            return;
        };
        match self.codec.decode::<User>(&record) {
            Ok(cached) => {
                let known = self
                    .accounts
                    .get(&cached.id)
                    .is_some_and(|a| normalize_email(&a.user.email) == normalize_email(&cached.email));
                if known {
                    tracing::info!(user_id = %cached.id, "session restored from cache");
                    self.current = Some(cached.id);
                } else {
                    tracing::debug!(user_id = %cached.id, "cached user not in directory, clearing");
                    self.cache.clear();
                }
            }
            Err(e) => {
                tracing::debug!(error = %e, "cached session unreadable, clearing");
                self.cache.clear();
            }
        }
    }

    /// Writes the current user to the cache.
    fn persist_current(&mut self) -> Result<(), IdentityError> {
        if let Some(account) = self.current.and_then(|id| self.accounts.get(&id)) {
            let record = self.codec.encode(&account.user)?;
            self.cache.store(record);
        }
        Ok(())
    }

    fn sign_in(&mut self, user_id: UserId) -> Result<&User, IdentityError> {
        self.current = Some(user_id);
        self.persist_current()?;
        self.accounts
            .get(&user_id)
            .map(|a| &a.user)
            .ok_or(IdentityError::UnknownUser(user_id))
    }

    /// Looks up any account by id.
    pub fn user(&self, user_id: UserId) -> Option<&User> {
        self.accounts.get(&user_id).map(|a| &a.user)
    }

    /// Records a finished match for `user_id`.
    ///
    /// A win adds `config.points_per_win` points.
    pub fn record_result(
        &mut self,
        user_id: UserId,
        outcome: MatchOutcome,
    ) -> Result<&User, IdentityError> {
        let points = self.config.points_per_win;
        let account = self
            .accounts
            .get_mut(&user_id)
            .ok_or(IdentityError::UnknownUser(user_id))?;
        match outcome {
            MatchOutcome::Win => {
                account.user.stats.wins += 1;
                account.user.stats.points += points;
            }
            MatchOutcome::Loss => account.user.stats.losses += 1,
        }
        tracing::debug!(%user_id, ?outcome, "match result recorded");
        if self.current == Some(user_id) {
            self.persist_current()?;
        }
        self.user(user_id).ok_or(IdentityError::UnknownUser(user_id))
    }

    /// Adds `tournament` to the user's list (no-op if already present).
    pub fn link_tournament(
        &mut self,
        user_id: UserId,
        tournament: TournamentId,
    ) -> Result<(), IdentityError> {
        let account = self
            .accounts
            .get_mut(&user_id)
            .ok_or(IdentityError::UnknownUser(user_id))?;
        if !account.user.tournaments.contains(&tournament) {
            account.user.tournaments.push(tournament);
        }
        if self.current == Some(user_id) {
            self.persist_current()?;
        }
        Ok(())
    }

    /// Profile statistics for any account.
    pub fn profile(&self, user_id: UserId) -> Result<ProfileStats, IdentityError> {
        self.user(user_id)
            .map(ProfileStats::from_user)
            .ok_or(IdentityError::UnknownUser(user_id))
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Consumes the provider and returns its cache.
    pub fn into_cache(self) -> C {
        self.cache
    }
}

impl<C: SessionCache, K: Codec> IdentityProvider for LocalIdentity<C, K> {
    fn current_user(&self) -> Option<&User> {
        self.current.and_then(|id| self.user(id))
    }

    fn login(&mut self, email: &str, password: &str) -> Result<&User, IdentityError> {
        let user_id = self
            .emails
            .get(&normalize_email(email))
            .copied()
            .filter(|id| self.accounts.get(id).is_some_and(|a| a.password == password))
            .ok_or(IdentityError::InvalidCredentials)?;

        tracing::info!(%user_id, "login successful");
        self.sign_in(user_id)
    }

    fn register(&mut self, registration: Registration) -> Result<&User, IdentityError> {
        let name = registration.name.trim();
        let email = normalize_email(&registration.email);
        if name.is_empty() {
            return Err(IdentityError::InvalidRegistration("name is required".into()));
        }
        if !email.contains('@') {
            return Err(IdentityError::InvalidRegistration(format!(
                "`{}` is not an email address",
                registration.email
            )));
        }
        if registration.password.is_empty() {
            return Err(IdentityError::InvalidRegistration("password is required".into()));
        }
        if self.emails.contains_key(&email) {
            return Err(IdentityError::AlreadyRegistered(email));
        }

        let user = User {
            id: UserId(self.next_id),
            name: name.to_string(),
            email,
            role: registration.role,
            tournaments: Vec::new(),
            stats: UserStats::default(),
            virtual_money: self.config.starting_virtual_money,
            created_at: Utc::now(),
        };
        let user_id = user.id;
        self.insert(user, registration.password);

        tracing::info!(%user_id, role = ?registration.role, "account registered");
        self.sign_in(user_id)
    }

    fn logout(&mut self) -> Result<(), IdentityError> {
        let user_id = self.current.take().ok_or(IdentityError::NotSignedIn)?;
        self.cache.clear();
        tracing::info!(%user_id, "logged out");
        Ok(())
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn fixture_time(rfc3339: &str) -> DateTime<Utc> {
    rfc3339.parse().unwrap_or_default()
}

/// The host and player accounts every fresh directory starts with.
fn fixture_accounts() -> Vec<(User, String)> {
    vec![
        (
            User {
                id: UserId(1),
                name: "John Host".into(),
                email: "host@example.com".into(),
                role: Role::Host,
                tournaments: vec![TournamentId(1), TournamentId(2)],
                stats: UserStats {
                    wins: 15,
                    losses: 5,
                    points: 150,
                    achievements: vec!["Tournament Creator".into(), "Sport Master".into()],
                },
                virtual_money: 15_000,
                created_at: fixture_time("2023-01-15T12:00:00Z"),
            },
            "password123".into(),
        ),
        (
            User {
                id: UserId(2),
                name: "Jane Player".into(),
                email: "player@example.com".into(),
                role: Role::Player,
                tournaments: vec![TournamentId(1)],
                stats: UserStats {
                    wins: 8,
                    losses: 2,
                    points: 80,
                    achievements: vec!["First Win".into(), "Tournament Joiner".into()],
                },
                virtual_money: 10_000,
                created_at: fixture_time("2023-01-20T14:30:00Z"),
            },
            "password123".into(),
        ),
    ]
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! Unit tests for `LocalIdentity`, named
    //! `test_{operation}_{scenario}_{expected}`.

    use super::*;
    use crate::MemoryCache;

    fn seeded() -> LocalIdentity<MemoryCache> {
        LocalIdentity::new(IdentityConfig::default(), MemoryCache::new())
    }

    fn empty() -> LocalIdentity<MemoryCache> {
        LocalIdentity::new(
            IdentityConfig {
                seed_fixtures: false,
                ..IdentityConfig::default()
            },
            MemoryCache::new(),
        )
    }

    fn alice() -> Registration {
        Registration::new("Alice", "alice@example.com", "secret", Role::Player)
    }

    // =====================================================================
    // construction
    // =====================================================================

    #[test]
    fn test_new_seeded_loads_fixture_accounts() {
        let id = seeded();
        assert_eq!(id.len(), 2);
        assert!(id.current_user().is_none());
        assert_eq!(id.user(UserId(1)).unwrap().name, "John Host");
        assert!(id.user(UserId(1)).unwrap().is_host());
    }

    #[test]
    fn test_new_unseeded_is_empty() {
        assert!(empty().is_empty());
    }

    // =====================================================================
    // login()
    // =====================================================================

    #[test]
    fn test_login_valid_credentials_signs_in() {
        let mut id = seeded();
        let user = id.login("player@example.com", "password123").unwrap();
        assert_eq!(user.id, UserId(2));
        assert_eq!(id.current_user().unwrap().name, "Jane Player");
    }

    #[test]
    fn test_login_email_is_case_insensitive() {
        let mut id = seeded();
        assert!(id.login("  HOST@Example.com ", "password123").is_ok());
    }

    #[test]
    fn test_login_wrong_password_returns_invalid_credentials() {
        let mut id = seeded();
        let result = id.login("host@example.com", "nope");
        assert!(matches!(result, Err(IdentityError::InvalidCredentials)));
        assert!(id.current_user().is_none());
    }

    #[test]
    fn test_login_unknown_email_returns_invalid_credentials() {
        let mut id = seeded();
        let result = id.login("ghost@example.com", "password123");
        assert!(matches!(result, Err(IdentityError::InvalidCredentials)));
    }

    // =====================================================================
    // register()
    // =====================================================================

    #[test]
    fn test_register_new_account_signs_in_with_defaults() {
        let mut id = seeded();
        let user = id.register(alice()).unwrap().clone();

        assert_eq!(user.id, UserId(3));
        assert_eq!(user.virtual_money, 10_000);
        assert_eq!(user.stats, UserStats::default());
        assert_eq!(id.current_user().unwrap().id, user.id);
    }

    #[test]
    fn test_register_duplicate_email_returns_already_registered() {
        let mut id = seeded();
        let result = id.register(Registration::new(
            "Imposter",
            "Host@Example.com",
            "x",
            Role::Host,
        ));
        assert!(matches!(result, Err(IdentityError::AlreadyRegistered(e)) if e == "host@example.com"));
        assert_eq!(id.len(), 2);
    }

    #[test]
    fn test_register_rejects_malformed_input() {
        let mut id = empty();
        let no_name = Registration::new("  ", "a@b.c", "pw", Role::Player);
        let bad_email = Registration::new("A", "not-an-email", "pw", Role::Player);
        let no_password = Registration::new("A", "a@b.c", "", Role::Player);

        for reg in [no_name, bad_email, no_password] {
            assert!(matches!(
                id.register(reg),
                Err(IdentityError::InvalidRegistration(_))
            ));
        }
        assert!(id.is_empty());
    }

    #[test]
    fn test_register_then_login_round_trip() {
        let mut id = empty();
        id.register(alice()).unwrap();
        id.logout().unwrap();

        let user = id.login("alice@example.com", "secret").unwrap();
        assert_eq!(user.name, "Alice");
    }

    // =====================================================================
    // logout()
    // =====================================================================

    #[test]
    fn test_logout_when_signed_out_returns_not_signed_in() {
        let mut id = seeded();
        assert!(matches!(id.logout(), Err(IdentityError::NotSignedIn)));
    }

    #[test]
    fn test_logout_clears_current_and_cache() {
        let mut id = seeded();
        id.login("host@example.com", "password123").unwrap();
        id.logout().unwrap();

        assert!(id.current_user().is_none());
        assert!(!id.into_cache().is_occupied());
    }

    // =====================================================================
    // session cache
    // =====================================================================

    #[test]
    fn test_cache_restores_user_in_new_provider() {
        let mut first = seeded();
        first.login("player@example.com", "password123").unwrap();
        let cache = first.into_cache();
        assert!(cache.is_occupied());

        let second = LocalIdentity::new(IdentityConfig::default(), cache);
        assert_eq!(second.current_user().unwrap().id, UserId(2));
    }

    #[test]
    fn test_cache_with_unknown_user_is_discarded() {
        let mut first = empty();
        first.register(alice()).unwrap();
        let cache = first.into_cache();

        // Fresh seeded directory has no "alice".
        let second = LocalIdentity::new(IdentityConfig::default(), cache);
        assert!(second.current_user().is_none());
        assert!(!second.into_cache().is_occupied());
    }

    #[test]
    fn test_cache_with_garbage_is_discarded() {
        let mut cache = MemoryCache::new();
        cache.store(b"{broken".to_vec());

        let id = LocalIdentity::new(IdentityConfig::default(), cache);
        assert!(id.current_user().is_none());
        assert!(!id.into_cache().is_occupied());
    }

    // =====================================================================
    // stats & profile
    // =====================================================================

    #[test]
    fn test_record_result_win_adds_points() {
        let mut id = seeded();
        let user = id.record_result(UserId(2), MatchOutcome::Win).unwrap();
        assert_eq!(user.stats.wins, 9);
        assert_eq!(user.stats.points, 90);

        let user = id.record_result(UserId(2), MatchOutcome::Loss).unwrap();
        assert_eq!(user.stats.losses, 3);
        assert_eq!(user.stats.points, 90);
    }

    #[test]
    fn test_record_result_unknown_user_errors() {
        let mut id = seeded();
        assert!(matches!(
            id.record_result(UserId(99), MatchOutcome::Win),
            Err(IdentityError::UnknownUser(UserId(99)))
        ));
    }

    #[test]
    fn test_record_result_refreshes_cached_current_user() {
        let mut id = seeded();
        id.login("player@example.com", "password123").unwrap();
        id.record_result(UserId(2), MatchOutcome::Win).unwrap();

        let record = id.into_cache().load().unwrap();
        let cached: User = JsonCodec.decode(&record).unwrap();
        assert_eq!(cached.stats.wins, 9);
    }

    #[test]
    fn test_link_tournament_is_idempotent() {
        let mut id = seeded();
        id.link_tournament(UserId(2), TournamentId(2)).unwrap();
        id.link_tournament(UserId(2), TournamentId(2)).unwrap();
        assert_eq!(
            id.user(UserId(2)).unwrap().tournaments,
            vec![TournamentId(1), TournamentId(2)]
        );
    }

    #[test]
    fn test_profile_reports_fixture_stats() {
        let id = seeded();
        let profile = id.profile(UserId(1)).unwrap();
        assert_eq!(profile.matches_played, 20);
        assert_eq!(profile.points, 150);
        assert_eq!(profile.tournaments, 2);
    }
}
