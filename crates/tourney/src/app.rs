//! The application layer: the signed-in user acting on the stores.
//!
//! [`Tourney`] owns the identity provider and the tournament store and
//! applies the permission rules the stores do not know about (who is
//! signed in, who hosts what). Every operation reports its result to the
//! notification sink, successes and rejections alike, and also returns it.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tourney_auction::{AuctionHandle, AuctionSession, RosterSource, spawn_auction};
use tourney_identity::{
    IdentityError, IdentityProvider, LocalIdentity, MatchOutcome, MemoryCache, ProfileStats,
    Registration, SessionCache, User,
};
use tourney_protocol::{MatchId, NoticeKind, Notification, NotificationSink, SportId, TournamentId, UserId};
use tourney_store::{
    Match, MatchDraft, Side, Sport, SportDraft, SportKind, StoreError, Tournament, TournamentDraft,
    TournamentStatus, TournamentStore,
};

use crate::{TourneyConfig, TourneyError};

/// A running auction: the handle to drive it and the task that hands the
/// session back once it stops.
pub type RunningAuction = (AuctionHandle, JoinHandle<AuctionSession>);

/// Accounts, tournaments, and auctions behind one signed-in user.
pub struct Tourney<C: SessionCache = MemoryCache> {
    config: TourneyConfig,
    identity: LocalIdentity<C>,
    store: TournamentStore,
    sink: Arc<dyn NotificationSink>,
}

impl Tourney<MemoryCache> {
    /// Builds an application over an in-memory session cache.
    pub fn new(config: TourneyConfig, sink: Arc<dyn NotificationSink>) -> Self {
        Self::with_cache(config, MemoryCache::new(), sink)
    }
}

impl<C: SessionCache> Tourney<C> {
    /// Builds an application whose signed-in user is kept in `cache`.
    pub fn with_cache(config: TourneyConfig, cache: C, sink: Arc<dyn NotificationSink>) -> Self {
        let identity = LocalIdentity::new(config.identity.clone(), cache);
        let store = TournamentStore::new(config.store.clone());
        tracing::info!(
            accounts = identity.len(),
            tournaments = store.len(),
            "tourney initialized"
        );
        Self {
            config,
            identity,
            store,
            sink,
        }
    }

    pub fn config(&self) -> &TourneyConfig {
        &self.config
    }

    pub fn identity(&self) -> &LocalIdentity<C> {
        &self.identity
    }

    pub fn store(&self) -> &TournamentStore {
        &self.store
    }

    pub fn current_user(&self) -> Option<&User> {
        self.identity.current_user()
    }

    // -----------------------------------------------------------------------
    // Accounts
    // -----------------------------------------------------------------------

    pub fn login(&mut self, email: &str, password: &str) -> Result<User, TourneyError> {
        let result = self
            .identity
            .login(email, password)
            .cloned()
            .map_err(TourneyError::from);
        self.report(NoticeKind::Account, result, |u| {
            format!("Login successful, welcome {}", u.name)
        })
    }

    pub fn register(&mut self, registration: Registration) -> Result<User, TourneyError> {
        let result = self
            .identity
            .register(registration)
            .cloned()
            .map_err(TourneyError::from);
        self.report(NoticeKind::Account, result, |u| {
            format!("Registration successful, welcome {}", u.name)
        })
    }

    pub fn logout(&mut self) -> Result<(), TourneyError> {
        let result = self.identity.logout().map_err(TourneyError::from);
        self.report(NoticeKind::Account, result, |_| "Logged out successfully".into())
    }

    /// Statistics for the signed-in user.
    pub fn profile(&self) -> Result<ProfileStats, TourneyError> {
        let user = self.signed_in()?;
        Ok(self.identity.profile(user)?)
    }

    // -----------------------------------------------------------------------
    // Tournaments
    // -----------------------------------------------------------------------

    /// Creates a tournament hosted by the signed-in host account.
    pub fn create_tournament(&mut self, draft: TournamentDraft) -> Result<Tournament, TourneyError> {
        let result = self.try_create_tournament(draft);
        self.report(NoticeKind::Tournament, result, |t| {
            format!("Tournament created, share code {}", t.join_code)
        })
    }

    fn try_create_tournament(&mut self, draft: TournamentDraft) -> Result<Tournament, TourneyError> {
        let user = self.signed_in()?;
        if !self.identity.user(user).is_some_and(User::is_host) {
            return Err(TourneyError::HostAccountRequired(user));
        }
        let tournament = self.store.create_tournament(draft, user)?.clone();
        self.identity.link_tournament(user, tournament.id)?;
        Ok(tournament)
    }

    /// Joins the signed-in user to the tournament with this code.
    pub fn join_tournament(&mut self, code: &str) -> Result<Tournament, TourneyError> {
        let result = self.try_join_tournament(code);
        self.report(NoticeKind::Tournament, result, |t| {
            format!("Successfully joined {}", t.name)
        })
    }

    fn try_join_tournament(&mut self, code: &str) -> Result<Tournament, TourneyError> {
        let user = self.signed_in()?;
        let tournament = self.store.join_tournament(code, user)?.clone();
        self.identity.link_tournament(user, tournament.id)?;
        Ok(tournament)
    }

    /// Moves a tournament the signed-in user hosts to its next status.
    pub fn advance_status(&mut self, id: TournamentId) -> Result<TournamentStatus, TourneyError> {
        let result = self
            .require_host(id)
            .and_then(|_| Ok(self.store.advance_status(id)?));
        self.report(NoticeKind::Tournament, result, |status| {
            format!("Tournament is now {status}")
        })
    }

    pub fn add_sport(&mut self, tournament: TournamentId, draft: SportDraft) -> Result<Sport, TourneyError> {
        let result = self
            .require_host(tournament)
            .and_then(|_| Ok(self.store.add_sport(tournament, draft)?.clone()));
        self.report(NoticeKind::Tournament, result, |s| {
            format!("{} added to tournament", s.name)
        })
    }

    /// Registers the signed-in user for a sport.
    pub fn register_for_sport(&mut self, sport: SportId) -> Result<Sport, TourneyError> {
        let result = self
            .signed_in()
            .and_then(|user| Ok(self.store.register_for_sport(sport, user)?.clone()));
        self.report(NoticeKind::Tournament, result, |s| {
            format!("Successfully registered for {}", s.name)
        })
    }

    pub fn create_match(&mut self, draft: MatchDraft) -> Result<Match, TourneyError> {
        let result = self
            .host_of_sport(draft.sport)
            .map(|_| ())
            .and_then(|_| Ok(self.store.create_match(draft)?.clone()));
        self.report(NoticeKind::Tournament, result, |m| {
            format!("Match scheduled: {} vs {}", m.home, m.away)
        })
    }

    /// Records a final score. When both sides are users, their win/loss
    /// records are updated too.
    pub fn update_match_score(
        &mut self,
        id: MatchId,
        score: &str,
        winner: Option<Side>,
    ) -> Result<Match, TourneyError> {
        let result = self.try_update_match_score(id, score, winner);
        self.report(NoticeKind::Tournament, result, |_| "Match score updated".into())
    }

    fn try_update_match_score(
        &mut self,
        id: MatchId,
        score: &str,
        winner: Option<Side>,
    ) -> Result<Match, TourneyError> {
        let tournament = self
            .store
            .match_by_id(id)
            .map(|m| m.tournament)
            .ok_or(StoreError::MatchNotFound(id))?;
        self.require_host(tournament)?;

        let m = self.store.update_match_score(id, score, winner)?.clone();
        if let (Some(Side::User(won)), Side::User(home), Side::User(away)) = (&m.winner, &m.home, &m.away) {
            let lost = if won == home { *away } else { *home };
            for (user, outcome) in [(*won, MatchOutcome::Win), (lost, MatchOutcome::Loss)] {
                if let Err(err) = self.identity.record_result(user, outcome) {
                    tracing::warn!(%user, match_id = %id, %err, "could not record match result");
                }
            }
        }
        Ok(m)
    }

    // -----------------------------------------------------------------------
    // Auctions
    // -----------------------------------------------------------------------

    /// Starts an auction actor for a team sport of a tournament the
    /// signed-in user hosts. Must be called inside a Tokio runtime.
    pub fn open_auction(
        &self,
        sport: SportId,
        roster: &dyn RosterSource,
    ) -> Result<RunningAuction, TourneyError> {
        let result = self.try_open_auction(sport, roster);
        if result.is_ok() {
            tracing::info!(sport_id = %sport, "auction opened");
        }
        self.report(NoticeKind::Tournament, result, |_| "Auction started".into())
    }

    fn try_open_auction(
        &self,
        sport: SportId,
        roster: &dyn RosterSource,
    ) -> Result<RunningAuction, TourneyError> {
        let s = self.host_of_sport(sport)?;
        if s.kind != SportKind::Team {
            return Err(TourneyError::NotTeamSport(sport));
        }
        let session =
            AuctionSession::from_source(self.config.auction.clone(), roster, Arc::clone(&self.sink))?;
        Ok(spawn_auction(session))
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn signed_in(&self) -> Result<UserId, TourneyError> {
        self.identity
            .current_user()
            .map(|u| u.id)
            .ok_or(TourneyError::Identity(IdentityError::NotSignedIn))
    }

    fn require_host(&self, tournament: TournamentId) -> Result<UserId, TourneyError> {
        let user = self.signed_in()?;
        let t = self
            .store
            .tournament(tournament)
            .ok_or(StoreError::TournamentNotFound(tournament))?;
        if !t.is_host(user) {
            return Err(TourneyError::NotHost { user, tournament });
        }
        Ok(user)
    }

    fn host_of_sport(&self, sport: SportId) -> Result<&Sport, TourneyError> {
        let s = self.store.sport(sport).ok_or(StoreError::SportNotFound(sport))?;
        self.require_host(s.tournament)?;
        Ok(s)
    }

    fn report<T>(
        &self,
        kind: NoticeKind,
        result: Result<T, TourneyError>,
        message: impl FnOnce(&T) -> String,
    ) -> Result<T, TourneyError> {
        match result {
            Ok(value) => {
                self.sink.notify(Notification::success(kind, message(&value)));
                Ok(value)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    fn fail(&self, err: TourneyError) -> TourneyError {
        tracing::debug!(reason = err.reason(), "operation rejected: {err}");
        self.sink.notify(Notification::error(err.reason(), err.to_string()));
        err
    }
}
