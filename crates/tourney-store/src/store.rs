//! The tournament store: creates, tracks, and routes users to tournaments.

use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use tourney_protocol::{MatchId, SportId, TournamentId, UserId};

use crate::code::{normalize_join_code, random_code};
use crate::fixtures::fixtures;
use crate::{
    Match, MatchDraft, MatchStatus, Participant, ParticipantStatus, Side, Sport, SportDraft,
    StoreConfig, StoreError, Tournament, TournamentDraft, TournamentStatus,
};

/// Owns every tournament, sport, and match.
///
/// Records live in `BTreeMap`s so listings come back in id order.
pub struct TournamentStore {
    tournaments: BTreeMap<TournamentId, Tournament>,
    /// Normalized join code → tournament. Kept in sync with `tournaments`.
    join_codes: HashMap<String, TournamentId>,
    sports: BTreeMap<SportId, Sport>,
    matches: BTreeMap<MatchId, Match>,
    next_tournament: u64,
    next_sport: u64,
    next_match: u64,
    config: StoreConfig,
}

impl TournamentStore {
    /// Creates a store, loading fixtures if `config.seed_fixtures` is set.
    pub fn new(config: StoreConfig) -> Self {
        let config = config.validated();
        let mut store = Self {
            tournaments: BTreeMap::new(),
            join_codes: HashMap::new(),
            sports: BTreeMap::new(),
            matches: BTreeMap::new(),
            next_tournament: 1,
            next_sport: 1,
            next_match: 1,
            config,
        };
        if store.config.seed_fixtures {
            store.load_fixtures();
        }
        store
    }

    /// A store with the default config (fixtures loaded).
    pub fn seeded() -> Self {
        Self::new(StoreConfig::default())
    }

    /// A store with no records.
    pub fn empty() -> Self {
        Self::new(StoreConfig {
            seed_fixtures: false,
            ..StoreConfig::default()
        })
    }

    fn load_fixtures(&mut self) {
        let seed = fixtures();
        for t in seed.tournaments {
            self.next_tournament = self.next_tournament.max(t.id.0 + 1);
            self.join_codes.insert(normalize_join_code(&t.join_code), t.id);
            self.tournaments.insert(t.id, t);
        }
        for s in seed.sports {
            self.next_sport = self.next_sport.max(s.id.0 + 1);
            self.sports.insert(s.id, s);
        }
        for m in seed.matches {
            self.next_match = self.next_match.max(m.id.0 + 1);
            self.matches.insert(m.id, m);
        }
        tracing::debug!(
            tournaments = self.tournaments.len(),
            sports = self.sports.len(),
            matches = self.matches.len(),
            "fixtures loaded"
        );
    }

    // -----------------------------------------------------------------------
    // Tournaments
    // -----------------------------------------------------------------------

    /// Creates a tournament hosted by `host`.
    ///
    /// The host becomes the first participant, the status starts at
    /// `Upcoming`, and a join code unique within this store is generated.
    pub fn create_tournament(
        &mut self,
        draft: TournamentDraft,
        host: UserId,
    ) -> Result<&Tournament, StoreError> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(StoreError::InvalidDraft("tournament name is required".into()));
        }
        if let (Some(start), Some(end)) = (draft.start_date, draft.end_date) {
            if end < start {
                return Err(StoreError::InvalidDraft(
                    "end date is before start date".into(),
                ));
            }
        }

        let join_code = self.unique_code();
        let id = TournamentId(self.next_tournament);
        self.next_tournament += 1;

        let tournament = Tournament {
            id,
            name: name.to_string(),
            host,
            join_code: join_code.clone(),
            sports: draft.sports,
            participants: vec![Participant {
                user: host,
                status: ParticipantStatus::Registered,
            }],
            status: TournamentStatus::Upcoming,
            rules: draft.rules,
            start_date: draft.start_date,
            end_date: draft.end_date,
            created_at: Utc::now(),
        };

        self.join_codes.insert(join_code.clone(), id);
        self.tournaments.insert(id, tournament);
        tracing::info!(tournament_id = %id, %host, %join_code, "tournament created");

        self.tournaments.get(&id).ok_or(StoreError::TournamentNotFound(id))
    }

    fn unique_code(&self) -> String {
        loop {
            let code = random_code(self.config.join_code_len);
            if !self.join_codes.contains_key(&code) {
                return code;
            }
        }
    }

    /// Adds `user` to the tournament with this join code.
    ///
    /// The code is matched after trimming and upper-casing.
    pub fn join_tournament(
        &mut self,
        code: &str,
        user: UserId,
    ) -> Result<&Tournament, StoreError> {
        let id = self
            .join_codes
            .get(&normalize_join_code(code))
            .copied()
            .ok_or_else(|| StoreError::InvalidJoinCode(code.trim().to_string()))?;
        let tournament = self
            .tournaments
            .get_mut(&id)
            .ok_or(StoreError::TournamentNotFound(id))?;

        if !tournament.status.is_joinable() {
            return Err(StoreError::InvalidState {
                id,
                status: tournament.status,
                reason: "tournament has finished".into(),
            });
        }
        if tournament.is_participant(user) {
            return Err(StoreError::AlreadyParticipating(user, id));
        }

        tournament.participants.push(Participant {
            user,
            status: ParticipantStatus::Registered,
        });
        tracing::info!(
            tournament_id = %id,
            %user,
            participants = tournament.participants.len(),
            "user joined tournament"
        );
        Ok(tournament)
    }

    /// Moves the tournament one step along `Upcoming → Live → Completed`.
    pub fn advance_status(&mut self, id: TournamentId) -> Result<TournamentStatus, StoreError> {
        let tournament = self
            .tournaments
            .get_mut(&id)
            .ok_or(StoreError::TournamentNotFound(id))?;
        let next = tournament.status.next().ok_or_else(|| StoreError::InvalidState {
            id,
            status: tournament.status,
            reason: "no further status".into(),
        })?;
        tracing::info!(tournament_id = %id, from = %tournament.status, to = %next, "tournament status changed");
        tournament.status = next;
        Ok(next)
    }

    pub fn tournament(&self, id: TournamentId) -> Option<&Tournament> {
        self.tournaments.get(&id)
    }

    pub fn by_join_code(&self, code: &str) -> Option<&Tournament> {
        self.join_codes
            .get(&normalize_join_code(code))
            .and_then(|id| self.tournaments.get(id))
    }

    /// Tournaments `user` hosts or participates in, in id order.
    pub fn tournaments_for(&self, user: UserId) -> Vec<&Tournament> {
        self.tournaments
            .values()
            .filter(|t| t.is_host(user) || t.is_participant(user))
            .collect()
    }

    pub fn tournaments(&self) -> impl Iterator<Item = &Tournament> {
        self.tournaments.values()
    }

    pub fn len(&self) -> usize {
        self.tournaments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tournaments.is_empty()
    }

    // -----------------------------------------------------------------------
    // Sports
    // -----------------------------------------------------------------------

    /// Adds a sport to a tournament that has not finished or gone live.
    pub fn add_sport(
        &mut self,
        tournament: TournamentId,
        draft: SportDraft,
    ) -> Result<&Sport, StoreError> {
        let name = draft.name.trim().to_string();
        if name.is_empty() {
            return Err(StoreError::InvalidDraft("sport name is required".into()));
        }
        if draft.max_players == 0 {
            return Err(StoreError::InvalidDraft("max_players must be at least 1".into()));
        }
        let t = self
            .tournaments
            .get_mut(&tournament)
            .ok_or(StoreError::TournamentNotFound(tournament))?;
        if t.status != TournamentStatus::Upcoming {
            return Err(StoreError::InvalidState {
                id: tournament,
                status: t.status,
                reason: "sports can only be added before the tournament starts".into(),
            });
        }
        if !t.sports.iter().any(|s| s.eq_ignore_ascii_case(&name)) {
            t.sports.push(name.clone());
        }

        let id = SportId(self.next_sport);
        self.next_sport += 1;
        self.sports.insert(
            id,
            Sport {
                id,
                tournament,
                name,
                kind: draft.kind,
                max_players: draft.max_players,
                participants: Vec::new(),
            },
        );
        tracing::info!(sport_id = %id, tournament_id = %tournament, "sport added");
        self.sports.get(&id).ok_or(StoreError::SportNotFound(id))
    }

    /// Registers a tournament participant for one of its sports.
    pub fn register_for_sport(
        &mut self,
        sport: SportId,
        user: UserId,
    ) -> Result<&Sport, StoreError> {
        let s = self
            .sports
            .get_mut(&sport)
            .ok_or(StoreError::SportNotFound(sport))?;
        let t = self
            .tournaments
            .get(&s.tournament)
            .ok_or(StoreError::TournamentNotFound(s.tournament))?;
        if !t.is_participant(user) {
            return Err(StoreError::NotParticipant(user, t.id));
        }
        if s.participants.contains(&user) {
            return Err(StoreError::AlreadyRegistered(user, sport));
        }
        s.participants.push(user);
        tracing::info!(sport_id = %sport, %user, "registered for sport");
        Ok(s)
    }

    pub fn sport(&self, id: SportId) -> Option<&Sport> {
        self.sports.get(&id)
    }

    pub fn sports_for(&self, tournament: TournamentId) -> Vec<&Sport> {
        self.sports
            .values()
            .filter(|s| s.tournament == tournament)
            .collect()
    }

    // -----------------------------------------------------------------------
    // Matches
    // -----------------------------------------------------------------------

    /// Schedules a pending match for a sport.
    pub fn create_match(&mut self, draft: MatchDraft) -> Result<&Match, StoreError> {
        let sport = self
            .sports
            .get(&draft.sport)
            .ok_or(StoreError::SportNotFound(draft.sport))?;
        if draft.home == draft.away {
            return Err(StoreError::InvalidDraft("a side cannot play itself".into()));
        }
        let tournament = sport.tournament;

        let id = MatchId(self.next_match);
        self.next_match += 1;
        self.matches.insert(
            id,
            Match {
                id,
                tournament,
                sport: draft.sport,
                home: draft.home,
                away: draft.away,
                score: None,
                winner: None,
                scheduled_for: draft.scheduled_for,
                status: MatchStatus::Pending,
                created_at: Utc::now(),
            },
        );
        tracing::info!(match_id = %id, tournament_id = %tournament, "match scheduled");
        self.matches.get(&id).ok_or(StoreError::MatchNotFound(id))
    }

    /// Records the final score and completes the match.
    ///
    /// `winner` must be one of the match's sides, or `None` for a draw.
    pub fn update_match_score(
        &mut self,
        id: MatchId,
        score: impl Into<String>,
        winner: Option<Side>,
    ) -> Result<&Match, StoreError> {
        let m = self.matches.get_mut(&id).ok_or(StoreError::MatchNotFound(id))?;
        if m.status == MatchStatus::Completed {
            return Err(StoreError::MatchAlreadyCompleted(id));
        }
        if let Some(w) = &winner {
            if !m.involves(w) {
                return Err(StoreError::InvalidWinner(id));
            }
        }
        m.score = Some(score.into());
        m.winner = winner;
        m.status = MatchStatus::Completed;
        tracing::info!(match_id = %id, score = ?m.score, "match score updated");
        Ok(m)
    }

    pub fn match_by_id(&self, id: MatchId) -> Option<&Match> {
        self.matches.get(&id)
    }

    pub fn matches_for(&self, tournament: TournamentId) -> Vec<&Match> {
        self.matches
            .values()
            .filter(|m| m.tournament == tournament)
            .collect()
    }

    /// Pending matches across all tournaments, earliest first.
    pub fn upcoming_matches(&self) -> Vec<&Match> {
        let mut pending: Vec<&Match> = self
            .matches
            .values()
            .filter(|m| m.status == MatchStatus::Pending)
            .collect();
        pending.sort_by_key(|m| (m.scheduled_for, m.id));
        pending
    }
}

impl Default for TournamentStore {
    fn default() -> Self {
        Self::seeded()
    }
}

impl std::fmt::Debug for TournamentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TournamentStore")
            .field("tournaments", &self.tournaments.len())
            .field("sports", &self.sports.len())
            .field("matches", &self.matches.len())
            .finish()
    }
}
