//! The auction state machine.
//!
//! [`AuctionSession`] is synchronous and owns no timer. Time reaches it
//! through [`AuctionSession::tick`], called by the actor (or a test) once
//! per elapsed countdown second.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tourney_protocol::{NoticeKind, Notification, NotificationSink, PlayerId};
use tracing::{debug, info, trace};

use crate::{AuctionConfig, AuctionError, Operation, Phase, Player, RosterSource, Team};

/// What happened to one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// Went to `team` for `price`, already debited from its budget.
    Sold {
        player: PlayerId,
        team: String,
        price: u64,
    },
    /// Skipped, or bidding closed with no bid.
    Unsold {
        player: PlayerId,
    },
}

impl Outcome {
    /// The player this outcome is about.
    pub fn player(&self) -> PlayerId {
        match self {
            Self::Sold { player, .. } | Self::Unsold { player } => *player,
        }
    }

    /// Returns `true` if a team bought the player.
    pub fn is_sold(&self) -> bool {
        matches!(self, Self::Sold { .. })
    }
}

/// Point-in-time view of a session, safe to hand to a UI or encode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionSnapshot {
    pub phase: Phase,
    /// Equals `roster_len` once complete.
    pub current_player_index: usize,
    pub roster_len: usize,
    pub current_player: Option<Player>,
    /// 0 with no bidder.
    pub highest_bid: u64,
    pub highest_bidder: Option<String>,
    pub remaining_seconds: u32,
    /// See [`AuctionSession::suggested_bid`].
    pub suggested_bid: u64,
    pub teams: Vec<Team>,
    pub outcomes: Vec<Outcome>,
}

/// One auction over a fixed roster.
///
/// Every operation either succeeds and emits a notification, or fails
/// with an [`AuctionError`], reports it to the sink as `error:<reason>`,
/// and leaves the session untouched.
pub struct AuctionSession {
    config: AuctionConfig,
    roster: Vec<Player>,
    teams: Vec<Team>,
    current: usize,
    phase: Phase,
    /// 0 means no bid yet; `highest_bidder` is `None` exactly then.
    highest_bid: u64,
    highest_bidder: Option<String>,
    remaining_secs: u32,
    outcomes: Vec<Outcome>,
    sink: Arc<dyn NotificationSink>,
}

impl AuctionSession {
    /// Creates a session in `Standby` on the first player.
    pub fn new(
        config: AuctionConfig,
        roster: Vec<Player>,
        teams: Vec<Team>,
        sink: Arc<dyn NotificationSink>,
    ) -> Result<Self, AuctionError> {
        let config = config.validated();

        if roster.is_empty() {
            return Err(AuctionError::EmptyRoster);
        }
        let mut seen_players = HashSet::new();
        for player in &roster {
            if !seen_players.insert(player.id) {
                return Err(AuctionError::InvalidConfig(format!(
                    "player {} appears more than once",
                    player.id
                )));
            }
        }
        let mut seen_teams = HashSet::new();
        for team in &teams {
            if !seen_teams.insert(team.name.as_str()) {
                return Err(AuctionError::DuplicateTeam(team.name.clone()));
            }
        }
        if let Some(opener) = &config.opening_bidder {
            if config.starting_bid == 0 {
                return Err(AuctionError::InvalidConfig(
                    "an opening bidder needs a starting bid above 0".into(),
                ));
            }
            let team = teams
                .iter()
                .find(|t| &t.name == opener)
                .ok_or_else(|| {
                    AuctionError::InvalidConfig(format!("opening bidder `{opener}` is not a team"))
                })?;
            if !team.can_afford(config.starting_bid) {
                return Err(AuctionError::InvalidConfig(format!(
                    "opening bidder `{opener}` cannot cover the starting bid of {}",
                    config.starting_bid
                )));
            }
        }

        info!(
            players = roster.len(),
            teams = teams.len(),
            starting_bid = config.starting_bid,
            "auction session created"
        );

        Ok(Self {
            config,
            roster,
            teams,
            current: 0,
            phase: Phase::Standby,
            highest_bid: 0,
            highest_bidder: None,
            remaining_secs: 0,
            outcomes: Vec::new(),
            sink,
        })
    }

    /// Creates a session from a [`RosterSource`].
    pub fn from_source(
        config: AuctionConfig,
        source: &dyn RosterSource,
        sink: Arc<dyn NotificationSink>,
    ) -> Result<Self, AuctionError> {
        Self::new(config, source.players(), source.teams(), sink)
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// Opens bidding on the current player.
    ///
    /// The opening bidder is credited with `starting_bid` if it can still
    /// afford it; otherwise bidding opens empty with `starting_bid` as the
    /// reserve.
    pub fn start_bidding(&mut self) -> Result<(), AuctionError> {
        self.require(Operation::StartBidding, &[Phase::Standby])?;

        let opener = self
            .config
            .opening_bidder
            .as_deref()
            .and_then(|name| self.team(name))
            .filter(|team| team.can_afford(self.config.starting_bid))
            .map(|team| team.name.clone());
        if opener.is_none() {
            if let Some(name) = &self.config.opening_bidder {
                debug!(team = %name, "opening bidder cannot cover the starting bid, opening empty");
            }
        }

        self.highest_bid = if opener.is_some() {
            self.config.starting_bid
        } else {
            0
        };
        self.highest_bidder = opener;
        self.remaining_secs = self.config.opening_secs;
        self.transition(Phase::Active);

        let player = self.current_name();
        info!(
            %player,
            highest_bid = self.highest_bid,
            remaining = self.remaining_secs,
            "bidding opened"
        );
        self.emit(Notification::info(
            NoticeKind::Started,
            format!("Bidding open for {player}"),
        ));
        Ok(())
    }

    /// Places a bid for `team`.
    ///
    /// Accepted bids reset the countdown to `extension_secs`.
    pub fn place_bid(&mut self, team: &str, amount: u64) -> Result<(), AuctionError> {
        self.require(Operation::PlaceBid, &[Phase::Active])?;

        let Some(budget) = self.team(team).map(|t| t.budget) else {
            return self.reject(AuctionError::UnknownTeam(team.to_string()));
        };
        let minimum = self.minimum_bid();
        if amount < minimum {
            return self.reject(AuctionError::BidTooLow {
                amount,
                highest: self.highest_bid,
                minimum,
            });
        }
        if amount > budget {
            return self.reject(AuctionError::InsufficientBudget {
                team: team.to_string(),
                amount,
                budget,
            });
        }

        self.highest_bid = amount;
        self.highest_bidder = Some(team.to_string());
        self.remaining_secs = self.config.extension_secs;

        info!(%team, amount, remaining = self.remaining_secs, "bid accepted");
        self.emit(Notification::success(
            NoticeKind::BidPlaced,
            format!("{team} bid {amount}"),
        ));
        Ok(())
    }

    /// Advances the countdown by `elapsed` seconds.
    ///
    /// Returns `true` if this tick closed bidding. Outside `Active` the
    /// call does nothing.
    pub fn tick(&mut self, elapsed: u64) -> bool {
        if !self.phase.accepts_bids() {
            return false;
        }
        let elapsed = u32::try_from(elapsed).unwrap_or(u32::MAX);
        self.remaining_secs = self.remaining_secs.saturating_sub(elapsed);
        trace!(remaining = self.remaining_secs, "countdown tick");

        if self.remaining_secs == 0 {
            self.close_bidding("time expired");
            true
        } else {
            false
        }
    }

    /// Closes bidding early.
    pub fn force_sold(&mut self) -> Result<(), AuctionError> {
        self.require(Operation::ForceSold, &[Phase::Active])?;
        self.close_bidding("closed early");
        Ok(())
    }

    /// Settles the closed auction and moves to the next player.
    ///
    /// The winner pays the highest bid and receives the player. With no
    /// bidder the player goes unsold.
    pub fn confirm_sale(&mut self) -> Result<Outcome, AuctionError> {
        self.require(Operation::ConfirmSale, &[Phase::Sold])?;

        let player = self.roster[self.current].clone();
        let price = self.highest_bid;

        let outcome = match self.highest_bidder.clone() {
            Some(name) => {
                let Some(idx) = self.teams.iter().position(|t| t.name == name) else {
                    return self.reject(AuctionError::UnknownTeam(name));
                };
                let budget = self.teams[idx].budget;
                let Some(remaining) = budget.checked_sub(price) else {
                    return self.reject(AuctionError::InsufficientBudget {
                        team: name,
                        amount: price,
                        budget,
                    });
                };
                let team = &mut self.teams[idx];
                team.budget = remaining;
                team.acquired_players.push(player.clone());

                info!(player = %player.name, team = %name, price, budget = remaining, "player sold");
                self.emit(Notification::success(
                    NoticeKind::Sold,
                    format!("{} sold to {name} for {price}", player.name),
                ));
                Outcome::Sold {
                    player: player.id,
                    team: name,
                    price,
                }
            }
            None => {
                info!(player = %player.name, "player went unsold");
                self.emit(Notification::info(
                    NoticeKind::Skipped,
                    format!("{} went unsold", player.name),
                ));
                Outcome::Unsold { player: player.id }
            }
        };

        self.advance(outcome.clone());
        Ok(outcome)
    }

    /// Passes over the current player without a sale.
    pub fn skip(&mut self) -> Result<Outcome, AuctionError> {
        self.require(Operation::Skip, &[Phase::Standby, Phase::Active])?;

        let player = &self.roster[self.current];
        let outcome = Outcome::Unsold { player: player.id };
        info!(player = %player.name, "player skipped");
        let notice = Notification::info(NoticeKind::Skipped, format!("{} skipped", player.name));
        self.emit(notice);

        self.advance(outcome.clone());
        Ok(outcome)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Returns `true` once every player has been sold or skipped.
    pub fn is_complete(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Index of the player under the hammer; equals the roster length
    /// once complete.
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The player under the hammer, `None` once complete.
    pub fn current_player(&self) -> Option<&Player> {
        self.roster.get(self.current)
    }

    /// Every player in auction order.
    pub fn roster(&self) -> &[Player] {
        &self.roster
    }

    /// Highest bid on the current player, 0 before any bid.
    pub fn highest_bid(&self) -> u64 {
        self.highest_bid
    }

    /// Team holding the highest bid.
    pub fn highest_bidder(&self) -> Option<&str> {
        self.highest_bidder.as_deref()
    }

    /// Seconds left on the countdown; only moves while `Active`.
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    /// Teams with their remaining budgets and acquired players.
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    /// Looks up a team by exact name.
    pub fn team(&self, name: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.name == name)
    }

    /// Sales and skips so far, in roster order.
    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    /// The validated configuration this session runs with.
    pub fn config(&self) -> &AuctionConfig {
        &self.config
    }

    /// The bid a client should pre-fill: one step above the highest bid,
    /// or the reserve when nobody has bid.
    pub fn suggested_bid(&self) -> u64 {
        if self.highest_bidder.is_some() {
            self.highest_bid.saturating_add(self.config.bid_step)
        } else {
            self.config.starting_bid
        }
    }

    /// Copies the current state into an [`AuctionSnapshot`].
    pub fn snapshot(&self) -> AuctionSnapshot {
        AuctionSnapshot {
            phase: self.phase,
            current_player_index: self.current,
            roster_len: self.roster.len(),
            current_player: self.current_player().cloned(),
            highest_bid: self.highest_bid,
            highest_bidder: self.highest_bidder.clone(),
            remaining_seconds: self.remaining_secs,
            suggested_bid: self.suggested_bid(),
            teams: self.teams.clone(),
            outcomes: self.outcomes.clone(),
        }
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// Smallest amount `place_bid` accepts right now.
    fn minimum_bid(&self) -> u64 {
        if self.highest_bidder.is_some() {
            self.highest_bid.saturating_add(1)
        } else {
            self.config.starting_bid.max(1)
        }
    }

    fn require(&self, op: Operation, allowed: &[Phase]) -> Result<(), AuctionError> {
        if self.phase.is_terminal() {
            return self.reject(AuctionError::RosterExhausted);
        }
        if !allowed.contains(&self.phase) {
            return self.reject(AuctionError::InvalidTransition {
                op,
                phase: self.phase,
            });
        }
        Ok(())
    }

    fn reject<T>(&self, err: AuctionError) -> Result<T, AuctionError> {
        debug!(reason = err.reason(), phase = %self.phase, "auction operation rejected: {err}");
        self.emit(Notification::error(err.reason(), err.to_string()));
        Err(err)
    }

    fn close_bidding(&mut self, why: &str) {
        self.remaining_secs = 0;
        self.transition(Phase::Sold);

        let player = self.current_name();
        info!(%player, highest_bid = self.highest_bid, why, "bidding closed");
        let message = match &self.highest_bidder {
            Some(team) => format!("Bidding closed on {player}: {team} leads at {}", self.highest_bid),
            None => format!("Bidding closed on {player} with no bids"),
        };
        self.emit(Notification::info(NoticeKind::BiddingClosed, message));
    }

    fn advance(&mut self, outcome: Outcome) {
        self.outcomes.push(outcome);
        self.current += 1;
        self.highest_bid = 0;
        self.highest_bidder = None;
        self.remaining_secs = 0;

        if self.current >= self.roster.len() {
            self.transition(Phase::Complete);
            let sold = self.outcomes.iter().filter(|o| o.is_sold()).count();
            let unsold = self.outcomes.len() - sold;
            info!(sold, unsold, "auction complete");
            self.emit(Notification::success(
                NoticeKind::Completed,
                format!("Auction complete: {sold} sold, {unsold} unsold"),
            ));
        } else {
            self.transition(Phase::Standby);
            debug!(player = %self.current_name(), index = self.current, "next player up");
        }
    }

    fn transition(&mut self, to: Phase) {
        debug_assert!(
            self.phase.can_transition_to(to),
            "illegal auction transition {} -> {to}",
            self.phase
        );
        self.phase = to;
    }

    fn current_name(&self) -> String {
        self.current_player()
            .map(|p| p.name.clone())
            .unwrap_or_default()
    }

    fn emit(&self, notification: Notification) {
        self.sink.notify(notification);
    }
}

impl std::fmt::Debug for AuctionSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuctionSession")
            .field("phase", &self.phase)
            .field("current", &self.current)
            .field("roster_len", &self.roster.len())
            .field("highest_bid", &self.highest_bid)
            .field("highest_bidder", &self.highest_bidder)
            .field("remaining_secs", &self.remaining_secs)
            .finish()
    }
}
