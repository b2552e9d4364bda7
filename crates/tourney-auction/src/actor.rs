//! Auction actor: a Tokio task that owns a session and its countdown.
//!
//! The actor is the only place an [`AuctionSession`] is touched once it
//! is spawned. Callers talk to it through an [`AuctionHandle`]; the timer
//! is a [`TickScheduler`] that runs only while bidding is open.

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tourney_tick::{TickConfig, TickScheduler};

use crate::{AuctionError, AuctionSession, AuctionSnapshot, Outcome, Phase};

type Reply<T> = oneshot::Sender<Result<T, AuctionError>>;

/// Commands sent to an auction actor through its channel.
pub(crate) enum AuctionCommand {
    /// Open bidding on the current player and start the countdown.
    StartBidding { reply: Reply<()> },
    /// Bid for a team; an accepted bid restarts the countdown.
    PlaceBid {
        team: String,
        amount: u64,
        reply: Reply<()>,
    },
    /// Close bidding before the countdown runs out.
    ForceSold { reply: Reply<()> },
    /// Settle the closed auction and move on.
    ConfirmSale { reply: Reply<Outcome> },
    /// Pass over the current player.
    Skip { reply: Reply<Outcome> },
    /// Read the session state.
    Snapshot { reply: oneshot::Sender<AuctionSnapshot> },
    /// Stop the actor.
    Shutdown,
}

/// Handle to a running auction actor.
///
/// Cheap to clone. The actor stops when [`shutdown`](Self::shutdown) is
/// called or every handle has been dropped.
#[derive(Debug, Clone)]
pub struct AuctionHandle {
    sender: mpsc::Sender<AuctionCommand>,
}

impl AuctionHandle {
    async fn request<T>(
        &self,
        make: impl FnOnce(Reply<T>) -> AuctionCommand,
    ) -> Result<T, AuctionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(make(reply_tx))
            .await
            .map_err(|_| AuctionError::Unavailable)?;
        reply_rx.await.map_err(|_| AuctionError::Unavailable)?
    }

    /// Opens bidding on the current player.
    pub async fn start_bidding(&self) -> Result<(), AuctionError> {
        self.request(|reply| AuctionCommand::StartBidding { reply })
            .await
    }

    /// Places a bid of `amount` for `team`.
    pub async fn place_bid(
        &self,
        team: impl Into<String>,
        amount: u64,
    ) -> Result<(), AuctionError> {
        let team = team.into();
        self.request(|reply| AuctionCommand::PlaceBid {
            team,
            amount,
            reply,
        })
        .await
    }

    /// Closes bidding without waiting for the countdown.
    pub async fn force_sold(&self) -> Result<(), AuctionError> {
        self.request(|reply| AuctionCommand::ForceSold { reply }).await
    }

    /// Settles the sale and returns what happened to the player.
    pub async fn confirm_sale(&self) -> Result<Outcome, AuctionError> {
        self.request(|reply| AuctionCommand::ConfirmSale { reply })
            .await
    }

    /// Skips the current player.
    pub async fn skip(&self) -> Result<Outcome, AuctionError> {
        self.request(|reply| AuctionCommand::Skip { reply }).await
    }

    /// Requests the current session state.
    pub async fn snapshot(&self) -> Result<AuctionSnapshot, AuctionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(AuctionCommand::Snapshot { reply: reply_tx })
            .await
            .map_err(|_| AuctionError::Unavailable)?;
        reply_rx.await.map_err(|_| AuctionError::Unavailable)
    }

    /// Tells the actor to stop. The countdown is dropped with it.
    pub async fn shutdown(&self) -> Result<(), AuctionError> {
        self.sender
            .send(AuctionCommand::Shutdown)
            .await
            .map_err(|_| AuctionError::Unavailable)
    }

    /// Returns `true` once the actor has stopped.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// The internal actor state. Runs inside a Tokio task.
struct AuctionActor {
    session: AuctionSession,
    scheduler: TickScheduler,
    receiver: mpsc::Receiver<AuctionCommand>,
}

impl AuctionActor {
    /// Runs until shutdown or until every handle is gone, then hands the
    /// session back.
    async fn run(mut self) -> AuctionSession {
        tracing::info!(
            players = self.session.roster().len(),
            rate_hz = self.scheduler.tick_rate_hz(),
            "auction actor started"
        );

        loop {
            tokio::select! {
                cmd = self.receiver.recv() => {
                    let Some(cmd) = cmd else {
                        tracing::debug!("all auction handles dropped");
                        break;
                    };
                    if !self.handle(cmd) {
                        tracing::info!("auction shutting down");
                        break;
                    }
                }
                tick = self.scheduler.wait_for_tick() => {
                    if self.session.tick(tick.elapsed_ticks()) {
                        tracing::debug!(tick = tick.tick, "countdown expired");
                    }
                    self.sync_timer();
                }
            }
        }

        self.scheduler.pause();
        tracing::info!(
            phase = %self.session.phase(),
            sold = self.session.outcomes().iter().filter(|o| o.is_sold()).count(),
            "auction actor stopped"
        );
        self.session
    }

    /// Applies one command. Returns `false` on shutdown.
    fn handle(&mut self, cmd: AuctionCommand) -> bool {
        match cmd {
            AuctionCommand::StartBidding { reply } => {
                let result = self.session.start_bidding();
                let _ = reply.send(result);
            }
            AuctionCommand::PlaceBid {
                team,
                amount,
                reply,
            } => {
                let result = self.session.place_bid(&team, amount);
                if result.is_ok() {
                    // The extension starts now, not at the next tick boundary.
                    self.scheduler.realign();
                }
                let _ = reply.send(result);
            }
            AuctionCommand::ForceSold { reply } => {
                let _ = reply.send(self.session.force_sold());
            }
            AuctionCommand::ConfirmSale { reply } => {
                let _ = reply.send(self.session.confirm_sale());
            }
            AuctionCommand::Skip { reply } => {
                let _ = reply.send(self.session.skip());
            }
            AuctionCommand::Snapshot { reply } => {
                let _ = reply.send(self.session.snapshot());
            }
            AuctionCommand::Shutdown => return false,
        }
        self.sync_timer();
        true
    }

    /// Runs the countdown exactly while bidding is open.
    fn sync_timer(&mut self) {
        if self.session.phase() == Phase::Active {
            self.scheduler.resume();
        } else {
            self.scheduler.pause();
        }
    }
}

/// Spawns an actor that owns `session` and returns a handle to it.
///
/// The join handle resolves to the session once the actor stops, so the
/// final squads and outcomes can be read after shutdown.
pub fn spawn_auction(session: AuctionSession) -> (AuctionHandle, JoinHandle<AuctionSession>) {
    let config = session.config();
    let (tx, rx) = mpsc::channel(config.channel_size);
    let scheduler = TickScheduler::new(TickConfig {
        start_paused: true,
        ..config.tick.clone()
    });

    let mut actor = AuctionActor {
        session,
        scheduler,
        receiver: rx,
    };
    actor.sync_timer();

    let task = tokio::spawn(actor.run());
    (AuctionHandle { sender: tx }, task)
}
