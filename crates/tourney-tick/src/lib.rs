//! Pausable tick scheduler that drives auction countdowns.
//!
//! One scheduler is owned by each auction actor. It fires at a fixed rate
//! (1 Hz by default, one tick per countdown second) and only while it is
//! running: a paused scheduler's [`TickScheduler::wait_for_tick`] pends
//! forever, so it can sit in a `tokio::select!` branch without spinning.
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(cmd) = cmd_rx.recv() => { /* handle commands */ }
//!         tick = scheduler.wait_for_tick() => {
//!             session.tick(tick.elapsed_ticks());
//!         }
//!     }
//! }
//! ```
//!
//! Dropping the scheduler is the cancellation: there is no background
//! task, the deadline lives inside the struct.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::{self, Instant};
use tracing::{debug, trace, warn};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// What to do when the scheduler wakes up late.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickPolicy {
    /// Report the missed ticks in [`TickInfo::ticks_skipped`] and schedule
    /// the next tick from now. A countdown stays wall-clock accurate by
    /// consuming `1 + ticks_skipped` seconds.
    #[default]
    Skip,
    /// Ignore lateness. The next tick keeps the original cadence.
    Drop,
}

/// Configuration for the tick scheduler.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TickConfig {
    /// Ticks per second. Must be at least 1.
    pub tick_rate_hz: u32,
    /// Lateness handling.
    pub policy: TickPolicy,
    /// Whether a freshly created scheduler waits for [`TickScheduler::resume`].
    pub start_paused: bool,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: 1,
            policy: TickPolicy::default(),
            start_paused: true,
        }
    }
}

impl TickConfig {
    /// Maximum supported tick rate.
    pub const MAX_TICK_RATE_HZ: u32 = 128;

    /// A config for a specific rate with the other fields defaulted.
    pub fn with_rate(tick_rate_hz: u32) -> Self {
        Self {
            tick_rate_hz,
            ..Default::default()
        }
    }

    /// Clamps the rate into `1..=MAX_TICK_RATE_HZ`.
    ///
    /// Called by [`TickScheduler::new`].
    pub fn validated(mut self) -> Self {
        if self.tick_rate_hz == 0 {
            warn!("tick_rate_hz of 0 is not a countdown rate, using 1 Hz");
            self.tick_rate_hz = 1;
        }
        if self.tick_rate_hz > Self::MAX_TICK_RATE_HZ {
            warn!(
                rate = self.tick_rate_hz,
                max = Self::MAX_TICK_RATE_HZ,
                "tick_rate_hz exceeds maximum, clamping"
            );
            self.tick_rate_hz = Self::MAX_TICK_RATE_HZ;
        }
        self
    }

    /// Duration of a single tick.
    pub fn tick_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_rate_hz.max(1) as f64)
    }
}

// ---------------------------------------------------------------------------
// Tick info
// ---------------------------------------------------------------------------

/// Returned by [`TickScheduler::wait_for_tick`] for each tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickInfo {
    /// Monotonic tick number, starting at 1.
    pub tick: u64,
    /// Fixed tick period.
    pub dt: Duration,
    /// `true` if the tick fired more than 10% of a period late.
    pub overrun: bool,
    /// Whole periods missed before this tick (always 0 under `Drop`).
    pub ticks_skipped: u64,
}

impl TickInfo {
    /// Number of periods this tick accounts for.
    pub fn elapsed_ticks(&self) -> u64 {
        1 + self.ticks_skipped
    }
}

/// Counters kept by the scheduler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickMetrics {
    pub total_ticks: u64,
    pub total_overruns: u64,
    pub total_skipped: u64,
    /// Times the scheduler was resumed or realigned.
    pub restarts: u64,
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

/// Fixed-rate, pausable tick source.
pub struct TickScheduler {
    config: TickConfig,
    tick_duration: Duration,
    tick_count: u64,
    /// Deadline of the next tick. `None` while paused.
    next_tick: Option<Instant>,
    metrics: TickMetrics,
}

impl TickScheduler {
    pub fn new(config: TickConfig) -> Self {
        let config = config.validated();
        let tick_duration = config.tick_duration();
        let next_tick = if config.start_paused {
            None
        } else {
            Some(Instant::now() + tick_duration)
        };

        debug!(
            rate_hz = config.tick_rate_hz,
            policy = ?config.policy,
            paused = config.start_paused,
            "tick scheduler created"
        );

        Self {
            config,
            tick_duration,
            tick_count: 0,
            next_tick,
            metrics: TickMetrics::default(),
        }
    }

    /// A running scheduler at the given rate.
    pub fn with_rate(tick_rate_hz: u32) -> Self {
        Self::new(TickConfig {
            start_paused: false,
            ..TickConfig::with_rate(tick_rate_hz)
        })
    }

    /// Waits for the next tick.
    ///
    /// Pends forever while paused; a `select!` loop keeps serving its
    /// other branches in the meantime.
    pub async fn wait_for_tick(&mut self) -> TickInfo {
        let Some(next) = self.next_tick else {
            std::future::pending::<()>().await;
            unreachable!()
        };

        time::sleep_until(next).await;

        let now = Instant::now();
        let period = self.tick_duration;
        self.tick_count += 1;

        let late_by = now.saturating_duration_since(next);
        let overrun = late_by > period / 10;
        let mut ticks_skipped = 0u64;

        self.next_tick = Some(match self.config.policy {
            TickPolicy::Skip => {
                if overrun {
                    ticks_skipped = (late_by.as_nanos() / period.as_nanos()) as u64;
                    if ticks_skipped > 0 {
                        warn!(
                            tick = self.tick_count,
                            skipped = ticks_skipped,
                            late_ms = late_by.as_secs_f64() * 1000.0,
                            "tick overrun, skipping ahead"
                        );
                    }
                }
                now + period
            }
            TickPolicy::Drop => {
                if overrun {
                    warn!(
                        tick = self.tick_count,
                        late_ms = late_by.as_secs_f64() * 1000.0,
                        "tick overrun, keeping original cadence"
                    );
                }
                next + period
            }
        });

        if overrun {
            self.metrics.total_overruns += 1;
        }
        self.metrics.total_skipped += ticks_skipped;
        self.metrics.total_ticks += 1;

        trace!(tick = self.tick_count, overrun, "tick fired");

        TickInfo {
            tick: self.tick_count,
            dt: period,
            overrun,
            ticks_skipped,
        }
    }

    /// Stops ticking. Idempotent.
    pub fn pause(&mut self) {
        if self.next_tick.take().is_some() {
            debug!(tick = self.tick_count, "tick scheduler paused");
        }
    }

    /// Starts ticking one full period from now. Idempotent while running.
    pub fn resume(&mut self) {
        if self.next_tick.is_none() {
            self.next_tick = Some(Instant::now() + self.tick_duration);
            self.metrics.restarts += 1;
            debug!(tick = self.tick_count, "tick scheduler resumed");
        }
    }

    /// Pushes the next tick to one full period from now.
    ///
    /// Used when a countdown is reset mid-period so that the first
    /// decrement after the reset is a whole second away. No effect while
    /// paused.
    pub fn realign(&mut self) {
        if self.next_tick.is_some() {
            self.next_tick = Some(Instant::now() + self.tick_duration);
            self.metrics.restarts += 1;
            trace!(tick = self.tick_count, "tick scheduler realigned");
        }
    }

    pub fn is_paused(&self) -> bool {
        self.next_tick.is_none()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn metrics(&self) -> &TickMetrics {
        &self.metrics
    }

    pub fn tick_rate_hz(&self) -> u32 {
        self.config.tick_rate_hz
    }

    pub fn tick_duration(&self) -> Duration {
        self.tick_duration
    }
}

impl std::fmt::Debug for TickScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TickScheduler")
            .field("rate_hz", &self.config.tick_rate_hz)
            .field("tick_count", &self.tick_count)
            .field("paused", &self.is_paused())
            .finish()
    }
}
