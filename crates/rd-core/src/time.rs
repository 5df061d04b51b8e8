//! Simulation time model.
//!
//! # Design
//!
//! Time is represented as a monotonically increasing `Tick` counter, one
//! tick per animation frame.  The mapping to wall-clock time is held in
//! `SimClock`:
//!
//!   wall_time_ms = start_unix_ms + tick * tick_ms
//!
//! Durations that the dispatch model states in seconds (dwell, dispatch
//! interval) are converted to whole ticks once, rounding up, so all state
//! machine arithmetic is exact integer comparison.

use std::fmt;

use crate::{CoreError, CoreResult};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0.saturating_add(n))
    }

    /// Ticks elapsed from `earlier` to `self` (zero if `earlier` is later).
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        self.offset(rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Converts between tick counts and Unix wall-clock milliseconds.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Unix timestamp (milliseconds since epoch) of tick 0.
    pub start_unix_ms: i64,
    /// How many milliseconds one tick represents.
    pub tick_ms: u32,
    /// The current tick, advanced by `SimClock::advance()`.
    pub current_tick: Tick,
}

impl SimClock {
    pub fn new(start_unix_ms: i64, tick_ms: u32) -> Self {
        Self {
            start_unix_ms,
            tick_ms,
            current_tick: Tick::ZERO,
        }
    }

    /// Advance the clock by `n` ticks.
    #[inline]
    pub fn advance(&mut self, n: u64) {
        self.current_tick = self.current_tick.offset(n);
    }

    /// Elapsed simulated milliseconds since tick 0.
    #[inline]
    pub fn elapsed_ms(&self) -> i64 {
        self.current_tick.0 as i64 * self.tick_ms as i64
    }

    /// Unix timestamp (ms) corresponding to `current_tick`.
    #[inline]
    pub fn current_unix_ms(&self) -> i64 {
        self.start_unix_ms + self.elapsed_ms()
    }

    /// How many ticks span `secs` seconds? (rounds up)
    #[inline]
    pub fn ticks_for_secs(&self, secs: f64) -> u64 {
        ticks_for_secs(secs, self.tick_ms)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_secs = self.elapsed_ms().max(0) / 1_000;
        write!(
            f,
            "{} ({:02}:{:02}:{:02})",
            self.current_tick,
            total_secs / 3_600,
            (total_secs % 3_600) / 60,
            total_secs % 60,
        )
    }
}

fn ticks_for_secs(secs: f64, tick_ms: u32) -> u64 {
    if !(secs > 0.0) || tick_ms == 0 {
        return 0;
    }
    (secs * 1_000.0 / tick_ms as f64).ceil() as u64
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Typically loaded from a JSON file by the application crate and passed
/// to the simulation builder.  Every field has a default so config files
/// only need to name what they change.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Unix timestamp (ms) for tick 0.
    pub start_unix_ms: i64,

    /// Milliseconds per tick (frame period).  Default: 16 (~60 fps).
    pub tick_ms: u32,

    /// Time a vehicle spends on scene before heading home.  Default: 5 s.
    pub dwell_secs: f64,

    /// Delay before the first dispatch attempt.  Default: 3 s.
    pub dispatch_warmup_secs: f64,

    /// Period between dispatch attempts.  Default: 45 s.
    pub dispatch_interval_secs: f64,

    /// Period between target-feed polls.  Default: 30 s.
    pub feed_poll_secs: f64,

    /// Master RNG seed used for generated patrol routes.
    pub seed: u64,

    /// When set, a target that already has a unit assigned is not offered
    /// to the selector again.  Default: `false` (several units may converge
    /// on the most severe target).
    pub one_unit_per_target: bool,

    /// Emit a position snapshot to observers every N ticks; 0 disables
    /// snapshots.  Position updates are still published every tick.
    pub snapshot_interval_ticks: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            start_unix_ms:           0,
            tick_ms:                 16,
            dwell_secs:              5.0,
            dispatch_warmup_secs:    3.0,
            dispatch_interval_secs:  45.0,
            feed_poll_secs:          30.0,
            seed:                    0,
            one_unit_per_target:     false,
            snapshot_interval_ticks: 60,
        }
    }
}

impl SimConfig {
    /// Reject configurations the tick loop cannot run with.
    pub fn validate(&self) -> CoreResult<()> {
        if self.tick_ms == 0 {
            return Err(CoreError::Config("tick_ms must be positive".into()));
        }
        for (name, value) in [
            ("dwell_secs", self.dwell_secs),
            ("dispatch_warmup_secs", self.dispatch_warmup_secs),
        ] {
            if !(value >= 0.0) || !value.is_finite() {
                return Err(CoreError::Config(format!("{name} must be a finite value >= 0")));
            }
        }
        for (name, value) in [
            ("dispatch_interval_secs", self.dispatch_interval_secs),
            ("feed_poll_secs", self.feed_poll_secs),
        ] {
            if !(value > 0.0) || !value.is_finite() {
                return Err(CoreError::Config(format!("{name} must be a finite value > 0")));
            }
        }
        Ok(())
    }

    /// Dwell duration in ticks (rounded up).
    #[inline]
    pub fn dwell_ticks(&self) -> u64 {
        ticks_for_secs(self.dwell_secs, self.tick_ms)
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.start_unix_ms, self.tick_ms)
    }
}
