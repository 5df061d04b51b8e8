//! `TargetBoard` — the simulation's view of the target feed.

use tracing::{debug, warn};

use crate::{FeedResult, Target};

/// Last-known-good target list.
///
/// A successful poll replaces the list wholesale (including with an empty
/// list: "no incidents" is valid data).  A failed poll leaves it untouched.
#[derive(Debug, Clone, Default)]
pub struct TargetBoard {
    targets:              Vec<Target>,
    successful_polls:     u64,
    consecutive_failures: u32,
}

impl TargetBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the board without counting a poll.
    pub fn with_targets(targets: Vec<Target>) -> Self {
        Self { targets, ..Self::default() }
    }

    /// Fold one poll result into the board.  Returns `true` if the target
    /// list was replaced.
    pub fn apply_poll(&mut self, result: FeedResult<Vec<Target>>) -> bool {
        match result {
            Ok(targets) => {
                debug!(
                    count = targets.len(),
                    active = targets.iter().filter(|t| t.is_active).count(),
                    "target feed refreshed"
                );
                self.targets = targets;
                self.successful_polls += 1;
                self.consecutive_failures = 0;
                true
            }
            Err(err) => {
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);
                warn!(
                    error = %err,
                    failures = self.consecutive_failures,
                    retained = self.targets.len(),
                    "target feed poll failed; keeping last known targets"
                );
                false
            }
        }
    }

    #[inline]
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    #[inline]
    pub fn successful_polls(&self) -> u64 {
        self.successful_polls
    }

    /// Failures since the last successful poll.
    #[inline]
    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// `true` while the board is serving data older than the latest poll.
    #[inline]
    pub fn is_stale(&self) -> bool {
        self.consecutive_failures > 0
    }
}
