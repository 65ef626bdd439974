use std::time::Duration;

/// Drop interval at level 1, in milliseconds.
const BASE_INTERVAL_MILLIS: u64 = 1000;
/// Fastest allowed drop interval.
const MIN_INTERVAL: Duration = Duration::from_millis(100);
/// Interval reduction per level above 1, in milliseconds.
const LEVEL_STEP_MILLIS: u64 = 50;

/// Elapsed-time scheduler for forced descents.
///
/// The session feeds it elapsed wall-clock time; whenever the accumulated
/// time reaches the current drop interval, one descent is due and the
/// accumulator restarts. The scheduler itself never touches the game
/// state and never runs while the session is paused, so pausing simply
/// stops feeding it and resuming continues from the accumulated time.
#[derive(Debug, Clone)]
pub struct Gravity {
    interval: Duration,
    accumulated: Duration,
}

impl Default for Gravity {
    fn default() -> Self {
        Self::new()
    }
}

impl Gravity {
    /// Creates a scheduler paced for level 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            interval: Self::interval_for_level(1),
            accumulated: Duration::ZERO,
        }
    }

    /// Drop interval for a level: 1000 ms at level 1, 50 ms shorter per
    /// level above that, floored at 100 ms.
    #[must_use]
    pub fn interval_for_level(level: usize) -> Duration {
        let level = u64::try_from(level).unwrap_or(u64::MAX);
        let millis = BASE_INTERVAL_MILLIS
            .saturating_sub(LEVEL_STEP_MILLIS.saturating_mul(level.saturating_sub(1)));
        Duration::from_millis(millis).max(MIN_INTERVAL)
    }

    /// Repaces the scheduler for the given level.
    ///
    /// The accumulated time is kept, so a level change mid-fall never
    /// skips or doubles a descent.
    pub fn set_level(&mut self, level: usize) {
        self.interval = Self::interval_for_level(level);
    }

    /// The current drop interval.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Clears the accumulated time.
    pub fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
    }

    /// Feeds elapsed time into the scheduler.
    ///
    /// Returns `true` when a forced descent is due. At most one descent is
    /// reported per call; a long stall does not produce a burst of
    /// catch-up descents.
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        self.accumulated = self.accumulated.saturating_add(elapsed);
        if self.accumulated >= self.interval {
            self.accumulated = Duration::ZERO;
            return true;
        }
        false
    }
}
