//! Wall-clock pacing for the terminal front-end.
//!
//! Provides clamped delta time and a fixed-timestep accumulator so the
//! real-time duel advances at a steady tick rate regardless of how fast the
//! loop spins.

use std::time::{Duration, Instant};

/// Most fixed updates run for a single delta.
const MAX_UPDATES_PER_FRAME: u32 = 10;

/// Frame clock with a fixed-timestep accumulator.
#[derive(Debug)]
pub struct FrameClock {
    /// Time of last delta sample
    last_frame: Instant,
    /// Time not yet consumed by fixed updates
    accumulator: Duration,
    /// Fixed timestep
    fixed_dt: Duration,
    /// Largest delta accepted in one sample
    max_dt: Duration,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(60)
    }
}

impl FrameClock {
    /// Creates a clock ticking `hz` times per second.
    #[must_use]
    pub fn new(hz: u32) -> Self {
        Self {
            last_frame: Instant::now(),
            accumulator: Duration::ZERO,
            fixed_dt: Duration::from_secs_f64(1.0 / f64::from(hz.max(1))),
            max_dt: Duration::from_millis(250),
        }
    }

    /// Fixed timestep.
    #[must_use]
    pub const fn fixed_dt(&self) -> Duration {
        self.fixed_dt
    }

    /// Time elapsed since the previous sample, clamped.
    pub fn delta_time(&mut self) -> Duration {
        let now = Instant::now();
        let dt = now - self.last_frame;
        self.last_frame = now;
        dt.min(self.max_dt)
    }

    /// Adds `dt` to the accumulator and returns how many fixed updates to run.
    pub fn accumulate(&mut self, dt: Duration) -> u32 {
        self.accumulator += dt;
        let mut count = 0;

        while self.accumulator >= self.fixed_dt && count < MAX_UPDATES_PER_FRAME {
            self.accumulator -= self.fixed_dt;
            count += 1;
        }

        // Too far behind: drop the backlog.
        if self.accumulator > self.fixed_dt * 2 {
            self.accumulator = Duration::ZERO;
        }

        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulate_counts_whole_steps() {
        let mut clock = FrameClock::new(60);
        let step = clock.fixed_dt();
        assert_eq!(clock.accumulate(step / 2), 0);
        assert_eq!(clock.accumulate(step * 2), 2);
    }

    #[test]
    fn test_accumulate_caps_updates() {
        let mut clock = FrameClock::new(60);
        assert_eq!(clock.accumulate(Duration::from_secs(1)), MAX_UPDATES_PER_FRAME);
        assert_eq!(clock.accumulate(Duration::ZERO), 0);
    }

    #[test]
    fn test_delta_is_clamped() {
        let mut clock = FrameClock::new(60);
        assert!(clock.delta_time() <= Duration::from_millis(250));
    }
}
