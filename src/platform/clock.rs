//! Frame pacing

use std::time::{Duration, Instant};

use crate::consts::TICK_RATE;

/// Final stretch of every frame is spin-waited; sleep is too coarse for it
const SPIN_MARGIN: Duration = Duration::from_millis(2);

/// How long to sleep before spinning, given the time already spent
pub fn sleep_budget(elapsed: Duration, frame: Duration) -> Duration {
    frame.saturating_sub(elapsed).saturating_sub(SPIN_MARGIN)
}

/// Caps the main loop at a fixed rate
pub struct FrameClock {
    frame: Duration,
    frame_start: Instant,
}

impl FrameClock {
    pub fn new(rate: u32) -> Self {
        Self {
            frame: Duration::from_secs_f64(1.0 / rate.max(1) as f64),
            frame_start: Instant::now(),
        }
    }

    pub fn frame_duration(&self) -> Duration {
        self.frame
    }

    /// Block until the current frame's time is used up, then start the next
    pub fn wait(&mut self) {
        let budget = sleep_budget(self.frame_start.elapsed(), self.frame);
        if !budget.is_zero() {
            std::thread::sleep(budget);
        }
        while self.frame_start.elapsed() < self.frame {
            std::hint::spin_loop();
        }
        self.frame_start = Instant::now();
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(TICK_RATE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sleep_budget_leaves_spin_margin() {
        let frame = Duration::from_millis(16);
        assert_eq!(sleep_budget(Duration::from_millis(4), frame), Duration::from_millis(10));
        assert_eq!(sleep_budget(Duration::from_millis(15), frame), Duration::ZERO);
        assert_eq!(sleep_budget(Duration::from_millis(40), frame), Duration::ZERO);
    }

    #[test]
    fn test_default_rate() {
        let clock = FrameClock::default();
        let expected = Duration::from_secs_f64(1.0 / 60.0);
        assert_eq!(clock.frame_duration(), expected);
    }

    #[test]
    fn test_wait_takes_at_least_one_frame() {
        let mut clock = FrameClock::new(200);
        let start = Instant::now();
        clock.wait();
        clock.wait();
        assert!(start.elapsed() >= Duration::from_millis(9));
    }
}
