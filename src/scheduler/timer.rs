//! Fixed-interval update gating driven by frame deltas

use crate::core::types::Seconds;

/// Accumulates frame time and fires once per interval
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpdateTimer {
    interval: Seconds,
    accumulated: Seconds,
}

impl UpdateTimer {
    pub fn new(interval: Seconds) -> Self {
        Self {
            interval: interval.max(0.0),
            accumulated: 0.0,
        }
    }

    pub fn interval(&self) -> Seconds {
        self.interval
    }

    pub fn accumulated(&self) -> Seconds {
        self.accumulated
    }

    /// Add `dt`; returns the time accumulated since the last run when the
    /// interval is reached, and starts counting again from zero
    pub fn tick(&mut self, dt: Seconds) -> Option<Seconds> {
        self.accumulated += dt.max(0.0);
        if self.accumulated >= self.interval {
            let elapsed = self.accumulated;
            self.accumulated = 0.0;
            Some(elapsed)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_per_interval() {
        let mut timer = UpdateTimer::new(0.5);
        let fired: Vec<usize> = (0..50)
            .filter(|_| timer.tick(0.1).is_some())
            .collect();

        // 50 ticks of 0.1s against 0.5s: 5 or 6 ticks per run
        assert!(fired.len() >= 8 && fired.len() <= 10, "fired {} times", fired.len());
        for pair in fired.windows(2) {
            assert!(pair[1] - pair[0] >= 4, "runs too close: {:?}", pair);
        }
    }

    #[test]
    fn test_reports_elapsed_time() {
        let mut timer = UpdateTimer::new(1.0);
        assert_eq!(timer.tick(0.6), None);
        let elapsed = timer.tick(0.6).unwrap();
        assert!((elapsed - 1.2).abs() < 1e-6);
        assert_eq!(timer.accumulated(), 0.0);
    }

    #[test]
    fn test_negative_delta_is_ignored() {
        let mut timer = UpdateTimer::new(1.0);
        timer.tick(-5.0);
        assert_eq!(timer.accumulated(), 0.0);
    }
}
