//! Time-gated FIFO event queue owned by one subsystem

use std::collections::VecDeque;

use crate::core::types::Seconds;
use crate::scheduler::timer::UpdateTimer;

/// Events released by one executed update, in arrival order
#[derive(Debug)]
pub struct Batch<E> {
    /// Time accumulated since the previous update
    pub elapsed: Seconds,
    pub events: VecDeque<E>,
}

/// Subsystem cadence plus its pending events
///
/// Events are handed out exactly once, on the first update after they were
/// pushed. Events pushed while a batch is being handled wait for the next
/// update.
#[derive(Debug, Clone)]
pub struct Scheduled<E> {
    timer: UpdateTimer,
    queue: VecDeque<E>,
}

impl<E> Scheduled<E> {
    pub fn new(interval: Seconds) -> Self {
        Self {
            timer: UpdateTimer::new(interval),
            queue: VecDeque::new(),
        }
    }

    pub fn push(&mut self, event: E) {
        self.queue.push_back(event);
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn timer(&self) -> &UpdateTimer {
        &self.timer
    }

    /// Advance the timer; on an update, drain the whole queue
    pub fn tick(&mut self, dt: Seconds) -> Option<Batch<E>> {
        let elapsed = self.timer.tick(dt)?;
        Some(Batch {
            elapsed,
            events: std::mem::take(&mut self.queue),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_wait_for_update() {
        let mut scheduled = Scheduled::new(0.3);
        scheduled.push("first");
        scheduled.push("second");

        assert!(scheduled.tick(0.1).is_none());
        assert_eq!(scheduled.pending(), 2);

        let batch = scheduled.tick(0.25).unwrap();
        assert_eq!(batch.events, VecDeque::from(vec!["first", "second"]));
        assert_eq!(scheduled.pending(), 0);
    }

    #[test]
    fn test_events_are_delivered_once() {
        let mut scheduled = Scheduled::new(0.1);
        scheduled.push(1);

        let first = scheduled.tick(0.1).unwrap();
        assert_eq!(first.events.len(), 1);

        scheduled.push(2);
        let second = scheduled.tick(0.1).unwrap();
        assert_eq!(second.events, VecDeque::from(vec![2]));
    }

    #[test]
    fn test_update_with_empty_queue_still_fires() {
        let mut scheduled: Scheduled<u8> = Scheduled::new(0.5);
        let batch = scheduled.tick(0.5).unwrap();
        assert!(batch.events.is_empty());
        assert!((batch.elapsed - 0.5).abs() < 1e-6);
    }
}
