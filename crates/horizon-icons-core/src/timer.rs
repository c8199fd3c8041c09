//! Timer system for Horizon Icons.
//!
//! Provides one-shot timers read against an injectable [`Clock`]. Owners poll
//! [`TimerManager::process_expired`] from their event loop and match the
//! returned IDs against the timers they started.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use slotmap::{SlotMap, new_key_type};

use crate::clock::Clock;
use crate::error::{Result, TimerError};

new_key_type! {
    /// A unique identifier for a timer.
    pub struct TimerId;
}

/// Internal timer data.
#[derive(Debug)]
struct TimerData {
    /// When this timer should fire.
    fire_at: Instant,
}

/// An entry in the timer queue (min-heap by fire time).
#[derive(Debug, Clone, Copy)]
struct TimerQueueEntry {
    id: TimerId,
    fire_time: Instant,
}

impl PartialEq for TimerQueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.fire_time == other.fire_time
    }
}

impl Eq for TimerQueueEntry {}

impl PartialOrd for TimerQueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimerQueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap (BinaryHeap is max-heap by default).
        other.fire_time.cmp(&self.fire_time)
    }
}

/// Manages the one-shot timers of a single owner.
pub struct TimerManager {
    clock: Arc<dyn Clock>,
    /// All pending timers.
    timers: SlotMap<TimerId, TimerData>,
    /// Priority queue of pending timer fires (min-heap by fire time).
    queue: BinaryHeap<TimerQueueEntry>,
}

impl TimerManager {
    /// Create a new timer manager reading time from `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            timers: SlotMap::with_key(),
            queue: BinaryHeap::new(),
        }
    }

    /// The clock this manager reads.
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Start a one-shot timer that fires after the specified duration.
    ///
    /// Returns the timer ID that can be used to cancel the timer.
    pub fn start_one_shot(&mut self, duration: Duration) -> TimerId {
        let fire_at = self.clock.now() + duration;
        let id = self.timers.insert(TimerData { fire_at });
        self.queue.push(TimerQueueEntry {
            id,
            fire_time: fire_at,
        });

        tracing::trace!(target: "horizon_icons_core::timer", ?id, ?duration, "timer started");
        id
    }

    /// Stop and remove a timer.
    ///
    /// Returns `Ok(())` if the timer was found and removed, or an error if not found.
    pub fn stop(&mut self, id: TimerId) -> Result<()> {
        if self.timers.remove(id).is_some() {
            tracing::trace!(target: "horizon_icons_core::timer", ?id, "timer stopped");
            Ok(())
        } else {
            Err(TimerError::InvalidTimerId.into())
        }
    }

    /// Stop every pending timer.
    pub fn stop_all(&mut self) {
        if !self.timers.is_empty() {
            crate::icons_trace!(stopped = self.timers.len(), "stopping all timers");
        }
        self.timers.clear();
        self.queue.clear();
    }

    /// Check if a timer is still pending.
    pub fn is_active(&self, id: TimerId) -> bool {
        self.timers.contains_key(id)
    }

    /// Get the duration until the next timer fires, if any.
    ///
    /// Returns `None` if there are no active timers.
    pub fn time_until_next(&mut self) -> Option<Duration> {
        self.discard_stale();
        let now = self.clock.now();
        self.queue
            .peek()
            .map(|entry| entry.fire_time.saturating_duration_since(now))
    }

    /// Remove and return every timer whose deadline has passed.
    #[tracing::instrument(skip(self), target = "horizon_icons_core::timer", level = "trace")]
    pub fn process_expired(&mut self) -> Vec<TimerId> {
        let now = self.clock.now();
        let mut fired = Vec::new();

        while let Some(entry) = self.queue.peek() {
            if entry.fire_time > now {
                break;
            }
            let Some(entry) = self.queue.pop() else {
                break;
            };

            // Stopped timers leave their queue entry behind.
            match self.timers.get(entry.id) {
                Some(data) if data.fire_at == entry.fire_time => {
                    self.timers.remove(entry.id);
                    tracing::trace!(target: "horizon_icons_core::timer", id = ?entry.id, "timer fired");
                    fired.push(entry.id);
                }
                _ => continue,
            }
        }

        fired
    }

    /// Get the number of pending timers.
    pub fn active_count(&self) -> usize {
        self.timers.len()
    }

    fn discard_stale(&mut self) {
        while let Some(entry) = self.queue.peek() {
            if self.timers.contains_key(entry.id) {
                break;
            }
            self.queue.pop();
        }
    }
}

impl std::fmt::Debug for TimerManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerManager")
            .field("active", &self.timers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn manager() -> (Arc<ManualClock>, TimerManager) {
        let clock = Arc::new(ManualClock::new());
        let timers = TimerManager::new(clock.clone());
        (clock, timers)
    }

    #[test]
    fn test_timer_fires_after_duration() {
        let (clock, mut timers) = manager();
        let id = timers.start_one_shot(Duration::from_millis(100));

        clock.advance(Duration::from_millis(99));
        assert!(timers.process_expired().is_empty());

        clock.advance(Duration::from_millis(1));
        assert_eq!(timers.process_expired(), vec![id]);
        assert!(!timers.is_active(id));
    }

    #[test]
    fn test_stopped_timer_never_fires() {
        let (clock, mut timers) = manager();
        let id = timers.start_one_shot(Duration::from_millis(10));
        timers.stop(id).unwrap();

        clock.advance(Duration::from_secs(1));
        assert!(timers.process_expired().is_empty());
        assert_eq!(timers.stop(id), Err(TimerError::InvalidTimerId.into()));
    }

    #[test]
    fn test_fire_order_follows_deadline() {
        let (clock, mut timers) = manager();
        let late = timers.start_one_shot(Duration::from_millis(200));
        let early = timers.start_one_shot(Duration::from_millis(100));

        clock.advance(Duration::from_millis(250));
        assert_eq!(timers.process_expired(), vec![early, late]);
        assert_eq!(timers.active_count(), 0);
    }

    #[test]
    fn test_time_until_next_skips_stopped() {
        let (clock, mut timers) = manager();
        let first = timers.start_one_shot(Duration::from_millis(50));
        timers.start_one_shot(Duration::from_millis(120));
        timers.stop(first).unwrap();

        clock.advance(Duration::from_millis(20));
        assert_eq!(timers.time_until_next(), Some(Duration::from_millis(100)));
    }

    #[test]
    fn test_stop_all() {
        let (clock, mut timers) = manager();
        timers.start_one_shot(Duration::from_millis(5));
        timers.start_one_shot(Duration::from_millis(6));
        timers.stop_all();

        clock.advance(Duration::from_millis(10));
        assert!(timers.process_expired().is_empty());
        assert_eq!(timers.time_until_next(), None);
    }
}
