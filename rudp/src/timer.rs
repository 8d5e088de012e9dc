//! The per-call retransmission timer set.
//!
//! `WINDOW_SIZE` independent, coarse-grained timers, each either inactive
//! or bound to a segment-buffer index and running since some start time.
//! Timer-slot indices are unrelated to buffer indices; the association
//! lives in each timer's `index` field, so the sender looks a timer up by
//! the buffer index it is protecting, not the other way around.

use std::time::{Duration, Instant};

use crate::config::WINDOW_SIZE;

#[derive(Debug, Clone, Copy)]
struct Timer {
    /// Buffer index this timer is protecting, when active.
    index: usize,
    active: bool,
    start: Option<Instant>,
}

impl Timer {
    const fn inactive() -> Self {
        Self { index: 0, active: false, start: None }
    }
}

/// A fixed set of `WINDOW_SIZE` retransmission timers.
///
/// Invariant (mirrors the window's own invariant): the set of active
/// timer indices is always a subset of `[base, next)` on the sender;
/// this module does not enforce that itself, it just tracks whatever the
/// send loop tells it to.
#[derive(Debug)]
pub struct TimerSet {
    timers: [Timer; WINDOW_SIZE],
    /// Rolling cursor for the next scan-for-free-slot search.
    cursor: usize,
}

impl TimerSet {
    pub fn new() -> Self {
        Self {
            timers: [Timer::inactive(); WINDOW_SIZE],
            cursor: 0,
        }
    }

    /// Starts a timer for `buffer_index`, scanning for a free slot from
    /// the rolling cursor. A free slot is guaranteed to exist whenever
    /// fewer than `WINDOW_SIZE` timers are active, which the window
    /// invariant (`next - base <= WINDOW_SIZE`) guarantees here.
    ///
    /// Returns the timer slot used.
    pub fn start(&mut self, buffer_index: usize, now: Instant) -> usize {
        for offset in 0..WINDOW_SIZE {
            let slot = (self.cursor + offset) % WINDOW_SIZE;
            if !self.timers[slot].active {
                self.timers[slot] = Timer { index: buffer_index, active: true, start: Some(now) };
                self.cursor = (slot + 1) % WINDOW_SIZE;
                return slot;
            }
        }
        unreachable!("timer set exhausted: window invariant violated");
    }

    /// Restarts the timer occupying `slot` (used when retransmitting:
    /// same slot, same buffer index, fresh start time).
    pub fn restart(&mut self, slot: usize, now: Instant) {
        self.timers[slot].start = Some(now);
    }

    /// Stops (deactivates) whichever timer is bound to `buffer_index`, if
    /// any. Returns `true` if a timer was found and stopped.
    pub fn stop_for_index(&mut self, buffer_index: usize) -> bool {
        for t in &mut self.timers {
            if t.active && t.index == buffer_index {
                t.active = false;
                t.start = None;
                return true;
            }
        }
        false
    }

    /// Returns `true` if the timer in `slot` has been running at least
    /// `timeout` as of `now`.
    fn expired_at(&self, slot: usize, now: Instant, timeout: Duration) -> bool {
        let t = &self.timers[slot];
        t.active && t.start.is_some_and(|start| now.duration_since(start) >= timeout)
    }

    /// Iterates `(slot, buffer_index)` for every timer that is active and
    /// has expired as of `now`. The send loop scans all timers each pass;
    /// this mirrors that scan.
    pub fn expired(&self, now: Instant, timeout: Duration) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..WINDOW_SIZE).filter_map(move |slot| {
            self.expired_at(slot, now, timeout).then(|| (slot, self.timers[slot].index))
        })
    }
}

impl Default for TimerSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_allocates_distinct_slots_until_full() {
        let mut timers = TimerSet::new();
        let now = Instant::now();
        let mut slots = Vec::new();
        for i in 0..WINDOW_SIZE {
            slots.push(timers.start(i, now));
        }
        slots.sort_unstable();
        slots.dedup();
        assert_eq!(slots.len(), WINDOW_SIZE);
    }

    #[test]
    fn stop_frees_the_slot_for_reuse() {
        let mut timers = TimerSet::new();
        let now = Instant::now();
        for i in 0..WINDOW_SIZE {
            timers.start(i, now);
        }
        assert!(timers.stop_for_index(3));
        // A free slot exists again.
        let slot = timers.start(99, now);
        assert_eq!(timers.expired(now, Duration::from_secs(0)).count() > 0, true);
        let _ = slot;
    }

    #[test]
    fn stop_for_unknown_index_is_noop() {
        let mut timers = TimerSet::new();
        assert!(!timers.stop_for_index(42));
    }

    #[test]
    fn expiration_respects_timeout() {
        let mut timers = TimerSet::new();
        let t0 = Instant::now();
        timers.start(0, t0);
        assert_eq!(timers.expired(t0, Duration::from_secs(3)).count(), 0);
        let later = t0 + Duration::from_secs(4);
        let expired: Vec<_> = timers.expired(later, Duration::from_secs(3)).collect();
        assert_eq!(expired, vec![(0, 0)]);
    }

    #[test]
    fn restart_resets_the_clock() {
        let mut timers = TimerSet::new();
        let t0 = Instant::now();
        let slot = timers.start(0, t0);
        let later = t0 + Duration::from_secs(4);
        timers.restart(slot, later);
        assert_eq!(timers.expired(later, Duration::from_secs(3)).count(), 0);
        let even_later = later + Duration::from_secs(4);
        assert_eq!(timers.expired(even_later, Duration::from_secs(3)).count(), 1);
    }
}
