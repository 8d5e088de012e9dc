//! The sliding window: `base`/`next` buffer indices and the membership
//! predicates used to classify an incoming segment or ACK.
//!
//! `Window` is shared shape for both roles: on the sender, `base` is the
//! earliest unacknowledged segment and `next` is the next segment to
//! transmit; on the receiver, `base` is the earliest segment not yet
//! delivered in order and `next` is unused (kept at `base`).

use crate::config::WINDOW_SIZE;

#[derive(Debug, Clone, Copy)]
pub struct Window {
    /// Index of the earliest segment not yet acknowledged (sender) or
    /// not yet received in-order (receiver).
    pub base: usize,
    /// Sender-only: index of the next segment to transmit.
    pub next: usize,
    /// Total segments in this call's buffer; `base`/`next` never exceed it.
    no_of_segments: usize,
}

impl Window {
    pub fn new(no_of_segments: usize) -> Self {
        Self { base: 0, next: 0, no_of_segments }
    }

    pub fn no_of_segments(&self) -> usize {
        self.no_of_segments
    }

    /// `true` once the window has admitted every segment in the call.
    pub fn all_sent(&self) -> bool {
        self.next >= self.no_of_segments
    }

    /// `true` once every segment in the call has been acknowledged / delivered.
    pub fn all_done(&self) -> bool {
        self.base >= self.no_of_segments
    }

    /// Sender: room to admit another segment into the window.
    pub fn has_room(&self) -> bool {
        self.next - self.base < WINDOW_SIZE && self.next < self.no_of_segments
    }

    /// Sender: admits `next` into the window and advances it.
    pub fn admit_next(&mut self) -> usize {
        debug_assert!(self.has_room());
        let idx = self.next;
        self.next += 1;
        idx
    }

    /// `idx` lies in the current window `[base, base + WINDOW_SIZE)`.
    pub fn in_current_window(&self, idx: usize) -> bool {
        idx >= self.base && idx < self.base + WINDOW_SIZE
    }

    /// `idx` lies in the window immediately preceding the current one:
    /// `[base - WINDOW_SIZE, base)`. Saturates at zero rather than
    /// wrapping, since a single call never needs indices below zero.
    pub fn in_previous_window(&self, idx: usize) -> bool {
        let lower = self.base.saturating_sub(WINDOW_SIZE);
        idx >= lower && idx < self.base
    }

    /// Advances `base` past every slot `[base, ...)` for which
    /// `is_acked(idx)` holds, bounded by `no_of_segments` so the scan can
    /// never walk past the end of this call's transfer region.
    pub fn advance_base(&mut self, mut is_acked: impl FnMut(usize) -> bool) {
        while self.base < self.no_of_segments && is_acked(self.base) {
            self.base += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_room_respects_window_size_and_segment_count() {
        let mut w = Window::new(3);
        assert!(w.has_room());
        w.admit_next();
        w.admit_next();
        w.admit_next();
        assert!(!w.has_room(), "no_of_segments exhausted");
    }

    #[test]
    fn has_room_respects_window_size_cap() {
        let mut w = Window::new(100);
        for _ in 0..WINDOW_SIZE {
            assert!(w.has_room());
            w.admit_next();
        }
        assert!(!w.has_room());
    }

    #[test]
    fn current_and_previous_window_predicates() {
        let w = Window { base: 10, next: 10, no_of_segments: 100 };
        assert!(w.in_current_window(10));
        assert!(w.in_current_window(10 + WINDOW_SIZE - 1));
        assert!(!w.in_current_window(10 + WINDOW_SIZE));
        assert!(w.in_previous_window(9));
        assert!(w.in_previous_window(10 - WINDOW_SIZE));
        assert!(!w.in_previous_window(10));
    }

    #[test]
    fn advance_base_stops_at_first_unacked() {
        let mut w = Window::new(10);
        w.next = 5;
        w.advance_base(|idx| idx < 3);
        assert_eq!(w.base, 3);
    }

    #[test]
    fn advance_base_never_exceeds_no_of_segments() {
        let mut w = Window::new(4);
        w.next = 4;
        w.advance_base(|_| true);
        assert_eq!(w.base, 4);
        assert!(w.all_done());
    }
}
