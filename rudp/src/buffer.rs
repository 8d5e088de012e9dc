//! The segment buffer: a per-call array of up to `BUFFER_SIZE` segments,
//! reused as the outgoing send queue (sender) or the reassembly area
//! (receiver).

use crate::config::{BUFFER_SIZE, MAX_PAYLOAD, SEQ_SPACE, WINDOW_SIZE};
use crate::segment::Segment;

pub struct SegmentBuffer {
    segments: Vec<Segment>,
}

impl SegmentBuffer {
    /// Splits `payload` into `ceil(len / MAX_PAYLOAD)` data segments,
    /// seqnos assigned `i mod SEQ_SPACE`, last segment flagged
    /// `last = 1`. A zero-length payload still produces exactly one
    /// (empty) `last` segment.
    pub fn for_sending(payload: &[u8]) -> Self {
        let no_of_segments = segment_count(payload.len());
        let mut segments = Vec::with_capacity(no_of_segments);
        for i in 0..no_of_segments {
            let start = i * MAX_PAYLOAD;
            let end = (start + MAX_PAYLOAD).min(payload.len());
            let is_last = i + 1 == no_of_segments;
            segments.push(Segment::data((i % SEQ_SPACE) as u8, is_last, &payload[start..end]));
        }
        Self { segments }
    }

    /// Seeds a reassembly buffer with `no_of_segments` placeholder data
    /// segments carrying sequential seqnos and `ack = 0`, so that
    /// `index_of` can resolve incoming segments before any data has
    /// arrived.
    pub fn for_receiving(no_of_segments: usize) -> Self {
        let segments = (0..no_of_segments)
            .map(|i| Segment::empty((i % SEQ_SPACE) as u8))
            .collect();
        Self { segments }
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn get(&self, idx: usize) -> &Segment {
        &self.segments[idx]
    }

    pub fn seqno_at(&self, idx: usize) -> u8 {
        self.segments[idx].header.seqno
    }

    pub fn is_acked(&self, idx: usize) -> bool {
        self.segments[idx].header.ack
    }

    /// Marks slot `idx` delivered/acknowledged (the `ack` bit doubles as
    /// the "delivered" mark during reassembly).
    pub fn mark_acked(&mut self, idx: usize) {
        self.segments[idx].header.ack = true;
    }

    /// Clears the `ack` bit on `idx` (sender: done right before
    /// retransmitting, so a late ACK for the stale transmission cannot
    /// be mistaken for one that covers the retransmission).
    pub fn clear_acked(&mut self, idx: usize) {
        self.segments[idx].header.ack = false;
    }

    /// Stores an incoming data segment's payload into slot `idx` and
    /// marks it delivered.
    pub fn store_received(&mut self, idx: usize, incoming: Segment) {
        let mut incoming = incoming;
        incoming.header.ack = true;
        self.segments[idx] = incoming;
    }

    /// Resolves a received `seqno` to a buffer index, scanning
    /// `[base - WINDOW_SIZE, base + WINDOW_SIZE)` (clamped at the buffer
    /// start) for the first slot whose stored seqno matches. This is the
    /// union of the current and previous windows, the only range over
    /// which seqnos are guaranteed unique given `2 * WINDOW_SIZE <=
    /// SEQ_SPACE`, so it correctly disambiguates both fresh and
    /// retransmitted segments.
    pub fn index_of(&self, base: usize, seqno: u8) -> Option<usize> {
        let lower = base.saturating_sub(WINDOW_SIZE);
        let upper = (base + WINDOW_SIZE).min(self.segments.len());
        (lower..upper).find(|&idx| self.segments[idx].header.seqno == seqno)
    }

    /// Reassembles the first `bytes_received` bytes of delivered payload
    /// into `out`.
    pub fn reassemble(&self, bytes_received: usize, out: &mut [u8]) {
        let no_of_segments = segment_count(bytes_received);
        let mut written = 0;
        for i in 0..no_of_segments {
            let seg = &self.segments[i];
            let remaining = bytes_received - written;
            let take = seg.payload_len().min(remaining);
            out[written..written + take].copy_from_slice(&seg.payload()[..take]);
            written += take;
        }
    }
}

/// `ceil(len / MAX_PAYLOAD)`, with the zero-length boundary case mapping
/// to exactly one segment.
pub fn segment_count(len: usize) -> usize {
    if len == 0 {
        1
    } else {
        (len + MAX_PAYLOAD - 1) / MAX_PAYLOAD
    }
}

/// `BUFFER_SIZE * MAX_PAYLOAD`, the maximum payload bytes a single call
/// may carry.
pub const fn max_call_bytes() -> usize {
    BUFFER_SIZE * MAX_PAYLOAD
}
