//! Compile-time protocol constants: a 6-bit sequence space, an 8-segment
//! window, and a 3-second coarse retransmission timeout. None of them are
//! runtime-configurable: changing them changes the wire format.

use std::time::Duration;

/// Maximum payload bytes carried by a single data segment.
pub const MAX_PAYLOAD: usize = 500;

/// Size of the modular sequence-number space (`seqno` is 6 bits).
pub const SEQ_SPACE: usize = 64;

/// Maximum number of unacknowledged segments in flight at once.
pub const WINDOW_SIZE: usize = 8;

/// Maximum number of segments a single `send_to`/`recv_from` call may carry.
pub const BUFFER_SIZE: usize = 256;

/// Maximum payload bytes carried by a single call.
pub const MAX_CALL_BYTES: usize = BUFFER_SIZE * MAX_PAYLOAD;

/// Retransmission timeout. 1-second resolution is assumed by the timer
/// set; finer-grained monotonic time is fine too, the wire protocol does
/// not depend on it.
pub const TIMEOUT: Duration = Duration::from_secs(3);

/// Chunk size used by the file-transfer helper (`filexfer`) for each
/// `send_to` call.
pub const FILE_BUFFER: usize = 102_400;

/// The literal sentinel the file-transfer helper sends to mark end of
/// stream. In-band and unescaped: a file chunk that itself begins with
/// these three bytes is indistinguishable from the sentinel. Preserved
/// deliberately as a known, documented limitation rather than hardened
/// with a length-prefixed control frame.
pub const EOF_SENTINEL: &[u8; 3] = b"EOF";

const _WINDOW_FITS_SEQUENCE_SPACE: () = assert!(
    2 * WINDOW_SIZE <= SEQ_SPACE,
    "WINDOW_SIZE must satisfy 2 * WINDOW_SIZE <= SEQ_SPACE to avoid ambiguous sequence numbers"
);
