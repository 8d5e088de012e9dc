//! Error types for the transport.
//!
//! Every fallible entry point returns `Result<T>`; the cause travels with
//! the value instead of living in a thread-local errno.

use std::fmt;
use std::io;

/// Result type alias for `rudp` operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error conditions surfaced by the public API.
#[derive(Debug)]
pub enum Error {
    /// Caller asked to send more than `BUFFER_SIZE * MAX_PAYLOAD` bytes
    /// in one `send_to` call.
    PayloadTooLarge { len: usize, max: usize },

    /// Caller's receive buffer is smaller than the bytes that arrived.
    BufferTooSmall { need: usize, have: usize },

    /// The background receiver loop or the socket itself hit an I/O
    /// error.
    Io(io::Error),

    /// The receiver's background thread panicked or could not be
    /// joined.
    ReceiverLost,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::PayloadTooLarge { len, max } => {
                write!(f, "payload of {len} bytes exceeds the {max}-byte limit for one call")
            }
            Error::BufferTooSmall { need, have } => {
                write!(f, "caller buffer has {have} bytes, {need} needed")
            }
            Error::Io(e) => write!(f, "transport I/O error: {e}"),
            Error::ReceiverLost => write!(f, "receiver thread did not terminate cleanly"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}
