//! `rudp`, selective-repeat sliding-window reliable delivery over an
//! unreliable datagram transport.
//!
//! A 1-byte segment header, an 8-segment selective-repeat window over a
//! 64-value sequence space, per-segment retransmission timers, and a
//! foreground send loop paired with a background receiver loop.
//!
//! ```no_run
//! use rudp::RudpSocket;
//! use std::net::SocketAddr;
//!
//! # fn main() -> rudp::Result<()> {
//! let sock = RudpSocket::bind("0.0.0.0:0".parse().unwrap())?;
//! let dest: SocketAddr = "127.0.0.1:9000".parse().unwrap();
//! sock.send_to(b"hello", dest)?;
//! # Ok(())
//! # }
//! ```

pub mod buffer;
pub mod config;
mod engine;
pub mod error;
pub mod segment;
pub mod timer;
pub mod transport;
pub mod window;

mod socket;

pub use error::{Error, Result};
pub use socket::{RudpSocket, RudpSocketBuilder};
pub use transport::DatagramSocket;
