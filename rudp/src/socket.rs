//! The public send/receive primitives and the `RudpSocket` handle that
//! carries the transport and the `logs` flag across calls. One
//! long-lived handle wraps the transport, and every call initializes its
//! own window, timers, and buffer from scratch and discards them on
//! return.

use std::net::SocketAddr;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use crate::buffer::{max_call_bytes, segment_count, SegmentBuffer};
use crate::engine::{join_receiver, send_loop, spawn_receiver, Shared};
use crate::error::{Error, Result};
use crate::transport::{self, DatagramSocket};

/// A reliable endpoint: a bound datagram socket plus the one
/// protocol-irrelevant setting (`logs`) that outlives individual calls.
pub struct RudpSocket {
    socket: Arc<dyn DatagramSocket>,
    logs: bool,
}

/// Builder for `RudpSocket`.
#[derive(Default)]
pub struct RudpSocketBuilder {
    logs: bool,
}

impl RudpSocketBuilder {
    /// Enables a `log::trace!` line per sent/received segment and ACK.
    /// No functional effect on the protocol.
    pub fn logs(mut self, enabled: bool) -> Self {
        self.logs = enabled;
        self
    }

    /// Opens and binds the underlying UDP socket.
    pub fn bind(self, local_addr: SocketAddr) -> Result<RudpSocket> {
        let socket = transport::open_and_bind(local_addr)?;
        Ok(RudpSocket { socket: Arc::new(socket), logs: self.logs })
    }

    /// Wraps an already-open datagram transport (used by tests to supply
    /// a lossy in-process loopback instead of a real UDP socket).
    pub fn with_transport(self, socket: Arc<dyn DatagramSocket>) -> RudpSocket {
        RudpSocket { socket, logs: self.logs }
    }
}

impl RudpSocket {
    pub fn builder() -> RudpSocketBuilder {
        RudpSocketBuilder::default()
    }

    /// Binds a socket with default settings (`logs` disabled).
    pub fn bind(local_addr: SocketAddr) -> Result<Self> {
        Self::builder().bind(local_addr)
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Closes the socket. Provided for symmetry with the explicit `bind`;
    /// dropping a `RudpSocket` has the same effect.
    pub fn close(self) {
        drop(self);
    }

    /// Segments `buffer`, runs one window-set of selective-repeat
    /// delivery to `dest`, and returns the number of payload bytes sent.
    pub fn send_to(&self, buffer: &[u8], dest: SocketAddr) -> Result<usize> {
        let max = max_call_bytes();
        if buffer.len() > max {
            return Err(Error::PayloadTooLarge { len: buffer.len(), max });
        }

        let shared = Arc::new(Mutex::new(Shared::new(SegmentBuffer::for_sending(buffer))));
        let stop = Arc::new(AtomicBool::new(false));
        let handle = spawn_receiver(self.socket.clone(), shared.clone(), stop.clone(), self.logs);

        let bytes_sent = send_loop(&self.socket, &shared, dest, &stop, self.logs);

        let outcome = join_receiver(handle)?;
        if let Some(err) = outcome.error {
            return Err(err);
        }
        Ok(bytes_sent)
    }

    /// Seeds a reassembly buffer sized to `buffer.len()`, waits for one
    /// window-set transfer to complete, and reassembles the delivered
    /// bytes into `buffer`.
    pub fn recv_from(&self, buffer: &mut [u8]) -> Result<(usize, SocketAddr)> {
        let max = max_call_bytes();
        if buffer.len() > max {
            return Err(Error::PayloadTooLarge { len: buffer.len(), max });
        }

        let no_of_segments = segment_count(buffer.len());
        let shared = Arc::new(Mutex::new(Shared::new(SegmentBuffer::for_receiving(no_of_segments))));
        let stop = Arc::new(AtomicBool::new(false));
        let handle = spawn_receiver(self.socket.clone(), shared.clone(), stop.clone(), self.logs);

        let outcome = join_receiver(handle)?;
        if let Some(err) = outcome.error {
            return Err(err);
        }

        let bytes_received = outcome.bytes_received.unwrap_or(0);
        if bytes_received > buffer.len() {
            return Err(Error::BufferTooSmall { need: bytes_received, have: buffer.len() });
        }

        let guard = shared.lock().expect("shared state mutex poisoned");
        guard.buffer.reassemble(bytes_received, &mut buffer[..bytes_received]);
        drop(guard);

        let peer = outcome.peer.expect("a completed transfer always observed at least one datagram");
        Ok((bytes_received, peer))
    }
}
