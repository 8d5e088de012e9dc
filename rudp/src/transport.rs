//! The datagram transport boundary: send-one-datagram-to-address,
//! receive-one-datagram-with-sender-address, plus bind/close, kept
//! separate from the protocol engine so a test double can stand in for
//! a real UDP socket. `DatagramSocket` is shaped around addressed
//! datagrams rather than a byte stream, since UDP hands back a peer
//! address with every receive.

use std::io;
use std::net::{SocketAddr, UdpSocket};

/// A datagram transport: send one datagram to an address, receive one
/// datagram and learn who sent it. Implemented for `std::net::UdpSocket`;
/// test code implements it for an in-process loopback to inject loss and
/// reordering (see `rudp/tests/`).
pub trait DatagramSocket: Send + Sync {
    fn send_to(&self, buf: &[u8], addr: SocketAddr) -> io::Result<usize>;
    fn recv_from(&self, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)>;
    fn local_addr(&self) -> io::Result<SocketAddr>;
}

impl DatagramSocket for UdpSocket {
    fn send_to(&self, buf: &[u8], addr: SocketAddr) -> io::Result<usize> {
        UdpSocket::send_to(self, buf, addr)
    }

    fn recv_from(&self, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)> {
        UdpSocket::recv_from(self, buf)
    }

    fn local_addr(&self) -> io::Result<SocketAddr> {
        UdpSocket::local_addr(self)
    }
}

/// Opens a UDP socket bound to `local_addr`. Binding to `0.0.0.0:0` picks
/// an ephemeral port, covering the "just give me a socket" client case.
pub fn open_and_bind(local_addr: SocketAddr) -> io::Result<UdpSocket> {
    UdpSocket::bind(local_addr)
}
