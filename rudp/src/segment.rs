//! Segment wire format.
//!
//! ```text
//!  0 1 2 3 4 5 6 7
//! +-+-+-+-+-+-+-+-+
//! |  seqno  |A|L|
//! +-+-+-+-+-+-+-+-+
//! |                |
//! |     payload    |  (0..MAX_PAYLOAD bytes, data segments only)
//! |                |
//! +-+-+-+-+-+-+-+-+
//! ```
//!
//! A data datagram on the wire is exactly `1 + payload_len` bytes; an ACK
//! datagram is exactly 1 byte. The payload length is never carried in the
//! header; it is inferred from how many bytes the datagram actually
//! contained.

use crate::config::MAX_PAYLOAD;

/// The one-byte segment header: a 6-bit sequence number plus the `ack`
/// and `last` flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Header {
    pub seqno: u8,
    pub ack: bool,
    pub last: bool,
}

impl Header {
    pub fn new(seqno: u8, ack: bool, last: bool) -> Self {
        Self { seqno: seqno & 0x3F, ack, last }
    }

    /// Packs the header into its one-byte wire form.
    pub fn encode(self) -> u8 {
        (self.seqno & 0x3F) | ((self.ack as u8) << 6) | ((self.last as u8) << 7)
    }

    /// Unpacks a header from its one-byte wire form.
    pub fn decode(byte: u8) -> Self {
        Self {
            seqno: byte & 0x3F,
            ack: (byte >> 6) & 0x1 != 0,
            last: (byte >> 7) & 0x1 != 0,
        }
    }
}

/// A segment held in the segment buffer: a header plus up to
/// `MAX_PAYLOAD` bytes of data. ACK segments are represented with
/// `len == 0` and `header.ack == true`.
#[derive(Debug, Clone, Copy)]
pub struct Segment {
    pub header: Header,
    data: [u8; MAX_PAYLOAD],
    len: usize,
}

impl Segment {
    /// An empty data segment with the given sequence number.
    pub fn empty(seqno: u8) -> Self {
        Self {
            header: Header::new(seqno, false, false),
            data: [0u8; MAX_PAYLOAD],
            len: 0,
        }
    }

    /// A data segment carrying `payload` (must fit in `MAX_PAYLOAD`).
    pub fn data(seqno: u8, last: bool, payload: &[u8]) -> Self {
        debug_assert!(payload.len() <= MAX_PAYLOAD);
        let mut data = [0u8; MAX_PAYLOAD];
        data[..payload.len()].copy_from_slice(payload);
        Self {
            header: Header::new(seqno, false, last),
            data,
            len: payload.len(),
        }
    }

    /// An ACK segment for the given sequence number.
    pub fn ack(seqno: u8, last: bool) -> Self {
        Self {
            header: Header::new(seqno, true, last),
            data: [0u8; MAX_PAYLOAD],
            len: 0,
        }
    }

    pub fn payload(&self) -> &[u8] {
        &self.data[..self.len]
    }

    pub fn payload_len(&self) -> usize {
        self.len
    }

    /// Serializes this segment to its wire form: the header byte, then
    /// the payload for data segments, nothing more for ACKs.
    pub fn to_wire(&self, out: &mut Vec<u8>) {
        out.clear();
        out.push(self.header.encode());
        if !self.header.ack {
            out.extend_from_slice(self.payload());
        }
    }

    /// Parses a received datagram. Datagram length (not the header)
    /// determines whether this is an ACK (length 1) or data segment.
    pub fn from_wire(bytes: &[u8]) -> Option<Self> {
        let (&head, payload) = bytes.split_first()?;
        let header = Header::decode(head);
        if payload.len() > MAX_PAYLOAD {
            return None;
        }
        let mut data = [0u8; MAX_PAYLOAD];
        data[..payload.len()].copy_from_slice(payload);
        Some(Self { header, data, len: payload.len() })
    }
}
