//! The two coupled activities that share the segment buffer, window, and
//! timer set for the duration of one call: the background receiver loop
//! and the foreground send loop.
//!
//! `Shared` is the one piece of state both activities touch, and it is
//! always accessed through the `Mutex` below, no raw shared memory and
//! no reliance on word-sized writes happening to be safe on the target
//! hardware.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crate::buffer::SegmentBuffer;
use crate::config::{MAX_PAYLOAD, TIMEOUT};
use crate::error::{Error, Result};
use crate::segment::Segment;
use crate::timer::TimerSet;
use crate::transport::DatagramSocket;
use crate::window::Window;

/// State shared between the send loop and the receiver loop for the
/// duration of one call.
pub struct Shared {
    pub buffer: SegmentBuffer,
    pub window: Window,
    pub timers: TimerSet,
}

impl Shared {
    pub fn new(buffer: SegmentBuffer) -> Self {
        let window = Window::new(buffer.len());
        Self { buffer, window, timers: TimerSet::new() }
    }
}

/// What the receiver loop hands back once it stops.
#[derive(Default)]
pub struct LoopOutcome {
    pub error: Option<Error>,
    /// Set once a DATA segment completes the transfer (receive mode only).
    pub bytes_received: Option<usize>,
    /// Address the most recent datagram arrived from.
    pub peer: Option<SocketAddr>,
}

/// Runs the background receiver activity until the transfer completes or
/// the transport errors. Shared by both call directions: it dispatches
/// on each incoming segment's `ack` bit rather than on which public
/// primitive spawned it.
pub fn receiver_loop(
    socket: Arc<dyn DatagramSocket>,
    shared: Arc<Mutex<Shared>>,
    stop: Arc<AtomicBool>,
    logs: bool,
) -> LoopOutcome {
    let mut outcome = LoopOutcome::default();
    let mut datagram = [0u8; 1 + MAX_PAYLOAD];

    loop {
        let (n, from) = match socket.recv_from(&mut datagram) {
            Ok(v) => v,
            Err(e) => {
                if logs {
                    log::error!("receiver loop: transport error: {e}");
                }
                outcome.error = Some(Error::Io(e));
                stop.store(true, Ordering::SeqCst);
                return outcome;
            }
        };

        let Some(incoming) = Segment::from_wire(&datagram[..n]) else {
            if logs {
                log::warn!("receiver loop: dropping malformed datagram of {n} bytes");
            }
            continue;
        };
        outcome.peer = Some(from);

        let mut guard = shared.lock().expect("shared state mutex poisoned");
        if incoming.header.ack {
            process_ack(&mut guard, incoming, logs);
        } else {
            process_data(&mut guard, &socket, from, incoming, &mut outcome, logs);
        }

        let done = guard.window.base > 0 && guard.buffer.get(guard.window.base - 1).header.last;
        drop(guard);

        if done {
            if logs {
                log::debug!("receiver loop: last segment observed, stopping");
            }
            stop.store(true, Ordering::SeqCst);
            return outcome;
        }
    }
}

/// ACK path: acknowledge the segment at its resolved buffer index, stop
/// its timer, and advance `base` past whatever is now contiguously acked.
fn process_ack(shared: &mut Shared, incoming: Segment, logs: bool) {
    let Some(idx) = shared.buffer.index_of(shared.window.base, incoming.header.seqno) else {
        if logs {
            log::trace!("ignoring ACK for seqno {} outside the current window", incoming.header.seqno);
        }
        return;
    };
    if !shared.window.in_current_window(idx) {
        if logs {
            log::trace!("ignoring duplicate/out-of-window ACK at index {idx}");
        }
        return;
    }

    shared.timers.stop_for_index(idx);
    shared.buffer.mark_acked(idx);
    let buffer = &shared.buffer;
    shared.window.advance_base(|i| buffer.is_acked(i));
    if logs {
        log::trace!("ACK for seqno {} (index {idx}); base now {}", incoming.header.seqno, shared.window.base);
    }
}

/// DATA path: store fresh in-window segments and acknowledge them,
/// re-acknowledge (without re-delivering) segments that fall in the
/// previous window, and silently drop anything else.
fn process_data(
    shared: &mut Shared,
    socket: &Arc<dyn DatagramSocket>,
    from: SocketAddr,
    incoming: Segment,
    outcome: &mut LoopOutcome,
    logs: bool,
) {
    let Some(idx) = shared.buffer.index_of(shared.window.base, incoming.header.seqno) else {
        if logs {
            log::trace!("dropping data segment with unresolvable seqno {}", incoming.header.seqno);
        }
        return;
    };

    if shared.window.in_current_window(idx) {
        let last = incoming.header.last;
        shared.buffer.store_received(idx, incoming);
        let buffer = &shared.buffer;
        shared.window.advance_base(|i| buffer.is_acked(i));
        send_ack(socket, from, shared.buffer.seqno_at(idx), last, logs);

        if last {
            outcome.bytes_received = Some(idx * MAX_PAYLOAD + shared.buffer.get(idx).payload_len());
        }
    } else if shared.window.in_previous_window(idx) {
        let stored = shared.buffer.get(idx);
        send_ack(socket, from, stored.header.seqno, stored.header.last, logs);
    } else if logs {
        log::trace!("dropping data segment at unresolved index {idx}");
    }
}

fn send_ack(socket: &Arc<dyn DatagramSocket>, to: SocketAddr, seqno: u8, last: bool, logs: bool) {
    let ack = Segment::ack(seqno, last);
    let mut wire = Vec::with_capacity(1);
    ack.to_wire(&mut wire);
    if let Err(e) = socket.send_to(&wire, to) {
        if logs {
            log::warn!("failed to send ACK for seqno {seqno}: {e}");
        }
    } else if logs {
        log::trace!("sent ACK for seqno {seqno} (last={last}) to {to}");
    }
}

/// Runs the foreground send activity: fills the window from the outgoing
/// buffer, scans timers for expiry and retransmits, and repeats until
/// the receiver signals `stop`.
///
/// Returns total *payload* bytes transmitted, counting first
/// transmissions only; retransmissions are not counted.
pub fn send_loop(
    socket: &Arc<dyn DatagramSocket>,
    shared: &Arc<Mutex<Shared>>,
    dest: SocketAddr,
    stop: &Arc<AtomicBool>,
    logs: bool,
) -> usize {
    let mut bytes_sent = 0usize;
    let mut wire = Vec::with_capacity(1 + MAX_PAYLOAD);

    while !stop.load(Ordering::SeqCst) {
        let mut guard = shared.lock().expect("shared state mutex poisoned");

        while guard.window.has_room() {
            let idx = guard.window.admit_next();
            let now = Instant::now();
            let payload_len = guard.buffer.get(idx).payload_len();
            transmit(socket, &mut guard.buffer, idx, dest, &mut wire, logs);
            guard.timers.start(idx, now);
            bytes_sent += payload_len;
        }

        let now = Instant::now();
        let expired: Vec<(usize, usize)> = guard.timers.expired(now, TIMEOUT).collect();
        for (slot, idx) in expired {
            guard.buffer.clear_acked(idx);
            transmit(socket, &mut guard.buffer, idx, dest, &mut wire, logs);
            guard.timers.restart(slot, now);
            if logs {
                log::debug!("retransmitting segment at index {idx} after timeout");
            }
        }

        drop(guard);
        thread::sleep(Duration::from_micros(500));
    }

    bytes_sent
}

fn transmit(
    socket: &Arc<dyn DatagramSocket>,
    buffer: &mut SegmentBuffer,
    idx: usize,
    dest: SocketAddr,
    wire: &mut Vec<u8>,
    logs: bool,
) {
    buffer.get(idx).to_wire(wire);
    if let Err(e) = socket.send_to(wire, dest) {
        if logs {
            log::warn!("failed to send segment at index {idx}: {e}");
        }
    } else if logs {
        log::trace!("sent segment {} (index {idx}, {} bytes)", buffer.seqno_at(idx), wire.len());
    }
}

/// Spawns the receiver loop on a background thread.
pub fn spawn_receiver(
    socket: Arc<dyn DatagramSocket>,
    shared: Arc<Mutex<Shared>>,
    stop: Arc<AtomicBool>,
    logs: bool,
) -> thread::JoinHandle<LoopOutcome> {
    thread::spawn(move || receiver_loop(socket, shared, stop, logs))
}

pub fn join_receiver(handle: thread::JoinHandle<LoopOutcome>) -> Result<LoopOutcome> {
    handle.join().map_err(|_| Error::ReceiverLost)
}
