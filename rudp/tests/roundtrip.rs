//! End-to-end boundary scenarios driven over real loopback UDP sockets
//! so both the send loop and the receiver loop run as they would in
//! production (two real threads, a real kernel socket buffer standing
//! in for the unreliable transport).

use rudp::RudpSocket;
use std::net::Ipv4Addr;
use std::thread;

fn bound_pair() -> (RudpSocket, RudpSocket) {
    let a = RudpSocket::bind((Ipv4Addr::LOCALHOST, 0).into()).unwrap();
    let b = RudpSocket::bind((Ipv4Addr::LOCALHOST, 0).into()).unwrap();
    (a, b)
}

fn round_trip(payload: &[u8]) -> Vec<u8> {
    let (sender, receiver) = bound_pair();
    let receiver_addr = receiver.local_addr().unwrap();
    let recv_len = payload.len().max(1);

    let recv_thread = thread::spawn(move || {
        let mut buf = vec![0u8; recv_len];
        let (n, _from) = receiver.recv_from(&mut buf).unwrap();
        buf.truncate(n);
        buf
    });

    let sent = sender.send_to(payload, receiver_addr).unwrap();
    assert_eq!(sent, payload.len());

    recv_thread.join().unwrap()
}

#[test]
fn empty_send_recovers_zero_bytes() {
    let out = round_trip(&[]);
    assert!(out.is_empty());
}

#[test]
fn exactly_one_segment_round_trips() {
    let payload = vec![0xABu8; 500];
    let out = round_trip(&payload);
    assert_eq!(out, payload);
}

#[test]
fn exactly_window_size_segments_round_trip() {
    // 8 segments of 500 bytes = 4000 bytes, filling exactly one window.
    let payload: Vec<u8> = (0u8..=255).cycle().take(4000).collect();
    let out = round_trip(&payload);
    assert_eq!(out, payload);
}

#[test]
fn window_rollover_round_trips() {
    // 10 segments: the window must advance past base = 7 before seqno 8
    // can be admitted.
    let payload: Vec<u8> = (0u8..=255).cycle().take(5000).collect();
    let out = round_trip(&payload);
    assert_eq!(out, payload);
}

#[test]
fn receiver_buffer_larger_than_payload_still_recovers_exact_length() {
    let (sender, receiver) = bound_pair();
    let receiver_addr = receiver.local_addr().unwrap();

    let recv_thread = thread::spawn(move || {
        let mut buf = vec![0u8; 10_000]; // much larger than the payload
        let (n, _from) = receiver.recv_from(&mut buf).unwrap();
        buf.truncate(n);
        buf
    });

    let payload = vec![0x42u8; 123];
    sender.send_to(&payload, receiver_addr).unwrap();
    let out = recv_thread.join().unwrap();
    assert_eq!(out, payload);
}

#[test]
fn recv_from_reports_senders_address() {
    let (sender, receiver) = bound_pair();
    let sender_addr = sender.local_addr().unwrap();
    let receiver_addr = receiver.local_addr().unwrap();

    let recv_thread = thread::spawn(move || {
        let mut buf = vec![0u8; 16];
        receiver.recv_from(&mut buf).unwrap().1
    });

    sender.send_to(b"hi", receiver_addr).unwrap();
    let observed_from = recv_thread.join().unwrap();
    assert_eq!(observed_from, sender_addr);
}
