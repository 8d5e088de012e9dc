//! For any reordering of the segments within a single window, reassembly
//! recovers the original buffer. Drives the public
//! `SegmentBuffer`/`Window` API directly (the same sequence of
//! operations the receiver's DATA path performs internally, which is not
//! part of the public surface) so the test does not depend on real
//! scheduling to produce a particular arrival order.

use rudp::buffer::SegmentBuffer;
use rudp::window::Window;

/// Dispatches one incoming segment the way the receiver's DATA path
/// does: a fresh in-window arrival is stored and delivered, a
/// previous-window arrival is a retransmit that was already delivered
/// (no-op here; the real path just re-ACKs it), anything else is a bug
/// in the test.
fn deliver(buffer: &mut SegmentBuffer, window: &mut Window, seqno: u8) {
    let idx = buffer.index_of(window.base, seqno).expect("seqno resolves to a buffer index");
    if window.in_current_window(idx) {
        let incoming = *buffer.get(idx);
        buffer.store_received(idx, incoming);
        window.advance_base(|i| buffer.is_acked(i));
    } else if window.in_previous_window(idx) {
        // Already delivered; a real retransmit just gets re-ACKed.
    } else {
        panic!("seqno {seqno} resolved to index {idx}, outside both windows");
    }
}

#[test]
fn reordered_delivery_within_one_window_reassembles_correctly() {
    let payload: Vec<u8> = (0u8..=255).cycle().take(4000).collect(); // exactly WINDOW_SIZE segments
    let send_buf = SegmentBuffer::for_sending(&payload);
    assert_eq!(send_buf.len(), 8);

    let mut recv_buf = SegmentBuffer::for_receiving(send_buf.len());
    let mut window = Window::new(recv_buf.len());

    // Arrive in a scrambled, but not sorted, order.
    let arrival_order = [3u8, 1, 0, 2, 7, 4, 6, 5];
    for &seqno in &arrival_order {
        deliver(&mut recv_buf, &mut window, seqno);
    }

    assert!(window.all_done());
    let mut out = vec![0u8; payload.len()];
    recv_buf.reassemble(payload.len(), &mut out);
    assert_eq!(out, payload);
}

#[test]
fn duplicate_delivery_does_not_corrupt_reassembly() {
    let payload = vec![0x7Eu8; 1200]; // 3 segments
    let send_buf = SegmentBuffer::for_sending(&payload);
    let mut recv_buf = SegmentBuffer::for_receiving(send_buf.len());
    let mut window = Window::new(recv_buf.len());

    deliver(&mut recv_buf, &mut window, 0);
    deliver(&mut recv_buf, &mut window, 0); // retransmit of an already-delivered segment
    deliver(&mut recv_buf, &mut window, 1);
    deliver(&mut recv_buf, &mut window, 2);

    assert!(window.all_done());
    let mut out = vec![0u8; payload.len()];
    recv_buf.reassemble(payload.len(), &mut out);
    assert_eq!(out, payload);
}
