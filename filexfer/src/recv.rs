use std::fs::File;
use std::io::Write;
use std::net::Ipv4Addr;

use rudp::config::{EOF_SENTINEL, FILE_BUFFER};
use rudp::RudpSocket;

use crate::error::Result;

/// Maximum filename length accepted in the handshake call.
const MAX_FILENAME_BYTES: usize = 255;

/// Listens on `port`, receives one filename then one file, and saves it
/// with the `"received - "` prefix.
pub fn run(port: u16, logs: bool) -> Result<()> {
    let socket = RudpSocket::builder().logs(logs).bind((Ipv4Addr::UNSPECIFIED, port).into())?;

    let mut name_buf = vec![0u8; MAX_FILENAME_BYTES];
    let (n, from) = socket.recv_from(&mut name_buf)?;
    let saved_name = format!("received - {}", String::from_utf8_lossy(&name_buf[..n]));
    let mut dest = File::create(&saved_name)?;

    let mut chunk = vec![0u8; FILE_BUFFER];
    let mut received = 0usize;
    loop {
        let (n, _) = socket.recv_from(&mut chunk)?;
        if n == EOF_SENTINEL.len() && &chunk[..n] == EOF_SENTINEL.as_slice() {
            break;
        }
        dest.write_all(&chunk[..n])?;
        received += n;
    }

    log::info!("saved {saved_name} ({received} bytes) from {from}");
    Ok(())
}
