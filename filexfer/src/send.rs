use std::fs::File;
use std::io::{self, Read};
use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;

use rudp::config::{EOF_SENTINEL, FILE_BUFFER};
use rudp::RudpSocket;

use crate::error::Result;

/// Sends `file` to `dest`: the filename first (one call), then the file
/// contents in `FILE_BUFFER`-sized calls, then the `EOF_SENTINEL`.
pub fn run(dest: SocketAddr, file: &Path, logs: bool) -> Result<()> {
    let socket = RudpSocket::builder().logs(logs).bind((Ipv4Addr::UNSPECIFIED, 0).into())?;

    let filename = file
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "file path has no file name"))?;
    socket.send_to(filename.as_bytes(), dest)?;

    let mut source = File::open(file)?;
    let mut chunk = vec![0u8; FILE_BUFFER];
    let mut sent = 0usize;
    loop {
        let n = source.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        socket.send_to(&chunk[..n], dest)?;
        sent += n;
    }
    socket.send_to(EOF_SENTINEL, dest)?;

    log::info!("sent {sent} bytes of {} to {dest}", file.display());
    Ok(())
}
