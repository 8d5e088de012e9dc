//! `filexfer`, a minimal file-transfer CLI over `rudp`. The filename
//! travels as one `send_to` call before the file itself, and the
//! receiver prefixes the saved name with `"received - "`.

mod error;
mod recv;
mod send;

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "filexfer", about = "Send or receive a file over rudp")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log each segment/ACK at trace level.
    #[arg(long, global = true)]
    logs: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Send a file to a listening `filexfer recv`.
    Send {
        server_ip: IpAddr,
        port: u16,
        file: PathBuf,
    },
    /// Listen on `port` and receive one file.
    Recv { port: u16 },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Send { server_ip, port, file } => {
            send::run(SocketAddr::new(server_ip, port), &file, cli.logs)
        }
        Command::Recv { port } => recv::run(port, cli.logs),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
