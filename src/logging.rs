//! Logger setup for both binaries.

use crate::utils::persistence;
use env_logger::{Builder, Env, Target};
use std::fs::OpenOptions;
use std::io;

pub const LOG_FILE: &str = "dino-run.log";

/// Route the client's log output to `~/.dino-run/dino-run.log`.
///
/// The terminal is owned by the game screen, so nothing goes to stderr.
pub fn init_client_logger() -> io::Result<()> {
    let path = persistence::save_path(LOG_FILE)?;
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
}

/// Log to stderr, filtered by `RUST_LOG` (default `info`).
pub fn init_server_logger() {
    let _ = Builder::from_env(Env::default().default_filter_or("info")).try_init();
}
