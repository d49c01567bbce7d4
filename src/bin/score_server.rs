//! Score server for the Dino Run leaderboard.
//!
//! Usage:
//!   cargo run --features server --bin dino-run-server -- [--port 3000] [--store scores.json]
//!
//! `PORT` sets the port when `--port` is absent. Log level comes from `RUST_LOG`.

use dino_run::build_info;
use dino_run::leaderboard::server::start_score_server;
use dino_run::leaderboard::Ledger;
use dino_run::logging;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_STORE: &str = "scores.json";

struct ServerArgs {
    port: u16,
    store: PathBuf,
}

fn parse_args(args: &[String], port_env: Option<String>) -> Result<ServerArgs, String> {
    let mut port = match port_env {
        Some(p) => p.parse().map_err(|_| format!("Invalid PORT: {}", p))?,
        None => DEFAULT_PORT,
    };
    let mut store = PathBuf::from(DEFAULT_STORE);

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--port" | "-p" => {
                let value = args.get(i + 1).ok_or("--port needs a value")?;
                port = value
                    .parse()
                    .map_err(|_| format!("Invalid port: {}", value))?;
                i += 2;
            }
            "--store" | "-s" => {
                let value = args.get(i + 1).ok_or("--store needs a value")?;
                store = PathBuf::from(value);
                i += 2;
            }
            "--version" | "-v" => {
                println!("{}", build_info::version_line("dino-run-server"));
                std::process::exit(0);
            }
            "--help" | "-h" => {
                println!("Usage: dino-run-server [--port <port>] [--store <file>]");
                std::process::exit(0);
            }
            other => return Err(format!("Unknown argument: {}", other)),
        }
    }
    Ok(ServerArgs { port, store })
}

#[tokio::main]
async fn main() {
    logging::init_server_logger();

    let args: Vec<String> = env::args().collect();
    let server_args = match parse_args(&args, env::var("PORT").ok()) {
        Ok(server_args) => server_args,
        Err(message) => {
            eprintln!("{}", message);
            std::process::exit(1);
        }
    };

    let ledger = Ledger::open(&server_args.store);
    log::info!(
        "loaded {} players from {}",
        ledger.data().players.len(),
        server_args.store.display()
    );

    if let Err(e) = start_score_server(server_args.port, Arc::new(Mutex::new(ledger))).await {
        log::error!("score server stopped: {}", e);
        std::process::exit(1);
    }
}
