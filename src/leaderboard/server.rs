//! HTTP front end for the score ledger.

use super::ledger::{Ledger, LedgerSnapshot};
use super::routes::{route, HttpResponse};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;

/// Largest request body accepted, in bytes.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Shared ledger handle. The lock serializes read-modify-write cycles.
pub type SharedLedger = Arc<Mutex<Ledger>>;

/// Revision most recently written to disk. Held across the blocking write so
/// writes land in order and an older snapshot never replaces a newer one.
type WrittenRevision = Arc<std::sync::Mutex<u64>>;

/// Accept connections on `port` forever.
pub async fn start_score_server(port: u16, ledger: SharedLedger) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    log::info!("score server listening on http://localhost:{}", port);
    serve(listener, ledger).await
}

/// Serve on an already-bound listener.
pub async fn serve(listener: TcpListener, ledger: SharedLedger) -> std::io::Result<()> {
    let written: WrittenRevision = Arc::new(std::sync::Mutex::new(ledger.lock().await.revision()));
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let ledger = Arc::clone(&ledger);
                let written = Arc::clone(&written);
                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, ledger, written).await {
                        log::warn!("connection error from {}: {}", addr, e);
                    }
                });
            }
            Err(e) => log::error!("accept error: {}", e),
        }
    }
}

async fn handle_connection(
    stream: TcpStream,
    ledger: SharedLedger,
    written: WrittenRevision,
) -> std::io::Result<()> {
    let mut reader = BufReader::new(stream);

    let mut request_line = String::new();
    if reader.read_line(&mut request_line).await? == 0 {
        return Ok(());
    }
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or("").to_string();
    let target = parts.next().unwrap_or("/").to_string();

    let mut content_length = 0usize;
    loop {
        let mut header = String::new();
        if reader.read_line(&mut header).await? == 0 {
            break;
        }
        let header = header.trim_end();
        if header.is_empty() {
            break;
        }
        if let Some((name, value)) = header.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().unwrap_or(0);
            }
        }
    }

    let response = if content_length > MAX_BODY_BYTES {
        HttpResponse {
            status: 400,
            body: r#"{"error":"request body too large"}"#.to_string(),
        }
    } else {
        let mut body = vec![0u8; content_length];
        reader.read_exact(&mut body).await?;
        let (response, snapshot) = {
            let mut ledger = ledger.lock().await;
            let before = ledger.revision();
            let response = route(&method, &target, &body, &mut ledger);
            let snapshot = if ledger.revision() != before {
                ledger.snapshot()
            } else {
                Ok(None)
            };
            (response, snapshot)
        };
        match snapshot {
            Ok(Some(snapshot)) => persist(snapshot, written).await,
            Ok(None) => {}
            Err(e) => log::error!("failed to write score file: {}", e),
        }
        response
    };

    log::debug!("{} {} -> {}", method, target, response.status);
    let mut stream = reader.into_inner();
    stream.write_all(frame_response(&response).as_bytes()).await?;
    stream.flush().await?;
    Ok(())
}

/// Write a snapshot on the blocking pool. Failures are logged; the response
/// is sent either way.
async fn persist(snapshot: LedgerSnapshot, written: WrittenRevision) {
    let result = tokio::task::spawn_blocking(move || {
        let mut last = written.lock().unwrap_or_else(|e| e.into_inner());
        if snapshot.revision <= *last {
            return Ok(());
        }
        snapshot.write()?;
        *last = snapshot.revision;
        log::info!("saved score file {}", snapshot.path.display());
        Ok::<(), std::io::Error>(())
    })
    .await;
    match result {
        Ok(Ok(())) => {}
        Ok(Err(e)) => log::error!("failed to write score file: {}", e),
        Err(e) => log::error!("score file writer stopped: {}", e),
    }
}

fn frame_response(response: &HttpResponse) -> String {
    format!(
        "HTTP/1.1 {} {}\r\n\
         Content-Type: application/json\r\n\
         Access-Control-Allow-Origin: *\r\n\
         Access-Control-Allow-Methods: GET, POST, OPTIONS\r\n\
         Access-Control-Allow-Headers: Content-Type\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\
         \r\n\
         {}",
        response.status,
        response.reason(),
        response.body.len(),
        response.body
    )
}
