//! Request routing for the score service, independent of the socket layer.
//!
//! - `GET /score/{playerKey}` returns the player's profile and the leader.
//! - `POST /score` applies a submission. Writing the ledger back is left to
//!   the caller, outside any lock.

use super::ledger::{Ledger, SubmitRequest};
use serde::Serialize;
use serde_json::json;

/// A response ready to be framed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    fn json<T: Serialize>(status: u16, value: &T) -> Self {
        let body = serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string());
        Self { status, body }
    }

    fn error(status: u16, message: &str) -> Self {
        Self::json(status, &json!({ "error": message }))
    }

    fn no_content() -> Self {
        Self {
            status: 204,
            body: String::new(),
        }
    }

    pub fn reason(&self) -> &'static str {
        match self.status {
            200 => "OK",
            204 => "No Content",
            400 => "Bad Request",
            404 => "Not Found",
            405 => "Method Not Allowed",
            _ => "Internal Server Error",
        }
    }
}

/// Dispatch one request against the ledger.
pub fn route(method: &str, target: &str, body: &[u8], ledger: &mut Ledger) -> HttpResponse {
    let path = target.split('?').next().unwrap_or(target);

    if method == "OPTIONS" {
        return HttpResponse::no_content();
    }

    if let Some(raw_key) = path.strip_prefix("/score/") {
        if method != "GET" {
            return HttpResponse::error(405, "method not allowed");
        }
        let Some(player_key) = percent_decode(raw_key) else {
            return HttpResponse::error(400, "malformed player key");
        };
        if player_key.is_empty() {
            return HttpResponse::error(404, "not found");
        }
        log::info!("fetching score for player: {}", player_key);
        return HttpResponse::json(200, &ledger.lookup(&player_key));
    }

    if path == "/score" {
        if method != "POST" {
            return HttpResponse::error(405, "method not allowed");
        }
        return submit(body, ledger);
    }

    HttpResponse::error(404, "not found")
}

fn submit(body: &[u8], ledger: &mut Ledger) -> HttpResponse {
    let request: SubmitRequest = match serde_json::from_slice(body) {
        Ok(request) => request,
        Err(e) => {
            log::warn!("rejected malformed submission: {}", e);
            return HttpResponse::error(400, "malformed request body");
        }
    };

    match ledger.submit(request) {
        Ok(response) => HttpResponse::json(200, &response),
        Err(e) => HttpResponse::error(400, e.message()),
    }
}

/// Decode `%XX` escapes. Returns `None` for bad escapes or non-UTF-8 output.
pub fn percent_decode(input: &str) -> Option<String> {
    let bytes = input.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = input.get(i + 1..i + 3)?;
            decoded.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            decoded.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(decoded).ok()
}
