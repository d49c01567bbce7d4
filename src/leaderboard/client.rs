//! Score service client.
//!
//! `ScoreApi` is the two-request contract with the score service.
//! `ScoreService` runs those requests on worker threads so the game loop never
//! waits on the network; results come back as `ScoreEvent`s the loop polls
//! once per frame.

use super::types::{PlayerProfile, ScoreSubmission, SubmitResponse};
use crate::error::ScoreError;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// The two requests the game makes against the score service.
pub trait ScoreApi: Send + Sync {
    fn fetch_profile(&self, player_key: &str) -> Result<PlayerProfile, ScoreError>;
    fn submit(&self, submission: &ScoreSubmission) -> Result<SubmitResponse, ScoreError>;
}

/// HTTP implementation over `ureq`.
pub struct HttpScoreClient {
    base_url: String,
    agent: ureq::Agent,
}

impl HttpScoreClient {
    /// `timeout` of `None` lets requests wait indefinitely.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Self {
        let mut builder = ureq::AgentBuilder::new().user_agent("dino-run");
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent: builder.build(),
        }
    }

    pub fn profile_url(&self, player_key: &str) -> String {
        format!("{}/score/{}", self.base_url, encode_path_segment(player_key))
    }

    pub fn submit_url(&self) -> String {
        format!("{}/score", self.base_url)
    }
}

impl ScoreApi for HttpScoreClient {
    fn fetch_profile(&self, player_key: &str) -> Result<PlayerProfile, ScoreError> {
        let profile: PlayerProfile = self
            .agent
            .get(&self.profile_url(player_key))
            .call()?
            .into_json()?;
        Ok(profile)
    }

    fn submit(&self, submission: &ScoreSubmission) -> Result<SubmitResponse, ScoreError> {
        let response: SubmitResponse = self
            .agent
            .post(&self.submit_url())
            .send_json(submission)?
            .into_json()?;
        Ok(response)
    }
}

/// Percent-encode everything outside the URL unreserved set.
pub fn encode_path_segment(segment: &str) -> String {
    let mut encoded = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}

/// Result of a background request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreEvent {
    ProfileLoaded(PlayerProfile),
    ProfileFailed(String),
    Submitted(SubmitResponse),
    SubmitFailed(String),
}

/// Fire-and-forget request runner.
pub struct ScoreService {
    api: Arc<dyn ScoreApi>,
    tx: Sender<ScoreEvent>,
    rx: Receiver<ScoreEvent>,
}

impl ScoreService {
    pub fn new(api: Arc<dyn ScoreApi>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self { api, tx, rx }
    }

    /// Fetch the player's best score and the leader in the background.
    pub fn request_profile(&self, player_key: &str) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        let player_key = player_key.to_string();
        thread::spawn(move || {
            let event = match api.fetch_profile(&player_key) {
                Ok(profile) => {
                    log::info!(
                        "loaded profile for '{}': best {}",
                        player_key,
                        profile.best_score
                    );
                    ScoreEvent::ProfileLoaded(profile)
                }
                Err(e) => {
                    log::warn!("could not load best score for '{}': {}", player_key, e);
                    ScoreEvent::ProfileFailed(e.to_string())
                }
            };
            let _ = tx.send(event);
        });
    }

    /// Send a final score in the background. No retry on failure.
    pub fn request_submit(&self, submission: ScoreSubmission) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let event = match api.submit(&submission) {
                Ok(response) => {
                    log::info!(
                        "submitted score {} for '{}': server best {}",
                        submission.score,
                        submission.player_name,
                        response.best_score
                    );
                    ScoreEvent::Submitted(response)
                }
                Err(e) => {
                    log::warn!("error updating best score: {}", e);
                    ScoreEvent::SubmitFailed(e.to_string())
                }
            };
            let _ = tx.send(event);
        });
    }

    /// Next finished request, if any. Never blocks.
    pub fn try_next(&self) -> Option<ScoreEvent> {
        self.rx.try_recv().ok()
    }

    /// Next finished request, waiting up to `timeout`.
    pub fn wait_next(&self, timeout: Duration) -> Option<ScoreEvent> {
        self.rx.recv_timeout(timeout).ok()
    }
}
