//! Error types for the game core and the score client.

use std::io;
use thiserror::Error;

/// Failures that prevent a session from starting.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("asset not ready: {0}")]
    AssetNotReady(String),
    #[error("obstacle catalog is malformed: {0}")]
    Catalog(#[from] serde_json::Error),
    #[error("cannot read obstacle catalog: {0}")]
    Io(#[from] io::Error),
}

/// Failures talking to the score service. Never fatal to gameplay.
#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("score request failed: {0}")]
    Http(#[from] ureq::Error),
    #[error("malformed score response: {0}")]
    Body(#[from] io::Error),
}
