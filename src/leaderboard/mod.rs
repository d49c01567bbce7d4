//! Leaderboard: client-side score state, the HTTP client, and the score service.

pub mod client;
pub mod ledger;
pub mod protocol;
pub mod routes;
#[cfg(feature = "server")]
pub mod server;
pub mod types;

pub use client::{HttpScoreClient, ScoreApi, ScoreEvent, ScoreService};
pub use ledger::Ledger;
pub use protocol::{build_submission, plan_submission, SubmissionPlan};
pub use types::{LeaderRecord, PlayerProfile, ScoreState, ScoreSubmission, SubmissionStatus};
