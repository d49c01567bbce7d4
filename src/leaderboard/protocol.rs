//! End-of-session submission rules.
//!
//! A score is submitted when it ties or beats the server-confirmed best. If it
//! also beats the known leader, the player is asked for a quote first.

use super::types::{ScoreState, ScoreSubmission};

/// Longest quote stored with a leader record, in characters.
pub const MAX_QUOTE_CHARS: usize = 100;

/// What to do with a finished session's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionPlan {
    /// Below the confirmed best.
    Skip,
    Submit,
    /// New global record: capture a quote, then submit.
    CrownAndSubmit,
}

pub fn plan_submission(score: u32, state: &ScoreState) -> SubmissionPlan {
    if score < state.confirmed_best {
        SubmissionPlan::Skip
    } else if score > state.leader_score() {
        SubmissionPlan::CrownAndSubmit
    } else {
        SubmissionPlan::Submit
    }
}

pub fn truncate_quote(quote: &str) -> String {
    quote.chars().take(MAX_QUOTE_CHARS).collect()
}

/// Build the request body. The quote is empty unless the session was crowned.
pub fn build_submission(state: &ScoreState, score: u32, quote: Option<&str>) -> ScoreSubmission {
    ScoreSubmission {
        player_name: state.player_key.clone(),
        real_name: state.submission_name().to_string(),
        score,
        quote: quote.map(truncate_quote).unwrap_or_default(),
    }
}
