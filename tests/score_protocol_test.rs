//! Integration test: score protocol end to end
//!
//! Drives the client-side submission rules through `ScoreService` against an
//! in-memory `ScoreApi` backed by the real ledger, so the server update rules
//! and the client reconciliation run together without a network.

use dino_run::error::ScoreError;
use dino_run::leaderboard::client::ScoreEvent;
use dino_run::leaderboard::ledger::SubmitRequest;
use dino_run::leaderboard::protocol::{build_submission, plan_submission, SubmissionPlan};
use dino_run::leaderboard::types::{PlayerProfile, ScoreSubmission, SubmitResponse};
use dino_run::leaderboard::{Ledger, ScoreApi, ScoreService, ScoreState};
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// `ScoreApi` answered directly by a ledger.
struct LedgerApi {
    ledger: Mutex<Ledger>,
}

impl LedgerApi {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            ledger: Mutex::new(Ledger::in_memory()),
        })
    }

    fn seed(&self, player: &str, name: &str, score: u32, quote: &str) {
        self.ledger
            .lock()
            .unwrap()
            .submit(SubmitRequest {
                player_name: Some(player.to_string()),
                real_name: Some(name.to_string()),
                score: Some(score),
                quote: Some(serde_json::json!(quote)),
            })
            .unwrap();
    }
}

impl ScoreApi for LedgerApi {
    fn fetch_profile(&self, player_key: &str) -> Result<PlayerProfile, ScoreError> {
        Ok(self.ledger.lock().unwrap().lookup(player_key))
    }

    fn submit(&self, submission: &ScoreSubmission) -> Result<SubmitResponse, ScoreError> {
        // Through the JSON body, as the server would see it
        let body = serde_json::to_vec(submission).map_err(io::Error::from)?;
        let request: SubmitRequest = serde_json::from_slice(&body).map_err(io::Error::from)?;
        self.ledger.lock().unwrap().submit(request).map_err(|e| {
            ScoreError::Body(io::Error::new(io::ErrorKind::InvalidData, e.message()))
        })
    }
}

fn next_event(service: &ScoreService) -> ScoreEvent {
    service
        .wait_next(Duration::from_secs(5))
        .expect("background request should finish")
}

/// Fetch the profile through the service, as a session does at start.
fn load_state(service: &ScoreService, key: &str, name: &str) -> ScoreState {
    let mut state = ScoreState::new(key, name);
    service.request_profile(key);
    match next_event(service) {
        ScoreEvent::ProfileLoaded(profile) => state.apply_profile(profile),
        other => panic!("unexpected event {:?}", other),
    }
    state
}

fn submit(service: &ScoreService, state: &mut ScoreState, submission: ScoreSubmission) {
    state.submission = dino_run::leaderboard::SubmissionStatus::Pending;
    service.request_submit(submission);
    match next_event(service) {
        ScoreEvent::Submitted(response) => state.apply_submit_response(response),
        other => panic!("unexpected event {:?}", other),
    }
}

// =============================================================================
// Read path
// =============================================================================

#[test]
fn test_unknown_key_reads_defaults_with_leader() {
    let api = LedgerApi::new();
    api.seed("bob", "Bob", 10, "hello");
    let service = ScoreService::new(api);

    let state = load_state(&service, "stranger", "");
    assert_eq!(state.confirmed_best, 0);
    assert!(state.display_name.is_empty());
    let leader = state.leader.expect("leader from store");
    assert_eq!(leader.real_name, "Bob");
    assert_eq!(leader.quote, "hello");
}

#[test]
fn test_unknown_key_on_empty_store_has_no_leader() {
    let service = ScoreService::new(LedgerApi::new());
    let state = load_state(&service, "stranger", "");
    assert_eq!(state.confirmed_best, 0);
    assert!(state.leader.is_none());
}

// =============================================================================
// Submission scenarios
// =============================================================================

#[test]
fn test_zero_score_below_leader_submits_without_quote() {
    let api = LedgerApi::new();
    api.seed("bob", "Bob", 10, "top");
    let service = ScoreService::new(api.clone());
    let mut state = load_state(&service, "ann", "Ann");

    assert_eq!(plan_submission(0, &state), SubmissionPlan::Submit);
    let submission = build_submission(&state, 0, None);
    assert!(submission.quote.is_empty());
    submit(&service, &mut state, submission);

    assert_eq!(state.local_best, 0);
    assert_eq!(state.confirmed_best, 0);
    // Leader untouched
    let leader = api.ledger.lock().unwrap().leader().cloned().unwrap();
    assert_eq!(leader.real_name, "Bob");
    assert_eq!(leader.quote, "top");
}

#[test]
fn test_first_zero_score_on_empty_store_leaves_blank_quote() {
    let api = LedgerApi::new();
    let service = ScoreService::new(api.clone());
    let mut state = load_state(&service, "ann", "Ann");

    // No leader known, so a 0 is not crowned and no quote is asked for
    assert_eq!(plan_submission(0, &state), SubmissionPlan::Submit);
    let submission = build_submission(&state, 0, None);
    submit(&service, &mut state, submission);

    // The store had no leader at all, so the 0 still takes the record
    let leader = api.ledger.lock().unwrap().leader().cloned().unwrap();
    assert_eq!(leader.real_name, "Ann");
    assert_eq!(leader.score, 0);
    assert_eq!(leader.quote, "");
    assert_eq!(state.leader.unwrap().quote, "");
}

#[test]
fn test_new_record_captures_truncated_quote() {
    let api = LedgerApi::new();
    api.seed("bob", "Bob", 10, "top");
    api.seed("ann", "Ann", 12, "");
    let service = ScoreService::new(api.clone());
    let mut state = load_state(&service, "ann", "Ann");
    assert_eq!(state.confirmed_best, 12);
    assert_eq!(state.leader_score(), 12);

    // Ann already holds the record at 12; 15 beats it
    assert_eq!(plan_submission(15, &state), SubmissionPlan::CrownAndSubmit);
    let long_quote = "z".repeat(140);
    let submission = build_submission(&state, 15, Some(&long_quote));
    submit(&service, &mut state, submission);

    assert_eq!(state.local_best, 15);
    assert_eq!(state.confirmed_best, 15);
    let leader = state.leader.clone().unwrap();
    assert_eq!(leader.score, 15);
    assert_eq!(leader.quote.chars().count(), 100);
}

#[test]
fn test_new_record_over_other_leader() {
    let api = LedgerApi::new();
    api.seed("bob", "Bob", 10, "top");
    let service = ScoreService::new(api.clone());
    let mut state = load_state(&service, "ann", "Ann");
    state.confirmed_best = 12;

    assert_eq!(plan_submission(15, &state), SubmissionPlan::CrownAndSubmit);
    let submission = build_submission(&state, 15, Some("mine"));
    submit(&service, &mut state, submission);

    assert_eq!(state.local_best, 15);
    assert_eq!(state.leader.as_ref().unwrap().real_name, "Ann");
    assert_eq!(api.ledger.lock().unwrap().lookup("ann").best_score, 15);
}

#[test]
fn test_lower_second_score_keeps_first() {
    let api = LedgerApi::new();
    let service = ScoreService::new(api.clone());
    let mut state = load_state(&service, "ann", "Ann");

    let submission = build_submission(&state, 5, None);
    submit(&service, &mut state, submission);
    assert_eq!(state.confirmed_best, 5);

    // The client would skip this one; force it through to check the server rule
    let submission = build_submission(&state, 3, None);
    submit(&service, &mut state, submission);
    assert_eq!(state.confirmed_best, 5);
    assert_eq!(api.ledger.lock().unwrap().lookup("ann").best_score, 5);
}

#[test]
fn test_below_confirmed_best_is_skipped() {
    let api = LedgerApi::new();
    api.seed("ann", "Ann", 9, "");
    let service = ScoreService::new(api);
    let state = load_state(&service, "ann", "Ann");

    assert_eq!(plan_submission(8, &state), SubmissionPlan::Skip);
    assert_eq!(plan_submission(9, &state), SubmissionPlan::Submit);
}

#[test]
fn test_leader_stays_running_maximum() {
    let api = LedgerApi::new();
    let service = ScoreService::new(api.clone());

    for (key, score) in [("a", 4), ("b", 11), ("c", 7), ("a", 12), ("b", 2)] {
        let mut state = load_state(&service, key, key);
        if plan_submission(score, &state) != SubmissionPlan::Skip {
            let submission = build_submission(&state, score, Some("q"));
            submit(&service, &mut state, submission);
        }
        let ledger = api.ledger.lock().unwrap();
        let max = ledger.data().players.values().map(|r| r.score).max().unwrap();
        assert!(ledger.leader().unwrap().score >= max);
    }
    assert_eq!(api.ledger.lock().unwrap().leader().unwrap().real_name, "a");
}
