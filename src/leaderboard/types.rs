//! Score service wire types and the client's local view of scores.

use serde::{Deserialize, Serialize};

/// The single global record holder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderRecord {
    pub real_name: String,
    pub score: u32,
    #[serde(default)]
    pub quote: String,
}

/// Response to `GET /score/{playerKey}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProfile {
    #[serde(default)]
    pub player_name: String,
    #[serde(default)]
    pub best_score: u32,
    #[serde(default)]
    pub real_name: String,
    #[serde(default)]
    pub leader: Option<LeaderRecord>,
}

/// Body of `POST /score`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSubmission {
    pub player_name: String,
    pub real_name: String,
    pub score: u32,
    /// Always sent. Empty unless the session set a new record.
    #[serde(default)]
    pub quote: String,
}

/// Response to `POST /score`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub best_score: u32,
    #[serde(default)]
    pub leader: Option<LeaderRecord>,
}

/// Where the end-of-session submission stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStatus {
    /// Session still running.
    NotSubmitted,
    /// Score below the confirmed best; nothing sent.
    Skipped,
    /// Waiting for the player's leader quote.
    AwaitingQuote,
    /// Request in flight.
    Pending,
    Confirmed,
    Failed,
}

/// Local score bookkeeping for one session.
///
/// `local_best` is what the player sees during the run and may be ahead of
/// the server. `confirmed_best` only ever comes from a server response.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreState {
    pub player_key: String,
    pub display_name: String,
    pub local_best: u32,
    pub confirmed_best: u32,
    pub leader: Option<LeaderRecord>,
    pub submission: SubmissionStatus,
}

impl ScoreState {
    pub fn new(player_key: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            player_key: player_key.into(),
            display_name: display_name.into(),
            local_best: 0,
            confirmed_best: 0,
            leader: None,
            submission: SubmissionStatus::NotSubmitted,
        }
    }

    /// Score of the known leader, 0 when none is known.
    pub fn leader_score(&self) -> u32 {
        self.leader.as_ref().map(|l| l.score).unwrap_or(0)
    }

    /// Name sent with submissions. Never empty.
    pub fn submission_name(&self) -> &str {
        if self.display_name.trim().is_empty() {
            &self.player_key
        } else {
            &self.display_name
        }
    }

    /// Optimistically raise the local best while the run is in progress.
    pub fn record_score(&mut self, score: u32) {
        if score > self.local_best {
            self.local_best = score;
        }
    }

    /// Adopt the profile fetched at session start. Stored scores never go
    /// down, so a profile read before a submission landed cannot lower the
    /// confirmed best.
    pub fn apply_profile(&mut self, profile: PlayerProfile) {
        self.confirmed_best = self.confirmed_best.max(profile.best_score);
        self.local_best = self.local_best.max(profile.best_score);
        if self.display_name.trim().is_empty() && !profile.real_name.is_empty() {
            self.display_name = profile.real_name;
        }
        if profile.leader.is_some() {
            self.leader = profile.leader;
        }
    }

    /// Adopt the server's answer to a submission. The server decides the best.
    ///
    /// The status only moves while this session's own request is pending; a
    /// late reply to an earlier session still updates the scores.
    pub fn apply_submit_response(&mut self, response: SubmitResponse) {
        self.confirmed_best = response.best_score;
        self.local_best = self.local_best.max(response.best_score);
        if self.submission == SubmissionStatus::Pending {
            self.local_best = response.best_score;
            self.submission = SubmissionStatus::Confirmed;
        }
        if response.leader.is_some() {
            self.leader = response.leader;
        }
    }

    pub fn mark_submit_failed(&mut self) {
        if self.submission == SubmissionStatus::Pending {
            self.submission = SubmissionStatus::Failed;
        }
    }

    /// State for a follow-up session by the same player: bests and the known
    /// leader carry over, the submission state starts fresh.
    pub fn next_session(&self) -> Self {
        Self {
            submission: SubmissionStatus::NotSubmitted,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_defaults_from_sparse_json() {
        let profile: PlayerProfile = serde_json::from_str("{}").unwrap();
        assert_eq!(profile.best_score, 0);
        assert!(profile.real_name.is_empty());
        assert!(profile.leader.is_none());

        let profile: PlayerProfile =
            serde_json::from_str(r#"{"playerName":"ann","bestScore":4,"realName":"Ann","leader":null}"#)
                .unwrap();
        assert_eq!(profile.best_score, 4);
        assert_eq!(profile.real_name, "Ann");
    }

    #[test]
    fn test_submission_wire_names() {
        let submission = ScoreSubmission {
            player_name: "ann".to_string(),
            real_name: "Ann".to_string(),
            score: 9,
            quote: String::new(),
        };
        let json = serde_json::to_value(&submission).unwrap();
        assert_eq!(json["playerName"], "ann");
        assert_eq!(json["realName"], "Ann");
        assert_eq!(json["score"], 9);
        assert_eq!(json["quote"], "");
    }

    #[test]
    fn test_stale_profile_does_not_lower_confirmed_best() {
        let mut state = ScoreState::new("ann", "Ann");
        state.submission = SubmissionStatus::Pending;
        state.apply_submit_response(SubmitResponse {
            best_score: 20,
            leader: None,
        });

        // Profile read before the submission was stored
        let mut state = state.next_session();
        state.apply_profile(PlayerProfile {
            player_name: "ann".to_string(),
            best_score: 12,
            real_name: "Ann".to_string(),
            leader: None,
        });
        assert_eq!(state.confirmed_best, 20);
        assert_eq!(state.local_best, 20);
    }

    #[test]
    fn test_record_score_is_optimistic_only() {
        let mut state = ScoreState::new("ann", "Ann");
        state.confirmed_best = 5;
        state.local_best = 5;

        state.record_score(3);
        assert_eq!(state.local_best, 5);

        state.record_score(7);
        assert_eq!(state.local_best, 7);
        assert_eq!(state.confirmed_best, 5, "confirmed best only moves on server replies");
    }

    #[test]
    fn test_apply_profile() {
        let mut state = ScoreState::new("ann", "");
        state.apply_profile(PlayerProfile {
            player_name: "ann".to_string(),
            best_score: 12,
            real_name: "Ann A.".to_string(),
            leader: Some(LeaderRecord {
                real_name: "Bob".to_string(),
                score: 30,
                quote: "hi".to_string(),
            }),
        });

        assert_eq!(state.confirmed_best, 12);
        assert_eq!(state.local_best, 12);
        assert_eq!(state.display_name, "Ann A.");
        assert_eq!(state.leader_score(), 30);
    }

    #[test]
    fn test_apply_profile_keeps_typed_name() {
        let mut state = ScoreState::new("ann", "Annie");
        state.apply_profile(PlayerProfile {
            real_name: "Ann A.".to_string(),
            ..Default::default()
        });
        assert_eq!(state.display_name, "Annie");
    }

    #[test]
    fn test_submit_response_overrides_local_best() {
        let mut state = ScoreState::new("ann", "Ann");
        state.record_score(20);
        state.submission = SubmissionStatus::Pending;
        state.apply_submit_response(SubmitResponse {
            best_score: 25,
            leader: None,
        });
        assert_eq!(state.local_best, 25);
        assert_eq!(state.confirmed_best, 25);
        assert_eq!(state.submission, SubmissionStatus::Confirmed);
    }

    #[test]
    fn test_submission_name_falls_back_to_key() {
        let state = ScoreState::new("ann", "  ");
        assert_eq!(state.submission_name(), "ann");
        let state = ScoreState::new("ann", "Ann");
        assert_eq!(state.submission_name(), "Ann");
    }

    #[test]
    fn test_next_session_carries_bests() {
        let mut state = ScoreState::new("ann", "Ann");
        state.apply_submit_response(SubmitResponse {
            best_score: 8,
            leader: None,
        });

        let next = state.next_session();
        assert_eq!(next.confirmed_best, 8);
        assert_eq!(next.local_best, 8);
        assert_eq!(next.submission, SubmissionStatus::NotSubmitted);
    }

    #[test]
    fn test_late_reply_leaves_new_session_status() {
        let mut state = ScoreState::new("ann", "Ann");
        state.record_score(3);
        state.apply_submit_response(SubmitResponse {
            best_score: 2,
            leader: None,
        });
        assert_eq!(state.submission, SubmissionStatus::NotSubmitted);
        assert_eq!(state.confirmed_best, 2);
        assert_eq!(state.local_best, 3);

        state.mark_submit_failed();
        assert_eq!(state.submission, SubmissionStatus::NotSubmitted);
    }
}
