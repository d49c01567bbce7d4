//! Persistent score ledger behind the score service.
//!
//! One JSON object maps each player key to `{ realName, score }`; the
//! reserved key `__leader` holds the global record. A player's score only
//! ever goes up, and the leader is the running maximum of all submissions.

use super::protocol::truncate_quote;
use super::types::{LeaderRecord, PlayerProfile, SubmitResponse};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Reserved key holding the leader record.
pub const LEADER_KEY: &str = "__leader";

/// Stored in place of a quote that was not a string.
pub const INVALID_QUOTE_MARKER: &str = "error";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRecord {
    pub real_name: String,
    pub score: u32,
}

/// On-disk layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerData {
    #[serde(rename = "__leader", default, skip_serializing_if = "Option::is_none")]
    pub leader: Option<LeaderRecord>,
    #[serde(flatten)]
    pub players: BTreeMap<String, PlayerRecord>,
}

/// A submission as received, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub player_name: Option<String>,
    pub real_name: Option<String>,
    pub score: Option<u32>,
    pub quote: Option<serde_json::Value>,
}

/// Why a submission was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    MissingFields,
    ReservedKey,
}

impl ValidationError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::MissingFields => "playerName, realName, and score are required",
            Self::ReservedKey => "playerName is reserved",
        }
    }
}

pub struct Ledger {
    data: LedgerData,
    path: Option<PathBuf>,
    /// Bumped on every accepted submission.
    revision: u64,
}

/// Serialized ledger contents captured at one revision, written without
/// holding the ledger.
#[derive(Debug, Clone)]
pub struct LedgerSnapshot {
    pub path: PathBuf,
    pub revision: u64,
    json: String,
}

impl LedgerSnapshot {
    pub fn write(&self) -> io::Result<()> {
        fs::write(&self.path, &self.json)
    }
}

impl Ledger {
    /// A ledger that is never written to disk.
    pub fn in_memory() -> Self {
        Self {
            data: LedgerData::default(),
            path: None,
            revision: 0,
        }
    }

    /// Open the ledger at `path`. A missing or unreadable file starts empty.
    pub fn open(path: &Path) -> Self {
        let data = match fs::read_to_string(path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                log::warn!("ignoring unreadable score file {}: {}", path.display(), e);
                LedgerData::default()
            }),
            Err(_) => LedgerData::default(),
        };
        Self {
            data,
            path: Some(path.to_path_buf()),
            revision: 0,
        }
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn data(&self) -> &LedgerData {
        &self.data
    }

    pub fn leader(&self) -> Option<&LeaderRecord> {
        self.data.leader.as_ref()
    }

    /// Profile for `player_key`; unknown players get zero and an empty name.
    pub fn lookup(&self, player_key: &str) -> PlayerProfile {
        let record = self.data.players.get(player_key);
        PlayerProfile {
            player_name: player_key.to_string(),
            best_score: record.map(|r| r.score).unwrap_or(0),
            real_name: record.map(|r| r.real_name.clone()).unwrap_or_default(),
            leader: self.data.leader.clone(),
        }
    }

    /// Apply a submission: raise the player's score and the leader record
    /// where the new score is strictly higher.
    pub fn submit(&mut self, request: SubmitRequest) -> Result<SubmitResponse, ValidationError> {
        let SubmitRequest {
            player_name,
            real_name,
            score,
            quote,
        } = request;
        let (player_name, real_name, score) = match (player_name, real_name, score) {
            (Some(p), Some(r), Some(s)) if !p.is_empty() && !r.is_empty() => (p, r, s),
            _ => return Err(ValidationError::MissingFields),
        };
        if player_name == LEADER_KEY {
            return Err(ValidationError::ReservedKey);
        }

        let improved = self
            .data
            .players
            .get(&player_name)
            .map_or(true, |current| score > current.score);
        if improved {
            self.data.players.insert(
                player_name.clone(),
                PlayerRecord {
                    real_name: real_name.clone(),
                    score,
                },
            );
        }

        let leader_score = self.data.leader.as_ref().map(|l| l.score as i64).unwrap_or(-1);
        if score as i64 > leader_score {
            let quote = match quote {
                Some(serde_json::Value::String(q)) => truncate_quote(&q),
                _ => INVALID_QUOTE_MARKER.to_string(),
            };
            let leader = LeaderRecord {
                real_name,
                score,
                quote,
            };
            log::info!("new leader: {:?}", leader);
            self.data.leader = Some(leader);
        }

        self.revision += 1;
        let best_score = self
            .data
            .players
            .get(&player_name)
            .map(|r| r.score)
            .unwrap_or(score);
        Ok(SubmitResponse {
            best_score,
            leader: self.data.leader.clone(),
        })
    }

    /// Current contents ready to write. `None` for in-memory ledgers.
    pub fn snapshot(&self) -> io::Result<Option<LedgerSnapshot>> {
        let Some(path) = &self.path else {
            return Ok(None);
        };
        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok(Some(LedgerSnapshot {
            path: path.clone(),
            revision: self.revision,
            json,
        }))
    }
}
