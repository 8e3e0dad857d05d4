use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Where one practice recording is in its pipeline. Transitions are
/// monotonic on the happy path; the one sanctioned reversal is
/// `analyzing → completed` when a classification attempt fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Recording,
    Completed,
    Analyzing,
    Analyzed,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionStatus::Recording => "recording",
            SessionStatus::Completed => "completed",
            SessionStatus::Analyzing => "analyzing",
            SessionStatus::Analyzed => "analyzed",
        };
        f.write_str(name)
    }
}

/// One practice recording session document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Opaque token, generated at creation, immutable.
    pub id: String,
    pub owner_id: String,
    /// The practice prompt/topic being read.
    pub prompt_id: String,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Blob store key once the recording is uploaded.
    pub blob_key: Option<String>,
    /// Content type of the stored blob; canonical WAV unless encoding fell
    /// back to the captured format.
    pub blob_content_type: Option<String>,
    pub duration_secs: Option<f64>,
    /// Amplitude envelope computed at upload, for chart rendering.
    pub waveform: Option<Vec<f32>>,
    pub status: SessionStatus,
}

impl SessionRecord {
    pub fn new(owner_id: impl Into<String>, prompt_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.into(),
            prompt_id: prompt_id.into(),
            created_at: Utc::now(),
            completed_at: None,
            blob_key: None,
            blob_content_type: None,
            duration_secs: None,
            waveform: None,
            status: SessionStatus::Recording,
        }
    }

    /// Deterministic blob location for this session's audio.
    pub fn blob_key_for(&self) -> String {
        format!("{}/{}.wav", self.owner_id, self.id)
    }
}
