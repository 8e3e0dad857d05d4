use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::analysis::{
    category_trend, trend_points, AnalysisRecord, CategoryPercentages, CategoryTrend,
    PatternCategory, TrendPoint,
};
use crate::audio::{decode, waveform, CaptureError, RecordingCapture};
use crate::classifier::{ClassifierService, ClassifyError, ClassifyRequest};
use crate::session::{SessionRecord, SessionStatus};
use crate::store::{BlobStore, SessionPatch, SessionStore};

/// Everything that can go wrong across the record → upload → analyze
/// pipeline. External-call failures are converted to these at the lifecycle
/// boundary; nothing below throws across it.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("session {0} not found")]
    NotFound(String),

    #[error("session {id} is {actual}, expected {expected}")]
    InvalidState {
        id: String,
        expected: SessionStatus,
        actual: SessionStatus,
    },

    #[error("an upload for session {0} already ran or is in progress")]
    DuplicateUpload(String),

    #[error("an analysis for session {0} is already in flight")]
    AnalysisInFlight(String),

    #[error("session {0} has no stored recording")]
    MissingRecording(String),

    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error("failed to store the recording: {0}")]
    Upload(String),

    #[error(transparent)]
    Classifier(#[from] ClassifyError),

    #[error("session store error: {0}")]
    Store(String),
}

#[derive(Debug, Clone)]
pub struct LifecycleConfig {
    /// Envelope resolution stored with each uploaded recording.
    pub waveform_buckets: usize,
    /// Lifetime of minted playback and classifier-fetch URLs.
    pub playback_ttl: Duration,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            waveform_buckets: waveform::DEFAULT_BUCKETS,
            playback_ttl: Duration::from_secs(15 * 60),
        }
    }
}

/// One analysis record joined with its session for the dashboard listing.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardEntry {
    pub session_id: String,
    pub prompt_id: String,
    pub recorded_at: DateTime<Utc>,
    pub duration_secs: Option<f64>,
    pub playback_url: Option<String>,
    pub percentages: CategoryPercentages,
    pub stutter_rate: f64,
    pub total_units: f64,
    pub analyzed_at: DateTime<Utc>,
}

/// Chart payload for one owner: a point per analyzed session plus the
/// first-vs-last descriptor for every category (absent with fewer than two
/// sessions).
#[derive(Debug, Clone, Serialize)]
pub struct TrendReport {
    pub points: Vec<TrendPoint>,
    pub trends: Vec<CategoryTrend>,
}

/// The record → upload → analyze state machine for practice sessions.
///
/// Owns the per-session upload and analysis guards so "already uploaded" and
/// "analysis in progress" are states of this machine, not booleans scattered
/// across callers. Failures leave a session at its last successful status;
/// retry is a user-triggered re-invocation of the same transition.
pub struct SessionLifecycle {
    sessions: Arc<dyn SessionStore>,
    blobs: Arc<dyn BlobStore>,
    classifier: Arc<dyn ClassifierService>,
    config: LifecycleConfig,
    /// Sessions whose upload has been claimed. An entry is removed only when
    /// the upload fails, so a finished recording uploads at most once.
    uploads_claimed: Mutex<HashSet<String>>,
    /// Single-flight guard for classify calls.
    analyses_in_flight: Mutex<HashSet<String>>,
}

impl SessionLifecycle {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        blobs: Arc<dyn BlobStore>,
        classifier: Arc<dyn ClassifierService>,
        config: LifecycleConfig,
    ) -> Self {
        Self {
            sessions,
            blobs,
            classifier,
            config,
            uploads_claimed: Mutex::new(HashSet::new()),
            analyses_in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Start a new practice session in the `recording` state.
    pub async fn create(
        &self,
        owner_id: &str,
        prompt_id: &str,
    ) -> Result<SessionRecord, LifecycleError> {
        let record = SessionRecord::new(owner_id, prompt_id);
        self.sessions
            .create(record.clone())
            .await
            .map_err(store_err)?;

        info!(session_id = %record.id, owner_id = %owner_id, "Session created");
        Ok(record)
    }

    pub async fn session(&self, session_id: &str) -> Result<SessionRecord, LifecycleError> {
        self.sessions
            .get(session_id)
            .await
            .map_err(store_err)?
            .ok_or_else(|| LifecycleError::NotFound(session_id.to_string()))
    }

    /// Persist a finished recording and move the session to `completed`.
    ///
    /// Runs at most once per completed recording: the first call claims the
    /// session's upload slot before touching the blob store, and the claim is
    /// released only on failure. On failure the session stays `recording` and
    /// the caller may retry.
    pub async fn upload(
        &self,
        session_id: &str,
        bytes: &[u8],
        content_type: &str,
        duration_hint: Option<f64>,
    ) -> Result<SessionRecord, LifecycleError> {
        let record = self.session(session_id).await?;
        if record.status != SessionStatus::Recording {
            return Err(LifecycleError::InvalidState {
                id: session_id.to_string(),
                expected: SessionStatus::Recording,
                actual: record.status,
            });
        }

        {
            let mut claimed = self.uploads_claimed.lock().await;
            if !claimed.insert(session_id.to_string()) {
                return Err(LifecycleError::DuplicateUpload(session_id.to_string()));
            }
        }

        // Derive the waveform envelope and duration from the audio itself;
        // undecodable fallback encodings keep the caller's duration hint.
        let (duration_secs, envelope) = match decode::decode(bytes) {
            Ok(decoded) => (
                Some(decoded.duration_secs()),
                Some(waveform::summarize(
                    &decoded.mono(),
                    self.config.waveform_buckets,
                )),
            ),
            Err(e) => {
                warn!(session_id = %session_id, error = %e, "Stored recording is not decodable");
                (duration_hint, None)
            }
        };

        let blob_key = record.blob_key_for();
        if let Err(e) = self.blobs.put(&blob_key, bytes, content_type).await {
            self.release_upload_claim(session_id).await;
            return Err(LifecycleError::Upload(e.to_string()));
        }

        let patch = SessionPatch {
            status: Some(SessionStatus::Completed),
            completed_at: Some(Utc::now()),
            blob_key: Some(blob_key),
            blob_content_type: Some(content_type.to_string()),
            duration_secs,
            waveform: envelope,
        };

        match self.sessions.update(session_id, patch).await {
            Ok(updated) => {
                info!(session_id = %session_id, "Recording uploaded, session completed");
                Ok(updated)
            }
            Err(e) => {
                self.release_upload_claim(session_id).await;
                Err(store_err(e))
            }
        }
    }

    /// Stop an active capture and feed the finished recording straight into
    /// `upload`. Recording-stop therefore triggers encoding and upload
    /// exactly once per completed recording; a second call trips the upload
    /// guard instead of writing a duplicate blob.
    pub async fn finish_recording(
        &self,
        session_id: &str,
        capture: &mut RecordingCapture,
    ) -> Result<SessionRecord, LifecycleError> {
        let recording = capture.stop().await?;
        self.upload(
            session_id,
            &recording.bytes,
            &recording.content_type,
            recording.duration_secs,
        )
        .await
    }

    /// Send the stored recording to the classifier and move the session to
    /// `analyzed`, writing the analysis record.
    ///
    /// Single-flight per session: a concurrent duplicate invocation is
    /// rejected while one is in flight. On failure the session reverts to
    /// `completed` and the caller may retry.
    pub async fn analyze(&self, session_id: &str) -> Result<AnalysisRecord, LifecycleError> {
        let record = self.session(session_id).await?;
        if record.status != SessionStatus::Completed {
            return Err(LifecycleError::InvalidState {
                id: session_id.to_string(),
                expected: SessionStatus::Completed,
                actual: record.status,
            });
        }

        let blob_key = record
            .blob_key
            .clone()
            .ok_or_else(|| LifecycleError::MissingRecording(session_id.to_string()))?;
        let content_type = record
            .blob_content_type
            .clone()
            .unwrap_or_else(|| crate::audio::CANONICAL_CONTENT_TYPE.to_string());

        {
            let mut in_flight = self.analyses_in_flight.lock().await;
            if !in_flight.insert(session_id.to_string()) {
                return Err(LifecycleError::AnalysisInFlight(session_id.to_string()));
            }
        }

        let result = self
            .run_analysis(session_id, &blob_key, &content_type)
            .await;

        {
            let mut in_flight = self.analyses_in_flight.lock().await;
            in_flight.remove(session_id);
        }

        result
    }

    async fn run_analysis(
        &self,
        session_id: &str,
        blob_key: &str,
        content_type: &str,
    ) -> Result<AnalysisRecord, LifecycleError> {
        self.sessions
            .update(session_id, SessionPatch::status(SessionStatus::Analyzing))
            .await
            .map_err(store_err)?;

        let raw = async {
            let audio_url = self
                .blobs
                .signed_url(blob_key, self.config.playback_ttl)
                .await
                .map_err(store_err)?;
            let request = ClassifyRequest::from_url(session_id, audio_url, content_type);
            self.classifier
                .classify(&request)
                .await
                .map_err(LifecycleError::Classifier)
        }
        .await;

        let raw = match raw {
            Ok(raw) => raw,
            Err(e) => {
                self.revert_to_completed(session_id).await;
                return Err(e);
            }
        };

        let analysis = AnalysisRecord::from_raw(session_id, raw);
        if let Err(e) = self.sessions.insert_analysis(analysis.clone()).await {
            self.revert_to_completed(session_id).await;
            return Err(store_err(e));
        }

        self.sessions
            .update(session_id, SessionPatch::status(SessionStatus::Analyzed))
            .await
            .map_err(store_err)?;

        info!(session_id = %session_id, total_units = analysis.total_units, "Session analyzed");
        Ok(analysis)
    }

    /// Dashboard listing: every analysis record for the owner, enriched with
    /// the originating session's duration and a resolved playback URL.
    pub async fn dashboard(&self, owner_id: &str) -> Result<Vec<DashboardEntry>, LifecycleError> {
        let sessions: HashMap<String, SessionRecord> = self
            .sessions
            .sessions_for_owner(owner_id)
            .await
            .map_err(store_err)?
            .into_iter()
            .map(|record| (record.id.clone(), record))
            .collect();

        let analyses = self
            .sessions
            .analyses_for_owner(owner_id)
            .await
            .map_err(store_err)?;

        let entries = analyses.into_iter().filter_map(|analysis| {
            let session = sessions.get(&analysis.session_id)?.clone();
            Some(async move {
                let playback_url = match &session.blob_key {
                    Some(key) => Some(self.blobs.signed_url(key, self.config.playback_ttl).await?),
                    None => None,
                };
                anyhow::Ok(DashboardEntry {
                    session_id: session.id,
                    prompt_id: session.prompt_id,
                    recorded_at: session.created_at,
                    duration_secs: session.duration_secs,
                    playback_url,
                    percentages: analysis.percentages,
                    stutter_rate: analysis.percentages.stutter_rate(),
                    total_units: analysis.total_units,
                    analyzed_at: analysis.analyzed_at,
                })
            })
        });

        futures::future::try_join_all(entries)
            .await
            .map_err(store_err)
    }

    /// Trend series for one owner, oldest analysis first (ties keep arrival
    /// order).
    pub async fn trends(&self, owner_id: &str) -> Result<TrendReport, LifecycleError> {
        let mut records = self
            .sessions
            .analyses_for_owner(owner_id)
            .await
            .map_err(store_err)?;
        records.sort_by_key(|r| r.analyzed_at);

        let trends = PatternCategory::ALL
            .iter()
            .filter_map(|category| category_trend(&records, *category))
            .collect();

        Ok(TrendReport {
            points: trend_points(&records),
            trends,
        })
    }

    async fn release_upload_claim(&self, session_id: &str) {
        let mut claimed = self.uploads_claimed.lock().await;
        claimed.remove(session_id);
    }

    async fn revert_to_completed(&self, session_id: &str) {
        if let Err(e) = self
            .sessions
            .update(session_id, SessionPatch::status(SessionStatus::Completed))
            .await
        {
            warn!(session_id = %session_id, error = %e, "Failed to revert session to completed");
        }
    }
}

fn store_err(e: anyhow::Error) -> LifecycleError {
    LifecycleError::Store(e.to_string())
}
