//! External persistence contracts
//!
//! The session document store and the content-addressable blob store are
//! external collaborators; the pipeline only sees these traits. No multi-key
//! transactional guarantees are assumed.

pub mod fs;
pub mod memory;

pub use fs::FsBlobStore;
pub use memory::MemorySessionStore;

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::time::Duration;

use crate::analysis::AnalysisRecord;
use crate::session::{SessionRecord, SessionStatus};

/// Partial update applied to a session document. `None` fields are left
/// untouched.
#[derive(Debug, Clone, Default)]
pub struct SessionPatch {
    pub status: Option<SessionStatus>,
    pub completed_at: Option<DateTime<Utc>>,
    pub blob_key: Option<String>,
    pub blob_content_type: Option<String>,
    pub duration_secs: Option<f64>,
    pub waveform: Option<Vec<f32>>,
}

impl SessionPatch {
    pub fn status(status: SessionStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

/// Keyed session documents plus their analysis records, and the read surface
/// the dashboard queries consume.
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    async fn create(&self, record: SessionRecord) -> Result<()>;

    async fn get(&self, id: &str) -> Result<Option<SessionRecord>>;

    async fn update(&self, id: &str, patch: SessionPatch) -> Result<SessionRecord>;

    async fn sessions_for_owner(&self, owner_id: &str) -> Result<Vec<SessionRecord>>;

    async fn insert_analysis(&self, record: AnalysisRecord) -> Result<()>;

    async fn analysis(&self, session_id: &str) -> Result<Option<AnalysisRecord>>;

    /// Analysis records for one owner in arrival order.
    async fn analyses_for_owner(&self, owner_id: &str) -> Result<Vec<AnalysisRecord>>;
}

/// Arbitrary bytes keyed by owner + session.
#[async_trait::async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, key: &str, bytes: &[u8], content_type: &str) -> Result<()>;

    /// A time-limited URL a browser can play the blob from.
    async fn signed_url(&self, key: &str, ttl: Duration) -> Result<String>;

    async fn exists(&self, key: &str) -> Result<bool>;
}
