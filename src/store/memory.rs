use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{SessionPatch, SessionStore};
use crate::analysis::AnalysisRecord;
use crate::session::SessionRecord;

/// In-process session store: session documents keyed by id, analysis records
/// alongside in arrival order. Backs the service in single-node deployments
/// and the tests everywhere.
#[derive(Clone, Default)]
pub struct MemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionRecord>>>,
    analyses: Arc<RwLock<Vec<AnalysisRecord>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, record: SessionRecord) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&record.id) {
            return Err(anyhow!("session {} already exists", record.id));
        }
        sessions.insert(record.id.clone(), record);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<SessionRecord>> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(id).cloned())
    }

    async fn update(&self, id: &str, patch: SessionPatch) -> Result<SessionRecord> {
        let mut sessions = self.sessions.write().await;
        let record = sessions
            .get_mut(id)
            .ok_or_else(|| anyhow!("session {} not found", id))?;

        if let Some(status) = patch.status {
            record.status = status;
        }
        if let Some(completed_at) = patch.completed_at {
            record.completed_at = Some(completed_at);
        }
        if let Some(blob_key) = patch.blob_key {
            record.blob_key = Some(blob_key);
        }
        if let Some(blob_content_type) = patch.blob_content_type {
            record.blob_content_type = Some(blob_content_type);
        }
        if let Some(duration_secs) = patch.duration_secs {
            record.duration_secs = Some(duration_secs);
        }
        if let Some(waveform) = patch.waveform {
            record.waveform = Some(waveform);
        }

        Ok(record.clone())
    }

    async fn sessions_for_owner(&self, owner_id: &str) -> Result<Vec<SessionRecord>> {
        let sessions = self.sessions.read().await;
        let mut records: Vec<SessionRecord> = sessions
            .values()
            .filter(|r| r.owner_id == owner_id)
            .cloned()
            .collect();
        records.sort_by_key(|r| r.created_at);
        Ok(records)
    }

    async fn insert_analysis(&self, record: AnalysisRecord) -> Result<()> {
        let mut analyses = self.analyses.write().await;
        if analyses.iter().any(|a| a.session_id == record.session_id) {
            return Err(anyhow!(
                "analysis for session {} already exists",
                record.session_id
            ));
        }
        analyses.push(record);
        Ok(())
    }

    async fn analysis(&self, session_id: &str) -> Result<Option<AnalysisRecord>> {
        let analyses = self.analyses.read().await;
        Ok(analyses
            .iter()
            .find(|a| a.session_id == session_id)
            .cloned())
    }

    async fn analyses_for_owner(&self, owner_id: &str) -> Result<Vec<AnalysisRecord>> {
        let sessions = self.sessions.read().await;
        let analyses = self.analyses.read().await;
        Ok(analyses
            .iter()
            .filter(|a| {
                sessions
                    .get(&a.session_id)
                    .is_some_and(|s| s.owner_id == owner_id)
            })
            .cloned()
            .collect())
    }
}
