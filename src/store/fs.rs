use anyhow::{Context, Result};
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use super::BlobStore;

/// Filesystem blob store. Blobs land under the configured recordings root at
/// their deterministic key, with the content type in a sidecar file so
/// playback and the classifier agree on what was actually stored (the
/// captured encoding is not always WAV).
pub struct FsBlobStore {
    root: PathBuf,
    public_base: String,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>, public_base: impl Into<String>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root).context("Failed to create recordings directory")?;

        Ok(Self {
            root,
            public_base: public_base.into(),
        })
    }

    fn blob_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    fn meta_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.type"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait::async_trait]
impl BlobStore for FsBlobStore {
    async fn put(&self, key: &str, bytes: &[u8], content_type: &str) -> Result<()> {
        let path = self.blob_path(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .context("Failed to create blob directory")?;
        }

        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("Failed to write blob {key}"))?;
        tokio::fs::write(self.meta_path(key), content_type)
            .await
            .with_context(|| format!("Failed to write content type for {key}"))?;

        info!(key = %key, bytes = bytes.len(), content_type = %content_type, "Blob stored");
        Ok(())
    }

    async fn signed_url(&self, key: &str, ttl: Duration) -> Result<String> {
        let expires = Utc::now().timestamp() + ttl.as_secs() as i64;
        Ok(format!(
            "{}/recordings/{key}?expires={expires}",
            self.public_base.trim_end_matches('/')
        ))
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(tokio::fs::try_exists(self.blob_path(key)).await?)
    }
}
