//! Object storage for uploaded images.

use std::path::PathBuf;

use async_trait::async_trait;
use axum::body::Bytes;

/// Where uploaded files end up. Returns the public URL of the stored object.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(&self, key: &str, content_type: &str, bytes: Bytes) -> anyhow::Result<String>;
}

/// Writes objects below a local directory that the server also serves
/// statically under `public_base`.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
    public_base: String,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>, public_base: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base: public_base.into(),
        }
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put(&self, key: &str, content_type: &str, bytes: Bytes) -> anyhow::Result<String> {
        anyhow::ensure!(
            !key.split('/').any(|part| part.is_empty() || part == ".." || part == "."),
            "invalid object key {key:?}"
        );
        let path = self.root.join(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, &bytes).await?;
        tracing::debug!(key, content_type, size = bytes.len(), "stored object");

        Ok(format!("{}/{key}", self.public_base.trim_end_matches('/')))
    }
}
