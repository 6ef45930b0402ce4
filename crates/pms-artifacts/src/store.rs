//! [`ArtifactStore`]: JSON documents over any `object_store` backend.

use std::path::Path as FsPath;
use std::sync::Arc;

use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path;
use object_store::{ObjectStore, PutPayload};
use pms_config::{ArtifactBackend, ArtifactConfig};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{ArtifactError, ArtifactName};

/// Reads and writes per-panel artifacts.
///
/// Cloning is cheap; clones share the same backend.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    inner: Arc<dyn ObjectStore>,
}

impl ArtifactStore {
    /// Wrap an already-built object store.
    #[must_use]
    pub fn new(inner: Arc<dyn ObjectStore>) -> Self {
        Self { inner }
    }

    /// Process-local store, used by tests and `:memory:` runs.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemory::new()))
    }

    /// Store rooted at a local directory, created if missing.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError::Io`] if the directory cannot be created.
    pub fn local(root: impl AsRef<FsPath>) -> Result<Self, ArtifactError> {
        let root = root.as_ref();
        std::fs::create_dir_all(root)?;
        let fs = LocalFileSystem::new_with_prefix(root)?;
        tracing::debug!(root = %root.display(), "opened local artifact store");
        Ok(Self::new(Arc::new(fs)))
    }

    /// Build the backend selected by configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError::NotConfigured`] for an S3 backend without
    /// credentials, or the backend's own construction error.
    pub fn from_config(config: &ArtifactConfig) -> Result<Self, ArtifactError> {
        match config.backend {
            ArtifactBackend::Memory => Ok(Self::in_memory()),
            ArtifactBackend::Local => Self::local(&config.local_root),
            ArtifactBackend::S3 => {
                if !config.is_configured() {
                    return Err(ArtifactError::NotConfigured(
                        "s3 backend needs bucket_name, access_key_id, and secret_access_key"
                            .into(),
                    ));
                }
                let mut builder = AmazonS3Builder::new()
                    .with_bucket_name(&config.bucket_name)
                    .with_region(&config.region)
                    .with_access_key_id(&config.access_key_id)
                    .with_secret_access_key(&config.secret_access_key);
                if let Some(endpoint) = config.endpoint_url() {
                    builder = builder.with_endpoint(endpoint);
                }
                let s3 = builder.build()?;
                tracing::debug!(bucket = %config.bucket_name, "opened s3 artifact store");
                Ok(Self::new(Arc::new(s3)))
            }
        }
    }

    /// Object key for an artifact: `{panel_id}/{file name}`.
    #[must_use]
    pub fn key(panel_id: &str, name: ArtifactName) -> Path {
        Path::from_iter([panel_id, name.file_name()])
    }

    /// Serialize `value` as pretty JSON and replace the stored document.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError`] if encoding or the write fails.
    pub async fn put_json<T: Serialize + Sync>(
        &self,
        panel_id: &str,
        name: ArtifactName,
        value: &T,
    ) -> Result<(), ArtifactError> {
        let body = serde_json::to_vec_pretty(value)?;
        let key = Self::key(panel_id, name);
        let bytes = body.len();
        self.inner.put(&key, PutPayload::from(body)).await?;
        tracing::debug!(%key, bytes, "wrote artifact");
        Ok(())
    }

    /// Raw document bytes, or `None` if the artifact was never written.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError::ObjectStore`] for any failure other than a
    /// missing object.
    pub async fn get_bytes(
        &self,
        panel_id: &str,
        name: ArtifactName,
    ) -> Result<Option<Vec<u8>>, ArtifactError> {
        let key = Self::key(panel_id, name);
        match self.inner.get(&key).await {
            Ok(result) => Ok(Some(result.bytes().await?.to_vec())),
            Err(object_store::Error::NotFound { .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Decode a stored document, or `None` if it was never written.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError`] if the read fails or the document does not
    /// decode as `T`.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        panel_id: &str,
        name: ArtifactName,
    ) -> Result<Option<T>, ArtifactError> {
        match self.get_bytes(panel_id, name).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}
