//! Artifact object store configuration.

use serde::{Deserialize, Serialize};

fn default_local_root() -> String {
    String::from(".pms/artifacts")
}

fn default_bucket_name() -> String {
    String::from("pms-panels")
}

fn default_region() -> String {
    String::from("us-east-1")
}

/// Where stage artifacts are kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactBackend {
    /// Process-local; artifacts vanish on exit.
    Memory,
    /// A directory on the local filesystem.
    #[default]
    Local,
    /// An S3-compatible bucket.
    S3,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArtifactConfig {
    #[serde(default)]
    pub backend: ArtifactBackend,

    /// Root directory for the `local` backend.
    #[serde(default = "default_local_root")]
    pub local_root: String,

    /// Bucket name for the `s3` backend.
    #[serde(default = "default_bucket_name")]
    pub bucket_name: String,

    #[serde(default = "default_region")]
    pub region: String,

    /// Custom endpoint URL (MinIO, R2, ...). Empty means AWS.
    #[serde(default)]
    pub endpoint: String,

    #[serde(default)]
    pub access_key_id: String,

    #[serde(default)]
    pub secret_access_key: String,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            backend: ArtifactBackend::default(),
            local_root: default_local_root(),
            bucket_name: default_bucket_name(),
            region: default_region(),
            endpoint: String::new(),
            access_key_id: String::new(),
            secret_access_key: String::new(),
        }
    }
}

impl ArtifactConfig {
    /// Check if the S3 settings have the minimum required fields.
    pub fn is_configured(&self) -> bool {
        !self.access_key_id.is_empty()
            && !self.secret_access_key.is_empty()
            && !self.bucket_name.is_empty()
    }

    /// The custom endpoint, if one is set.
    pub fn endpoint_url(&self) -> Option<&str> {
        (!self.endpoint.is_empty()).then_some(self.endpoint.as_str())
    }
}
