//! # pms-artifacts
//!
//! Stage artifacts (tag distribution, cluster ranking, shortlist) stored as
//! pretty-printed JSON documents under `{panel_id}/{file name}` in an
//! `object_store` backend: in-memory, a local directory, or an S3 bucket.
//!
//! Each write replaces the previous document for that panel and name.

pub mod error;
pub mod name;
pub mod store;

pub use error::ArtifactError;
pub use name::ArtifactName;
pub use store::ArtifactStore;
