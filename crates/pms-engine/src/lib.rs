//! # pms-engine
//!
//! Per-panel batch stages for the peer-review workflow.
//!
//! - [`cluster`]: groups questions by their similarity links and ranks the
//!   groups by net likes.
//! - [`distribute`]: hands every student a tagging bucket of questions they
//!   did not write.
//! - [`shortlist`]: picks finalists from the top clusters by vote score.
//! - [`grading`]: scores questions and students and summarizes the cohort.
//!
//! [`PanelEngine`] wires the stages to a [`PanelRepository`](pms_core::store::PanelRepository)
//! and an [`ArtifactStore`](pms_artifacts::ArtifactStore).

pub mod cluster;
pub mod distribute;
mod engine;
pub mod error;
pub mod grading;
pub mod memory;
pub mod shortlist;

pub use engine::{GradingReport, PanelEngine};
pub use error::{DeficiencyReport, EngineError, StudentDeficiency};
pub use memory::MemoryStore;
