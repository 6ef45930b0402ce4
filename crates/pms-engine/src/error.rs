//! Engine error types.

use std::fmt;

use pms_artifacts::ArtifactError;
use pms_core::errors::StoreError;
use serde::{Deserialize, Serialize};

/// Errors surfaced by a stage run.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A panel or a prerequisite artifact is missing.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Nothing can be distributed for tagging.
    #[error(
        "panel {panel_id} has {questions} question(s) with {required} required per student; \
         no questions left to distribute"
    )]
    InsufficientQuestions {
        panel_id: String,
        questions: usize,
        required: u32,
    },

    /// Some students cannot be given a full tagging bucket.
    #[error("tag distribution unsatisfiable: {0}")]
    Unsatisfiable(DeficiencyReport),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),
}

/// Which students a distribution run could not fill, and by how much.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeficiencyReport {
    pub panel_id: String,
    pub quota: usize,
    pub deficient: Vec<StudentDeficiency>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentDeficiency {
    pub student_id: String,
    /// Size of the best bucket reached before giving up.
    pub assigned: usize,
    /// Distinct questions in the panel the student did not author.
    pub eligible: usize,
}

impl fmt::Display for DeficiencyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "panel {} quota {}: {} student(s) short",
            self.panel_id,
            self.quota,
            self.deficient.len()
        )?;
        for d in &self.deficient {
            write!(
                f,
                "; {} got {} of {} ({} eligible)",
                d.student_id, d.assigned, self.quota, d.eligible
            )?;
        }
        Ok(())
    }
}
