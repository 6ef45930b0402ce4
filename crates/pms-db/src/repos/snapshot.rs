//! Bulk import of a panel snapshot.

use pms_core::snapshot::PanelSnapshot;

use crate::PmsDb;
use crate::error::DatabaseError;

/// Row counts written by [`PmsDb::import_snapshot`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct ImportSummary {
    pub students: usize,
    pub questions: usize,
    pub metrics: usize,
}

impl PmsDb {
    /// Write a whole panel snapshot in one transaction.
    ///
    /// Existing rows with the same keys are overwritten; rows the snapshot
    /// does not mention are left alone. Nothing is written if any record
    /// fails validation or any insert fails.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Invalid` for a malformed snapshot, or the
    /// first write error after rolling back.
    #[tracing::instrument(skip(self, snapshot), fields(panel_id = %snapshot.panel.id))]
    pub async fn import_snapshot(
        &self,
        snapshot: &PanelSnapshot,
    ) -> Result<ImportSummary, DatabaseError> {
        snapshot.validate()?;

        self.conn().execute("BEGIN", ()).await?;
        match self.write_snapshot(snapshot).await {
            Ok(summary) => {
                self.conn().execute("COMMIT", ()).await?;
                tracing::info!(
                    students = summary.students,
                    questions = summary.questions,
                    metrics = summary.metrics,
                    "imported panel snapshot"
                );
                Ok(summary)
            }
            Err(e) => {
                if let Err(rollback) = self.conn().execute("ROLLBACK", ()).await {
                    tracing::warn!(error = %rollback, "rollback after failed import also failed");
                }
                Err(e)
            }
        }
    }

    async fn write_snapshot(&self, snapshot: &PanelSnapshot) -> Result<ImportSummary, DatabaseError> {
        self.upsert_panel(&snapshot.panel).await?;
        for student in &snapshot.students {
            self.upsert_student(student).await?;
        }
        for question in &snapshot.questions {
            self.save_question(question).await?;
        }
        for metric in &snapshot.metrics {
            self.save_metric(metric).await?;
        }
        Ok(ImportSummary {
            students: snapshot.students.len(),
            questions: snapshot.questions.len(),
            metrics: snapshot.metrics.len(),
        })
    }
}
