//! Student roster repository.

use pms_core::entities::Student;

use crate::PmsDb;
use crate::error::DatabaseError;

impl PmsDb {
    pub async fn upsert_student(&self, student: &Student) -> Result<(), DatabaseError> {
        self.conn()
            .execute(
                "INSERT OR IGNORE INTO students (id, panel_id) VALUES (?1, ?2)",
                libsql::params![student.id.as_str(), student.panel_id.as_str()],
            )
            .await?;
        Ok(())
    }

    pub async fn student_ids(&self, panel_id: &str) -> Result<Vec<String>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT id FROM students WHERE panel_id = ?1 ORDER BY rowid",
                [panel_id],
            )
            .await?;
        let mut ids = Vec::new();
        while let Some(row) = rows.next().await? {
            ids.push(row.get::<String>(0)?);
        }
        Ok(ids)
    }
}
