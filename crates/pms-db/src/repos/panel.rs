//! Panel repository.

use pms_core::entities::Panel;

use crate::PmsDb;
use crate::error::DatabaseError;

fn row_to_panel(row: &libsql::Row) -> Result<Panel, DatabaseError> {
    let required = row.get::<i64>(1)?;
    Ok(Panel {
        id: row.get::<String>(0)?,
        questions_required: u32::try_from(required).map_err(|_| {
            DatabaseError::Query(format!("questions_required out of range: {required}"))
        })?,
    })
}

impl PmsDb {
    pub async fn upsert_panel(&self, panel: &Panel) -> Result<(), DatabaseError> {
        self.conn()
            .execute(
                "INSERT INTO panels (id, questions_required) VALUES (?1, ?2)
                 ON CONFLICT(id) DO UPDATE SET questions_required = excluded.questions_required",
                libsql::params![panel.id.as_str(), i64::from(panel.questions_required)],
            )
            .await?;
        Ok(())
    }

    pub async fn find_panel(&self, panel_id: &str) -> Result<Option<Panel>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT id, questions_required FROM panels WHERE id = ?1",
                [panel_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_panel(&row)?)),
            None => Ok(None),
        }
    }
}
