//! Metric repository.

use pms_core::entities::{CohortStats, Metric};

use crate::PmsDb;
use crate::error::DatabaseError;
use crate::helpers::{
    get_opt_string, parse_decimal, parse_optional_datetime, parse_optional_decimal, text_or_null,
};

const METRIC_COLUMNS: &str = "student_id, panel_id, tag_stage_in, tag_stage_out, vote_stage_in, \
                              vote_stage_out, tag_stage_interactions, entered_questions_score, \
                              question_stage_score, tag_stage_score, vote_stage_score, \
                              final_total_score, cohort, grading_error";

fn row_to_metric(row: &libsql::Row) -> Result<Metric, DatabaseError> {
    let interactions = row.get::<i64>(6)?;
    let cohort = get_opt_string(row, 12)?
        .map(|raw| serde_json::from_str::<CohortStats>(&raw))
        .transpose()?;
    Ok(Metric {
        student_id: row.get::<String>(0)?,
        panel_id: row.get::<String>(1)?,
        tag_stage_in: parse_optional_datetime(get_opt_string(row, 2)?.as_deref())?,
        tag_stage_out: parse_optional_datetime(get_opt_string(row, 3)?.as_deref())?,
        vote_stage_in: parse_optional_datetime(get_opt_string(row, 4)?.as_deref())?,
        vote_stage_out: parse_optional_datetime(get_opt_string(row, 5)?.as_deref())?,
        tag_stage_interactions: u32::try_from(interactions).map_err(|_| {
            DatabaseError::Query(format!("tag_stage_interactions out of range: {interactions}"))
        })?,
        entered_questions_score: parse_decimal(&row.get::<String>(7)?)?,
        question_stage_score: parse_optional_decimal(get_opt_string(row, 8)?.as_deref())?,
        tag_stage_score: parse_optional_decimal(get_opt_string(row, 9)?.as_deref())?,
        vote_stage_score: parse_optional_decimal(get_opt_string(row, 10)?.as_deref())?,
        final_total_score: parse_optional_decimal(get_opt_string(row, 11)?.as_deref())?,
        cohort,
        grading_error: get_opt_string(row, 13)?,
    })
}

impl PmsDb {
    /// Insert or fully overwrite the metric for `(student_id, panel_id)`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the cohort cannot be encoded or the write fails.
    pub async fn save_metric(&self, metric: &Metric) -> Result<(), DatabaseError> {
        let cohort = metric.cohort.as_ref().map(serde_json::to_string).transpose()?;
        let params = vec![
            libsql::Value::Text(metric.student_id.clone()),
            libsql::Value::Text(metric.panel_id.clone()),
            text_or_null(metric.tag_stage_in.map(|t| t.to_rfc3339())),
            text_or_null(metric.tag_stage_out.map(|t| t.to_rfc3339())),
            text_or_null(metric.vote_stage_in.map(|t| t.to_rfc3339())),
            text_or_null(metric.vote_stage_out.map(|t| t.to_rfc3339())),
            libsql::Value::Integer(i64::from(metric.tag_stage_interactions)),
            libsql::Value::Text(metric.entered_questions_score.to_string()),
            text_or_null(metric.question_stage_score),
            text_or_null(metric.tag_stage_score),
            text_or_null(metric.vote_stage_score),
            text_or_null(metric.final_total_score),
            text_or_null(cohort),
            text_or_null(metric.grading_error.as_deref()),
        ];
        self.conn()
            .execute(
                "INSERT INTO metrics (student_id, panel_id, tag_stage_in, tag_stage_out,
                                      vote_stage_in, vote_stage_out, tag_stage_interactions,
                                      entered_questions_score, question_stage_score,
                                      tag_stage_score, vote_stage_score, final_total_score,
                                      cohort, grading_error)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
                 ON CONFLICT(student_id, panel_id) DO UPDATE SET
                    tag_stage_in = excluded.tag_stage_in,
                    tag_stage_out = excluded.tag_stage_out,
                    vote_stage_in = excluded.vote_stage_in,
                    vote_stage_out = excluded.vote_stage_out,
                    tag_stage_interactions = excluded.tag_stage_interactions,
                    entered_questions_score = excluded.entered_questions_score,
                    question_stage_score = excluded.question_stage_score,
                    tag_stage_score = excluded.tag_stage_score,
                    vote_stage_score = excluded.vote_stage_score,
                    final_total_score = excluded.final_total_score,
                    cohort = excluded.cohort,
                    grading_error = excluded.grading_error",
                libsql::params_from_iter(params),
            )
            .await?;
        Ok(())
    }

    pub async fn find_metric(
        &self,
        student_id: &str,
        panel_id: &str,
    ) -> Result<Option<Metric>, DatabaseError> {
        let sql = format!(
            "SELECT {METRIC_COLUMNS} FROM metrics WHERE student_id = ?1 AND panel_id = ?2"
        );
        let mut rows = self
            .conn()
            .query(&sql, libsql::params![student_id, panel_id])
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_metric(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn metrics_for_panel(&self, panel_id: &str) -> Result<Vec<Metric>, DatabaseError> {
        let sql = format!("SELECT {METRIC_COLUMNS} FROM metrics WHERE panel_id = ?1 ORDER BY rowid");
        let mut rows = self.conn().query(&sql, [panel_id]).await?;
        let mut metrics = Vec::new();
        while let Some(row) = rows.next().await? {
            metrics.push(row_to_metric(&row)?);
        }
        Ok(metrics)
    }
}
