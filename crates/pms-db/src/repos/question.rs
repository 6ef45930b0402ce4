//! Question repository.
//!
//! Rows keep their insertion order (`ORDER BY rowid`); clustering ties and
//! the `front` extra-slot policy both depend on it, so updates go through
//! `ON CONFLICT DO UPDATE` rather than a delete-and-insert replace.

use pms_core::entities::Question;

use crate::PmsDb;
use crate::error::DatabaseError;
use crate::helpers::{encode_id_set, get_opt_string, parse_id_set, parse_optional_decimal, text_or_null};

const QUESTION_COLUMNS: &str = "id, panel_id, author_id, text, liked_by, disliked_by, flagged_by, \
                                similar_to, vote_score, final_score";

fn row_to_question(row: &libsql::Row) -> Result<Question, DatabaseError> {
    let similar_to = get_opt_string(row, 7)?
        .map(|raw| parse_id_set(&raw))
        .transpose()?;
    Ok(Question {
        id: row.get::<String>(0)?,
        panel_id: row.get::<String>(1)?,
        author_id: row.get::<String>(2)?,
        text: row.get::<String>(3)?,
        liked_by: parse_id_set(&row.get::<String>(4)?)?,
        disliked_by: parse_id_set(&row.get::<String>(5)?)?,
        flagged_by: parse_id_set(&row.get::<String>(6)?)?,
        similar_to,
        vote_score: row.get::<Option<i64>>(8)?,
        final_score: parse_optional_decimal(get_opt_string(row, 9)?.as_deref())?,
    })
}

async fn collect(mut rows: libsql::Rows) -> Result<Vec<Question>, DatabaseError> {
    let mut questions = Vec::new();
    while let Some(row) = rows.next().await? {
        questions.push(row_to_question(&row)?);
    }
    Ok(questions)
}

impl PmsDb {
    /// Insert a question or overwrite every mutable column of an existing one.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if encoding or the write fails, including a
    /// foreign-key failure when the panel does not exist.
    pub async fn save_question(&self, question: &Question) -> Result<(), DatabaseError> {
        let similar_to = question
            .similar_to
            .as_ref()
            .map(encode_id_set)
            .transpose()?;
        let params = vec![
            libsql::Value::Text(question.id.clone()),
            libsql::Value::Text(question.panel_id.clone()),
            libsql::Value::Text(question.author_id.clone()),
            libsql::Value::Text(question.text.clone()),
            libsql::Value::Text(encode_id_set(&question.liked_by)?),
            libsql::Value::Text(encode_id_set(&question.disliked_by)?),
            libsql::Value::Text(encode_id_set(&question.flagged_by)?),
            text_or_null(similar_to),
            question
                .vote_score
                .map_or(libsql::Value::Null, libsql::Value::Integer),
            text_or_null(question.final_score),
        ];
        self.conn()
            .execute(
                "INSERT INTO questions (id, panel_id, author_id, text, liked_by, disliked_by,
                                        flagged_by, similar_to, vote_score, final_score)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                 ON CONFLICT(id) DO UPDATE SET
                    panel_id = excluded.panel_id,
                    author_id = excluded.author_id,
                    text = excluded.text,
                    liked_by = excluded.liked_by,
                    disliked_by = excluded.disliked_by,
                    flagged_by = excluded.flagged_by,
                    similar_to = excluded.similar_to,
                    vote_score = excluded.vote_score,
                    final_score = excluded.final_score",
                libsql::params_from_iter(params),
            )
            .await?;
        Ok(())
    }

    pub async fn find_question(&self, question_id: &str) -> Result<Option<Question>, DatabaseError> {
        let sql = format!("SELECT {QUESTION_COLUMNS} FROM questions WHERE id = ?1");
        let mut rows = self.conn().query(&sql, [question_id]).await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_question(&row)?)),
            None => Ok(None),
        }
    }

    /// All questions of a panel in submission order.
    pub async fn questions_for_panel(&self, panel_id: &str) -> Result<Vec<Question>, DatabaseError> {
        let sql = format!("SELECT {QUESTION_COLUMNS} FROM questions WHERE panel_id = ?1 ORDER BY rowid");
        collect(self.conn().query(&sql, [panel_id]).await?).await
    }

    pub async fn questions_by_author(
        &self,
        panel_id: &str,
        author_id: &str,
    ) -> Result<Vec<Question>, DatabaseError> {
        let sql = format!(
            "SELECT {QUESTION_COLUMNS} FROM questions
             WHERE panel_id = ?1 AND author_id = ?2 ORDER BY rowid"
        );
        collect(
            self.conn()
                .query(&sql, libsql::params![panel_id, author_id])
                .await?,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use pms_core::entities::Panel;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    async fn db_with_panel() -> PmsDb {
        let db = PmsDb::open_local(":memory:").await.unwrap();
        db.upsert_panel(&Panel {
            id: "p-1".into(),
            questions_required: 2,
        })
        .await
        .unwrap();
        db
    }

    #[tokio::test]
    async fn question_roundtrips_every_field() {
        let db = db_with_panel().await;
        let mut question = Question::new("q-1", "u-1", "p-1", "Why borrow?")
            .unwrap()
            .with_likes(["u-2", "u-3"])
            .with_dislikes(["u-4"])
            .with_flags(["u-5"])
            .with_similar(["q-2"])
            .with_vote_score(7);
        question.final_score = Some(dec!(12.50));
        db.save_question(&question).await.unwrap();

        let found = db.find_question("q-1").await.unwrap().unwrap();
        assert_eq!(found, question);
    }

    #[tokio::test]
    async fn missing_similar_to_stays_missing() {
        let db = db_with_panel().await;
        let question = Question::new("q-1", "u-1", "p-1", "t").unwrap();
        db.save_question(&question).await.unwrap();

        let found = db.find_question("q-1").await.unwrap().unwrap();
        assert!(found.similar_to.is_none());
        assert!(found.final_score.is_none());
    }

    #[tokio::test]
    async fn update_keeps_submission_order() {
        let db = db_with_panel().await;
        for id in ["q-1", "q-2", "q-3"] {
            db.save_question(&Question::new(id, "u-1", "p-1", id).unwrap())
                .await
                .unwrap();
        }
        let mut first = db.find_question("q-1").await.unwrap().unwrap();
        first.final_score = Some(dec!(3));
        db.save_question(&first).await.unwrap();

        let ids: Vec<String> = db
            .questions_for_panel("p-1")
            .await
            .unwrap()
            .into_iter()
            .map(|q| q.id)
            .collect();
        assert_eq!(ids, vec!["q-1", "q-2", "q-3"]);
    }

    #[tokio::test]
    async fn author_filter_only_returns_own_questions() {
        let db = db_with_panel().await;
        db.save_question(&Question::new("q-1", "u-1", "p-1", "a").unwrap())
            .await
            .unwrap();
        db.save_question(&Question::new("q-2", "u-2", "p-1", "b").unwrap())
            .await
            .unwrap();

        let mine = db.questions_by_author("p-1", "u-2").await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, "q-2");
    }
}
