//! In-memory implementation of every store contract.
//!
//! Keeps insertion order the way the libSQL store does, so a panel seeded
//! here clusters and distributes the same way it would from a database.

use std::collections::HashSet;

use pms_core::entities::{Metric, Panel, Question};
use pms_core::errors::StoreError;
use pms_core::snapshot::PanelSnapshot;
use pms_core::store::{MetricStore, PanelStore, QuestionStore, StudentStore};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Tables {
    panels: Vec<Panel>,
    students: Vec<(String, String)>,
    questions: Vec<Question>,
    metrics: Vec<Metric>,
}

/// Test double for the panel stores.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    failing_authors: RwLock<HashSet<String>>,
}

#[derive(Debug, thiserror::Error)]
#[error("injected failure for {0}")]
struct InjectedFailure(String);

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with one panel snapshot.
    pub async fn from_snapshot(snapshot: &PanelSnapshot) -> Self {
        let store = Self::new();
        store.load(snapshot).await;
        store
    }

    /// Merge a snapshot, replacing records with the same keys.
    pub async fn load(&self, snapshot: &PanelSnapshot) {
        let mut tables = self.tables.write().await;
        upsert_by(&mut tables.panels, snapshot.panel.clone(), |p| p.id.clone());
        for student in &snapshot.students {
            let key = (student.id.clone(), student.panel_id.clone());
            if !tables.students.contains(&key) {
                tables.students.push(key);
            }
        }
        for question in &snapshot.questions {
            upsert_by(&mut tables.questions, question.clone(), |q| q.id.clone());
        }
        for metric in &snapshot.metrics {
            upsert_by(&mut tables.metrics, metric.clone(), |m| {
                (m.student_id.clone(), m.panel_id.clone())
            });
        }
    }

    /// Make `list_my_questions` fail for one student.
    pub async fn fail_author_lookup(&self, student_id: impl Into<String>) {
        self.failing_authors.write().await.insert(student_id.into());
    }
}

fn upsert_by<T, K: PartialEq>(rows: &mut Vec<T>, row: T, key: impl Fn(&T) -> K) {
    let wanted = key(&row);
    match rows.iter_mut().find(|r| key(r) == wanted) {
        Some(existing) => *existing = row,
        None => rows.push(row),
    }
}

impl QuestionStore for MemoryStore {
    async fn list_questions_by_panel(&self, panel_id: &str) -> Result<Vec<Question>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .questions
            .iter()
            .filter(|q| q.panel_id == panel_id)
            .cloned()
            .collect())
    }

    async fn get_question(&self, question_id: &str) -> Result<Option<Question>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.questions.iter().find(|q| q.id == question_id).cloned())
    }

    async fn upsert_question(&self, question: &Question) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        upsert_by(&mut tables.questions, question.clone(), |q| q.id.clone());
        Ok(())
    }

    async fn list_my_questions(
        &self,
        panel_id: &str,
        student_id: &str,
    ) -> Result<Vec<Question>, StoreError> {
        if self.failing_authors.read().await.contains(student_id) {
            return Err(StoreError::unavailable(
                "list_my_questions",
                InjectedFailure(student_id.to_string()),
            ));
        }
        let tables = self.tables.read().await;
        Ok(tables
            .questions
            .iter()
            .filter(|q| q.panel_id == panel_id && q.author_id == student_id)
            .cloned()
            .collect())
    }
}

impl StudentStore for MemoryStore {
    async fn list_student_ids(&self, panel_id: &str) -> Result<Vec<String>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .students
            .iter()
            .filter(|(_, p)| p == panel_id)
            .map(|(id, _)| id.clone())
            .collect())
    }
}

impl PanelStore for MemoryStore {
    async fn get_panel(&self, panel_id: &str) -> Result<Option<Panel>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.panels.iter().find(|p| p.id == panel_id).cloned())
    }

    async fn get_required_question_count(&self, panel_id: &str) -> Result<Option<u32>, StoreError> {
        Ok(self.get_panel(panel_id).await?.map(|p| p.questions_required))
    }
}

impl MetricStore for MemoryStore {
    async fn list_metrics_by_panel(&self, panel_id: &str) -> Result<Vec<Metric>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .metrics
            .iter()
            .filter(|m| m.panel_id == panel_id)
            .cloned()
            .collect())
    }

    async fn get_metric(&self, student_id: &str, panel_id: &str) -> Result<Option<Metric>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .metrics
            .iter()
            .find(|m| m.student_id == student_id && m.panel_id == panel_id)
            .cloned())
    }

    async fn upsert_metric(&self, metric: &Metric) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        upsert_by(&mut tables.metrics, metric.clone(), |m| {
            (m.student_id.clone(), m.panel_id.clone())
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pms_core::entities::Student;

    use super::*;

    fn snapshot() -> PanelSnapshot {
        PanelSnapshot {
            panel: Panel {
                id: "p-1".into(),
                questions_required: 1,
            },
            students: vec![
                Student {
                    id: "u-1".into(),
                    panel_id: "p-1".into(),
                },
                Student {
                    id: "u-1".into(),
                    panel_id: "p-1".into(),
                },
            ],
            questions: vec![
                Question::new("q-1", "u-1", "p-1", "a").unwrap(),
                Question::new("q-2", "u-2", "p-1", "b").unwrap(),
            ],
            metrics: vec![Metric::new("u-1", "p-1")],
        }
    }

    #[tokio::test]
    async fn roster_is_unique() {
        let store = MemoryStore::from_snapshot(&snapshot()).await;
        assert_eq!(store.list_student_ids("p-1").await.unwrap(), vec!["u-1"]);
    }

    #[tokio::test]
    async fn upsert_keeps_position() {
        let store = MemoryStore::from_snapshot(&snapshot()).await;
        let mut first = store.get_question("q-1").await.unwrap().unwrap();
        first.text = "edited".into();
        store.upsert_question(&first).await.unwrap();
        let ids: Vec<String> = store
            .list_questions_by_panel("p-1")
            .await
            .unwrap()
            .into_iter()
            .map(|q| q.id)
            .collect();
        assert_eq!(ids, vec!["q-1", "q-2"]);
    }

    #[tokio::test]
    async fn injected_lookup_failure_is_unavailable() {
        let store = MemoryStore::from_snapshot(&snapshot()).await;
        store.fail_author_lookup("u-1").await;
        let err = store.list_my_questions("p-1", "u-1").await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable { operation: "list_my_questions", .. }));
        assert_eq!(store.list_my_questions("p-1", "u-2").await.unwrap().len(), 1);
    }
}
