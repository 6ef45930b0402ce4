//! `pms_core::store` contracts over [`PmsDb`].

use pms_core::entities::{Metric, Panel, Question};
use pms_core::errors::StoreError;
use pms_core::store::{MetricStore, PanelStore, QuestionStore, StudentStore};

use crate::PmsDb;

impl QuestionStore for PmsDb {
    async fn list_questions_by_panel(&self, panel_id: &str) -> Result<Vec<Question>, StoreError> {
        self.questions_for_panel(panel_id)
            .await
            .map_err(|e| StoreError::unavailable("list_questions_by_panel", e))
    }

    async fn get_question(&self, question_id: &str) -> Result<Option<Question>, StoreError> {
        self.find_question(question_id)
            .await
            .map_err(|e| StoreError::unavailable("get_question", e))
    }

    async fn upsert_question(&self, question: &Question) -> Result<(), StoreError> {
        self.save_question(question)
            .await
            .map_err(|e| StoreError::unavailable("upsert_question", e))
    }

    async fn list_my_questions(
        &self,
        panel_id: &str,
        student_id: &str,
    ) -> Result<Vec<Question>, StoreError> {
        self.questions_by_author(panel_id, student_id)
            .await
            .map_err(|e| StoreError::unavailable("list_my_questions", e))
    }
}

impl StudentStore for PmsDb {
    async fn list_student_ids(&self, panel_id: &str) -> Result<Vec<String>, StoreError> {
        self.student_ids(panel_id)
            .await
            .map_err(|e| StoreError::unavailable("list_student_ids", e))
    }
}

impl PanelStore for PmsDb {
    async fn get_panel(&self, panel_id: &str) -> Result<Option<Panel>, StoreError> {
        self.find_panel(panel_id)
            .await
            .map_err(|e| StoreError::unavailable("get_panel", e))
    }

    async fn get_required_question_count(&self, panel_id: &str) -> Result<Option<u32>, StoreError> {
        Ok(self.get_panel(panel_id).await?.map(|p| p.questions_required))
    }
}

impl MetricStore for PmsDb {
    async fn list_metrics_by_panel(&self, panel_id: &str) -> Result<Vec<Metric>, StoreError> {
        self.metrics_for_panel(panel_id)
            .await
            .map_err(|e| StoreError::unavailable("list_metrics_by_panel", e))
    }

    async fn get_metric(&self, student_id: &str, panel_id: &str) -> Result<Option<Metric>, StoreError> {
        self.find_metric(student_id, panel_id)
            .await
            .map_err(|e| StoreError::unavailable("get_metric", e))
    }

    async fn upsert_metric(&self, metric: &Metric) -> Result<(), StoreError> {
        self.save_metric(metric)
            .await
            .map_err(|e| StoreError::unavailable("upsert_metric", e))
    }
}
