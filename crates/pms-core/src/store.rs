//! Contracts for the persistence collaborators the engine reads and writes.
//!
//! Stages receive an implementation explicitly; nothing in the engine looks a
//! store up from process state. `pms-db` implements these over libSQL and
//! `pms-engine` ships an in-memory fake for tests.

use std::future::Future;

use crate::entities::{Metric, Panel, Question};
use crate::errors::StoreError;

pub trait QuestionStore: Send + Sync {
    fn list_questions_by_panel(
        &self,
        panel_id: &str,
    ) -> impl Future<Output = Result<Vec<Question>, StoreError>> + Send;

    fn get_question(
        &self,
        question_id: &str,
    ) -> impl Future<Output = Result<Option<Question>, StoreError>> + Send;

    fn upsert_question(
        &self,
        question: &Question,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Questions in `panel_id` authored by `student_id`.
    fn list_my_questions(
        &self,
        panel_id: &str,
        student_id: &str,
    ) -> impl Future<Output = Result<Vec<Question>, StoreError>> + Send;
}

pub trait StudentStore: Send + Sync {
    /// Unique roster ids for the panel. Ordering carries no meaning.
    fn list_student_ids(
        &self,
        panel_id: &str,
    ) -> impl Future<Output = Result<Vec<String>, StoreError>> + Send;
}

pub trait PanelStore: Send + Sync {
    fn get_panel(
        &self,
        panel_id: &str,
    ) -> impl Future<Output = Result<Option<Panel>, StoreError>> + Send;

    /// How many questions each student must submit for the panel.
    fn get_required_question_count(
        &self,
        panel_id: &str,
    ) -> impl Future<Output = Result<Option<u32>, StoreError>> + Send;
}

pub trait MetricStore: Send + Sync {
    fn list_metrics_by_panel(
        &self,
        panel_id: &str,
    ) -> impl Future<Output = Result<Vec<Metric>, StoreError>> + Send;

    fn get_metric(
        &self,
        student_id: &str,
        panel_id: &str,
    ) -> impl Future<Output = Result<Option<Metric>, StoreError>> + Send;

    fn upsert_metric(&self, metric: &Metric)
    -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Every store the engine needs, behind one bound.
pub trait PanelRepository: QuestionStore + StudentStore + PanelStore + MetricStore {}

impl<T> PanelRepository for T where T: QuestionStore + StudentStore + PanelStore + MetricStore {}
