//! Bulk panel import document.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Metric, Panel, Question, Student};
use crate::errors::CoreError;

/// Everything upstream submission flows produce for one panel.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PanelSnapshot {
    pub panel: Panel,
    #[serde(default)]
    pub students: Vec<Student>,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub metrics: Vec<Metric>,
}

impl PanelSnapshot {
    /// Check that every record belongs to the snapshot's panel.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] for the first record that is invalid
    /// or scoped to another panel.
    pub fn validate(&self) -> Result<(), CoreError> {
        let panel_id = self.panel.id.as_str();
        let foreign = |kind: &str, id: &str, other: &str| {
            CoreError::Validation(format!(
                "{kind} {id} belongs to panel {other}, expected {panel_id}"
            ))
        };

        for student in &self.students {
            if student.panel_id != panel_id {
                return Err(foreign("student", &student.id, &student.panel_id));
            }
        }
        for question in &self.questions {
            question.validate()?;
            if question.panel_id != panel_id {
                return Err(foreign("question", &question.id, &question.panel_id));
            }
        }
        for metric in &self.metrics {
            if metric.panel_id != panel_id {
                return Err(foreign("metric", &metric.student_id, &metric.panel_id));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_question_from_other_panel() {
        let snapshot = PanelSnapshot {
            panel: Panel {
                id: "p-1".into(),
                questions_required: 2,
            },
            students: vec![],
            questions: vec![Question::new("q-1", "u-1", "p-2", "t").unwrap()],
            metrics: vec![],
        };
        let err = snapshot.validate().unwrap_err();
        assert!(err.to_string().contains("q-1"));
    }
}
