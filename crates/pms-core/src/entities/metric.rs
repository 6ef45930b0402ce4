use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// `entered_questions_score` value meaning the student never completed the
/// question-entry step.
pub const ENTERED_SCORE_SENTINEL: Decimal = Decimal::NEGATIVE_ONE;

/// Per-(student, panel) interaction record.
///
/// Upstream tracking fills the stage timestamps, the interaction count, and
/// the entered score. The grading stage owns every field below
/// `entered_questions_score` and overwrites them on each run.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Metric {
    pub student_id: String,
    pub panel_id: String,
    #[serde(default)]
    pub tag_stage_in: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tag_stage_out: Option<DateTime<Utc>>,
    #[serde(default)]
    pub vote_stage_in: Option<DateTime<Utc>>,
    #[serde(default)]
    pub vote_stage_out: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tag_stage_interactions: u32,
    #[serde(default = "sentinel")]
    pub entered_questions_score: Decimal,

    #[serde(default)]
    pub question_stage_score: Option<Decimal>,
    #[serde(default)]
    pub tag_stage_score: Option<Decimal>,
    #[serde(default)]
    pub vote_stage_score: Option<Decimal>,
    #[serde(default)]
    pub final_total_score: Option<Decimal>,
    #[serde(default)]
    pub cohort: Option<CohortStats>,
    #[serde(default)]
    pub grading_error: Option<String>,
}

const fn sentinel() -> Decimal {
    ENTERED_SCORE_SENTINEL
}

/// Cohort-wide min/max/mean of one stage score.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StageSummary {
    pub min: Decimal,
    pub max: Decimal,
    pub mean: Decimal,
}

/// Shared cohort context stamped onto every graded metric.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CohortStats {
    pub question_stage: StageSummary,
    pub tag_stage: StageSummary,
    pub vote_stage: StageSummary,
}

impl Metric {
    /// A fresh metric with no stage activity recorded.
    #[must_use]
    pub fn new(student_id: impl Into<String>, panel_id: impl Into<String>) -> Self {
        Self {
            student_id: student_id.into(),
            panel_id: panel_id.into(),
            tag_stage_in: None,
            tag_stage_out: None,
            vote_stage_in: None,
            vote_stage_out: None,
            tag_stage_interactions: 0,
            entered_questions_score: ENTERED_SCORE_SENTINEL,
            question_stage_score: None,
            tag_stage_score: None,
            vote_stage_score: None,
            final_total_score: None,
            cohort: None,
            grading_error: None,
        }
    }

    /// The self-entered score, or `None` when the sentinel is set.
    #[must_use]
    pub fn entered_score(&self) -> Option<Decimal> {
        (self.entered_questions_score != ENTERED_SCORE_SENTINEL)
            .then_some(self.entered_questions_score)
    }

    /// Tag-stage window, present only when both timestamps are recorded.
    #[must_use]
    pub fn tag_window(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        self.tag_stage_in.zip(self.tag_stage_out)
    }

    /// Vote-stage window, present only when both timestamps are recorded.
    #[must_use]
    pub fn vote_window(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        self.vote_stage_in.zip(self.vote_stage_out)
    }

    /// Drop every grading-owned field so a rerun starts clean.
    pub fn clear_grades(&mut self) {
        self.question_stage_score = None;
        self.tag_stage_score = None;
        self.vote_stage_score = None;
        self.final_total_score = None;
        self.cohort = None;
        self.grading_error = None;
    }
}
