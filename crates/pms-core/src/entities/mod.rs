//! Entity records flowing between the grading stages.
//!
//! Question, Student, and Panel records are created upstream and are read-only
//! here, except for `Question::final_score`. Metric records are mutated in place
//! by the grading stage. All records derive `Serialize`, `Deserialize`, and
//! `JsonSchema` for JSON roundtrip and schema validation.

mod metric;
mod panel;
mod question;
mod student;

pub use metric::{CohortStats, Metric, StageSummary, ENTERED_SCORE_SENTINEL};
pub use panel::Panel;
pub use question::Question;
pub use student::Student;
