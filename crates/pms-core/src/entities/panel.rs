use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One grading cycle. `questions_required` is how many questions each
/// student must submit, which also bounds their tagging quota.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Panel {
    pub id: String,
    pub questions_required: u32,
}
