//! Tagging workload distribution policy.

use serde::{Deserialize, Serialize};

/// Hard ceiling on questions any one student is asked to tag.
const fn default_max_questions_per_student() -> u32 {
    20
}

const fn default_max_student_attempts() -> u32 {
    32
}

/// How the remainder slots (`total_slots % total_questions`) are filled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtraSlotFill {
    /// A random subset of questions gets the extra slot.
    #[default]
    Random,
    /// The first questions in store order get the extra slot.
    Front,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct DistributionConfig {
    #[serde(default = "default_max_questions_per_student")]
    pub max_questions_per_student: u32,

    #[serde(default)]
    pub extra_slot_fill: ExtraSlotFill,

    /// Fresh draws allowed per student before the shortfall is reported.
    #[serde(default = "default_max_student_attempts")]
    pub max_student_attempts: u32,

    /// Fixed shuffle seed; `None` draws from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for DistributionConfig {
    fn default() -> Self {
        Self {
            max_questions_per_student: default_max_questions_per_student(),
            extra_slot_fill: ExtraSlotFill::default(),
            max_student_attempts: default_max_student_attempts(),
            seed: None,
        }
    }
}
