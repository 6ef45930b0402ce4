//! Sizes of the tagging pool and the voting shortlist.

use serde::{Deserialize, Serialize};

const fn default_tagging_pool_size() -> usize {
    20
}

const fn default_finalist_count() -> usize {
    10
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ShortlistConfig {
    /// Top-ranked clusters that go on to voting and earn the tag-stage bonus.
    #[serde(default = "default_tagging_pool_size")]
    pub tagging_pool_size: usize,

    /// Clusters kept in `finalQuestions.json`.
    #[serde(default = "default_finalist_count")]
    pub finalist_count: usize,
}

impl Default for ShortlistConfig {
    fn default() -> Self {
        Self {
            tagging_pool_size: default_tagging_pool_size(),
            finalist_count: default_finalist_count(),
        }
    }
}
