//! Shapes of the JSON documents handed from one stage to the next.
//!
//! Field names are part of the stored document format and must not change:
//! a document written by one stage is read verbatim by the next.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One ranked similarity cluster (`sortedCluster.json` entries).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ClusterDescriptor {
    #[serde(rename = "rep_id")]
    pub representative_id: String,
    #[serde(rename = "rep_question")]
    pub representative_text: String,
    /// Unflagged members, in traversal order.
    #[serde(rename = "cluster")]
    pub member_ids: Vec<String>,
    pub cluster_likes: i64,
    pub cluster_dislikes: i64,
    #[serde(rename = "cluster_net_likes")]
    pub net_likes: i64,
}

/// A finalist cluster (`finalQuestions.json` entries).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ShortlistEntry {
    #[serde(flatten)]
    pub cluster: ClusterDescriptor,
    pub vote_score: i64,
}

/// Tagging assignments (`questions.json`): student id → question id → text.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(transparent)]
pub struct TagDistribution(pub BTreeMap<String, BTreeMap<String, String>>);

impl TagDistribution {
    /// Questions assigned to `student_id`, if the student is in the distribution.
    #[must_use]
    pub fn assignments_for(&self, student_id: &str) -> Option<&BTreeMap<String, String>> {
        self.0.get(student_id)
    }

    /// Record one student's full bucket, replacing any earlier one.
    pub fn assign(&mut self, student_id: impl Into<String>, bucket: BTreeMap<String, String>) {
        self.0.insert(student_id.into(), bucket);
    }

    pub fn students(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
