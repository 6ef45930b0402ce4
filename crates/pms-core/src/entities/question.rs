use std::collections::BTreeSet;

use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// A question submitted by a student to a panel.
///
/// `similar_to` is directed as stored; `None` means the record never carried
/// the field, which clustering treats the same as an empty set.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Question {
    pub id: String,
    pub author_id: String,
    pub panel_id: String,
    pub text: String,
    #[serde(default)]
    pub liked_by: BTreeSet<String>,
    #[serde(default)]
    pub disliked_by: BTreeSet<String>,
    #[serde(default)]
    pub flagged_by: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similar_to: Option<BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_score: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_score: Option<Decimal>,
}

impl Question {
    /// Build a question with no interactions yet.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] if any identifier is empty.
    pub fn new(
        id: impl Into<String>,
        author_id: impl Into<String>,
        panel_id: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<Self, CoreError> {
        let question = Self {
            id: id.into(),
            author_id: author_id.into(),
            panel_id: panel_id.into(),
            text: text.into(),
            liked_by: BTreeSet::new(),
            disliked_by: BTreeSet::new(),
            flagged_by: BTreeSet::new(),
            similar_to: None,
            vote_score: None,
            final_score: None,
        };
        question.validate()?;
        Ok(question)
    }

    /// Check the identifiers every stage relies on.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] naming the first empty field.
    pub fn validate(&self) -> Result<(), CoreError> {
        for (field, value) in [
            ("id", &self.id),
            ("author_id", &self.author_id),
            ("panel_id", &self.panel_id),
        ] {
            if value.trim().is_empty() {
                return Err(CoreError::Validation(format!(
                    "question field '{field}' must not be empty"
                )));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn likes(&self) -> i64 {
        i64::try_from(self.liked_by.len()).unwrap_or(i64::MAX)
    }

    #[must_use]
    pub fn dislikes(&self) -> i64 {
        i64::try_from(self.disliked_by.len()).unwrap_or(i64::MAX)
    }

    #[must_use]
    pub fn net_likes(&self) -> i64 {
        self.likes() - self.dislikes()
    }

    /// Any flag disqualifies a question from representing its cluster.
    #[must_use]
    pub fn is_flagged(&self) -> bool {
        !self.flagged_by.is_empty()
    }

    /// Outgoing similarity links; empty when the field is missing.
    pub fn similar_ids(&self) -> impl Iterator<Item = &str> {
        self.similar_to.iter().flatten().map(String::as_str)
    }

    #[must_use]
    pub fn with_likes<I, S>(mut self, students: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.liked_by.extend(students.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_dislikes<I, S>(mut self, students: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.disliked_by.extend(students.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_flags<I, S>(mut self, students: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.flagged_by.extend(students.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_similar<I, S>(mut self, questions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.similar_to
            .get_or_insert_with(BTreeSet::new)
            .extend(questions.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub const fn with_vote_score(mut self, score: i64) -> Self {
        self.vote_score = Some(score);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question() -> Question {
        Question::new("q-1", "u-1", "p-1", "What is ownership?").unwrap()
    }

    #[test]
    fn new_rejects_empty_author() {
        let err = Question::new("q-1", " ", "p-1", "text").unwrap_err();
        assert!(err.to_string().contains("author_id"));
    }

    #[test]
    fn net_likes_subtracts_dislikes() {
        let q = question()
            .with_likes(["u-2", "u-3", "u-4"])
            .with_dislikes(["u-5"]);
        assert_eq!(q.likes(), 3);
        assert_eq!(q.dislikes(), 1);
        assert_eq!(q.net_likes(), 2);
    }

    #[test]
    fn missing_similar_to_yields_no_edges() {
        let q = question();
        assert!(q.similar_to.is_none());
        assert_eq!(q.similar_ids().count(), 0);
    }

    #[test]
    fn missing_similar_to_survives_roundtrip() {
        let json = r#"{"id":"q-1","author_id":"u-1","panel_id":"p-1","text":"t"}"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert!(q.similar_to.is_none());
        assert!(!q.is_flagged());
        let back = serde_json::to_string(&q).unwrap();
        assert!(!back.contains("similar_to"));
    }
}
