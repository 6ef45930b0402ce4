//! Point values and curve parameters for the grading stage.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

fn default_total_score() -> Decimal {
    Decimal::ONE_HUNDRED
}

fn default_performance_score() -> Decimal {
    Decimal::from(5)
}

fn default_std_question_score() -> Decimal {
    Decimal::from(5)
}

fn default_above_std_score() -> Decimal {
    Decimal::from(2)
}

fn default_penalty_rate() -> Decimal {
    Decimal::from(2)
}

fn default_engagement_points() -> Decimal {
    Decimal::TEN
}

fn default_tagging_points() -> Decimal {
    Decimal::TEN
}

fn default_stage_bonus() -> Decimal {
    Decimal::from(5)
}

fn default_question_stage_denominator() -> Decimal {
    Decimal::from(20)
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ScoringConfig {
    /// Ceiling every stage score and the final score are clamped to.
    #[serde(default = "default_total_score")]
    pub total_score: Decimal,

    /// Quality points a cluster keeps when it is not penalised.
    #[serde(default = "default_performance_score")]
    pub performance_score: Decimal,

    /// Bonus for a cluster at or above one deviation below the mean.
    #[serde(default = "default_std_question_score")]
    pub std_question_score: Decimal,

    /// Extra bonus for a cluster more than one deviation above the mean.
    #[serde(default = "default_above_std_score")]
    pub above_std_score: Decimal,

    /// Points lost per deviation unit beyond the tolerated band.
    #[serde(default = "default_penalty_rate")]
    pub penalty_rate: Decimal,

    /// Full credit for time spent in the tag stage.
    #[serde(default = "default_engagement_points")]
    pub engagement_tag_points: Decimal,

    /// Full credit for time spent in the vote stage.
    #[serde(default = "default_engagement_points")]
    pub engagement_vote_points: Decimal,

    /// Full credit for the number of tag-stage interactions.
    #[serde(default = "default_tagging_points")]
    pub tagging_points: Decimal,

    /// Bonus for authoring a question that reached the tagging pool.
    #[serde(default = "default_stage_bonus")]
    pub tag_stage_bonus: Decimal,

    /// Bonus for authoring a question that reached the shortlist.
    #[serde(default = "default_stage_bonus")]
    pub vote_stage_bonus: Decimal,

    /// Raw question-stage points that map to `total_score`.
    #[serde(default = "default_question_stage_denominator")]
    pub question_stage_denominator: Decimal,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            total_score: default_total_score(),
            performance_score: default_performance_score(),
            std_question_score: default_std_question_score(),
            above_std_score: default_above_std_score(),
            penalty_rate: default_penalty_rate(),
            engagement_tag_points: default_engagement_points(),
            engagement_vote_points: default_engagement_points(),
            tagging_points: default_tagging_points(),
            tag_stage_bonus: default_stage_bonus(),
            vote_stage_bonus: default_stage_bonus(),
            question_stage_denominator: default_question_stage_denominator(),
        }
    }
}

impl ScoringConfig {
    /// Raw tag-stage points that map to `total_score`.
    #[must_use]
    pub fn tag_stage_denominator(&self) -> Decimal {
        self.tagging_points + self.engagement_tag_points
    }

    /// Raw vote-stage points that map to `total_score`.
    #[must_use]
    pub const fn vote_stage_denominator(&self) -> Decimal {
        self.engagement_vote_points
    }

    /// Reject values that would make a rescale divide by zero or invert a curve.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("scoring.total_score", self.total_score),
            (
                "scoring.question_stage_denominator",
                self.question_stage_denominator,
            ),
            ("scoring.tagging_points + engagement_tag_points", self.tag_stage_denominator()),
            ("scoring.engagement_vote_points", self.vote_stage_denominator()),
        ];
        for (field, value) in positive {
            if value <= Decimal::ZERO {
                return Err(ConfigError::InvalidValue {
                    field: field.into(),
                    reason: format!("must be positive, got {value}"),
                });
            }
        }

        let non_negative = [
            ("scoring.performance_score", self.performance_score),
            ("scoring.std_question_score", self.std_question_score),
            ("scoring.above_std_score", self.above_std_score),
            ("scoring.penalty_rate", self.penalty_rate),
            ("scoring.tag_stage_bonus", self.tag_stage_bonus),
            ("scoring.vote_stage_bonus", self.vote_stage_bonus),
        ];
        for (field, value) in non_negative {
            if value < Decimal::ZERO {
                return Err(ConfigError::InvalidValue {
                    field: field.into(),
                    reason: format!("must not be negative, got {value}"),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = ScoringConfig::default();
        assert_eq!(config.total_score, dec!(100));
        assert_eq!(config.tag_stage_denominator(), dec!(20));
        assert_eq!(config.vote_stage_denominator(), dec!(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_denominator_is_rejected() {
        let config = ScoringConfig {
            question_stage_denominator: Decimal::ZERO,
            ..ScoringConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("question_stage_denominator"));
    }

    #[test]
    fn negative_penalty_rate_is_rejected() {
        let config = ScoringConfig {
            penalty_rate: dec!(-1),
            ..ScoringConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
