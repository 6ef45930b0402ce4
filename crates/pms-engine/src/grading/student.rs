//! Per-student stage scores.

use pms_config::ScoringConfig;
use pms_core::entities::Metric;
use rust_decimal::Decimal;

use super::GradeError;
use super::cohort::{EngagementCohort, elapsed_seconds};
use super::curves::{one_sided, rescale, two_sided};
use super::stats::Spread;
use super::StageBonuses;

/// Shared inputs for grading every student of one panel.
#[derive(Debug, Clone, Copy)]
pub struct GradingContext<'a> {
    pub scoring: &'a ScoringConfig,
    pub cohort: &'a EngagementCohort,
    pub bonuses: &'a StageBonuses,
    pub required_questions: u32,
}

/// The four bounded scores written onto a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StudentScores {
    pub question_stage: Decimal,
    pub tag_stage: Decimal,
    pub vote_stage: Decimal,
    pub final_total: Decimal,
}

impl StudentScores {
    pub const ZERO: Self = Self {
        question_stage: Decimal::ZERO,
        tag_stage: Decimal::ZERO,
        vote_stage: Decimal::ZERO,
        final_total: Decimal::ZERO,
    };

    pub fn apply_to(&self, metric: &mut Metric) {
        metric.question_stage_score = Some(self.question_stage);
        metric.tag_stage_score = Some(self.tag_stage);
        metric.vote_stage_score = Some(self.vote_stage);
        metric.final_total_score = Some(self.final_total);
    }
}

fn deviation(spread: Option<Spread>, value: f64) -> Decimal {
    spread.map_or(Decimal::ZERO, |s| s.deviation(value))
}

fn stage_seconds(
    window: Option<(chrono::DateTime<chrono::Utc>, chrono::DateTime<chrono::Utc>)>,
    stage: &'static str,
) -> Result<Option<f64>, GradeError> {
    match window.map(elapsed_seconds) {
        Some(seconds) if seconds < 0.0 => Err(GradeError::ReversedWindow { stage }),
        other => Ok(other),
    }
}

/// Grade one student from their metric and the final scores of the
/// questions they authored.
///
/// A stage without both timestamps scores zero, bonus included.
///
/// # Errors
///
/// Returns [`GradeError::ReversedWindow`] if a stage exit precedes its entry.
pub fn grade_student(
    metric: &Metric,
    authored_scores: &[Decimal],
    ctx: &GradingContext<'_>,
) -> Result<StudentScores, GradeError> {
    let scoring = ctx.scoring;
    let total = scoring.total_score;

    let question_stage = match metric.entered_score() {
        None => Decimal::ZERO,
        Some(entered) => {
            let average = if ctx.required_questions == 0 {
                Decimal::ZERO
            } else {
                (authored_scores.iter().sum::<Decimal>() / Decimal::from(ctx.required_questions))
                    .round_dp(2)
            };
            rescale(average + entered, scoring.question_stage_denominator, total)
        }
    };

    let tag_stage = match stage_seconds(metric.tag_window(), "tag")? {
        None => Decimal::ZERO,
        Some(seconds) => {
            let engagement = two_sided(
                scoring.engagement_tag_points,
                deviation(ctx.cohort.tag_time, seconds),
                scoring.penalty_rate,
            );
            let interactions = one_sided(
                scoring.tagging_points,
                deviation(
                    ctx.cohort.tag_interactions,
                    f64::from(metric.tag_stage_interactions),
                ),
                scoring.penalty_rate,
            );
            let bonus = if ctx.bonuses.earns_tag_bonus(&metric.student_id) {
                scoring.tag_stage_bonus
            } else {
                Decimal::ZERO
            };
            rescale(
                engagement + interactions + bonus,
                scoring.tag_stage_denominator(),
                total,
            )
        }
    };

    let vote_stage = match stage_seconds(metric.vote_window(), "vote")? {
        None => Decimal::ZERO,
        Some(seconds) => {
            let engagement = two_sided(
                scoring.engagement_vote_points,
                deviation(ctx.cohort.vote_time, seconds),
                scoring.penalty_rate,
            );
            let bonus = if ctx.bonuses.earns_vote_bonus(&metric.student_id) {
                scoring.vote_stage_bonus
            } else {
                Decimal::ZERO
            };
            rescale(engagement + bonus, scoring.vote_stage_denominator(), total)
        }
    };

    let final_total = rescale(
        question_stage + tag_stage + vote_stage,
        total * Decimal::from(3),
        total,
    );

    Ok(StudentScores {
        question_stage,
        tag_stage,
        vote_stage,
        final_total,
    })
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn timed(student: &str, tag_minutes: Option<i64>, vote_minutes: Option<i64>) -> Metric {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let mut metric = Metric::new(student, "p-1");
        metric.entered_questions_score = dec!(4);
        metric.tag_stage_interactions = 10;
        if let Some(m) = tag_minutes {
            metric.tag_stage_in = Some(start);
            metric.tag_stage_out = Some(start + Duration::minutes(m));
        }
        if let Some(m) = vote_minutes {
            metric.vote_stage_in = Some(start);
            metric.vote_stage_out = Some(start + Duration::minutes(m));
        }
        metric
    }

    fn grade(
        metric: &Metric,
        cohort_of: &[Metric],
        authored: &[Decimal],
        bonuses: &StageBonuses,
    ) -> Result<StudentScores, GradeError> {
        let scoring = ScoringConfig::default();
        let cohort = EngagementCohort::from_metrics(cohort_of);
        let ctx = GradingContext {
            scoring: &scoring,
            cohort: &cohort,
            bonuses,
            required_questions: 2,
        };
        grade_student(metric, authored, &ctx)
    }

    #[test]
    fn identical_cohort_gets_full_engagement_credit() {
        let metrics = vec![
            timed("u-1", Some(20), Some(15)),
            timed("u-2", Some(20), Some(15)),
        ];
        let scores = grade(&metrics[0], &metrics, &[dec!(10), dec!(10)], &StageBonuses::default()).unwrap();
        // (10 + 4) / 20 * 100
        assert_eq!(scores.question_stage, dec!(70));
        // (10 + 10) / 20 * 100
        assert_eq!(scores.tag_stage, dec!(100));
        assert_eq!(scores.vote_stage, dec!(100));
        assert_eq!(scores.final_total, dec!(90));
    }

    #[test]
    fn bonuses_are_capped_by_total_score() {
        let metrics = vec![timed("u-1", Some(20), Some(15))];
        let bonuses = StageBonuses::from_sets(["u-1"], ["u-1"]);
        let scores = grade(&metrics[0], &metrics, &[], &bonuses).unwrap();
        assert_eq!(scores.tag_stage, dec!(100));
        assert_eq!(scores.vote_stage, dec!(100));
    }

    #[test]
    fn missing_stage_scores_zero_and_loses_bonus() {
        let metrics = vec![timed("u-1", None, Some(15))];
        let bonuses = StageBonuses::from_sets(["u-1"], Vec::<&str>::new());
        let scores = grade(&metrics[0], &metrics, &[], &bonuses).unwrap();
        assert_eq!(scores.tag_stage, Decimal::ZERO);
        assert_eq!(scores.vote_stage, dec!(100));
    }

    #[test]
    fn sentinel_zeroes_question_stage() {
        let mut metric = timed("u-1", None, None);
        metric.entered_questions_score = pms_core::entities::ENTERED_SCORE_SENTINEL;
        let scores = grade(&metric, &[], &[dec!(12), dec!(12)], &StageBonuses::default()).unwrap();
        assert_eq!(scores, StudentScores::ZERO);
    }

    #[test]
    fn slow_outlier_is_penalised() {
        let mut metrics: Vec<Metric> = (0..4).map(|i| timed(&format!("u-{i}"), Some(10), None)).collect();
        metrics.push(timed("u-slow", Some(60), None));
        // Times 600,600,600,600,3600: mean 1200, std 1200, slow deviation 2.
        let scores = grade(&metrics[4], &metrics, &[], &StageBonuses::default()).unwrap();
        // engagement 10 - 2 = 8, interactions 10: 18 / 20 * 100
        assert_eq!(scores.tag_stage, dec!(90));
    }

    #[test]
    fn reversed_window_is_an_error() {
        let metric = timed("u-1", Some(-3), None);
        let err = grade(&metric, &[metric.clone()], &[], &StageBonuses::default()).unwrap_err();
        assert!(matches!(err, GradeError::ReversedWindow { stage: "tag" }));
    }

    #[test]
    fn zero_required_questions_averages_to_zero() {
        let scoring = ScoringConfig::default();
        let cohort = EngagementCohort::default();
        let bonuses = StageBonuses::default();
        let ctx = GradingContext {
            scoring: &scoring,
            cohort: &cohort,
            bonuses: &bonuses,
            required_questions: 0,
        };
        let scores = grade_student(&timed("u-1", None, None), &[dec!(12)], &ctx).unwrap();
        // only the entered score: 4 / 20 * 100
        assert_eq!(scores.question_stage, dec!(20));
    }
}
