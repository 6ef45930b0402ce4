//! Deviation-to-points curves.

use pms_config::ScoringConfig;
use rust_decimal::Decimal;

/// `points` minus a penalty of `|1 - |deviation|| * rate`, floored at zero.
fn penalised(points: Decimal, deviation: Decimal, rate: Decimal) -> Decimal {
    let overshoot = (Decimal::ONE - deviation.abs()).abs();
    let penalty = points.min(overshoot * rate).round_dp(2);
    (points - penalty).round_dp(2).max(Decimal::ZERO)
}

/// Full credit inside the ±1 band, penalised outside it on either side.
#[must_use]
pub fn two_sided(points: Decimal, deviation: Decimal, rate: Decimal) -> Decimal {
    if (-Decimal::ONE..=Decimal::ONE).contains(&deviation) {
        points
    } else {
        penalised(points, deviation, rate)
    }
}

/// Full credit from -1 upward; only a shortfall is penalised.
#[must_use]
pub fn one_sided(points: Decimal, deviation: Decimal, rate: Decimal) -> Decimal {
    if deviation >= -Decimal::ONE {
        points
    } else {
        penalised(points, deviation, rate)
    }
}

/// Content score of one cluster, clamped to `total_score`.
///
/// At or above -1: baseline performance plus the standard bonus, plus the
/// above-threshold bonus past +1. Below -1: penalised performance only.
#[must_use]
pub fn cluster_quality(deviation: Decimal, scoring: &ScoringConfig) -> Decimal {
    let score = if deviation >= -Decimal::ONE {
        let mut bonus = scoring.std_question_score;
        if deviation > Decimal::ONE {
            bonus += scoring.above_std_score;
        }
        scoring.performance_score + bonus
    } else {
        penalised(scoring.performance_score, deviation, scoring.penalty_rate)
    };
    clamp(score.round_dp(2), scoring.total_score)
}

/// `value / denominator * total_score`, rounded and clamped.
#[must_use]
pub fn rescale(value: Decimal, denominator: Decimal, total_score: Decimal) -> Decimal {
    if denominator.is_zero() {
        return Decimal::ZERO;
    }
    clamp((value / denominator * total_score).round_dp(2), total_score)
}

#[must_use]
pub fn clamp(value: Decimal, total_score: Decimal) -> Decimal {
    value.max(Decimal::ZERO).min(total_score)
}
