//! Population statistics and rounding.
//!
//! Means and standard deviations are computed in `f64` and rounded to two
//! decimals as soon as they are known. Deviations built from them are
//! rounded again before they reach a curve.

use pms_core::entities::StageSummary;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

/// Round half away from zero to two decimals.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Two-decimal `Decimal` from a float; non-finite input maps to zero.
#[must_use]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(round2(value))
        .unwrap_or(Decimal::ZERO)
        .round_dp(2)
}

/// Cohort mean and population standard deviation of one signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spread {
    pub mean: f64,
    pub std_dev: f64,
}

impl Spread {
    /// `None` for an empty population.
    #[must_use]
    pub fn of(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Some(Self {
            mean: round2(mean),
            std_dev: round2(variance.sqrt()),
        })
    }

    /// `(value - mean) / std_dev`, or zero when the cohort has no spread.
    #[must_use]
    pub fn deviation(&self, value: f64) -> Decimal {
        if self.std_dev < f64::EPSILON {
            return Decimal::ZERO;
        }
        to_decimal((value - self.mean) / self.std_dev)
    }
}

/// Min, max, and two-decimal mean; all zero for an empty cohort.
#[must_use]
pub fn summarize(scores: &[Decimal]) -> StageSummary {
    let (Some(min), Some(max)) = (scores.iter().min(), scores.iter().max()) else {
        return StageSummary::default();
    };
    let total: Decimal = scores.iter().sum();
    StageSummary {
        min: *min,
        max: *max,
        mean: (total / Decimal::from(scores.len())).round_dp(2),
    }
}
