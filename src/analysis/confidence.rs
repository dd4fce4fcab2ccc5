//! Confidence scoring module
//!
//! Two complementary views of how far an accumulated profile can be trusted:
//!
//! 1. **Signal confidence** ([`estimate_confidence`]): four independently
//!    scored signals over the weighted history, each in `[0, 100]`
//!    - Quantity: `min(100, count · 10)`
//!    - Time spread: `min(100, stdev(days_ago) · 2)`, 50 when undefined
//!    - Stability consistency: `max(0, 100 − stdev(stability_score))`
//!    - Weight spread: 100 while the weights' coefficient of variation sits
//!      in `[0.3, 0.7]`, linearly penalized outside
//!
//!    combined as `0.3·quantity + 0.25·time + 0.25·stability + 0.2·weights`.
//!
//! 2. **Measurement confidence** ([`measurement_confidence`]): a coarse level
//!    from the number of recordings alone.
//!
//! # Example
//!
//! ```
//! use vocal_profile::analysis::confidence::estimate_confidence;
//!
//! let days = [0.0; 10];
//! let scores = [12.0; 10];
//! let weights = [0.1; 10];
//! let confidence = estimate_confidence(&days, &scores, &weights);
//!
//! assert_eq!(confidence.time_spread, 50.0);
//! assert_eq!(confidence.stability_consistency, 100.0);
//! assert!(confidence.overall >= 0.0 && confidence.overall <= 100.0);
//! ```

use crate::features::statistics::{mean, sample_std_dev};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Score used for a signal that cannot be measured yet
const NEUTRAL_SCORE: f64 = 50.0;

const QUANTITY_WEIGHT: f64 = 0.3;
const TIME_SPREAD_WEIGHT: f64 = 0.25;
const STABILITY_CONSISTENCY_WEIGHT: f64 = 0.25;
const WEIGHT_SPREAD_WEIGHT: f64 = 0.2;

/// Band of weight coefficients of variation scored as ideal
const WEIGHT_CV_BAND: (f64, f64) = (0.3, 0.7);

/// Per-signal and overall confidence, all in `[0, 100]`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ConfidenceBreakdown {
    /// Score from the number of records
    pub quantity: f64,
    /// Score from how spread out the recordings are in time
    pub time_spread: f64,
    /// Score from how consistent the stability scores are
    pub stability_consistency: f64,
    /// Score from how differentiated the weights are
    pub weight_spread: f64,
    /// Weighted combination, clamped to `[0, 100]`
    pub overall: f64,
}

/// Combine the four confidence signals
///
/// # Arguments
///
/// * `days_ago` - Age of each record in whole days
/// * `stability_scores` - Stability score of each record
/// * `weights` - Aggregation weight of each record
///
/// All three slices describe the same records. Empty input scores 0.
pub fn estimate_confidence(
    days_ago: &[f64],
    stability_scores: &[f64],
    weights: &[f64],
) -> ConfidenceBreakdown {
    let count = days_ago.len();
    if count == 0 {
        return ConfidenceBreakdown::default();
    }

    let quantity = (count as f64 * 10.0).min(100.0);

    let time_spread = if count > 1 && days_ago.iter().any(|&d| d != days_ago[0]) {
        (sample_std_dev(days_ago) * 2.0).min(100.0)
    } else {
        NEUTRAL_SCORE
    };

    let stability_consistency = if stability_scores.len() > 1 {
        (100.0 - sample_std_dev(stability_scores)).clamp(0.0, 100.0)
    } else {
        NEUTRAL_SCORE
    };

    let weight_spread = if weights.len() > 1 {
        weight_spread_score(weights)
    } else {
        NEUTRAL_SCORE
    };

    let overall = (QUANTITY_WEIGHT * quantity
        + TIME_SPREAD_WEIGHT * time_spread
        + STABILITY_CONSISTENCY_WEIGHT * stability_consistency
        + WEIGHT_SPREAD_WEIGHT * weight_spread)
        .clamp(0.0, 100.0);

    log::debug!(
        "Confidence: quantity={:.1}, time={:.1}, stability={:.1}, weights={:.1} -> {:.1}",
        quantity,
        time_spread,
        stability_consistency,
        weight_spread,
        overall
    );

    ConfidenceBreakdown {
        quantity,
        time_spread,
        stability_consistency,
        weight_spread,
        overall,
    }
}

/// Score the coefficient of variation of the weights
fn weight_spread_score(weights: &[f64]) -> f64 {
    let weight_mean = mean(weights);
    let cv = if weight_mean > 0.0 {
        sample_std_dev(weights) / weight_mean
    } else {
        0.0
    };

    let (low, high) = WEIGHT_CV_BAND;
    let score = if cv < low {
        100.0 - (low - cv) * 200.0
    } else if cv > high {
        100.0 - (cv - high) * 100.0
    } else {
        100.0
    };
    score.clamp(0.0, 100.0)
}

/// Coarse confidence level from the number of recordings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    /// No recordings
    None,
    /// 1-2 recordings
    Low,
    /// 3-4 recordings
    Medium,
    /// 5-9 recordings
    High,
    /// 10 or more recordings
    VeryHigh,
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConfidenceLevel::None => "none",
            ConfidenceLevel::Low => "low",
            ConfidenceLevel::Medium => "medium",
            ConfidenceLevel::High => "high",
            ConfidenceLevel::VeryHigh => "very high",
        })
    }
}

/// Count-based confidence with advice for the singer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementConfidence {
    /// Coarse level
    pub level: ConfidenceLevel,
    /// Confidence in percent
    pub percentage: f64,
    /// Number of recordings considered
    pub total_measurements: usize,
    /// What the singer should do next
    pub recommendation: String,
}

/// Map a recording count to a [`MeasurementConfidence`]
///
/// | count | level     | percentage               |
/// |-------|-----------|--------------------------|
/// | 0     | none      | 0                        |
/// | 1-2   | low       | `min(30, n·15)`          |
/// | 3-4   | medium    | `30 + (n−2)·20`          |
/// | 5-9   | high      | `70 + (n−4)·5`           |
/// | ≥ 10  | very high | `min(95, 85 + (n−9)·2)`  |
pub fn measurement_confidence(count: usize) -> MeasurementConfidence {
    let n = count as f64;
    let (level, percentage, recommendation) = match count {
        0 => (
            ConfidenceLevel::None,
            0.0,
            "Sing a song to start measuring your range.".to_string(),
        ),
        1..=2 => (
            ConfidenceLevel::Low,
            (n * 15.0).min(30.0),
            format!(
                "Record {} more time(s) for a more reliable profile.",
                3 - count
            ),
        ),
        3..=4 => (
            ConfidenceLevel::Medium,
            30.0 + (n - 2.0) * 20.0,
            "Good start. A few more recordings will sharpen the profile.".to_string(),
        ),
        5..=9 => (
            ConfidenceLevel::High,
            70.0 + (n - 4.0) * 5.0,
            "Your range profile has stabilized.".to_string(),
        ),
        _ => (
            ConfidenceLevel::VeryHigh,
            (85.0 + (n - 9.0) * 2.0).min(95.0),
            "Your range profile is highly reliable.".to_string(),
        ),
    };

    MeasurementConfidence {
        level,
        percentage,
        total_measurements: count,
        recommendation,
    }
}
