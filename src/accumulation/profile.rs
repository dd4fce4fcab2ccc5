//! Accumulated profile types
//!
//! Every profile is a pure function of a record history, a strategy and an
//! explicit "now". None of them carries identity or state of its own, so an
//! empty history maps to an explicit empty profile rather than an error.

use super::weighting::WeightingStrategy;
use crate::analysis::confidence::{
    measurement_confidence, ConfidenceBreakdown, MeasurementConfidence,
};
use crate::analysis::result::{FrequencyRange, StabilityRating};
use crate::analysis::trend::StabilityTrend;
use crate::features::statistics::{mean, median, min_max, sample_std_dev};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Weighted voice quality averages with confidence
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StabilityProfile {
    /// Weighted mean stability score (lower = steadier)
    pub avg_stability: f64,
    /// Weighted mean jitter (%)
    pub avg_jitter: f64,
    /// Weighted mean shimmer (%)
    pub avg_shimmer: f64,
    /// Overall confidence, 0-100
    pub confidence: f64,
    /// Per-signal confidence scores
    pub confidence_breakdown: ConfidenceBreakdown,
}

/// Spread of the weights used for an aggregation
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WeightDistribution {
    /// Mean weight
    pub mean: f64,
    /// Median weight
    pub median: f64,
    /// Sample standard deviation (0 for a single weight)
    pub std: f64,
    /// Smallest weight
    pub min: f64,
    /// Largest weight
    pub max: f64,
}

impl WeightDistribution {
    /// Summarize a set of weights (all zeros for an empty set)
    pub fn from_weights(weights: &[f64]) -> Self {
        if weights.is_empty() {
            return Self::default();
        }
        let (min, max) = min_max(weights);
        Self {
            mean: mean(weights),
            median: median(weights),
            std: sample_std_dev(weights),
            min,
            max,
        }
    }
}

/// What an accumulated profile was computed from
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// Records aggregated
    pub count: usize,
    /// Newest record timestamp
    pub most_recent: Option<DateTime<Utc>>,
    /// Oldest record timestamp
    pub oldest: Option<DateTime<Utc>>,
    /// Mean un-normalized weight
    pub avg_weight: f64,
    /// Spread of the un-normalized weights
    pub weight_distribution: WeightDistribution,
}

/// Weighted-average synthesis of a singer's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccumulatedProfile {
    /// Weighted mean of the per-record comfortable ranges
    pub comfortable_range: FrequencyRange,
    /// Weighted mean of the per-record core ranges
    pub core_range: FrequencyRange,
    /// Weighted voice quality and confidence
    pub stability_profile: StabilityProfile,
    /// Record count, time span and weights
    pub analysis_summary: AnalysisSummary,
    /// Direction of the stability score over the last records
    pub stability_trend: StabilityTrend,
}

impl AccumulatedProfile {
    /// Profile of an empty history
    pub fn empty() -> Self {
        Self {
            comfortable_range: FrequencyRange::unknown(),
            core_range: FrequencyRange::unknown(),
            stability_profile: StabilityProfile::default(),
            analysis_summary: AnalysisSummary::default(),
            stability_trend: StabilityTrend::InsufficientData,
        }
    }

    /// True if no record contributed
    pub fn is_empty(&self) -> bool {
        self.analysis_summary.count == 0
    }
}

/// Strategy-weighted percentile profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedProfile {
    /// Strategy that produced the weights
    pub strategy: WeightingStrategy,
    /// Weighted P10 of the minima to weighted P90 of the maxima
    pub total_range: FrequencyRange,
    /// Weighted P20 of the comfortable minima to P80 of the maxima
    pub comfortable_range: FrequencyRange,
    /// Weighted P25 of the core minima to P75 of the maxima
    pub core_range: FrequencyRange,
    /// Weighted mean stability score
    pub avg_stability: f64,
    /// Rating of the averaged stability score (`None` without records)
    pub stability_rating: Option<StabilityRating>,
    /// Normalized weights, oldest record first
    pub weights: Vec<f64>,
    /// Signal confidence over the strategy weights
    pub confidence: ConfidenceBreakdown,
    /// Count-based confidence
    pub measurement: MeasurementConfidence,
    /// Direction of the stability score over the last records
    pub stability_trend: StabilityTrend,
    /// Records aggregated
    pub count: usize,
    /// Oldest record timestamp
    pub first_analysis: Option<DateTime<Utc>>,
    /// Newest record timestamp
    pub last_analysis: Option<DateTime<Utc>>,
}

impl WeightedProfile {
    /// Profile of an empty history
    pub fn empty(strategy: WeightingStrategy) -> Self {
        Self {
            strategy,
            total_range: FrequencyRange::unknown(),
            comfortable_range: FrequencyRange::unknown(),
            core_range: FrequencyRange::unknown(),
            avg_stability: 0.0,
            stability_rating: None,
            weights: Vec::new(),
            confidence: ConfidenceBreakdown::default(),
            measurement: measurement_confidence(0),
            stability_trend: StabilityTrend::InsufficientData,
            count: 0,
            first_analysis: None,
            last_analysis: None,
        }
    }
}

/// Outlier-trimmed all-time profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobustProfile {
    /// Span of the trimmed pooled total-range bounds
    pub total_range: FrequencyRange,
    /// Span of the trimmed pooled comfortable-range bounds
    pub comfortable_range: FrequencyRange,
    /// Span of the trimmed pooled core-range bounds
    pub core_range: FrequencyRange,
    /// Span of the trimmed known stability comfortable bounds
    pub stability_comfortable_range: FrequencyRange,
    /// Span of the trimmed known stability core bounds
    pub stability_core_range: FrequencyRange,
    /// Mean of the trimmed stability scores
    pub avg_stability: f64,
    /// Direction of the stability score over the last records
    pub stability_trend: StabilityTrend,
    /// Rating of the averaged stability score (`None` without records)
    pub stability_rating: Option<StabilityRating>,
    /// Count-based confidence
    pub measurement: MeasurementConfidence,
    /// Records aggregated
    pub count: usize,
    /// Oldest record timestamp
    pub first_analysis: Option<DateTime<Utc>>,
    /// Newest record timestamp
    pub last_analysis: Option<DateTime<Utc>>,
}

impl RobustProfile {
    /// Profile of an empty history
    pub fn empty() -> Self {
        Self {
            total_range: FrequencyRange::unknown(),
            comfortable_range: FrequencyRange::unknown(),
            core_range: FrequencyRange::unknown(),
            stability_comfortable_range: FrequencyRange::unknown(),
            stability_core_range: FrequencyRange::unknown(),
            avg_stability: 0.0,
            stability_trend: StabilityTrend::InsufficientData,
            stability_rating: None,
            measurement: measurement_confidence(0),
            count: 0,
            first_analysis: None,
            last_analysis: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::confidence::ConfidenceLevel;

    #[test]
    fn test_weight_distribution() {
        let dist = WeightDistribution::from_weights(&[0.2, 0.4, 0.9]);
        assert!((dist.mean - 0.5).abs() < 1e-12);
        assert_eq!(dist.median, 0.4);
        assert_eq!(dist.min, 0.2);
        assert_eq!(dist.max, 0.9);
        assert!(dist.std > 0.0);

        let single = WeightDistribution::from_weights(&[0.7]);
        assert_eq!(single.std, 0.0);
        assert_eq!(single.median, 0.7);

        assert_eq!(WeightDistribution::from_weights(&[]), WeightDistribution::default());
    }

    #[test]
    fn test_empty_profiles() {
        let profile = AccumulatedProfile::empty();
        assert!(profile.is_empty());
        assert_eq!(profile.comfortable_range.min_note, "N/A");
        assert_eq!(profile.stability_trend, StabilityTrend::InsufficientData);
        assert_eq!(profile.stability_profile.confidence, 0.0);

        let weighted = WeightedProfile::empty(WeightingStrategy::Time);
        assert_eq!(weighted.measurement.level, ConfidenceLevel::None);
        assert!(weighted.stability_rating.is_none());

        let robust = RobustProfile::empty();
        assert!(!robust.stability_core_range.is_known());
        assert_eq!(robust.count, 0);
    }
}
