//! Stability rating classifier
//!
//! Deterministic lookup-table classifier. Jitter, shimmer and the stability
//! score each map to a 1-5 sub-score, the weighted total picks the label.
//!
//! # Example
//!
//! ```
//! use vocal_profile::analysis::rating::RatingClassifier;
//! use vocal_profile::analysis::result::StabilityRating;
//!
//! let classifier = RatingClassifier::default();
//! assert_eq!(classifier.classify(0.0, 0.0, 0.0), StabilityRating::VeryStable);
//! assert_eq!(classifier.classify(10.0, 25.0, 70.0), StabilityRating::Unstable);
//! ```

use super::result::StabilityRating;
use crate::config::RatingThresholds;

/// Maps (stability score, jitter, shimmer) to a [`StabilityRating`]
#[derive(Debug, Clone, Default)]
pub struct RatingClassifier {
    thresholds: RatingThresholds,
}

impl RatingClassifier {
    /// Classifier with custom tables
    pub fn new(thresholds: RatingThresholds) -> Self {
        Self { thresholds }
    }

    /// Lookup tables in use
    pub fn thresholds(&self) -> &RatingThresholds {
        &self.thresholds
    }

    /// Weighted 1-5 total of the three sub-scores
    pub fn total_score(&self, stability_score: f64, jitter_pct: f64, shimmer_pct: f64) -> f64 {
        let t = &self.thresholds;
        t.jitter_weight * sub_score(jitter_pct, &t.jitter_bounds)
            + t.shimmer_weight * sub_score(shimmer_pct, &t.shimmer_bounds)
            + t.stability_weight * sub_score(stability_score, &t.stability_bounds)
    }

    /// Rate one recording
    pub fn classify(
        &self,
        stability_score: f64,
        jitter_pct: f64,
        shimmer_pct: f64,
    ) -> StabilityRating {
        let total = self.total_score(stability_score, jitter_pct, shimmer_pct);
        let rating = self.label_for(total);
        log::debug!(
            "Rating: stability={:.2}, jitter={:.2}, shimmer={:.2} -> total {:.2} ({})",
            stability_score,
            jitter_pct,
            shimmer_pct,
            total,
            rating
        );
        rating
    }

    /// Rate an averaged stability score alone
    ///
    /// Uses the stability table directly: `< 15` very stable through `≥ 60`
    /// unstable. Used for accumulated profiles, which carry no per-frame data.
    pub fn rate_stability_score(&self, stability_score: f64) -> StabilityRating {
        match sub_score(stability_score, &self.thresholds.stability_bounds) as u8 {
            5 => StabilityRating::VeryStable,
            4 => StabilityRating::Stable,
            3 => StabilityRating::Moderate,
            2 => StabilityRating::SlightlyUnstable,
            _ => StabilityRating::Unstable,
        }
    }

    fn label_for(&self, total: f64) -> StabilityRating {
        let [very_stable, stable, moderate, slightly_unstable] = self.thresholds.label_cutoffs;
        if total >= very_stable {
            StabilityRating::VeryStable
        } else if total >= stable {
            StabilityRating::Stable
        } else if total >= moderate {
            StabilityRating::Moderate
        } else if total >= slightly_unstable {
            StabilityRating::SlightlyUnstable
        } else {
            StabilityRating::Unstable
        }
    }
}

/// 5 below the first bound, 4 below the second, down to 1 at or above the last
fn sub_score(value: f64, bounds: &[f64; 4]) -> f64 {
    bounds
        .iter()
        .position(|&bound| value < bound)
        .map(|i| 5.0 - i as f64)
        .unwrap_or(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sub_scores() {
        let bounds = [1.0, 2.0, 5.0, 8.0];
        assert_eq!(sub_score(0.5, &bounds), 5.0);
        assert_eq!(sub_score(1.0, &bounds), 4.0);
        assert_eq!(sub_score(4.9, &bounds), 3.0);
        assert_eq!(sub_score(7.0, &bounds), 2.0);
        assert_eq!(sub_score(8.0, &bounds), 1.0);
        assert_eq!(sub_score(f64::NAN, &bounds), 1.0);
    }

    #[test]
    fn test_total_score_weights() {
        let classifier = RatingClassifier::default();
        // jitter 4 (1.5), shimmer 3 (7.0), stability 2 (50)
        let total = classifier.total_score(50.0, 1.5, 7.0);
        assert!((total - (0.3 * 4.0 + 0.3 * 3.0 + 0.4 * 2.0)).abs() < 1e-12);
        assert_eq!(classifier.classify(50.0, 1.5, 7.0), StabilityRating::Moderate);
    }

    #[test]
    fn test_label_boundaries() {
        let classifier = RatingClassifier::default();
        assert_eq!(classifier.label_for(4.5), StabilityRating::VeryStable);
        assert_eq!(classifier.label_for(4.49), StabilityRating::Stable);
        assert_eq!(classifier.label_for(2.5), StabilityRating::Moderate);
        assert_eq!(classifier.label_for(1.5), StabilityRating::SlightlyUnstable);
        assert_eq!(classifier.label_for(1.0), StabilityRating::Unstable);
    }

    #[test]
    fn test_rate_stability_score() {
        let classifier = RatingClassifier::default();
        assert_eq!(classifier.rate_stability_score(0.0), StabilityRating::VeryStable);
        assert_eq!(classifier.rate_stability_score(20.0), StabilityRating::Stable);
        assert_eq!(classifier.rate_stability_score(39.9), StabilityRating::Moderate);
        assert_eq!(classifier.rate_stability_score(59.0), StabilityRating::SlightlyUnstable);
        assert_eq!(classifier.rate_stability_score(60.0), StabilityRating::Unstable);
    }

    #[test]
    fn test_custom_tables() {
        let strict = RatingThresholds {
            stability_bounds: [1.0, 2.0, 3.0, 4.0],
            ..RatingThresholds::default()
        };
        let classifier = RatingClassifier::new(strict);
        assert_eq!(classifier.rate_stability_score(10.0), StabilityRating::Unstable);
    }
}
