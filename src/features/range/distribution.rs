//! Central pitch, histogram shape and coarse stability overview

use crate::analysis::result::{
    CentralPitch, DistributionShape, FrequencyDistribution, FrequencyRange, StabilityBin,
    StabilityOverview,
};
use crate::features::histogram::FrequencyHistogram;
use crate::features::notes::{NoteTable, UNKNOWN_NOTE};
use crate::features::statistics::{mean, median, std_dev};

/// Histogram resolution for the distribution summary
const DISTRIBUTION_BINS: usize = 30;

/// Overview bins need strictly more samples than this to be scored
const OVERVIEW_MIN_BIN_SAMPLES: usize = 3;

/// Steady bins for the overview's stable range need strictly more samples than this
const OVERVIEW_STABLE_MIN_SAMPLES: usize = 5;

/// Overview score above which a bin counts as steady
const OVERVIEW_STABLE_SCORE: f64 = 70.0;

/// Overview score below which a bin is reported as unstable
const OVERVIEW_UNSTABLE_SCORE: f64 = 50.0;

/// Mean, median and spread of the voiced frames
pub fn central_pitch(valid: &[f64], notes: &NoteTable) -> CentralPitch {
    let mean_freq = mean(valid);
    CentralPitch {
        mean_freq,
        median_freq: median(valid),
        std_freq: std_dev(valid),
        mean_note: notes.nearest(mean_freq),
    }
}

/// Peak, concentration and skew of the voiced-frame histogram
///
/// Shape is `Normal` when `|mean − median| ≤ 0.1·std` (a constant series
/// is therefore normal), `LowSkewed` when the mean sits above the median and
/// `HighSkewed` otherwise.
pub fn frequency_distribution(valid: &[f64], notes: &NoteTable) -> FrequencyDistribution {
    let histogram = FrequencyHistogram::build(valid, DISTRIBUTION_BINS);
    let Some(peak) = histogram.peak() else {
        return FrequencyDistribution {
            shape: DistributionShape::Empty,
            peak_frequency: 0.0,
            peak_note: UNKNOWN_NOTE.to_string(),
            usage_concentration: 0.0,
        };
    };

    let mean_freq = mean(valid);
    let median_freq = median(valid);
    let shape = if (mean_freq - median_freq).abs() <= std_dev(valid) * 0.1 {
        DistributionShape::Normal
    } else if mean_freq > median_freq {
        DistributionShape::LowSkewed
    } else {
        DistributionShape::HighSkewed
    };

    let peak_frequency = peak.centre();
    FrequencyDistribution {
        shape,
        peak_frequency,
        peak_note: notes.nearest(peak_frequency),
        usage_concentration: peak.values.len() as f64 / valid.len() as f64 * 100.0,
    }
}

/// Coarse per-bin steadiness summary
///
/// Each bin with enough samples gets `100 − min(cv·100, 100)`. This scale is
/// ten times gentler than the stability-range scoring.
pub fn stability_overview(
    valid: &[f64],
    bin_count: usize,
    min_valid_samples: usize,
    notes: &NoteTable,
) -> StabilityOverview {
    if valid.len() < min_valid_samples {
        return StabilityOverview {
            stable_range: FrequencyRange::unknown(),
            unstable_regions: Vec::new(),
            overall_stability: 0.0,
            bins: Vec::new(),
        };
    }

    let total = valid.len() as f64;
    let histogram = FrequencyHistogram::build(valid, bin_count);
    let bins: Vec<StabilityBin> = histogram
        .bins()
        .filter(|bin| bin.values.len() > OVERVIEW_MIN_BIN_SAMPLES)
        .map(|bin| {
            let bin_mean = mean(bin.values);
            let variability = if bin_mean > 0.0 {
                std_dev(bin.values) / bin_mean * 100.0
            } else {
                100.0
            };
            let score = 100.0 - variability.min(100.0);
            let usage_ratio = bin.values.len() as f64 / total * 100.0;
            StabilityBin {
                min_freq: bin.lower,
                max_freq: bin.upper,
                stability_score: score,
                weighted_stability: score * (1.0 + usage_ratio / 100.0),
                sample_count: bin.values.len(),
                usage_ratio,
            }
        })
        .collect();

    let steady: Vec<&StabilityBin> = bins
        .iter()
        .filter(|b| {
            b.stability_score > OVERVIEW_STABLE_SCORE
                && b.sample_count > OVERVIEW_STABLE_MIN_SAMPLES
        })
        .collect();
    let stable_range = if steady.is_empty() {
        FrequencyRange::unknown()
    } else {
        let lo = steady.iter().map(|b| b.min_freq).fold(f64::INFINITY, f64::min);
        let hi = steady.iter().map(|b| b.max_freq).fold(f64::NEG_INFINITY, f64::max);
        FrequencyRange::new(lo, hi, notes)
    };

    let unstable_regions: Vec<StabilityBin> = bins
        .iter()
        .filter(|b| b.stability_score < OVERVIEW_UNSTABLE_SCORE)
        .cloned()
        .collect();

    let overall_stability = if bins.is_empty() {
        0.0
    } else {
        bins.iter().map(|b| b.stability_score).sum::<f64>() / bins.len() as f64
    };

    StabilityOverview {
        stable_range,
        unstable_regions,
        overall_stability,
        bins,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_central_pitch() {
        let notes = NoteTable::standard();
        let pitch = central_pitch(&[200.0, 220.0, 240.0], &notes);
        assert!((pitch.mean_freq - 220.0).abs() < 1e-9);
        assert_eq!(pitch.median_freq, 220.0);
        assert_eq!(pitch.mean_note, "A3");
    }

    #[test]
    fn test_distribution_shapes() {
        let notes = NoteTable::standard();

        let constant = frequency_distribution(&[220.0; 40], &notes);
        assert_eq!(constant.shape, DistributionShape::Normal);
        assert_eq!(constant.usage_concentration, 100.0);
        assert_eq!(constant.peak_note, "A3");

        // Long upper tail pulls the mean above the median
        let mut low_heavy = vec![200.0; 30];
        low_heavy.extend([500.0, 600.0, 700.0]);
        let low = frequency_distribution(&low_heavy, &notes);
        assert_eq!(low.shape, DistributionShape::LowSkewed);

        let mut high_heavy = vec![500.0; 30];
        high_heavy.extend([100.0, 150.0, 200.0]);
        let high = frequency_distribution(&high_heavy, &notes);
        assert_eq!(high.shape, DistributionShape::HighSkewed);
    }

    #[test]
    fn test_empty_distribution() {
        let dist = frequency_distribution(&[], &NoteTable::standard());
        assert_eq!(dist.shape, DistributionShape::Empty);
        assert_eq!(dist.peak_note, UNKNOWN_NOTE);
    }

    #[test]
    fn test_overview_constant_series() {
        let overview = stability_overview(&[220.0; 50], 20, 10, &NoteTable::standard());
        assert_eq!(overview.bins.len(), 1);
        assert_eq!(overview.overall_stability, 100.0);
        assert!(overview.unstable_regions.is_empty());
        assert!(overview.stable_range.min_freq <= 220.0);
        assert!(overview.stable_range.max_freq >= 220.0);
    }

    #[test]
    fn test_overview_too_short() {
        let overview = stability_overview(&[220.0; 5], 20, 10, &NoteTable::standard());
        assert_eq!(overview.overall_stability, 0.0);
        assert!(!overview.stable_range.is_known());
    }
}
