//! Stability-based range selection
//!
//! Voiced frames are bucketed into equal-width bins. Each well-populated bin
//! is scored by how little F0 varies inside it, and the comfortable/core
//! ranges are the union of bins passing a score and usage threshold.
//!
//! # Algorithm
//!
//! 1. Bin the voiced frames (default 30 bins)
//! 2. For every bin with more than `min_bin_samples` frames:
//!    - `cv = std / mean`
//!    - `stability_score = max(0, 100 − cv·1000)`
//!    - `usage_ratio = count / total · 100`
//!    - `weighted_stability = stability_score · (1 + usage_ratio / 100)`
//! 3. Rank bins by `weighted_stability` (descending)
//! 4. Select tiers, falling back to the top `1/divisor` of ranked bins when no
//!    bin passes the thresholds

use crate::analysis::result::{FrequencyRange, StabilityBin, StabilityRange};
use crate::config::SegmentationConfig;
use crate::features::histogram::FrequencyHistogram;
use crate::features::notes::NoteTable;
use crate::features::statistics::{mean, std_dev};

/// Score every qualifying bin and rank by weighted stability
///
/// Bins with equal weighted stability keep their frequency order.
pub fn rank_stability_bins(valid: &[f64], config: &SegmentationConfig) -> Vec<StabilityBin> {
    let total = valid.len();
    if total == 0 {
        return Vec::new();
    }

    let histogram = FrequencyHistogram::build(valid, config.bin_count);
    let mut ranked: Vec<StabilityBin> = histogram
        .bins()
        .filter(|bin| bin.values.len() > config.min_bin_samples)
        .map(|bin| {
            let bin_mean = mean(bin.values);
            let cv = if bin_mean > 0.0 {
                std_dev(bin.values) / bin_mean
            } else {
                f64::INFINITY
            };
            let stability_score = (100.0 - cv * 1000.0).max(0.0);
            let usage_ratio = bin.values.len() as f64 / total as f64 * 100.0;
            StabilityBin {
                min_freq: bin.lower,
                max_freq: bin.upper,
                stability_score,
                weighted_stability: stability_score * (1.0 + usage_ratio / 100.0),
                sample_count: bin.values.len(),
                usage_ratio,
            }
        })
        .collect();

    ranked.sort_by(|a, b| b.weighted_stability.total_cmp(&a.weighted_stability));
    ranked
}

/// Comfortable and core stability ranges from ranked bins
///
/// # Arguments
///
/// * `ranked` - Output of [`rank_stability_bins`]
/// * `valid_count` - Number of voiced frames the bins were built from
/// * `config` - Thresholds and fallback divisors
/// * `notes` - Table for boundary labels
///
/// # Returns
///
/// `(comfortable, core)`; both unknown with score 0 when fewer than
/// `min_valid_samples` frames were voiced or no bin qualified.
pub fn select_stability_ranges(
    ranked: &[StabilityBin],
    valid_count: usize,
    config: &SegmentationConfig,
    notes: &NoteTable,
) -> (StabilityRange, StabilityRange) {
    if valid_count < config.min_valid_samples || ranked.is_empty() {
        log::debug!(
            "No stability ranges: {} voiced frames, {} scored bins",
            valid_count,
            ranked.len()
        );
        return (StabilityRange::unknown(), StabilityRange::unknown());
    }

    let min_comfortable_count = valid_count as f64 * config.comfortable_min_share;
    let comfortable: Vec<&StabilityBin> = ranked
        .iter()
        .filter(|b| {
            b.stability_score >= config.comfortable_threshold
                && b.sample_count as f64 >= min_comfortable_count
        })
        .collect();
    let comfortable = with_fallback(comfortable, ranked, config.comfortable_fallback_divisor);

    let core: Vec<&StabilityBin> = ranked
        .iter()
        .filter(|b| {
            b.stability_score >= config.core_threshold && b.usage_ratio >= config.core_min_usage_pct
        })
        .collect();
    let core = with_fallback(core, ranked, config.core_fallback_divisor);

    (union_range(&comfortable, notes), union_range(&core, notes))
}

fn with_fallback<'a>(
    selected: Vec<&'a StabilityBin>,
    ranked: &'a [StabilityBin],
    divisor: usize,
) -> Vec<&'a StabilityBin> {
    if !selected.is_empty() {
        return selected;
    }
    let keep = (ranked.len() / divisor.max(1)).max(1);
    log::debug!(
        "No bin passed the thresholds, keeping top {} of {} ranked bins",
        keep,
        ranked.len()
    );
    ranked.iter().take(keep).collect()
}

fn union_range(bins: &[&StabilityBin], notes: &NoteTable) -> StabilityRange {
    if bins.is_empty() {
        return StabilityRange::unknown();
    }
    let lo = bins.iter().map(|b| b.min_freq).fold(f64::INFINITY, f64::min);
    let hi = bins.iter().map(|b| b.max_freq).fold(f64::NEG_INFINITY, f64::max);
    let score = bins.iter().map(|b| b.stability_score).sum::<f64>() / bins.len() as f64;

    StabilityRange {
        range: FrequencyRange::new(lo, hi, notes),
        stability_score: score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bin(lo: f64, score: f64, usage: f64, count: usize) -> StabilityBin {
        StabilityBin {
            min_freq: lo,
            max_freq: lo + 10.0,
            stability_score: score,
            weighted_stability: score * (1.0 + usage / 100.0),
            sample_count: count,
            usage_ratio: usage,
        }
    }

    #[test]
    fn test_constant_series_single_perfect_bin() {
        let valid = vec![220.0; 200];
        let ranked = rank_stability_bins(&valid, &SegmentationConfig::default());

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].stability_score, 100.0);
        assert_eq!(ranked[0].usage_ratio, 100.0);
        assert!((ranked[0].weighted_stability - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_ranking_descending() {
        let mut valid = Vec::new();
        for i in 0..300 {
            // Steady low cluster, noisy high cluster
            valid.push(200.0 + (i % 2) as f64 * 0.1);
            valid.push(400.0 + (i % 7) as f64 * 3.0);
        }
        let ranked = rank_stability_bins(&valid, &SegmentationConfig::default());
        assert!(ranked.len() >= 2);
        for pair in ranked.windows(2) {
            assert!(pair[0].weighted_stability >= pair[1].weighted_stability);
        }
        assert!(ranked[0].min_freq < 300.0);
    }

    #[test]
    fn test_thresholded_tiers() {
        let config = SegmentationConfig::default();
        let notes = NoteTable::standard();
        let ranked = vec![
            bin(200.0, 95.0, 40.0, 400),
            bin(210.0, 80.0, 30.0, 300),
            bin(300.0, 20.0, 30.0, 300),
        ];

        let (comfortable, core) = select_stability_ranges(&ranked, 1000, &config, &notes);
        assert_eq!(comfortable.range.min_freq, 200.0);
        assert_eq!(comfortable.range.max_freq, 220.0);
        assert!((comfortable.stability_score - 87.5).abs() < 1e-9);

        assert_eq!(core.range.min_freq, 200.0);
        assert_eq!(core.range.max_freq, 210.0);
        assert_eq!(core.stability_score, 95.0);
    }

    #[test]
    fn test_fallback_tiers() {
        let config = SegmentationConfig::default();
        let notes = NoteTable::standard();
        let ranked: Vec<StabilityBin> = (0..6)
            .map(|i| bin(100.0 + 20.0 * i as f64, 60.0 - i as f64, 10.0, 100))
            .collect();

        let (comfortable, core) = select_stability_ranges(&ranked, 1000, &config, &notes);
        // Top third of 6 = 2 bins, top fifth = max(1, 1) bin
        assert_eq!(comfortable.range.min_freq, 100.0);
        assert_eq!(comfortable.range.max_freq, 130.0);
        assert!((comfortable.stability_score - 59.5).abs() < 1e-9);
        assert_eq!(core.range.min_freq, 100.0);
        assert_eq!(core.range.max_freq, 110.0);
    }

    #[test]
    fn test_too_few_samples_zeroed() {
        let config = SegmentationConfig::default();
        let ranked = vec![bin(200.0, 95.0, 100.0, 9)];
        let (comfortable, core) =
            select_stability_ranges(&ranked, 9, &config, &NoteTable::standard());
        assert_eq!(comfortable, StabilityRange::unknown());
        assert_eq!(core, StabilityRange::unknown());
    }

    #[test]
    fn test_no_qualifying_bins_zeroed() {
        // 12 frames spread over 30 bins: no bin holds more than 5
        let valid: Vec<f64> = (0..12).map(|i| 100.0 + 50.0 * i as f64).collect();
        let config = SegmentationConfig::default();
        let ranked = rank_stability_bins(&valid, &config);
        assert!(ranked.is_empty());

        let (comfortable, _) =
            select_stability_ranges(&ranked, valid.len(), &config, &NoteTable::standard());
        assert_eq!(comfortable.stability_score, 0.0);
        assert_eq!(comfortable.range.min_freq, 0.0);
    }
}
