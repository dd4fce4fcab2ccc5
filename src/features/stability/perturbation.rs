//! Jitter, shimmer and overall F0 variability
//!
//! All three are percentages of the mean F0 of the voiced frames:
//!
//! - jitter: `mean(|Δf|) / mean(f) · 100`
//! - shimmer: `std(Δf) / mean(f) · 100` (F0-based stand-in, amplitude is not modelled)
//! - stability score: `std(f) / mean(f) · 100` (lower = steadier)
//!
//! `Δf` is the difference between consecutive voiced frames.

use crate::features::statistics::{mean, std_dev};

/// Frame-to-frame differences of consecutive values
pub fn first_difference(values: &[f64]) -> Vec<f64> {
    values.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Jitter in percent (0.0 with fewer than 2 frames or a zero mean)
pub fn jitter_pct(valid: &[f64]) -> f64 {
    let mean_f0 = mean(valid);
    if valid.len() < 2 || mean_f0 <= 0.0 {
        return 0.0;
    }
    let abs_diff: Vec<f64> = first_difference(valid).iter().map(|d| d.abs()).collect();
    mean(&abs_diff) / mean_f0 * 100.0
}

/// Shimmer in percent (0.0 with fewer than 2 frames or a zero mean)
pub fn shimmer_pct(valid: &[f64]) -> f64 {
    let mean_f0 = mean(valid);
    if valid.len() < 2 || mean_f0 <= 0.0 {
        return 0.0;
    }
    std_dev(&first_difference(valid)) / mean_f0 * 100.0
}

/// Coefficient of variation of F0 in percent (0.0 for a zero mean)
pub fn stability_score(valid: &[f64]) -> f64 {
    let mean_f0 = mean(valid);
    if mean_f0 <= 0.0 {
        return 0.0;
    }
    std_dev(valid) / mean_f0 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_series_is_perfectly_stable() {
        let valid = vec![220.0; 200];
        assert_eq!(jitter_pct(&valid), 0.0);
        assert_eq!(shimmer_pct(&valid), 0.0);
        assert_eq!(stability_score(&valid), 0.0);
    }

    #[test]
    fn test_alternating_series() {
        // Δf alternates +10, -10
        let valid: Vec<f64> = (0..101).map(|i| if i % 2 == 0 { 195.0 } else { 205.0 }).collect();
        let mean_f0 = mean(&valid);

        assert!((jitter_pct(&valid) - 10.0 / mean_f0 * 100.0).abs() < 1e-9);
        assert!((shimmer_pct(&valid) - 10.0 / mean_f0 * 100.0).abs() < 1e-9);
        assert!(stability_score(&valid) > 0.0);
        assert!(stability_score(&valid) < jitter_pct(&valid));
    }

    #[test]
    fn test_single_frame() {
        assert_eq!(jitter_pct(&[220.0]), 0.0);
        assert_eq!(shimmer_pct(&[220.0]), 0.0);
        assert_eq!(first_difference(&[220.0]), Vec::<f64>::new());
    }
}
