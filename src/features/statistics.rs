//! Descriptive and robust statistics shared by the segmenter and the aggregator
//!
//! All helpers are total: empty input yields 0.0 (or an empty vector) rather
//! than NaN, so callers never divide by an unchecked length.

/// Arithmetic mean (0.0 for empty input)
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (ddof = 0)
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Sample standard deviation (ddof = 1), 0.0 with fewer than two values
pub fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance =
        values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

/// Copy and sort ascending
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    out.sort_by(f64::total_cmp);
    out
}

/// Median (mean of the two middle values for even lengths)
pub fn median(values: &[f64]) -> f64 {
    percentile(values, 50.0)
}

/// Percentile with linear interpolation between closest ranks
///
/// `p` is in percent (0-100). Matches the "linear" definition: the rank is
/// `p / 100 * (n - 1)` and fractional ranks interpolate between neighbours.
pub fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    percentile_sorted(&sorted(values), p)
}

/// [`percentile`] on data that is already sorted ascending
pub fn percentile_sorted(sorted_values: &[f64], p: f64) -> f64 {
    if sorted_values.is_empty() {
        return 0.0;
    }
    let rank = (p.clamp(0.0, 100.0) / 100.0) * (sorted_values.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let low_value = sorted_values[lo];
    if lo == hi {
        return low_value;
    }
    let frac = rank - lo as f64;
    low_value + (sorted_values[hi] - low_value) * frac
}

/// Weighted mean `Σ(v·w) / Σw`
///
/// Computed as an offset from the first value so that a set of identical
/// values returns that value bit-for-bit regardless of the weights.
/// Returns 0.0 when the input is empty or the total weight is not positive.
pub fn weighted_mean(values: &[f64], weights: &[f64]) -> f64 {
    debug_assert_eq!(values.len(), weights.len());
    let total: f64 = weights.iter().sum();
    if values.is_empty() || total <= 0.0 {
        return 0.0;
    }
    let anchor = values[0];
    let offset: f64 = values
        .iter()
        .zip(weights)
        .map(|(v, w)| (v - anchor) * w)
        .sum::<f64>()
        / total;
    anchor + offset
}

/// Weighted percentile by cumulative weight
///
/// Values are sorted ascending, weights accumulated, and the first value whose
/// cumulative weight reaches `total · p / 100` is returned (no interpolation).
pub fn weighted_percentile(values: &[f64], weights: &[f64], p: f64) -> f64 {
    debug_assert_eq!(values.len(), weights.len());
    if values.is_empty() {
        return 0.0;
    }

    let mut pairs: Vec<(f64, f64)> = values.iter().copied().zip(weights.iter().copied()).collect();
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

    let total: f64 = pairs.iter().map(|(_, w)| w).sum();
    let target = total * p / 100.0;

    let mut cumulative = 0.0;
    for (value, weight) in &pairs {
        cumulative += weight;
        if cumulative >= target {
            return *value;
        }
    }
    pairs[pairs.len() - 1].0
}

/// Keep values inside `[Q1 − 1.5·IQR, Q3 + 1.5·IQR]`
///
/// Falls back to the untrimmed set if trimming would discard everything.
pub fn iqr_trim(values: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }
    let ordered = sorted(values);
    let q1 = percentile_sorted(&ordered, 25.0);
    let q3 = percentile_sorted(&ordered, 75.0);
    let iqr = q3 - q1;
    let lower = q1 - 1.5 * iqr;
    let upper = q3 + 1.5 * iqr;

    let kept: Vec<f64> = values
        .iter()
        .copied()
        .filter(|v| *v >= lower && *v <= upper)
        .collect();

    if kept.is_empty() {
        log::warn!("IQR trim removed all {} values, keeping untrimmed set", values.len());
        values.to_vec()
    } else {
        kept
    }
}

/// Minimum and maximum (0, 0 for empty input)
pub fn min_max(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_std() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(mean(&values), 5.0);
        assert!((std_dev(&values) - 2.0).abs() < 1e-12);
        assert!((sample_std_dev(&values) - 2.138089935).abs() < 1e-6);
        assert_eq!(sample_std_dev(&[3.0]), 0.0);
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_percentile_linear() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(percentile(&values, 0.0), 1.0);
        assert_eq!(percentile(&values, 50.0), 3.0);
        assert_eq!(percentile(&values, 100.0), 5.0);
        // rank 0.1 * 4 = 0.4
        assert!((percentile(&values, 10.0) - 1.4).abs() < 1e-12);
        assert!((median(&[4.0, 1.0, 3.0, 2.0]) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_weighted_mean_identical_values_exact() {
        let values = [220.123456789; 7];
        let weights = [0.013, 7.5, 1e-6, 0.33, 2.0, 0.9, 11.0];
        assert_eq!(weighted_mean(&values, &weights), 220.123456789);
    }

    #[test]
    fn test_weighted_mean() {
        let value = weighted_mean(&[100.0, 200.0], &[3.0, 1.0]);
        assert!((value - 125.0).abs() < 1e-12);
        assert_eq!(weighted_mean(&[], &[]), 0.0);
    }

    #[test]
    fn test_weighted_percentile() {
        let values = [300.0, 100.0, 200.0];
        let weights = [0.25, 0.5, 0.25];
        assert_eq!(weighted_percentile(&values, &weights, 10.0), 100.0);
        assert_eq!(weighted_percentile(&values, &weights, 50.0), 100.0);
        assert_eq!(weighted_percentile(&values, &weights, 60.0), 200.0);
        assert_eq!(weighted_percentile(&values, &weights, 90.0), 300.0);
    }

    #[test]
    fn test_iqr_trim_removes_outlier() {
        let values = [200.0, 205.0, 210.0, 207.0, 203.0, 900.0];
        let kept = iqr_trim(&values);
        assert_eq!(kept.len(), 5);
        assert!(!kept.contains(&900.0));
    }

    #[test]
    fn test_iqr_trim_constant() {
        let kept = iqr_trim(&[5.0, 5.0, 5.0]);
        assert_eq!(kept, vec![5.0, 5.0, 5.0]);
        assert!(iqr_trim(&[]).is_empty());
    }

    #[test]
    fn test_min_max() {
        assert_eq!(min_max(&[3.0, -1.0, 8.0]), (-1.0, 8.0));
        assert_eq!(min_max(&[]), (0.0, 0.0));
    }
}
