//! Moving-average smoothing of voiced frames
//!
//! Only voiced frames are averaged, and only with each other: unvoiced frames
//! stay at their original value and never pull the average towards 0. At the
//! edges of the voiced sequence the window shrinks to the frames that exist.

use super::voicing::is_voiced;
use crate::error::ProfileError;

/// Smooth the voiced frames of a series with a centred moving average
///
/// # Arguments
///
/// * `series` - Full F0 series (unvoiced frames ≤ 0)
/// * `window` - Window length in voiced frames (≥ 1)
///
/// # Returns
///
/// A series of the same length. If the series holds `window` or fewer voiced
/// frames it is returned unchanged.
///
/// # Errors
///
/// Returns `ProfileError::InvalidInput` if `window` is 0.
pub fn smooth_voiced(series: &[f64], window: usize) -> Result<Vec<f64>, ProfileError> {
    if window == 0 {
        return Err(ProfileError::InvalidInput(
            "Smoothing window must be >= 1".to_string(),
        ));
    }

    let voiced_idx: Vec<usize> = series
        .iter()
        .enumerate()
        .filter(|(_, &f)| is_voiced(f))
        .map(|(i, _)| i)
        .collect();

    let mut smoothed = series.to_vec();
    if voiced_idx.len() <= window {
        log::debug!(
            "Skipping smoothing: {} voiced frames <= window {}",
            voiced_idx.len(),
            window
        );
        return Ok(smoothed);
    }

    let voiced: Vec<f64> = voiced_idx.iter().map(|&i| series[i]).collect();
    let n = voiced.len();
    let behind = window / 2;
    let ahead = (window - 1) / 2;

    // Prefix sums keep this linear in the series length
    let mut prefix = Vec::with_capacity(n + 1);
    prefix.push(0.0);
    for v in &voiced {
        let last = prefix[prefix.len() - 1];
        prefix.push(last + v);
    }

    for (k, &target) in voiced_idx.iter().enumerate() {
        let lo = k.saturating_sub(behind);
        let hi = (k + ahead).min(n - 1);
        smoothed[target] = (prefix[hi + 1] - prefix[lo]) / (hi + 1 - lo) as f64;
    }

    log::debug!("Smoothed {} voiced frames with window {}", n, window);
    Ok(smoothed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_window_rejected() {
        assert!(smooth_voiced(&[220.0; 10], 0).is_err());
    }

    #[test]
    fn test_short_series_unchanged() {
        let series = vec![0.0, 200.0, 0.0, 300.0, 250.0];
        assert_eq!(smooth_voiced(&series, 3).unwrap(), series);
    }

    #[test]
    fn test_unvoiced_frames_preserved() {
        let series = vec![100.0, 0.0, 200.0, 300.0, 0.0, 400.0, 500.0];
        let smoothed = smooth_voiced(&series, 3).unwrap();

        assert_eq!(smoothed[1], 0.0);
        assert_eq!(smoothed[4], 0.0);
        // Edge averages over the two voiced frames that exist
        assert!((smoothed[0] - 150.0).abs() < 1e-9);
        // Interior averages 100, 200, 300 ignoring the unvoiced gap
        assert!((smoothed[2] - 200.0).abs() < 1e-9);
        assert!((smoothed[6] - 450.0).abs() < 1e-9);
    }

    #[test]
    fn test_constant_series_stays_constant() {
        let series = vec![220.0; 50];
        let smoothed = smooth_voiced(&series, 5).unwrap();
        assert!(smoothed.iter().all(|&f| (f - 220.0).abs() < 1e-9));
    }

    #[test]
    fn test_window_of_one_is_identity() {
        let series = vec![100.0, 150.0, 0.0, 175.0];
        assert_eq!(smooth_voiced(&series, 1).unwrap(), series);
    }
}
