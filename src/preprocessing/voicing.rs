//! Series validation and voiced-frame filtering
//!
//! An F0 series holds one Hz value per analysis frame; values ≤ 0 mark
//! unvoiced frames. NaN or infinite values are malformed input, not
//! unvoiced frames, and are rejected.
//!
//! # Example
//!
//! ```
//! use vocal_profile::preprocessing::voicing::{prepare_series, voiced_frames};
//!
//! let series = prepare_series(&[0.0, 220.0, 221.0, 0.0])?;
//! assert_eq!(voiced_frames(&series), vec![220.0, 221.0]);
//! # Ok::<(), vocal_profile::ProfileError>(())
//! ```

use crate::error::ProfileError;

/// Validate a raw frame series and widen it to `f64`
///
/// # Errors
///
/// Returns `ProfileError::InvalidInput` if any frame is NaN or infinite.
pub fn prepare_series(frames: &[f32]) -> Result<Vec<f64>, ProfileError> {
    if let Some(index) = frames.iter().position(|f| !f.is_finite()) {
        return Err(ProfileError::InvalidInput(format!(
            "Non-finite F0 value {} at frame {}",
            frames[index], index
        )));
    }
    Ok(frames.iter().map(|&f| f as f64).collect())
}

/// True if the frame carries a usable F0 estimate
#[inline]
pub fn is_voiced(freq: f64) -> bool {
    freq > 0.0 && freq.is_finite()
}

/// Voiced frames of a series, in order
pub fn voiced_frames(series: &[f64]) -> Vec<f64> {
    series.iter().copied().filter(|&f| is_voiced(f)).collect()
}

/// Share of voiced frames (0.0 for an empty series)
pub fn voice_ratio(valid_frames: usize, total_frames: usize) -> f64 {
    if total_frames == 0 {
        return 0.0;
    }
    valid_frames as f64 / total_frames as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_series_rejects_nan() {
        let result = prepare_series(&[220.0, f32::NAN, 0.0]);
        assert!(matches!(result, Err(ProfileError::InvalidInput(_))));

        let result = prepare_series(&[f32::INFINITY]);
        assert!(result.is_err());
    }

    #[test]
    fn test_voiced_frames_filters_unvoiced() {
        let series = prepare_series(&[0.0, 110.0, -1.0, 220.0, 0.0]).unwrap();
        assert_eq!(series.len(), 5);
        assert_eq!(voiced_frames(&series), vec![110.0, 220.0]);
    }

    #[test]
    fn test_voice_ratio() {
        assert_eq!(voice_ratio(2, 4), 0.5);
        assert_eq!(voice_ratio(0, 0), 0.0);
    }
}
