//! Voice stability metrics
//!
//! Jitter, shimmer, the scalar stability score and vibrato of one recording,
//! all derived from its voiced F0 frames.
//!
//! # Example
//!
//! ```
//! use vocal_profile::config::StabilityConfig;
//! use vocal_profile::features::stability::compute_stability_metrics;
//!
//! let valid = vec![220.0; 200];
//! let metrics = compute_stability_metrics(&valid, 22050, 512, &StabilityConfig::default());
//!
//! assert_eq!(metrics.stability_score, 0.0);
//! assert_eq!(metrics.vibrato_rate_hz, 0.0);
//! ```

pub mod perturbation;
pub mod vibrato;

use crate::analysis::result::StabilityMetrics;
use crate::config::StabilityConfig;

/// Compute stability metrics from voiced frames
///
/// # Arguments
///
/// * `valid` - Voiced F0 frames (> 0 Hz) in time order
/// * `sample_rate` - Sample rate of the source audio, for the vibrato rate
/// * `hop_length` - Hop between frames in samples, for the vibrato rate
/// * `config` - Vibrato search parameters
///
/// # Returns
///
/// All-zero metrics with fewer than 2 frames. Every field is ≥ 0.
pub fn compute_stability_metrics(
    valid: &[f64],
    sample_rate: u32,
    hop_length: usize,
    config: &StabilityConfig,
) -> StabilityMetrics {
    if valid.len() < 2 {
        log::debug!("Stability metrics zeroed: {} voiced frames", valid.len());
        return StabilityMetrics::default();
    }

    let vibrato = vibrato::detect_vibrato(valid, sample_rate, hop_length, config);
    let metrics = StabilityMetrics {
        jitter_pct: perturbation::jitter_pct(valid),
        shimmer_pct: perturbation::shimmer_pct(valid),
        stability_score: perturbation::stability_score(valid),
        vibrato_rate_hz: vibrato.rate_hz,
        vibrato_extent_hz: vibrato.extent_hz,
    };

    log::debug!(
        "Stability metrics: jitter={:.3}%, shimmer={:.3}%, score={:.3}",
        metrics.jitter_pct,
        metrics.shimmer_pct,
        metrics.stability_score
    );
    metrics
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_few_frames() {
        let metrics = compute_stability_metrics(&[220.0], 22050, 512, &StabilityConfig::default());
        assert_eq!(metrics, StabilityMetrics::default());
    }

    #[test]
    fn test_metrics_non_negative() {
        let valid: Vec<f64> = (0..250)
            .map(|i| 180.0 + ((i * 37) % 23) as f64 * 1.7)
            .collect();
        let metrics = compute_stability_metrics(&valid, 22050, 512, &StabilityConfig::default());
        assert!(metrics.jitter_pct >= 0.0);
        assert!(metrics.shimmer_pct >= 0.0);
        assert!(metrics.stability_score >= 0.0);
        assert!(metrics.vibrato_rate_hz >= 0.0);
        assert!(metrics.vibrato_extent_hz >= 0.0);
    }
}
