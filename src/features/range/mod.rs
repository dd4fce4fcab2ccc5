//! Range segmentation
//!
//! Splits the frequency space of one recording into five range families:
//! - Total, comfortable and core ranges from percentiles (usage)
//! - Comfortable and core ranges from histogram-bin stability (acoustic quality)
//!
//! The segmenter owns its note table and thresholds, so alternate tunings can
//! be injected per instance.
//!
//! # Example
//!
//! ```
//! use vocal_profile::config::SegmentationConfig;
//! use vocal_profile::features::range::RangeSegmenter;
//!
//! let segmenter = RangeSegmenter::new(SegmentationConfig::default());
//! let series = vec![220.0; 200];
//! let analysis = segmenter.segment(&series)?;
//!
//! assert_eq!(analysis.total_range.min_note, "A3");
//! # Ok::<(), vocal_profile::ProfileError>(())
//! ```

pub mod distribution;
pub mod percentile;
pub mod stability_bins;

use crate::analysis::result::{RangeAnalysis, VoicingStatistics};
use crate::config::SegmentationConfig;
use crate::error::ProfileError;
use crate::features::notes::NoteTable;
use crate::features::statistics::sorted;
use crate::preprocessing::voicing::{voice_ratio, voiced_frames};

/// Fewest voiced frames a recording needs to be segmented
pub const MIN_VOICED_FRAMES: usize = 2;

/// Percentile and stability range segmenter
#[derive(Debug, Clone, Default)]
pub struct RangeSegmenter {
    config: SegmentationConfig,
    notes: NoteTable,
}

impl RangeSegmenter {
    /// Segmenter with the standard C2..C6 note table
    pub fn new(config: SegmentationConfig) -> Self {
        Self {
            config,
            notes: NoteTable::standard(),
        }
    }

    /// Segmenter with a custom note table
    pub fn with_notes(config: SegmentationConfig, notes: NoteTable) -> Self {
        Self { config, notes }
    }

    /// Note table used for boundary labels
    pub fn notes(&self) -> &NoteTable {
        &self.notes
    }

    /// Segmentation thresholds
    pub fn config(&self) -> &SegmentationConfig {
        &self.config
    }

    /// Segment one F0 series
    ///
    /// # Arguments
    ///
    /// * `series` - Per-frame F0 in Hz, values ≤ 0 are unvoiced
    ///
    /// # Returns
    ///
    /// The full [`RangeAnalysis`]. Stability ranges are zeroed (not an error)
    /// when too few frames are voiced to score any bin.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::InsufficientData` if fewer than 2 frames are voiced.
    pub fn segment(&self, series: &[f64]) -> Result<RangeAnalysis, ProfileError> {
        let valid = voiced_frames(series);
        log::debug!(
            "Segmenting range: {} voiced of {} frames",
            valid.len(),
            series.len()
        );

        if valid.len() < MIN_VOICED_FRAMES {
            log::warn!("Only {} voiced frames, cannot segment range", valid.len());
            return Err(ProfileError::InsufficientData(format!(
                "{} voiced frames (need at least {})",
                valid.len(),
                MIN_VOICED_FRAMES
            )));
        }

        let ordered = sorted(&valid);
        let percentiles = percentile::percentile_ranges(&ordered, &self.notes);

        let stability_regions = stability_bins::rank_stability_bins(&valid, &self.config);
        let (stability_comfortable_range, stability_core_range) =
            stability_bins::select_stability_ranges(
                &stability_regions,
                valid.len(),
                &self.config,
                &self.notes,
            );

        log::debug!(
            "Stability ranges: comfortable {:.1}-{:.1} Hz ({:.1}), core {:.1}-{:.1} Hz ({:.1})",
            stability_comfortable_range.range.min_freq,
            stability_comfortable_range.range.max_freq,
            stability_comfortable_range.stability_score,
            stability_core_range.range.min_freq,
            stability_core_range.range.max_freq,
            stability_core_range.stability_score
        );

        let stability_overview = distribution::stability_overview(
            &valid,
            self.config.overview_bin_count,
            self.config.min_valid_samples,
            &self.notes,
        );

        Ok(RangeAnalysis {
            total_range: percentiles.total,
            comfortable_range: percentiles.comfortable,
            core_range: percentiles.core,
            stability_comfortable_range,
            stability_core_range,
            central_pitch: distribution::central_pitch(&valid, &self.notes),
            stability_overview,
            stability_regions,
            statistics: VoicingStatistics {
                valid_frames: valid.len(),
                total_frames: series.len(),
                voice_ratio: voice_ratio(valid.len(), series.len()),
                distribution: distribution::frequency_distribution(&valid, &self.notes),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::notes::Note;

    #[test]
    fn test_constant_series() {
        let segmenter = RangeSegmenter::default();
        let analysis = segmenter.segment(&vec![220.0; 200]).unwrap();

        assert_eq!(analysis.total_range.min_freq, 220.0);
        assert_eq!(analysis.total_range.max_freq, 220.0);
        assert_eq!(analysis.core_range.min_note, "A3");

        let core = &analysis.stability_core_range;
        assert!((core.range.min_freq - 220.0).abs() < 0.05);
        assert!((core.range.max_freq - 220.0).abs() < 0.05);
        assert_eq!(core.stability_score, 100.0);
        assert_eq!(analysis.statistics.voice_ratio, 1.0);
    }

    #[test]
    fn test_insufficient_voiced_frames() {
        let segmenter = RangeSegmenter::default();
        let result = segmenter.segment(&[0.0, 220.0, 0.0, 0.0]);
        assert!(matches!(result, Err(ProfileError::InsufficientData(_))));

        let result = segmenter.segment(&[]);
        assert!(result.is_err());
    }

    #[test]
    fn test_short_series_zeroes_stability_ranges() {
        let segmenter = RangeSegmenter::default();
        let analysis = segmenter.segment(&[200.0, 0.0, 210.0, 220.0]).unwrap();

        assert_eq!(analysis.statistics.valid_frames, 3);
        assert_eq!(analysis.statistics.total_frames, 4);
        assert_eq!(analysis.stability_comfortable_range.stability_score, 0.0);
        assert_eq!(analysis.stability_core_range.range.min_freq, 0.0);
        assert!(analysis.total_range.is_known());
    }

    #[test]
    fn test_custom_note_table() {
        let notes = NoteTable::from_notes(vec![
            Note {
                name: "low".to_string(),
                frequency: 100.0,
            },
            Note {
                name: "high".to_string(),
                frequency: 1000.0,
            },
        ]);
        let segmenter = RangeSegmenter::with_notes(SegmentationConfig::default(), notes);
        let analysis = segmenter.segment(&[150.0, 900.0]).unwrap();
        assert_eq!(analysis.total_range.min_note, "low");
        assert_eq!(analysis.total_range.max_note, "high");
    }

    #[test]
    fn test_ranges_ordered_for_two_clusters() {
        let series: Vec<f64> = (0..400)
            .map(|i| if i % 2 == 0 { 196.0 + (i % 3) as f64 * 0.2 } else { 330.0 + (i % 5) as f64 })
            .collect();
        let analysis = RangeSegmenter::default().segment(&series).unwrap();

        for range in [
            &analysis.total_range,
            &analysis.comfortable_range,
            &analysis.core_range,
            &analysis.stability_comfortable_range.range,
            &analysis.stability_core_range.range,
        ] {
            assert!(range.min_freq <= range.max_freq);
        }
        assert!(!analysis.stability_regions.is_empty());
    }
}
