//! Analysis result types
//!
//! [`AnalysisRecord`] is the immutable per-recording result that the
//! persistence collaborator stores; [`RangeAnalysis`] is the richer per-recording
//! breakdown produced alongside it.

use crate::features::notes::{semitone_span, NoteTable, UNKNOWN_NOTE};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Frequency span in Hz with nearest-note labels
///
/// `0.0` in either bound means "unknown", never a measured value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyRange {
    /// Lower bound in Hz
    pub min_freq: f64,
    /// Upper bound in Hz
    pub max_freq: f64,
    /// Nearest note to the lower bound ("N/A" if unknown)
    pub min_note: String,
    /// Nearest note to the upper bound ("N/A" if unknown)
    pub max_note: String,
    /// `12 · log2(max / min)`, 0 if either bound is unknown
    pub semitone_span: f64,
}

impl FrequencyRange {
    /// Build a range and label its bounds
    ///
    /// If both bounds are known and arrive reversed they are swapped, so
    /// `min_freq <= max_freq` holds for every constructed range.
    pub fn new(min_freq: f64, max_freq: f64, notes: &NoteTable) -> Self {
        let (min_freq, max_freq) = if min_freq > 0.0 && max_freq > 0.0 && min_freq > max_freq {
            log::warn!(
                "Range bounds reversed ({:.2} > {:.2} Hz), swapping",
                min_freq,
                max_freq
            );
            (max_freq, min_freq)
        } else {
            (min_freq, max_freq)
        };

        Self {
            min_freq,
            max_freq,
            min_note: notes.nearest(min_freq),
            max_note: notes.nearest(max_freq),
            semitone_span: semitone_span(min_freq, max_freq),
        }
    }

    /// The "unknown" range: both bounds 0 Hz
    pub fn unknown() -> Self {
        Self {
            min_freq: 0.0,
            max_freq: 0.0,
            min_note: UNKNOWN_NOTE.to_string(),
            max_note: UNKNOWN_NOTE.to_string(),
            semitone_span: 0.0,
        }
    }

    /// True if both bounds are measured (> 0)
    pub fn is_known(&self) -> bool {
        self.min_freq > 0.0 && self.max_freq > 0.0
    }

    /// Width in Hz
    pub fn width_hz(&self) -> f64 {
        self.max_freq - self.min_freq
    }

    /// Note span such as "A3 - E4"
    pub fn note_span(&self) -> String {
        format!("{} - {}", self.min_note, self.max_note)
    }
}

/// Frequency range chosen by acoustic stability, with its mean bin score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StabilityRange {
    /// Range covered by the selected histogram bins
    #[serde(flatten)]
    pub range: FrequencyRange,
    /// Mean stability score (0-100, higher = steadier) of the selected bins
    pub stability_score: f64,
}

impl StabilityRange {
    /// `{0, 0, score: 0}`: no bin qualified
    pub fn unknown() -> Self {
        Self {
            range: FrequencyRange::unknown(),
            stability_score: 0.0,
        }
    }
}

/// Voice quality metrics of one recording
///
/// `stability_score` keeps the inverted convention used throughout the
/// engine: it is the coefficient of variation of F0 in percent, so lower
/// means steadier.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StabilityMetrics {
    /// Mean absolute frame-to-frame F0 change relative to mean F0 (%)
    pub jitter_pct: f64,
    /// Standard deviation of the frame-to-frame F0 change relative to mean F0 (%)
    pub shimmer_pct: f64,
    /// Standard deviation of F0 relative to mean F0 (%), lower = more stable
    pub stability_score: f64,
    /// Vibrato rate in Hz (0 if none detected)
    pub vibrato_rate_hz: f64,
    /// Vibrato extent (peak-to-trough F0) in Hz (0 if none detected)
    pub vibrato_extent_hz: f64,
}

/// Categorical stability rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StabilityRating {
    /// Total score ≥ 4.5
    VeryStable,
    /// Total score ≥ 3.5
    Stable,
    /// Total score ≥ 2.5
    Moderate,
    /// Total score ≥ 1.5
    SlightlyUnstable,
    /// Anything lower
    Unstable,
}

impl StabilityRating {
    /// Human-readable label (e.g., "very stable")
    pub fn label(&self) -> &'static str {
        match self {
            StabilityRating::VeryStable => "very stable",
            StabilityRating::Stable => "stable",
            StabilityRating::Moderate => "moderate",
            StabilityRating::SlightlyUnstable => "slightly unstable",
            StabilityRating::Unstable => "unstable",
        }
    }
}

impl fmt::Display for StabilityRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of analyzing one recording
///
/// Created once by the recording analyzer and never mutated. Every field is
/// required when deserializing except the optional song label, so partial
/// records are rejected at the history boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    /// When the recording was made
    pub timestamp: DateTime<Utc>,
    /// Recording length in seconds
    pub duration_s: f64,
    /// Full span of valid F0
    pub total_range: FrequencyRange,
    /// 10th-90th percentile span
    pub comfortable_range: FrequencyRange,
    /// 25th-75th percentile span
    pub core_range: FrequencyRange,
    /// Comfortable span chosen by bin stability
    pub stability_comfortable_range: StabilityRange,
    /// Core span chosen by bin stability
    pub stability_core_range: StabilityRange,
    /// Jitter, shimmer, stability score and vibrato
    pub stability_metrics: StabilityMetrics,
    /// Categorical rating of the metrics
    pub rating: StabilityRating,
    /// Song the recording was sung to, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub song: Option<String>,
}

/// Mean/median/spread of the valid F0 frames
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CentralPitch {
    /// Mean F0 in Hz
    pub mean_freq: f64,
    /// Median F0 in Hz
    pub median_freq: f64,
    /// Population standard deviation of F0 in Hz
    pub std_freq: f64,
    /// Nearest note to the mean
    pub mean_note: String,
}

/// Shape of the F0 histogram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionShape {
    /// Mean and median within 0.1 standard deviations
    Normal,
    /// Mean above median (bulk of the singing sits low)
    LowSkewed,
    /// Mean below median (bulk of the singing sits high)
    HighSkewed,
    /// No valid frames
    Empty,
}

/// Where in the range the singer spends most time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyDistribution {
    /// Histogram shape classification
    pub shape: DistributionShape,
    /// Centre of the fullest histogram bin in Hz
    pub peak_frequency: f64,
    /// Nearest note to the peak
    pub peak_note: String,
    /// Share of frames in the fullest bin (%)
    pub usage_concentration: f64,
}

/// Voicing counts of one recording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoicingStatistics {
    /// Frames with F0 > 0
    pub valid_frames: usize,
    /// All frames
    pub total_frames: usize,
    /// `valid_frames / total_frames`
    pub voice_ratio: f64,
    /// Histogram summary of the valid frames
    pub distribution: FrequencyDistribution,
}

/// One histogram bin scored for acoustic stability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StabilityBin {
    /// Lower bin edge in Hz
    pub min_freq: f64,
    /// Upper bin edge in Hz
    pub max_freq: f64,
    /// `max(0, 100 − cv·1000)`, higher = steadier
    pub stability_score: f64,
    /// `stability_score · (1 + usage_ratio / 100)`
    pub weighted_stability: f64,
    /// Frames in the bin
    pub sample_count: usize,
    /// Share of all valid frames in the bin (%)
    pub usage_ratio: f64,
}

/// Coarse per-bin steadiness summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StabilityOverview {
    /// Span of the steady bins
    pub stable_range: FrequencyRange,
    /// Bins scoring below 50
    pub unstable_regions: Vec<StabilityBin>,
    /// Mean score over all scored bins
    pub overall_stability: f64,
    /// Every scored bin, in frequency order
    pub bins: Vec<StabilityBin>,
}

/// Full per-recording range breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeAnalysis {
    /// Full span of valid F0
    pub total_range: FrequencyRange,
    /// 10th-90th percentile span
    pub comfortable_range: FrequencyRange,
    /// 25th-75th percentile span
    pub core_range: FrequencyRange,
    /// Comfortable span chosen by bin stability
    pub stability_comfortable_range: StabilityRange,
    /// Core span chosen by bin stability
    pub stability_core_range: StabilityRange,
    /// Mean/median/spread of F0
    pub central_pitch: CentralPitch,
    /// Coarse steadiness summary
    pub stability_overview: StabilityOverview,
    /// Scored bins ranked by weighted stability (best first)
    pub stability_regions: Vec<StabilityBin>,
    /// Voicing counts and histogram summary
    pub statistics: VoicingStatistics,
}
