//! Per-recording analysis
//!
//! Orchestrates preprocessing, range segmentation, stability metrics and the
//! rating classifier into one immutable [`AnalysisRecord`].
//!
//! # Example
//!
//! ```
//! use chrono::Utc;
//! use vocal_profile::analysis::recording::{RecordingAnalyzer, RecordingInfo};
//! use vocal_profile::{AnalysisConfig, StabilityRating};
//!
//! let analyzer = RecordingAnalyzer::new(AnalysisConfig::default())?;
//! let frames = vec![220.0f32; 200];
//! let analysis = analyzer.analyze(&frames, RecordingInfo::new(Utc::now(), 4.6))?;
//!
//! assert_eq!(analysis.record.rating, StabilityRating::VeryStable);
//! # Ok::<(), vocal_profile::ProfileError>(())
//! ```

use super::metadata::{AnalysisFlag, AnalysisMetadata, LOW_VOICE_RATIO};
use super::rating::RatingClassifier;
use super::result::{AnalysisRecord, RangeAnalysis};
use crate::config::AnalysisConfig;
use crate::error::ProfileError;
use crate::features::notes::NoteTable;
use crate::features::range::RangeSegmenter;
use crate::features::stability::compute_stability_metrics;
use crate::preprocessing::smoothing::smooth_voiced;
use crate::preprocessing::voicing::{prepare_series, voiced_frames};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Recording facts the F0 series does not carry
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingInfo {
    /// When the recording was made
    pub timestamp: DateTime<Utc>,
    /// Recording length in seconds
    pub duration_s: f64,
    /// Song the recording was sung to
    pub song: Option<String>,
}

impl RecordingInfo {
    /// Info without a song label
    pub fn new(timestamp: DateTime<Utc>, duration_s: f64) -> Self {
        Self {
            timestamp,
            duration_s,
            song: None,
        }
    }

    /// Attach a song label
    pub fn with_song(mut self, song: impl Into<String>) -> Self {
        self.song = Some(song.into());
        self
    }
}

/// Everything produced for one recording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingAnalysis {
    /// The persisted per-recording result
    pub record: AnalysisRecord,
    /// Full range breakdown
    pub details: RangeAnalysis,
    /// Processing metadata
    pub metadata: AnalysisMetadata,
}

/// Turns one F0 series into an [`AnalysisRecord`]
#[derive(Debug, Clone)]
pub struct RecordingAnalyzer {
    config: AnalysisConfig,
    segmenter: RangeSegmenter,
    classifier: RatingClassifier,
}

impl RecordingAnalyzer {
    /// Analyzer with the standard note table
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::Config` if the configuration fails validation.
    pub fn new(config: AnalysisConfig) -> Result<Self, ProfileError> {
        Self::with_notes(config, NoteTable::standard())
    }

    /// Analyzer with a custom note table
    pub fn with_notes(config: AnalysisConfig, notes: NoteTable) -> Result<Self, ProfileError> {
        config.validate()?;
        Ok(Self {
            segmenter: RangeSegmenter::with_notes(config.segmentation.clone(), notes),
            classifier: RatingClassifier::new(config.rating.clone()),
            config,
        })
    }

    /// Configuration in use
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze one recording
    ///
    /// # Arguments
    ///
    /// * `frames` - Per-frame F0 in Hz (≤ 0 = unvoiced)
    /// * `info` - Timestamp, duration and optional song label
    ///
    /// # Errors
    ///
    /// - `ProfileError::InvalidInput` for NaN/infinite frames or an invalid duration
    /// - `ProfileError::InsufficientData` if fewer than 2 frames are voiced
    pub fn analyze(
        &self,
        frames: &[f32],
        info: RecordingInfo,
    ) -> Result<RecordingAnalysis, ProfileError> {
        let start_time = Instant::now();
        log::debug!(
            "Analyzing recording: {} frames, {:.1}s, song={:?}",
            frames.len(),
            info.duration_s,
            info.song
        );

        if !info.duration_s.is_finite() || info.duration_s < 0.0 {
            return Err(ProfileError::InvalidInput(format!(
                "Invalid recording duration: {}",
                info.duration_s
            )));
        }

        let mut metadata = AnalysisMetadata {
            total_frames: frames.len(),
            sample_rate: self.config.sample_rate,
            hop_length: self.config.hop_length,
            ..AnalysisMetadata::default()
        };

        let mut series = prepare_series(frames)?;
        if let Some(window) = self.config.smoothing_window {
            series = smooth_voiced(&series, window)?;
            metadata.flag(
                AnalysisFlag::Smoothed,
                format!("Voiced frames smoothed with window {}", window),
            );
        }

        let details = self.segmenter.segment(&series)?;
        let valid = voiced_frames(&series);
        metadata.voiced_frames = valid.len();

        let metrics = compute_stability_metrics(
            &valid,
            self.config.sample_rate,
            self.config.hop_length,
            &self.config.stability,
        );
        let rating = self.classifier.classify(
            metrics.stability_score,
            metrics.jitter_pct,
            metrics.shimmer_pct,
        );

        if details.statistics.voice_ratio < LOW_VOICE_RATIO {
            metadata.flag(
                AnalysisFlag::LowVoiceRatio,
                format!(
                    "Only {:.0}% of frames are voiced",
                    details.statistics.voice_ratio * 100.0
                ),
            );
        }
        if details.stability_regions.is_empty()
            || valid.len() < self.config.segmentation.min_valid_samples
        {
            metadata.flag(
                AnalysisFlag::StabilityRangesUnavailable,
                "Not enough voiced frames per bin for stability ranges",
            );
        }
        if valid.len() < self.config.stability.vibrato_min_samples {
            metadata.flag(
                AnalysisFlag::VibratoSkipped,
                format!(
                    "{} voiced frames, vibrato needs {}",
                    valid.len(),
                    self.config.stability.vibrato_min_samples
                ),
            );
        }

        let record = AnalysisRecord {
            timestamp: info.timestamp,
            duration_s: info.duration_s,
            total_range: details.total_range.clone(),
            comfortable_range: details.comfortable_range.clone(),
            core_range: details.core_range.clone(),
            stability_comfortable_range: details.stability_comfortable_range.clone(),
            stability_core_range: details.stability_core_range.clone(),
            stability_metrics: metrics,
            rating,
            song: info.song,
        };

        metadata.processing_time_ms = start_time.elapsed().as_secs_f64() * 1000.0;
        log::debug!(
            "Recording analyzed in {:.2} ms: {} ({})",
            metadata.processing_time_ms,
            record.total_range.note_span(),
            record.rating
        );

        Ok(RecordingAnalysis {
            record,
            details,
            metadata,
        })
    }
}
