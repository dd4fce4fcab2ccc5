//! # Vocal Profile
//!
//! A vocal range profiling engine: per-recording pitch range segmentation,
//! voice stability metrics and cross-session profile accumulation.
//!
//! ## Features
//!
//! - **Range Segmentation**: Percentile ranges plus comfortable/core ranges chosen by
//!   histogram-bin stability
//! - **Stability Metrics**: Jitter, shimmer, coefficient-of-variation stability score and vibrato
//! - **Rating**: Lookup-table classification into five stability labels
//! - **Accumulation**: Weighted, strategy-weighted and outlier-robust profiles over a
//!   singer's history, with confidence scoring and trends
//!
//! ## Quick Start
//!
//! ```
//! use chrono::{Duration, Utc};
//! use vocal_profile::{accumulate_profile, analyze_recording, AnalysisConfig, RecordingInfo};
//!
//! // F0 per frame in Hz from an external pitch tracker (0 = unvoiced)
//! let frames: Vec<f32> = (0..400)
//!     .map(|i| if i % 10 == 0 { 0.0 } else { 220.0 + (i % 7) as f32 })
//!     .collect();
//!
//! let now = Utc::now();
//! let mut history = Vec::new();
//! for days in [14, 7, 0] {
//!     let info = RecordingInfo::new(now - Duration::days(days), 9.3);
//!     history.push(analyze_recording(&frames, info, AnalysisConfig::default())?.record);
//! }
//!
//! let profile = accumulate_profile(&history, None, now)?;
//! println!(
//!     "Comfortable: {} ({:.1}% confidence)",
//!     profile.comfortable_range.note_span(),
//!     profile.stability_profile.confidence
//! );
//! # Ok::<(), vocal_profile::ProfileError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! F0 series → Preprocessing → Feature Extraction → AnalysisRecord → Accumulation → Profile
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod accumulation;
pub mod analysis;
pub mod config;
pub mod error;
pub mod features;
pub mod preprocessing;

// Re-export main types
pub use accumulation::{
    AccumulatedProfile, ProfileAggregator, RobustProfile, WeightStrategy, WeightedProfile,
    WeightingStrategy,
};
pub use analysis::recording::{RecordingAnalysis, RecordingAnalyzer, RecordingInfo};
pub use analysis::result::{
    AnalysisRecord, FrequencyRange, RangeAnalysis, StabilityMetrics, StabilityRange,
    StabilityRating,
};
pub use config::{AggregationConfig, AnalysisConfig};
pub use error::ProfileError;

use chrono::{DateTime, Utc};

/// Analyze one recording
///
/// Builds a [`RecordingAnalyzer`] for `config` and runs it on `frames`.
///
/// # Arguments
///
/// * `frames` - Per-frame F0 estimates in Hz, values ≤ 0 are unvoiced
/// * `info` - Timestamp, duration and optional song label of the recording
/// * `config` - Analysis configuration parameters
///
/// # Returns
///
/// `RecordingAnalysis` holding the persistable `AnalysisRecord`, the full range
/// breakdown and processing metadata
///
/// # Errors
///
/// Returns `ProfileError` if the configuration is invalid, the frames are
/// malformed, or fewer than 2 frames are voiced
pub fn analyze_recording(
    frames: &[f32],
    info: RecordingInfo,
    config: AnalysisConfig,
) -> Result<RecordingAnalysis, ProfileError> {
    log::debug!("analyze_recording: {} frames", frames.len());
    RecordingAnalyzer::new(config)?.analyze(frames, info)
}

/// Accumulate a singer's history with the default aggregation settings
///
/// # Arguments
///
/// * `records` - Every stored record for one singer, in any order
/// * `window_days` - Only use records from the last `window_days` days
/// * `now` - Reference time for record ages
///
/// # Errors
///
/// Returns `ProfileError::InvalidRecord` if a record violates the history
/// contract. An empty history is not an error.
pub fn accumulate_profile(
    records: &[AnalysisRecord],
    window_days: Option<u32>,
    now: DateTime<Utc>,
) -> Result<AccumulatedProfile, ProfileError> {
    log::debug!(
        "accumulate_profile: {} records, window {:?}",
        records.len(),
        window_days
    );
    ProfileAggregator::default().accumulate(records, window_days, now)
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::analysis::rating::RatingClassifier;
    use crate::analysis::result::{AnalysisRecord, FrequencyRange, StabilityMetrics, StabilityRange};
    use crate::features::notes::NoteTable;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    /// Day `n` after a fixed epoch (2024-01-01)
    pub fn day(n: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0)
            .single()
            .expect("valid epoch")
            + Duration::days(n)
    }

    /// Reference "now": day 100
    pub fn now() -> DateTime<Utc> {
        day(100)
    }

    /// A well-formed 30 s record with total range `(min, max)`
    ///
    /// Comfortable and core ranges sit 10% and 25% of the width inside the
    /// total range, jitter is 1% and shimmer 2%.
    pub fn record(
        timestamp: DateTime<Utc>,
        (min, max): (f64, f64),
        stability_score: f64,
    ) -> AnalysisRecord {
        let notes = NoteTable::standard();
        let width = max - min;
        let comfortable = FrequencyRange::new(min + 0.1 * width, max - 0.1 * width, &notes);
        let core = FrequencyRange::new(min + 0.25 * width, max - 0.25 * width, &notes);
        let metrics = StabilityMetrics {
            jitter_pct: 1.0,
            shimmer_pct: 2.0,
            stability_score,
            vibrato_rate_hz: 0.0,
            vibrato_extent_hz: 0.0,
        };

        AnalysisRecord {
            timestamp,
            duration_s: 30.0,
            total_range: FrequencyRange::new(min, max, &notes),
            stability_comfortable_range: StabilityRange {
                range: comfortable.clone(),
                stability_score: 80.0,
            },
            stability_core_range: StabilityRange {
                range: core.clone(),
                stability_score: 90.0,
            },
            comfortable_range: comfortable,
            core_range: core,
            rating: RatingClassifier::default().classify(stability_score, 1.0, 2.0),
            stability_metrics: metrics,
            song: None,
        }
    }
}
