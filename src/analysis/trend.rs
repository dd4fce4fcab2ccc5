//! Stability trend and range progress over time
//!
//! Both operate on records in chronological order (oldest first).
//!
//! The stability trend compares the mean stability score of the newest window
//! against the window before it. Stability scores grow as the voice gets
//! less steady, and the labels follow the raw delta: a rising score reads as
//! "improved". Consumers depend on this convention.

use super::result::AnalysisRecord;
use crate::config::TrendConfig;
use crate::features::statistics::mean;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of the stability score over recent recordings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StabilityTrend {
    /// Delta above the "much improved" threshold
    MuchImproved,
    /// Delta above the "improved" threshold
    Improved,
    /// Delta within the stable band, or too few records for a comparison
    Stable,
    /// Delta just below the stable band
    SlightlyDeclining,
    /// Delta below the slight-decline floor
    Declining,
    /// Fewer records than one window
    InsufficientData,
}

impl fmt::Display for StabilityTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StabilityTrend::MuchImproved => "much improved",
            StabilityTrend::Improved => "improved",
            StabilityTrend::Stable => "stable",
            StabilityTrend::SlightlyDeclining => "slightly declining",
            StabilityTrend::Declining => "declining",
            StabilityTrend::InsufficientData => "insufficient data",
        })
    }
}

/// Classify the stability trend of chronologically ordered scores
///
/// - fewer than `window` scores: `InsufficientData`
/// - fewer than `2 · window`: `Stable`
/// - otherwise the delta `mean(newest window) − mean(previous window)` is
///   bucketed by the configured thresholds
pub fn stability_trend(scores: &[f64], config: &TrendConfig) -> StabilityTrend {
    let window = config.window.max(1);
    if scores.len() < window {
        return StabilityTrend::InsufficientData;
    }
    if scores.len() < 2 * window {
        return StabilityTrend::Stable;
    }

    let n = scores.len();
    let recent = mean(&scores[n - window..]);
    let previous = mean(&scores[n - 2 * window..n - window]);
    let delta = recent - previous;

    let trend = if delta > config.much_improved {
        StabilityTrend::MuchImproved
    } else if delta > config.improved {
        StabilityTrend::Improved
    } else if delta > config.stable_floor {
        StabilityTrend::Stable
    } else if delta > config.slight_decline_floor {
        StabilityTrend::SlightlyDeclining
    } else {
        StabilityTrend::Declining
    };
    log::debug!(
        "Stability trend: recent {:.2} vs previous {:.2} (delta {:.2}) -> {}",
        recent,
        previous,
        delta,
        trend
    );
    trend
}

/// Direction of the total range width over time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeTrend {
    /// Fewer than 2 records
    InsufficientData,
    /// Exactly 2 records, too early to call
    Analyzing,
    /// Newest total range is wider than the oldest by more than the threshold
    Expanding,
    /// Newest total range is narrower than the oldest by more than the threshold
    Contracting,
    /// Width change within the threshold
    Steady,
}

impl fmt::Display for RangeTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RangeTrend::InsufficientData => "insufficient data",
            RangeTrend::Analyzing => "analyzing",
            RangeTrend::Expanding => "expanding",
            RangeTrend::Contracting => "contracting",
            RangeTrend::Steady => "steady",
        })
    }
}

/// One recording on the progress timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressPoint {
    /// When the recording was made
    pub timestamp: DateTime<Utc>,
    /// Song label, if any
    pub song: Option<String>,
    /// Total range lower bound in Hz
    pub total_min: f64,
    /// Total range upper bound in Hz
    pub total_max: f64,
    /// Comfortable range lower bound in Hz
    pub comfortable_min: f64,
    /// Comfortable range upper bound in Hz
    pub comfortable_max: f64,
    /// Stability score of the recording
    pub stability_score: f64,
}

/// Range progress over a history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeProgress {
    /// Width trend classification
    pub trend: RangeTrend,
    /// Chronological timeline (empty with fewer than 2 records)
    pub data_points: Vec<ProgressPoint>,
    /// One-line description
    pub summary: String,
}

/// Track how the total range width changes across chronologically ordered records
pub fn range_progress(records: &[AnalysisRecord], config: &TrendConfig) -> RangeProgress {
    if records.len() < 2 {
        return RangeProgress {
            trend: RangeTrend::InsufficientData,
            data_points: Vec::new(),
            summary: "At least 2 recordings are needed to track progress".to_string(),
        };
    }

    let data_points: Vec<ProgressPoint> = records
        .iter()
        .map(|r| ProgressPoint {
            timestamp: r.timestamp,
            song: r.song.clone(),
            total_min: r.total_range.min_freq,
            total_max: r.total_range.max_freq,
            comfortable_min: r.comfortable_range.min_freq,
            comfortable_max: r.comfortable_range.max_freq,
            stability_score: r.stability_metrics.stability_score,
        })
        .collect();

    let trend = match (records.first(), records.last()) {
        (Some(first), Some(last)) if records.len() >= 3 => {
            let change = last.total_range.width_hz() - first.total_range.width_hz();
            if change > config.range_change_hz {
                RangeTrend::Expanding
            } else if change < -config.range_change_hz {
                RangeTrend::Contracting
            } else {
                RangeTrend::Steady
            }
        }
        _ => RangeTrend::Analyzing,
    };

    RangeProgress {
        summary: format!("{} recordings, trend: {}", data_points.len(), trend),
        trend,
        data_points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trend_needs_a_window() {
        let config = TrendConfig::default();
        assert_eq!(stability_trend(&[], &config), StabilityTrend::InsufficientData);
        assert_eq!(stability_trend(&[10.0, 20.0], &config), StabilityTrend::InsufficientData);
        assert_eq!(stability_trend(&[10.0, 20.0, 90.0], &config), StabilityTrend::Stable);
        assert_eq!(stability_trend(&[10.0; 5], &config), StabilityTrend::Stable);
    }

    #[test]
    fn test_trend_buckets() {
        let config = TrendConfig::default();
        let trend = |recent: f64| {
            stability_trend(&[10.0, 10.0, 10.0, recent, recent, recent], &config)
        };
        assert_eq!(trend(16.0), StabilityTrend::MuchImproved);
        assert_eq!(trend(13.0), StabilityTrend::Improved);
        assert_eq!(trend(10.0), StabilityTrend::Stable);
        assert_eq!(trend(7.0), StabilityTrend::SlightlyDeclining);
        assert_eq!(trend(4.0), StabilityTrend::Declining);
    }

    #[test]
    fn test_trend_uses_last_two_windows_only() {
        let config = TrendConfig::default();
        let scores = [90.0, 90.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0];
        assert_eq!(stability_trend(&scores, &config), StabilityTrend::Stable);
    }

    #[test]
    fn test_range_progress() {
        use crate::test_support::{day, record};
        let config = TrendConfig::default();

        let one = [record(day(0), (200.0, 400.0), 20.0)];
        let progress = range_progress(&one, &config);
        assert_eq!(progress.trend, RangeTrend::InsufficientData);
        assert!(progress.data_points.is_empty());

        let two = [
            record(day(0), (200.0, 400.0), 20.0),
            record(day(5), (180.0, 500.0), 20.0),
        ];
        let progress = range_progress(&two, &config);
        assert_eq!(progress.trend, RangeTrend::Analyzing);
        assert_eq!(progress.data_points.len(), 2);

        let widening = [
            record(day(0), (200.0, 400.0), 20.0),
            record(day(5), (190.0, 420.0), 20.0),
            record(day(9), (180.0, 460.0), 20.0),
        ];
        assert_eq!(range_progress(&widening, &config).trend, RangeTrend::Expanding);
        // 80 Hz wider overall
        assert_eq!(widening[2].total_range.width_hz() - widening[0].total_range.width_hz(), 80.0);

        let narrowing = [
            record(day(0), (150.0, 500.0), 20.0),
            record(day(5), (190.0, 420.0), 20.0),
            record(day(9), (200.0, 400.0), 20.0),
        ];
        assert_eq!(range_progress(&narrowing, &config).trend, RangeTrend::Contracting);

        let steady = [
            record(day(0), (200.0, 400.0), 20.0),
            record(day(5), (100.0, 700.0), 20.0),
            record(day(9), (210.0, 430.0), 20.0),
        ];
        let progress = range_progress(&steady, &config);
        assert_eq!(progress.trend, RangeTrend::Steady);
        assert!(progress.summary.contains("steady"));
    }

    #[test]
    fn test_trend_labels() {
        assert_eq!(StabilityTrend::SlightlyDeclining.to_string(), "slightly declining");
        assert_eq!(RangeTrend::Expanding.to_string(), "expanding");
    }
}
