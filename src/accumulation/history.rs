//! History contract: validation, ordering, windowing and per-song grouping
//!
//! A history arrives as an unordered collection of [`AnalysisRecord`]s for
//! one singer. Records are validated at this boundary so the aggregation
//! formulas never see a malformed value.

use crate::analysis::result::{AnalysisRecord, FrequencyRange, StabilityRange};
use crate::error::ProfileError;
use crate::features::statistics::{mean, std_dev};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Label used to group records without a song
pub const UNKNOWN_SONG: &str = "unknown";

/// Check one record against the history contract
///
/// # Errors
///
/// Returns `ProfileError::InvalidRecord` if any number is non-finite or
/// negative, or a range has `min > max` with both bounds known.
pub fn validate_record(record: &AnalysisRecord) -> Result<(), ProfileError> {
    if !record.duration_s.is_finite() || record.duration_s < 0.0 {
        return Err(ProfileError::InvalidRecord(format!(
            "duration_s = {}",
            record.duration_s
        )));
    }

    let ranges: [(&str, &FrequencyRange); 5] = [
        ("total_range", &record.total_range),
        ("comfortable_range", &record.comfortable_range),
        ("core_range", &record.core_range),
        (
            "stability_comfortable_range",
            &record.stability_comfortable_range.range,
        ),
        ("stability_core_range", &record.stability_core_range.range),
    ];
    for (name, range) in ranges {
        validate_range(name, range)?;
    }
    for (name, range) in [
        ("stability_comfortable_range", &record.stability_comfortable_range),
        ("stability_core_range", &record.stability_core_range),
    ] {
        validate_stability_range(name, range)?;
    }

    let m = &record.stability_metrics;
    for (name, value) in [
        ("jitter_pct", m.jitter_pct),
        ("shimmer_pct", m.shimmer_pct),
        ("stability_score", m.stability_score),
        ("vibrato_rate_hz", m.vibrato_rate_hz),
        ("vibrato_extent_hz", m.vibrato_extent_hz),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(ProfileError::InvalidRecord(format!("{} = {}", name, value)));
        }
    }
    Ok(())
}

fn validate_range(name: &str, range: &FrequencyRange) -> Result<(), ProfileError> {
    if !range.min_freq.is_finite()
        || !range.max_freq.is_finite()
        || range.min_freq < 0.0
        || range.max_freq < 0.0
    {
        return Err(ProfileError::InvalidRecord(format!(
            "{} bounds [{}, {}]",
            name, range.min_freq, range.max_freq
        )));
    }
    if range.is_known() && range.min_freq > range.max_freq {
        return Err(ProfileError::InvalidRecord(format!(
            "{} min {} > max {}",
            name, range.min_freq, range.max_freq
        )));
    }
    Ok(())
}

fn validate_stability_range(name: &str, range: &StabilityRange) -> Result<(), ProfileError> {
    if !range.stability_score.is_finite() || range.stability_score < 0.0 {
        return Err(ProfileError::InvalidRecord(format!(
            "{} stability_score = {}",
            name, range.stability_score
        )));
    }
    Ok(())
}

/// Validate every record, reporting the first offender's index
pub fn validate_history(records: &[AnalysisRecord]) -> Result<(), ProfileError> {
    for (i, record) in records.iter().enumerate() {
        validate_record(record).map_err(|e| match e {
            ProfileError::InvalidRecord(msg) => {
                ProfileError::InvalidRecord(format!("record {}: {}", i, msg))
            }
            other => other,
        })?;
    }
    Ok(())
}

/// Whole days between `timestamp` and `now`, never negative
pub fn days_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - timestamp).num_days().max(0)
}

/// Validate, window and sort a history oldest first
///
/// With `window_days`, only records with `timestamp ≥ now − window_days` are
/// kept. Records with equal timestamps keep their input order.
pub fn prepare_history(
    records: &[AnalysisRecord],
    window_days: Option<u32>,
    now: DateTime<Utc>,
) -> Result<Vec<AnalysisRecord>, ProfileError> {
    validate_history(records)?;

    let cutoff = window_days.map(|days| now - Duration::days(i64::from(days)));
    let mut kept: Vec<AnalysisRecord> = records
        .iter()
        .filter(|r| cutoff.map_or(true, |c| r.timestamp >= c))
        .cloned()
        .collect();
    kept.sort_by_key(|r| r.timestamp);

    log::debug!(
        "History: {} of {} records within window {:?}",
        kept.len(),
        records.len(),
        window_days
    );
    Ok(kept)
}

/// Per-song range summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongSummary {
    /// Song label ([`UNKNOWN_SONG`] for unlabelled records)
    pub song: String,
    /// Recordings of this song
    pub measurement_count: usize,
    /// Mean total-range lower bound in Hz
    pub avg_min_freq: f64,
    /// Mean total-range upper bound in Hz
    pub avg_max_freq: f64,
    /// `std(max) + std(min)` of the total range, lower = more consistent
    pub range_variability: f64,
    /// Timestamp of the newest recording
    pub last_measured: DateTime<Utc>,
}

/// Group chronologically ordered records by song
///
/// Songs are listed in order of first appearance.
pub fn song_summaries(records: &[AnalysisRecord]) -> Vec<SongSummary> {
    let mut groups: Vec<(String, Vec<&AnalysisRecord>)> = Vec::new();
    for record in records {
        let song = record.song.as_deref().unwrap_or(UNKNOWN_SONG);
        match groups.iter_mut().find(|(name, _)| name == song) {
            Some((_, members)) => members.push(record),
            None => groups.push((song.to_string(), vec![record])),
        }
    }

    groups
        .into_iter()
        .filter_map(|(song, members)| {
            let last = members.iter().map(|r| r.timestamp).max()?;
            let mins: Vec<f64> = members.iter().map(|r| r.total_range.min_freq).collect();
            let maxs: Vec<f64> = members.iter().map(|r| r.total_range.max_freq).collect();
            Some(SongSummary {
                song,
                measurement_count: members.len(),
                avg_min_freq: mean(&mins),
                avg_max_freq: mean(&maxs),
                range_variability: std_dev(&maxs) + std_dev(&mins),
                last_measured: last,
            })
        })
        .collect()
}
