//! Percentile-based ranges
//!
//! These describe time-weighted usage: how much of the recording sits in a
//! span, not how steady the voice is there.

use crate::analysis::result::FrequencyRange;
use crate::features::notes::NoteTable;
use crate::features::statistics::percentile_sorted;

/// Total, comfortable and core ranges of one recording
#[derive(Debug, Clone, PartialEq)]
pub struct PercentileRanges {
    /// `[min, max]` of the voiced frames
    pub total: FrequencyRange,
    /// `[P10, P90]`
    pub comfortable: FrequencyRange,
    /// `[P25, P75]`
    pub core: FrequencyRange,
}

/// Compute the percentile ranges of voiced frames
///
/// `sorted_valid` must be sorted ascending. An empty slice yields unknown
/// ranges.
pub fn percentile_ranges(sorted_valid: &[f64], notes: &NoteTable) -> PercentileRanges {
    if sorted_valid.is_empty() {
        return PercentileRanges {
            total: FrequencyRange::unknown(),
            comfortable: FrequencyRange::unknown(),
            core: FrequencyRange::unknown(),
        };
    }

    let span = |lo: f64, hi: f64| {
        FrequencyRange::new(
            percentile_sorted(sorted_valid, lo),
            percentile_sorted(sorted_valid, hi),
            notes,
        )
    };

    PercentileRanges {
        total: span(0.0, 100.0),
        comfortable: span(10.0, 90.0),
        core: span(25.0, 75.0),
    }
}
