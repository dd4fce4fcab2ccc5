//! Cross-session profile aggregation
//!
//! [`ProfileAggregator`] merges a singer's record history into one profile.
//! Three modes are offered:
//!
//! - [`accumulate`](ProfileAggregator::accumulate): weighted mean of the
//!   comfortable/core ranges and voice quality, using blended per-session
//!   weights, with confidence and trend
//! - [`weighted_profile`](ProfileAggregator::weighted_profile): weighted
//!   percentiles under a selectable [`WeightingStrategy`]
//! - [`robust_profile`](ProfileAggregator::robust_profile): IQR-trimmed
//!   pooled bounds, unweighted
//!
//! Every mode validates the history, applies the optional day window against
//! an explicit `now`, and maps an empty history to an empty profile.

use super::history::{days_ago, prepare_history, song_summaries, SongSummary};
use super::profile::{
    AccumulatedProfile, AnalysisSummary, RobustProfile, StabilityProfile, WeightDistribution,
    WeightedProfile,
};
use super::weighting::{
    normalize, recommend_strategy, BlendedSessionWeight, StrategyRecommendation, WeightStrategy,
    WeightingStrategy,
};
use crate::analysis::confidence::{estimate_confidence, measurement_confidence};
use crate::analysis::rating::RatingClassifier;
use crate::analysis::result::{AnalysisRecord, FrequencyRange, StabilityRange};
use crate::analysis::trend::{range_progress, stability_trend, RangeProgress};
use crate::config::{AggregationConfig, RatingThresholds};
use crate::error::ProfileError;
use crate::features::notes::NoteTable;
use crate::features::statistics::{iqr_trim, mean, min_max, weighted_mean, weighted_percentile};
use chrono::{DateTime, Utc};

/// Merges record histories into accumulated profiles
#[derive(Debug, Clone)]
pub struct ProfileAggregator {
    config: AggregationConfig,
    classifier: RatingClassifier,
    notes: NoteTable,
}

impl Default for ProfileAggregator {
    fn default() -> Self {
        Self {
            config: AggregationConfig::default(),
            classifier: RatingClassifier::default(),
            notes: NoteTable::standard(),
        }
    }
}

impl ProfileAggregator {
    /// Create an aggregator with the standard note table and rating tables
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::Config` if the configuration fails validation.
    pub fn new(config: AggregationConfig) -> Result<Self, ProfileError> {
        Self::with_tables(config, RatingThresholds::default(), NoteTable::standard())
    }

    /// Create an aggregator with custom rating thresholds and note table
    pub fn with_tables(
        config: AggregationConfig,
        thresholds: RatingThresholds,
        notes: NoteTable,
    ) -> Result<Self, ProfileError> {
        config.validate()?;
        Ok(Self {
            config,
            classifier: RatingClassifier::new(thresholds),
            notes,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &AggregationConfig {
        &self.config
    }

    /// Weighted-average profile over blended session weights
    ///
    /// # Arguments
    ///
    /// * `records` - History for one singer, in any order
    /// * `window_days` - Keep only records from the last `window_days` days
    /// * `now` - Reference time for record ages and the window
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::InvalidRecord` if any record violates the
    /// history contract. An empty (or fully windowed-out) history yields
    /// [`AccumulatedProfile::empty`].
    pub fn accumulate(
        &self,
        records: &[AnalysisRecord],
        window_days: Option<u32>,
        now: DateTime<Utc>,
    ) -> Result<AccumulatedProfile, ProfileError> {
        let history = prepare_history(records, window_days, now)?;
        if history.is_empty() {
            log::warn!("No records to accumulate, returning empty profile");
            return Ok(AccumulatedProfile::empty());
        }

        let blend = BlendedSessionWeight::new(self.config.weighting.session.clone());
        let weights = blend.compute(&history, now);
        let column =
            |f: fn(&AnalysisRecord) -> f64| -> Vec<f64> { history.iter().map(f).collect() };
        let average = |f: fn(&AnalysisRecord) -> f64| weighted_mean(&column(f), &weights);

        let comfortable_range = FrequencyRange::new(
            average(|r| r.comfortable_range.min_freq),
            average(|r| r.comfortable_range.max_freq),
            &self.notes,
        );
        let core_range = FrequencyRange::new(
            average(|r| r.core_range.min_freq),
            average(|r| r.core_range.max_freq),
            &self.notes,
        );

        let scores = column(|r| r.stability_metrics.stability_score);
        let confidence = estimate_confidence(&self.ages(&history, now), &scores, &weights);
        let stability_profile = StabilityProfile {
            avg_stability: weighted_mean(&scores, &weights),
            avg_jitter: average(|r| r.stability_metrics.jitter_pct),
            avg_shimmer: average(|r| r.stability_metrics.shimmer_pct),
            confidence: confidence.overall,
            confidence_breakdown: confidence,
        };

        let analysis_summary = AnalysisSummary {
            count: history.len(),
            most_recent: history.last().map(|r| r.timestamp),
            oldest: history.first().map(|r| r.timestamp),
            avg_weight: mean(&weights),
            weight_distribution: WeightDistribution::from_weights(&weights),
        };

        log::debug!(
            "Accumulated {} records: comfortable {:.1}-{:.1} Hz, core {:.1}-{:.1} Hz, conf {:.1}",
            history.len(),
            comfortable_range.min_freq,
            comfortable_range.max_freq,
            core_range.min_freq,
            core_range.max_freq,
            stability_profile.confidence
        );

        Ok(AccumulatedProfile {
            comfortable_range,
            core_range,
            stability_profile,
            analysis_summary,
            stability_trend: stability_trend(&scores, &self.config.trend),
        })
    }

    /// Weighted-percentile profile under one strategy
    ///
    /// Weights are normalized to sum to 1 and reported oldest record first.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::InvalidRecord` for a malformed history.
    pub fn weighted_profile(
        &self,
        records: &[AnalysisRecord],
        strategy: WeightingStrategy,
        window_days: Option<u32>,
        now: DateTime<Utc>,
    ) -> Result<WeightedProfile, ProfileError> {
        let history = prepare_history(records, window_days, now)?;
        if history.is_empty() {
            log::warn!("No records for {} weighting, returning empty profile", strategy);
            return Ok(WeightedProfile::empty(strategy));
        }

        let weights = normalize(&strategy.build(&self.config.weighting).compute(&history, now));
        let column =
            |f: fn(&AnalysisRecord) -> f64| -> Vec<f64> { history.iter().map(f).collect() };
        let range = |lo: fn(&AnalysisRecord) -> f64, hi: fn(&AnalysisRecord) -> f64, p: f64| {
            FrequencyRange::new(
                weighted_percentile(&column(lo), &weights, p),
                weighted_percentile(&column(hi), &weights, 100.0 - p),
                &self.notes,
            )
        };

        let total_range = range(|r| r.total_range.min_freq, |r| r.total_range.max_freq, 10.0);
        let comfortable_range = range(
            |r| r.comfortable_range.min_freq,
            |r| r.comfortable_range.max_freq,
            20.0,
        );
        let core_range = range(|r| r.core_range.min_freq, |r| r.core_range.max_freq, 25.0);

        let scores = column(|r| r.stability_metrics.stability_score);
        let avg_stability = weighted_mean(&scores, &weights);
        let confidence = estimate_confidence(&self.ages(&history, now), &scores, &weights);

        log::debug!(
            "{} weighting over {} records: total {:.1}-{:.1} Hz, stability {:.2}",
            strategy,
            history.len(),
            total_range.min_freq,
            total_range.max_freq,
            avg_stability
        );

        Ok(WeightedProfile {
            strategy,
            total_range,
            comfortable_range,
            core_range,
            avg_stability,
            stability_rating: Some(self.classifier.rate_stability_score(avg_stability)),
            weights,
            confidence,
            measurement: measurement_confidence(history.len()),
            stability_trend: stability_trend(&scores, &self.config.trend),
            count: history.len(),
            first_analysis: history.first().map(|r| r.timestamp),
            last_analysis: history.last().map(|r| r.timestamp),
        })
    }

    /// Outlier-trimmed, unweighted profile
    ///
    /// Each range pools the lower and upper bounds of every record, trims
    /// the pool by IQR and reports its span. The stability ranges pool only
    /// records whose range is known.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::InvalidRecord` for a malformed history.
    pub fn robust_profile(
        &self,
        records: &[AnalysisRecord],
        window_days: Option<u32>,
        now: DateTime<Utc>,
    ) -> Result<RobustProfile, ProfileError> {
        let history = prepare_history(records, window_days, now)?;
        if history.is_empty() {
            log::warn!("No records for robust accumulation, returning empty profile");
            return Ok(RobustProfile::empty());
        }

        let scores: Vec<f64> = history
            .iter()
            .map(|r| r.stability_metrics.stability_score)
            .collect();
        let avg_stability = mean(&iqr_trim(&scores));

        let profile = RobustProfile {
            total_range: self.pooled_span(&all_ranges(&history, |r| &r.total_range)),
            comfortable_range: self.pooled_span(&all_ranges(&history, |r| &r.comfortable_range)),
            core_range: self.pooled_span(&all_ranges(&history, |r| &r.core_range)),
            stability_comfortable_range: self
                .pooled_span(&known_ranges(&history, |r| &r.stability_comfortable_range)),
            stability_core_range: self
                .pooled_span(&known_ranges(&history, |r| &r.stability_core_range)),
            avg_stability,
            stability_trend: stability_trend(&scores, &self.config.trend),
            stability_rating: Some(self.classifier.rate_stability_score(avg_stability)),
            measurement: measurement_confidence(history.len()),
            count: history.len(),
            first_analysis: history.first().map(|r| r.timestamp),
            last_analysis: history.last().map(|r| r.timestamp),
        };

        log::debug!(
            "Robust profile over {} records: total {:.1}-{:.1} Hz, stability {:.2} ({})",
            profile.count,
            profile.total_range.min_freq,
            profile.total_range.max_freq,
            profile.avg_stability,
            profile.measurement.level
        );
        Ok(profile)
    }

    /// Chronological range timeline and width trend
    pub fn range_progress(
        &self,
        records: &[AnalysisRecord],
        window_days: Option<u32>,
        now: DateTime<Utc>,
    ) -> Result<RangeProgress, ProfileError> {
        let history = prepare_history(records, window_days, now)?;
        Ok(range_progress(&history, &self.config.trend))
    }

    /// Per-song summaries in order of first recording
    pub fn song_summaries(
        &self,
        records: &[AnalysisRecord],
        window_days: Option<u32>,
        now: DateTime<Utc>,
    ) -> Result<Vec<SongSummary>, ProfileError> {
        let history = prepare_history(records, window_days, now)?;
        Ok(song_summaries(&history))
    }

    /// Suggested weighting strategy for a history of `count` records
    pub fn recommend_strategy(&self, count: usize) -> StrategyRecommendation {
        recommend_strategy(count, &self.config.weighting)
    }

    fn ages(&self, history: &[AnalysisRecord], now: DateTime<Utc>) -> Vec<f64> {
        history
            .iter()
            .map(|r| days_ago(r.timestamp, now) as f64)
            .collect()
    }

    /// Span of the IQR-trimmed pool of lower and upper bounds
    fn pooled_span(&self, ranges: &[&FrequencyRange]) -> FrequencyRange {
        if ranges.is_empty() {
            return FrequencyRange::unknown();
        }
        let bounds: Vec<f64> = ranges
            .iter()
            .map(|r| r.min_freq)
            .chain(ranges.iter().map(|r| r.max_freq))
            .collect();
        let (lo, hi) = min_max(&iqr_trim(&bounds));
        FrequencyRange::new(lo, hi, &self.notes)
    }
}

fn all_ranges<'a>(
    history: &'a [AnalysisRecord],
    pick: fn(&AnalysisRecord) -> &FrequencyRange,
) -> Vec<&'a FrequencyRange> {
    history.iter().map(pick).collect()
}

/// Stability ranges of records where one was found
fn known_ranges<'a>(
    history: &'a [AnalysisRecord],
    pick: fn(&AnalysisRecord) -> &StabilityRange,
) -> Vec<&'a FrequencyRange> {
    history
        .iter()
        .map(|r| &pick(r).range)
        .filter(|range| range.min_freq > 0.0)
        .collect()
}
