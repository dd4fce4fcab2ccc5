//! Record weighting strategies
//!
//! Every strategy implements [`WeightStrategy`]: it maps a history to one
//! weight per record, in input order, against an explicit "now". Weights are
//! recomputed on every aggregation and never persisted.
//!
//! | strategy    | weight                                                   |
//! |-------------|----------------------------------------------------------|
//! | `time`      | `max(floor, exp(−days_ago / 30))`                        |
//! | `stability` | `max(floor, 1 / (1 + exp(0.1 · (score − 30))))`          |
//! | `duration`  | `clamp(duration_s / 30, 0.3, 2.0)`                       |
//! | `composite` | `0.4·time + 0.4·stability + 0.2·duration`                |
//! | `adaptive`  | uniform (≤ 3 records), stability (≤ 7), composite (more) |
//!
//! [`BlendedSessionWeight`] is the recency/stability/position/quality blend
//! used by the weighted-average profile.
//!
//! # Example
//!
//! ```
//! use vocal_profile::accumulation::weighting::WeightingStrategy;
//!
//! let strategy: WeightingStrategy = "Composite".parse()?;
//! assert_eq!(strategy, WeightingStrategy::Composite);
//! assert!("median".parse::<WeightingStrategy>().is_err());
//! # Ok::<(), vocal_profile::ProfileError>(())
//! ```

use super::history::days_ago;
use crate::analysis::result::AnalysisRecord;
use crate::config::{SessionWeightConfig, WeightingConfig};
use crate::error::ProfileError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Assigns a positive weight to every record of a history
pub trait WeightStrategy {
    /// Strategy name for logs and reports
    fn name(&self) -> &'static str;

    /// One weight per record, in input order, each ≥ the strategy's floor
    fn compute(&self, records: &[AnalysisRecord], now: DateTime<Utc>) -> Vec<f64>;
}

/// Recency only: exponential decay with age
#[derive(Debug, Clone)]
pub struct TimeDecay {
    /// Decay constant in days
    pub scale_days: f64,
    /// Smallest weight handed out
    pub floor: f64,
}

impl WeightStrategy for TimeDecay {
    fn name(&self) -> &'static str {
        "time"
    }

    fn compute(&self, records: &[AnalysisRecord], now: DateTime<Utc>) -> Vec<f64> {
        if records.len() <= 1 {
            return vec![1.0; records.len()];
        }
        records
            .iter()
            .map(|r| {
                let days = days_ago(r.timestamp, now) as f64;
                (-days / self.scale_days).exp().max(self.floor)
            })
            .collect()
    }
}

/// Steadiness only: a sigmoid falling as the stability score rises
#[derive(Debug, Clone)]
pub struct StabilitySigmoid {
    /// Score at which the weight is 0.5
    pub center: f64,
    /// Slope per score point
    pub steepness: f64,
    /// Smallest weight handed out
    pub floor: f64,
}

impl StabilitySigmoid {
    fn weight(&self, stability_score: f64) -> f64 {
        let w = 1.0 / (1.0 + (self.steepness * (stability_score - self.center)).exp());
        w.max(self.floor)
    }
}

impl WeightStrategy for StabilitySigmoid {
    fn name(&self) -> &'static str {
        "stability"
    }

    fn compute(&self, records: &[AnalysisRecord], _now: DateTime<Utc>) -> Vec<f64> {
        records
            .iter()
            .map(|r| self.weight(r.stability_metrics.stability_score))
            .collect()
    }
}

/// Recording length relative to a reference, clamped
#[derive(Debug, Clone)]
pub struct DurationWeight {
    /// Length in seconds that maps to 1.0
    pub reference_s: f64,
    /// Lower clamp
    pub min_weight: f64,
    /// Upper clamp
    pub max_weight: f64,
}

impl WeightStrategy for DurationWeight {
    fn name(&self) -> &'static str {
        "duration"
    }

    fn compute(&self, records: &[AnalysisRecord], _now: DateTime<Utc>) -> Vec<f64> {
        records
            .iter()
            .map(|r| (r.duration_s / self.reference_s).clamp(self.min_weight, self.max_weight))
            .collect()
    }
}

/// Fixed mix of time, stability and duration weights
#[derive(Debug, Clone)]
pub struct CompositeWeight {
    /// Recency component
    pub time: TimeDecay,
    /// Steadiness component
    pub stability: StabilitySigmoid,
    /// Length component
    pub duration: DurationWeight,
    /// Shares of time, stability and duration
    pub shares: [f64; 3],
}

impl WeightStrategy for CompositeWeight {
    fn name(&self) -> &'static str {
        "composite"
    }

    fn compute(&self, records: &[AnalysisRecord], now: DateTime<Utc>) -> Vec<f64> {
        let time = self.time.compute(records, now);
        let stability = self.stability.compute(records, now);
        let duration = self.duration.compute(records, now);
        let [t, s, d] = self.shares;
        time.iter()
            .zip(&stability)
            .zip(&duration)
            .map(|((tw, sw), dw)| t * tw + s * sw + d * dw)
            .collect()
    }
}

/// Picks a strategy by history size
///
/// Small histories weigh every record equally, medium ones by stability and
/// large ones by the composite mix.
#[derive(Debug, Clone)]
pub struct AdaptiveSelect {
    /// Histories up to this size are weighted uniformly
    pub uniform_max: usize,
    /// Histories up to this size use the stability strategy
    pub stability_max: usize,
    /// Composite used for large histories (its stability part serves medium ones)
    pub composite: CompositeWeight,
}

impl WeightStrategy for AdaptiveSelect {
    fn name(&self) -> &'static str {
        "adaptive"
    }

    fn compute(&self, records: &[AnalysisRecord], now: DateTime<Utc>) -> Vec<f64> {
        let n = records.len();
        if n <= self.uniform_max {
            log::debug!("Adaptive weighting: uniform for {} records", n);
            vec![1.0; n]
        } else if n <= self.stability_max {
            log::debug!("Adaptive weighting: stability for {} records", n);
            self.composite.stability.compute(records, now)
        } else {
            log::debug!("Adaptive weighting: composite for {} records", n);
            self.composite.compute(records, now)
        }
    }
}

/// Selectable weighting strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightingStrategy {
    /// Recency only
    Time,
    /// Steadiness only
    Stability,
    /// Recording length only
    Duration,
    /// Fixed mix of time, stability and duration
    Composite,
    /// Chosen by history size
    Adaptive,
}

impl WeightingStrategy {
    /// Every strategy, in declaration order
    pub const ALL: [WeightingStrategy; 5] = [
        WeightingStrategy::Time,
        WeightingStrategy::Stability,
        WeightingStrategy::Duration,
        WeightingStrategy::Composite,
        WeightingStrategy::Adaptive,
    ];

    /// Canonical lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            WeightingStrategy::Time => "time",
            WeightingStrategy::Stability => "stability",
            WeightingStrategy::Duration => "duration",
            WeightingStrategy::Composite => "composite",
            WeightingStrategy::Adaptive => "adaptive",
        }
    }

    /// Instantiate the strategy with the given parameters
    pub fn build(&self, config: &WeightingConfig) -> Box<dyn WeightStrategy> {
        match self {
            WeightingStrategy::Time => Box::new(time_decay(config)),
            WeightingStrategy::Stability => Box::new(stability_sigmoid(config)),
            WeightingStrategy::Duration => Box::new(duration_weight(config)),
            WeightingStrategy::Composite => Box::new(composite(config)),
            WeightingStrategy::Adaptive => Box::new(AdaptiveSelect {
                uniform_max: config.adaptive_uniform_max,
                stability_max: config.adaptive_stability_max,
                composite: composite(config),
            }),
        }
    }
}

impl fmt::Display for WeightingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeightingStrategy {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        WeightingStrategy::ALL
            .iter()
            .copied()
            .find(|strategy| strategy.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                log::warn!("Rejecting unknown weighting strategy {:?}", s);
                ProfileError::UnknownStrategy(s.to_string())
            })
    }
}

fn time_decay(config: &WeightingConfig) -> TimeDecay {
    TimeDecay {
        scale_days: config.time_scale_days,
        floor: config.time_floor,
    }
}

fn stability_sigmoid(config: &WeightingConfig) -> StabilitySigmoid {
    StabilitySigmoid {
        center: config.stability_center,
        steepness: config.stability_steepness,
        floor: config.stability_floor,
    }
}

fn duration_weight(config: &WeightingConfig) -> DurationWeight {
    DurationWeight {
        reference_s: config.duration_reference_s,
        min_weight: config.duration_min_weight,
        max_weight: config.duration_max_weight,
    }
}

fn composite(config: &WeightingConfig) -> CompositeWeight {
    CompositeWeight {
        time: time_decay(config),
        stability: stability_sigmoid(config),
        duration: duration_weight(config),
        shares: [
            config.composite_time,
            config.composite_stability,
            config.composite_duration,
        ],
    }
}

/// Components of one blended session weight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionWeight {
    /// `0.5 ^ (days_ago / half_life)`
    pub time_weight: f64,
    /// `max(0.1, 1 − stability_score / 100)`
    pub stability_weight: f64,
    /// `1 / (1 + 0.1 · position)` with position 0 = newest
    pub frequency_weight: f64,
    /// Mean of the jitter and shimmer quality terms
    pub quality_weight: f64,
    /// Floored weighted sum of the four components
    pub combined: f64,
}

/// Recency, stability, history position and quality blended per session
#[derive(Debug, Clone)]
pub struct BlendedSessionWeight {
    config: SessionWeightConfig,
}

impl BlendedSessionWeight {
    /// Blend with the given parameters
    pub fn new(config: SessionWeightConfig) -> Self {
        Self { config }
    }

    /// Full breakdown per record, in input order
    ///
    /// Position in history is the record's rank when sorted newest first
    /// (ties keep input order).
    pub fn components(&self, records: &[AnalysisRecord], now: DateTime<Utc>) -> Vec<SessionWeight> {
        let c = &self.config;

        let mut newest_first: Vec<usize> = (0..records.len()).collect();
        newest_first.sort_by(|&a, &b| records[b].timestamp.cmp(&records[a].timestamp));
        let mut position = vec![0usize; records.len()];
        for (rank, &idx) in newest_first.iter().enumerate() {
            position[idx] = rank;
        }

        records
            .iter()
            .zip(&position)
            .map(|(record, &pos)| {
                let days = days_ago(record.timestamp, now) as f64;
                let m = &record.stability_metrics;

                let time_weight = 0.5f64.powf(days / c.half_life_days);
                let stability_weight = (1.0 - m.stability_score / 100.0).max(c.component_floor);
                let frequency_weight = 1.0 / (1.0 + c.position_decay * pos as f64);
                let jitter_term =
                    (1.0 - m.jitter_pct / c.jitter_reference).max(c.component_floor);
                let shimmer_term =
                    (1.0 - m.shimmer_pct / c.shimmer_reference).max(c.component_floor);
                let quality_weight = (jitter_term + shimmer_term) / 2.0;

                let combined = (c.time_share * time_weight
                    + c.stability_share * stability_weight
                    + c.position_share * frequency_weight
                    + c.quality_share * quality_weight)
                    .max(c.floor);

                SessionWeight {
                    time_weight,
                    stability_weight,
                    frequency_weight,
                    quality_weight,
                    combined,
                }
            })
            .collect()
    }
}

impl WeightStrategy for BlendedSessionWeight {
    fn name(&self) -> &'static str {
        "session"
    }

    fn compute(&self, records: &[AnalysisRecord], now: DateTime<Utc>) -> Vec<f64> {
        self.components(records, now)
            .into_iter()
            .map(|w| w.combined)
            .collect()
    }
}

/// Scale weights to sum to 1
///
/// A non-positive or non-finite total falls back to uniform weights.
pub fn normalize(weights: &[f64]) -> Vec<f64> {
    let total: f64 = weights.iter().sum();
    if weights.is_empty() {
        return Vec::new();
    }
    if total <= 0.0 || !total.is_finite() {
        log::warn!("Weights sum to {}, falling back to uniform", total);
        return vec![1.0 / weights.len() as f64; weights.len()];
    }
    weights.iter().map(|w| w / total).collect()
}

/// A suggested strategy with its rationale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyAlternative {
    /// Suggested strategy
    pub strategy: WeightingStrategy,
    /// When to prefer it
    pub reason: String,
}

/// Recommended weighting strategy for a history size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyRecommendation {
    /// Always [`WeightingStrategy::Adaptive`]
    pub primary: WeightingStrategy,
    /// Why the primary is recommended
    pub reason: String,
    /// Situational alternatives
    pub alternatives: Vec<StrategyAlternative>,
    /// History size the recommendation is for
    pub current_analyses: usize,
}

/// Recommend a strategy for a history of `count` records
pub fn recommend_strategy(count: usize, config: &WeightingConfig) -> StrategyRecommendation {
    let alt = |strategy, reason: &str| StrategyAlternative {
        strategy,
        reason: reason.to_string(),
    };

    let (reason, alternatives) = if count == 0 {
        (
            "First recording: start with the adaptive strategy".to_string(),
            Vec::new(),
        )
    } else {
        let alternatives = if count <= config.adaptive_uniform_max {
            vec![
                alt(WeightingStrategy::Composite, "for a balanced view from the start"),
                alt(WeightingStrategy::Stability, "to trust only the steadiest recordings"),
            ]
        } else if count <= config.adaptive_stability_max {
            vec![
                alt(WeightingStrategy::Stability, "to emphasise steadiness further"),
                alt(WeightingStrategy::Time, "to reflect recent growth"),
            ]
        } else {
            vec![
                alt(WeightingStrategy::Composite, "for one consistent mixed strategy"),
                alt(WeightingStrategy::Time, "to emphasise recent improvement"),
                alt(WeightingStrategy::Stability, "to favour the steadiest recordings"),
            ]
        };
        (
            "Adapts automatically to the number of recordings".to_string(),
            alternatives,
        )
    };

    StrategyRecommendation {
        primary: WeightingStrategy::Adaptive,
        reason,
        alternatives,
        current_analyses: count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{day, now, record};

    fn three_sessions() -> Vec<AnalysisRecord> {
        // 0, 30 and 60 days ago with stability scores 10, 50, 90
        vec![
            record(day(100), (200.0, 400.0), 10.0),
            record(day(70), (200.0, 400.0), 50.0),
            record(day(40), (200.0, 400.0), 90.0),
        ]
    }

    #[test]
    fn test_parse_strategy() {
        assert_eq!("time".parse::<WeightingStrategy>().unwrap(), WeightingStrategy::Time);
        assert_eq!(" ADAPTIVE ".parse::<WeightingStrategy>().unwrap(), WeightingStrategy::Adaptive);
        for strategy in WeightingStrategy::ALL {
            assert_eq!(strategy.to_string().parse::<WeightingStrategy>().unwrap(), strategy);
        }
        assert!(matches!(
            "equal".parse::<WeightingStrategy>(),
            Err(ProfileError::UnknownStrategy(_))
        ));
    }

    #[test]
    fn test_time_strategy_decreases_with_age() {
        let weights = WeightingStrategy::Time
            .build(&WeightingConfig::default())
            .compute(&three_sessions(), now());
        assert_eq!(weights[0], 1.0);
        assert!(weights[0] > weights[1] && weights[1] > weights[2]);
        assert!((weights[1] - (-1.0f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn test_time_strategy_single_record() {
        let weights = WeightingStrategy::Time
            .build(&WeightingConfig::default())
            .compute(&three_sessions()[2..], now());
        assert_eq!(weights, vec![1.0]);
    }

    #[test]
    fn test_stability_strategy_decreases_with_score() {
        let weights = WeightingStrategy::Stability
            .build(&WeightingConfig::default())
            .compute(&three_sessions(), now());
        assert!(weights[0] > weights[1] && weights[1] > weights[2]);
        assert!((weights[0] - 1.0 / (1.0 + (-2.0f64).exp())).abs() < 1e-12);
        assert!((weights[2] - 1.0 / (1.0 + 6.0f64.exp())).abs() < 1e-12);
    }

    #[test]
    fn test_stability_strategy_separates_steady_scores() {
        let records: Vec<AnalysisRecord> = [60.0, 70.0, 90.0, 150.0]
            .iter()
            .map(|&score| record(day(100), (200.0, 400.0), score))
            .collect();
        let weights = WeightingStrategy::Stability
            .build(&WeightingConfig::default())
            .compute(&records, now());
        for pair in weights.windows(2) {
            assert!(pair[0] > pair[1], "weights not strictly decreasing: {:?}", weights);
        }
    }

    #[test]
    fn test_duration_strategy_clamped() {
        let mut records = three_sessions();
        records[0].duration_s = 3.0;
        records[1].duration_s = 45.0;
        records[2].duration_s = 600.0;
        let weights = WeightingStrategy::Duration
            .build(&WeightingConfig::default())
            .compute(&records, now());
        assert_eq!(weights, vec![0.3, 1.5, 2.0]);
    }

    #[test]
    fn test_composite_mix() {
        let config = WeightingConfig::default();
        let records = three_sessions();
        let time = WeightingStrategy::Time.build(&config).compute(&records, now());
        let stability = WeightingStrategy::Stability.build(&config).compute(&records, now());
        let duration = WeightingStrategy::Duration.build(&config).compute(&records, now());
        let composite = WeightingStrategy::Composite.build(&config).compute(&records, now());
        for i in 0..records.len() {
            let expected = 0.4 * time[i] + 0.4 * stability[i] + 0.2 * duration[i];
            assert!((composite[i] - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_adaptive_selects_by_size() {
        let config = WeightingConfig::default();
        let adaptive = WeightingStrategy::Adaptive.build(&config);
        let stability = WeightingStrategy::Stability.build(&config);
        let composite = WeightingStrategy::Composite.build(&config);

        let records: Vec<AnalysisRecord> = (0..10)
            .map(|i| record(day(i * 9), (200.0, 400.0), 5.0 + 9.0 * i as f64))
            .collect();

        assert_eq!(adaptive.compute(&records[..3], now()), vec![1.0; 3]);
        assert_eq!(
            adaptive.compute(&records[..5], now()),
            stability.compute(&records[..5], now())
        );
        assert_eq!(adaptive.compute(&records, now()), composite.compute(&records, now()));
        assert_eq!(adaptive.name(), "adaptive");
    }

    #[test]
    fn test_session_weights_components() {
        let blend = BlendedSessionWeight::new(SessionWeightConfig::default());
        // Input is oldest first; positions count from the newest
        let mut records = three_sessions();
        records.reverse();
        let weights = blend.components(&records, now());

        let newest = &weights[2];
        assert_eq!(newest.time_weight, 1.0);
        assert_eq!(newest.frequency_weight, 1.0);
        assert!((newest.stability_weight - 0.9).abs() < 1e-12);
        assert!((weights[1].time_weight - 0.5).abs() < 1e-12);
        assert!((weights[1].frequency_weight - 1.0 / 1.1).abs() < 1e-12);
        assert!((weights[0].time_weight - 0.25).abs() < 1e-12);
        assert!((weights[0].stability_weight - 0.1).abs() < 1e-12);

        // jitter 1, shimmer 2 -> (0.9 + 0.9) / 2
        assert!((newest.quality_weight - 0.9).abs() < 1e-12);
        let expected = 0.3 * 1.0 + 0.25 * 0.9 + 0.2 * 1.0 + 0.25 * 0.9;
        assert!((newest.combined - expected).abs() < 1e-12);
        assert!(weights.iter().all(|w| w.combined >= 0.05));
    }

    #[test]
    fn test_weights_have_floor() {
        let config = WeightingConfig::default();
        let mut ancient = record(day(0), (200.0, 400.0), 500.0);
        ancient.timestamp = now() - chrono::Duration::days(5000);
        ancient.stability_metrics.jitter_pct = 90.0;
        ancient.stability_metrics.shimmer_pct = 90.0;
        let records = vec![ancient, record(day(100), (200.0, 400.0), 10.0)];

        for strategy in WeightingStrategy::ALL {
            let weights = strategy.build(&config).compute(&records, now());
            assert!(weights.iter().all(|&w| w > 0.0), "{} produced a zero weight", strategy);
        }
        let blended = BlendedSessionWeight::new(config.session.clone()).compute(&records, now());
        assert!(blended.iter().all(|&w| w >= 0.05));
    }

    #[test]
    fn test_normalize() {
        let normalized = normalize(&[1.0, 3.0]);
        assert_eq!(normalized, vec![0.25, 0.75]);
        assert_eq!(normalize(&[0.0, 0.0]), vec![0.5, 0.5]);
        assert!(normalize(&[]).is_empty());
    }

    #[test]
    fn test_recommendation_alternatives() {
        let config = WeightingConfig::default();
        assert!(recommend_strategy(0, &config).alternatives.is_empty());
        assert_eq!(recommend_strategy(2, &config).alternatives.len(), 2);
        assert_eq!(
            recommend_strategy(6, &config).alternatives[1].strategy,
            WeightingStrategy::Time
        );
        let many = recommend_strategy(12, &config);
        assert_eq!(many.primary, WeightingStrategy::Adaptive);
        assert_eq!(many.alternatives.len(), 3);
        assert_eq!(many.current_analyses, 12);
    }
}
