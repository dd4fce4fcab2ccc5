//! Configuration parameters for recording analysis and profile accumulation
//!
//! Every constant used by the segmenter, the stability metrics, the rating
//! classifier and the aggregator lives here so tests and callers can swap in
//! alternate tuning. All structs deserialize with `#[serde(default)]`, so a
//! TOML document only needs to name the values it overrides.
//!
//! # Example
//!
//! ```
//! use vocal_profile::AnalysisConfig;
//!
//! let config = AnalysisConfig::from_toml_str(r#"
//!     sample_rate = 44100
//!
//!     [segmentation]
//!     bin_count = 40
//! "#)?;
//!
//! assert_eq!(config.sample_rate, 44100);
//! assert_eq!(config.hop_length, 512);
//! assert_eq!(config.segmentation.bin_count, 40);
//! # Ok::<(), vocal_profile::ProfileError>(())
//! ```

use crate::error::ProfileError;
use serde::{Deserialize, Serialize};

/// Per-recording analysis configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Sample rate of the audio the F0 series was extracted from (default: 22050)
    ///
    /// Only used to convert an autocorrelation lag into a vibrato rate.
    pub sample_rate: u32,

    /// Hop length in samples between F0 frames (default: 512)
    pub hop_length: usize,

    /// Optional moving-average window applied to voiced frames before analysis
    ///
    /// `None` (default) means the series is consumed as delivered.
    pub smoothing_window: Option<usize>,

    /// Range segmentation parameters
    pub segmentation: SegmentationConfig,

    /// Jitter/shimmer/vibrato parameters
    pub stability: StabilityConfig,

    /// Rating lookup tables
    pub rating: RatingThresholds,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sample_rate: 22050,
            hop_length: 512,
            smoothing_window: None,
            segmentation: SegmentationConfig::default(),
            stability: StabilityConfig::default(),
            rating: RatingThresholds::default(),
        }
    }
}

impl AnalysisConfig {
    /// Parse a (possibly partial) TOML document and validate it
    pub fn from_toml_str(source: &str) -> Result<Self, ProfileError> {
        let config: Self =
            toml::from_str(source).map_err(|e| ProfileError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check parameter sanity
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.sample_rate == 0 {
            return Err(ProfileError::Config("sample_rate must be > 0".to_string()));
        }
        if self.hop_length == 0 {
            return Err(ProfileError::Config("hop_length must be > 0".to_string()));
        }
        if self.smoothing_window == Some(0) {
            return Err(ProfileError::Config(
                "smoothing_window must be >= 1 when set".to_string(),
            ));
        }
        self.segmentation.validate()?;
        if self.stability.vibrato_max_lag < 2 {
            return Err(ProfileError::Config(
                "vibrato_max_lag must be >= 2".to_string(),
            ));
        }
        Ok(())
    }
}

/// Histogram-based range segmentation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Number of equal-width bins for stability ranges (default: 30)
    pub bin_count: usize,

    /// A bin is scored only if it holds strictly more samples than this (default: 5)
    pub min_bin_samples: usize,

    /// Below this many valid samples the stability ranges are zeroed (default: 10)
    pub min_valid_samples: usize,

    /// Minimum bin stability score for the comfortable range (default: 70)
    pub comfortable_threshold: f64,

    /// Minimum share of all valid samples a comfortable bin must hold (default: 0.01)
    pub comfortable_min_share: f64,

    /// Minimum bin stability score for the core range (default: 85)
    pub core_threshold: f64,

    /// Minimum usage ratio in percent for a core bin (default: 2.0)
    pub core_min_usage_pct: f64,

    /// Comfortable fallback keeps the top `1/divisor` of ranked bins (default: 3)
    pub comfortable_fallback_divisor: usize,

    /// Core fallback keeps the top `1/divisor` of ranked bins (default: 5)
    pub core_fallback_divisor: usize,

    /// Number of bins for the coarse stability overview (default: 20)
    pub overview_bin_count: usize,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            bin_count: 30,
            min_bin_samples: 5,
            min_valid_samples: 10,
            comfortable_threshold: 70.0,
            comfortable_min_share: 0.01,
            core_threshold: 85.0,
            core_min_usage_pct: 2.0,
            comfortable_fallback_divisor: 3,
            core_fallback_divisor: 5,
            overview_bin_count: 20,
        }
    }
}

impl SegmentationConfig {
    fn validate(&self) -> Result<(), ProfileError> {
        if self.bin_count == 0 || self.overview_bin_count == 0 {
            return Err(ProfileError::Config("bin counts must be > 0".to_string()));
        }
        if self.comfortable_fallback_divisor == 0 || self.core_fallback_divisor == 0 {
            return Err(ProfileError::Config(
                "fallback divisors must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Jitter, shimmer and vibrato parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilityConfig {
    /// Vibrato is searched only with at least this many valid samples (default: 100)
    pub vibrato_min_samples: usize,

    /// Largest autocorrelation lag (exclusive) scanned for a vibrato period (default: 50)
    pub vibrato_max_lag: usize,
}

impl Default for StabilityConfig {
    fn default() -> Self {
        Self {
            vibrato_min_samples: 100,
            vibrato_max_lag: 50,
        }
    }
}

/// Lookup tables for the stability rating
///
/// Each `*_bounds` array holds the exclusive upper bounds for sub-scores
/// 5, 4, 3 and 2; anything at or above the last bound scores 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingThresholds {
    /// Jitter (%) bounds (default: 1, 2, 5, 8)
    pub jitter_bounds: [f64; 4],

    /// Shimmer (%) bounds (default: 3, 6, 12, 20)
    pub shimmer_bounds: [f64; 4],

    /// Stability score bounds (default: 15, 25, 40, 60)
    pub stability_bounds: [f64; 4],

    /// Weight of the jitter sub-score (default: 0.3)
    pub jitter_weight: f64,

    /// Weight of the shimmer sub-score (default: 0.3)
    pub shimmer_weight: f64,

    /// Weight of the stability sub-score (default: 0.4)
    pub stability_weight: f64,

    /// Minimum totals for very stable, stable, moderate, slightly unstable
    /// (default: 4.5, 3.5, 2.5, 1.5)
    pub label_cutoffs: [f64; 4],
}

impl Default for RatingThresholds {
    fn default() -> Self {
        Self {
            jitter_bounds: [1.0, 2.0, 5.0, 8.0],
            shimmer_bounds: [3.0, 6.0, 12.0, 20.0],
            stability_bounds: [15.0, 25.0, 40.0, 60.0],
            jitter_weight: 0.3,
            shimmer_weight: 0.3,
            stability_weight: 0.4,
            label_cutoffs: [4.5, 3.5, 2.5, 1.5],
        }
    }
}

/// Cross-session aggregation configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    /// Weighting strategy parameters
    pub weighting: WeightingConfig,

    /// Trend classification parameters
    pub trend: TrendConfig,
}

impl AggregationConfig {
    /// Parse a (possibly partial) TOML document and validate it
    pub fn from_toml_str(source: &str) -> Result<Self, ProfileError> {
        let config: Self =
            toml::from_str(source).map_err(|e| ProfileError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check parameter sanity
    pub fn validate(&self) -> Result<(), ProfileError> {
        self.weighting.validate()?;
        if self.trend.window == 0 {
            return Err(ProfileError::Config("trend window must be > 0".to_string()));
        }
        Ok(())
    }
}

/// Parameters of the record weighting strategies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightingConfig {
    /// Time strategy decay constant in days: `exp(-days / scale)` (default: 30)
    pub time_scale_days: f64,

    /// Smallest weight the time strategy hands out (default: 0.001)
    pub time_floor: f64,

    /// Stability score at which the stability sigmoid crosses 0.5 (default: 30)
    pub stability_center: f64,

    /// Sigmoid steepness per stability point (default: 0.1)
    pub stability_steepness: f64,

    /// Underflow guard for the stability sigmoid (default: 1e-6)
    pub stability_floor: f64,

    /// Recording length that maps to weight 1.0 (default: 30 s)
    pub duration_reference_s: f64,

    /// Duration weight clamp, lower bound (default: 0.3)
    pub duration_min_weight: f64,

    /// Duration weight clamp, upper bound (default: 2.0)
    pub duration_max_weight: f64,

    /// Composite mix: time share (default: 0.4)
    pub composite_time: f64,

    /// Composite mix: stability share (default: 0.4)
    pub composite_stability: f64,

    /// Composite mix: duration share (default: 0.2)
    pub composite_duration: f64,

    /// Adaptive selector: histories up to this size weigh uniformly (default: 3)
    pub adaptive_uniform_max: usize,

    /// Adaptive selector: histories up to this size use the stability strategy (default: 7)
    pub adaptive_stability_max: usize,

    /// Blended per-session weights used by the weighted-average profile
    pub session: SessionWeightConfig,
}

impl Default for WeightingConfig {
    fn default() -> Self {
        Self {
            time_scale_days: 30.0,
            time_floor: 1e-3,
            stability_center: 30.0,
            stability_steepness: 0.1,
            stability_floor: 1e-6,
            duration_reference_s: 30.0,
            duration_min_weight: 0.3,
            duration_max_weight: 2.0,
            composite_time: 0.4,
            composite_stability: 0.4,
            composite_duration: 0.2,
            adaptive_uniform_max: 3,
            adaptive_stability_max: 7,
            session: SessionWeightConfig::default(),
        }
    }
}

impl WeightingConfig {
    fn validate(&self) -> Result<(), ProfileError> {
        if self.time_scale_days <= 0.0 || self.duration_reference_s <= 0.0 {
            return Err(ProfileError::Config(
                "time scale and duration reference must be > 0".to_string(),
            ));
        }
        if self.time_floor <= 0.0 || self.stability_floor <= 0.0 || self.session.floor <= 0.0 {
            return Err(ProfileError::Config("weight floors must be > 0".to_string()));
        }
        if self.duration_min_weight <= 0.0 || self.duration_min_weight > self.duration_max_weight
        {
            return Err(ProfileError::Config(format!(
                "invalid duration clamp [{}, {}]",
                self.duration_min_weight, self.duration_max_weight
            )));
        }
        if self.adaptive_uniform_max > self.adaptive_stability_max {
            return Err(ProfileError::Config(
                "adaptive_uniform_max must not exceed adaptive_stability_max".to_string(),
            ));
        }
        if self.session.half_life_days <= 0.0 {
            return Err(ProfileError::Config(
                "session half_life_days must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Blended per-session weight: recency, stability, history position and quality
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionWeightConfig {
    /// Recency half-life in days (default: 30)
    pub half_life_days: f64,

    /// Decay per position in the newest-first history (default: 0.1)
    pub position_decay: f64,

    /// Jitter (%) at which the jitter quality term bottoms out (default: 10)
    pub jitter_reference: f64,

    /// Shimmer (%) at which the shimmer quality term bottoms out (default: 20)
    pub shimmer_reference: f64,

    /// Lower bound of the stability and quality terms (default: 0.1)
    pub component_floor: f64,

    /// Share of the recency term (default: 0.3)
    pub time_share: f64,

    /// Share of the stability term (default: 0.25)
    pub stability_share: f64,

    /// Share of the position term (default: 0.2)
    pub position_share: f64,

    /// Share of the quality term (default: 0.25)
    pub quality_share: f64,

    /// Smallest combined weight (default: 0.05)
    pub floor: f64,
}

impl Default for SessionWeightConfig {
    fn default() -> Self {
        Self {
            half_life_days: 30.0,
            position_decay: 0.1,
            jitter_reference: 10.0,
            shimmer_reference: 20.0,
            component_floor: 0.1,
            time_share: 0.3,
            stability_share: 0.25,
            position_share: 0.2,
            quality_share: 0.25,
            floor: 0.05,
        }
    }
}

/// Stability trend and range progress thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendConfig {
    /// Number of records per comparison window (default: 3)
    pub window: usize,

    /// Delta above which the trend is "much improved" (default: 5)
    pub much_improved: f64,

    /// Delta above which the trend is "improved" (default: 2)
    pub improved: f64,

    /// Delta above which the trend is "stable" (default: -2)
    pub stable_floor: f64,

    /// Delta above which the trend is "slightly declining" (default: -5)
    pub slight_decline_floor: f64,

    /// Total-range width change in Hz that counts as expansion/contraction (default: 50)
    pub range_change_hz: f64,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            window: 3,
            much_improved: 5.0,
            improved: 2.0,
            stable_floor: -2.0,
            slight_decline_floor: -5.0,
            range_change_hz: 50.0,
        }
    }
}
