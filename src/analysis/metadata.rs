//! Analysis metadata structures

use serde::{Deserialize, Serialize};

/// Voice ratio below which a recording is flagged as mostly unvoiced
pub const LOW_VOICE_RATIO: f64 = 0.3;

/// Analysis flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisFlag {
    /// Less than 30% of the frames are voiced
    LowVoiceRatio,
    /// No histogram bin qualified, stability ranges are zeroed
    StabilityRangesUnavailable,
    /// Too few voiced frames for vibrato detection
    VibratoSkipped,
    /// Voiced frames were smoothed before analysis
    Smoothed,
}

/// Analysis metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    /// Algorithm version
    pub algorithm_version: String,

    /// Wall-clock processing time in milliseconds
    pub processing_time_ms: f64,

    /// Frames in the input series
    pub total_frames: usize,

    /// Voiced frames used for analysis
    pub voiced_frames: usize,

    /// Sample rate used for the vibrato rate
    pub sample_rate: u32,

    /// Hop length used for the vibrato rate
    pub hop_length: usize,

    /// Analysis flags
    pub flags: Vec<AnalysisFlag>,

    /// Human-readable warnings
    pub warnings: Vec<String>,
}

impl Default for AnalysisMetadata {
    fn default() -> Self {
        Self {
            algorithm_version: env!("CARGO_PKG_VERSION").to_string(),
            processing_time_ms: 0.0,
            total_frames: 0,
            voiced_frames: 0,
            sample_rate: 0,
            hop_length: 0,
            flags: vec![],
            warnings: vec![],
        }
    }
}

impl AnalysisMetadata {
    /// Record a flag together with its warning text
    pub fn flag(&mut self, flag: AnalysisFlag, warning: impl Into<String>) {
        if !self.flags.contains(&flag) {
            self.flags.push(flag);
        }
        self.warnings.push(warning.into());
    }

    /// True if `flag` was raised
    pub fn has_flag(&self, flag: AnalysisFlag) -> bool {
        self.flags.contains(&flag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_version() {
        let metadata = AnalysisMetadata::default();
        assert_eq!(metadata.algorithm_version, env!("CARGO_PKG_VERSION"));
        assert!(metadata.flags.is_empty());
    }

    #[test]
    fn test_flag_deduplicated() {
        let mut metadata = AnalysisMetadata::default();
        metadata.flag(AnalysisFlag::LowVoiceRatio, "first");
        metadata.flag(AnalysisFlag::LowVoiceRatio, "second");
        assert_eq!(metadata.flags.len(), 1);
        assert_eq!(metadata.warnings.len(), 2);
        assert!(metadata.has_flag(AnalysisFlag::LowVoiceRatio));
    }
}
