//! Error types for the vocal profiling engine

use thiserror::Error;

/// Errors that can occur during recording analysis or profile accumulation
///
/// Numeric degeneracies (constant series, zero means, empty histories) are
/// recovered locally and never surface here. Only contract violations and
/// the "not enough frames" state of a single recording do.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProfileError {
    /// Invalid input parameters or malformed frame data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Too few voiced frames to analyze a recording
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Weighting strategy name that does not map to a known strategy
    #[error("Unknown weighting strategy: {0}")]
    UnknownStrategy(String),

    /// History record that violates the record contract
    #[error("Invalid analysis record: {0}")]
    InvalidRecord(String),

    /// Configuration could not be parsed or failed validation
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ProfileError {
    /// True for the recoverable "not enough voiced frames" state
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, ProfileError::InsufficientData(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProfileError::UnknownStrategy("median".to_string());
        assert_eq!(err.to_string(), "Unknown weighting strategy: median");

        let err = ProfileError::InsufficientData("1 valid frame".to_string());
        assert!(err.is_insufficient_data());
        assert!(err.to_string().contains("1 valid frame"));
    }
}
