//! Per-recording analysis and result types
//!
//! Combines the feature extraction results into final analysis:
//! - Result types (records, ranges, metrics)
//! - Rating classification
//! - Recording orchestration
//! - Confidence scoring
//! - Stability trend and range progress
//! - Metadata

pub mod confidence;
pub mod metadata;
pub mod rating;
pub mod recording;
pub mod result;
pub mod trend;
