//! Feature extraction modules
//!
//! This module contains the per-recording algorithms:
//! - Note table and interval conversions
//! - Shared descriptive and robust statistics
//! - Equal-width frequency histograms
//! - Range segmentation (percentile and stability based)
//! - Stability metrics (jitter, shimmer, vibrato)

pub mod histogram;
pub mod notes;
pub mod range;
pub mod stability;
pub mod statistics;
