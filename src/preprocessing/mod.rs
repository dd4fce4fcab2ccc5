//! F0 series preprocessing
//!
//! Prepares a per-frame F0 series for analysis:
//! - Validation and widening to `f64`
//! - Voiced-frame filtering
//! - Optional moving-average smoothing of voiced frames

pub mod smoothing;
pub mod voicing;
