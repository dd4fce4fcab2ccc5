//! Cross-session accumulation
//!
//! Turns a singer's history of [`AnalysisRecord`](crate::AnalysisRecord)s
//! into accumulated profiles:
//! - History validation, windowing and per-song grouping
//! - Record weighting strategies
//! - Profile types
//! - The aggregator that ties them together

pub mod aggregator;
pub mod history;
pub mod profile;
pub mod weighting;

pub use aggregator::ProfileAggregator;
pub use profile::{AccumulatedProfile, RobustProfile, WeightedProfile};
pub use weighting::{WeightStrategy, WeightingStrategy};
