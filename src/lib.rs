//! Vertical Interval Statistics
//!
//! Tallies the vertical intervals and interval n-grams of two-voice music
//! and reports on them: formatted listings under configurable sort orders,
//! chart-ready histogram data, retrograde pairing, and power-law regression
//! over rank/frequency distributions.

pub mod errors;
pub mod models;
pub mod report;
pub mod stats;

// Re-export the types nearly every caller touches.
pub use errors::{AnalysisError, Result};
pub use models::interval::{Direction, Interval, Quality, SimpleOrCompound};
pub use models::ngram::NGram;
pub use models::pitch::Pitch;
pub use report::{AnalysisSettings, ReportOutput};
pub use stats::IntervalStatistics;
