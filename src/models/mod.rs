//! Data models for the statistics engine
//!
//! Anchor pitches, directed intervals with their label forms, and interval
//! n-grams, together with the two custom total orders the reports sort with.

pub mod interval;
pub mod ngram;
pub mod pitch;

// Re-export commonly used types
pub use interval::{interval_sorter, strip_quality, Direction, Interval, Quality, SimpleOrCompound};
pub use ngram::{ngram_sorter, NGram};
pub use pitch::{Letter, Pitch};
