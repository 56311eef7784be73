//! Error types for the statistics engine
//!
//! Every failure the engine can produce is synchronous and comes from bad
//! input or an empty selection; there are no transient failure modes and no
//! retries.

use thiserror::Error;

/// Errors raised by interval construction, the statistics store, and the
/// reporting engine.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AnalysisError {
    /// An interval or n-gram input lacks the data needed to work with it
    /// (unparseable pitch, missing anchor pitches, underivable quality).
    /// Raised at construction, never deferred.
    #[error("malformed interval: {0}")]
    MalformedInterval(String),

    /// A mode argument was neither "simple" nor "compound".
    #[error("invalid mode: {0}")]
    InvalidMode(String),

    /// A report was requested over an empty selection.
    #[error("no data: {0}")]
    NoData(String),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
