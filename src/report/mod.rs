//! The query/reporting engine
//!
//! Pure, read-only transforms over an `IntervalStatistics` store: filtering,
//! regrouping by quality sensitivity, sorting under the custom label orders,
//! retrograde pairing, and power-law regression, rendered either as text or
//! as chart-ready data for an external charting collaborator.

pub mod chart;
pub mod intervals;
pub mod ngrams;
pub mod regression;
pub mod spec;

pub use chart::{GroupedBarData, HistogramData, RetrogradePair};
pub use intervals::format_intervals;
pub use ngrams::{format_ngrams, power_law_analysis, retrogrades};
pub use spec::{ReportSpec, SortBy, SortDirection};

use serde::{Deserialize, Serialize};

use crate::models::interval::SimpleOrCompound;

/// Session-level report defaults, threaded explicitly into every reporting
/// call (no ambient globals). Individual report specifications may override
/// either field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSettings {
    /// Whether interval quality distinguishes otherwise-identical entries.
    pub heed_quality: bool,
    /// Whether labels use octave-reduced or true sizes.
    pub simple_or_compound: SimpleOrCompound,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            heed_quality: false,
            simple_or_compound: SimpleOrCompound::Compound,
        }
    }
}

/// What a report produced: a formatted textual listing, or chart-ready data
/// when the specification asked for a graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ReportOutput {
    Text(String),
    /// One histogram per reported group (one per cardinality for n-grams).
    Histograms(Vec<HistogramData>),
    /// Grouped bars for retrograde reports, one chart per cardinality.
    GroupedBars(Vec<GroupedBarData>),
}

impl ReportOutput {
    /// The text of a `Text` output; `None` for chart outputs.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ReportOutput::Text(text) => Some(text),
            _ => None,
        }
    }

    /// JSON form, for handing chart data across the rendering boundary.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
