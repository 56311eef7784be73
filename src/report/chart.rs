//! Chart-ready report data
//!
//! The engine never draws anything. When a report asks for a graph, these
//! structures carry the bucketed category/count pairs and axis tick labels
//! to whatever does the rendering; they serialize cleanly for that boundary.

use serde::{Deserialize, Serialize};

/// One histogram: a bar per category, in display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramData {
    /// Chart title, e.g. `"2-Grams"`; interval histograms carry none.
    pub title: Option<String>,
    /// Category labels in bar order; doubles as the x-axis tick labels.
    pub categories: Vec<String>,
    pub counts: Vec<u64>,
}

impl HistogramData {
    /// X tick positions and labels, one per bar, offset to the bar center.
    pub fn x_ticks(&self) -> Vec<(f64, String)> {
        self.categories
            .iter()
            .enumerate()
            .map(|(k, label)| (k as f64 + 0.4, label.clone()))
            .collect()
    }

    /// Y tick values, one per whole count up to the tallest bar.
    pub fn y_ticks(&self) -> Vec<u64> {
        let max = self.counts.iter().copied().max().unwrap_or(0);
        (0..=max).collect()
    }
}

/// One n-gram/retrograde pair as a two-bar group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrogradePair {
    pub label: String,
    pub retrograde_label: String,
    pub count: u64,
    pub retrograde_count: u64,
}

/// Grouped-bar data for a retrograde report, one group per pairing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupedBarData {
    pub title: String,
    pub groups: Vec<RetrogradePair>,
}
