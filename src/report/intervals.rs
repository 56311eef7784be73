//! Interval listings
//!
//! Renders the vertical-interval side of the store: the full tally of
//! recorded intervals under the requested quality sensitivity and size form,
//! sorted by frequency or by the interval total order, as text or as
//! histogram data.

use std::collections::BTreeMap;

use crate::errors::{AnalysisError, Result};
use crate::models::interval::{interval_sorter, SimpleOrCompound};
use crate::report::chart::HistogramData;
use crate::report::spec::{ReportSpec, SortBy, SortDirection};
use crate::report::{AnalysisSettings, ReportOutput};
use crate::stats::IntervalStatistics;

/// Produces an interval report per the specification string.
///
/// `total` short-circuits everything else and answers with the plain sum of
/// all recorded intervals. Otherwise the listing covers every label in the
/// selected map; a store with no intervals at all is an error either way.
pub fn format_intervals(
    stats: &IntervalStatistics,
    settings: &AnalysisSettings,
    specs: &str,
) -> Result<ReportOutput> {
    let spec = ReportSpec::parse(specs);
    log::debug!("interval report requested: {:?}", spec);

    if stats.total_interval_count() == 0 {
        return Err(AnalysisError::NoData(
            "no intervals have been recorded".into(),
        ));
    }
    if spec.total {
        return Ok(ReportOutput::Text(stats.total_interval_count().to_string()));
    }

    let source = match spec.effective_form(settings) {
        SimpleOrCompound::Simple => stats.simple_interval_counts(),
        SimpleOrCompound::Compound => stats.compound_interval_counts(),
    };
    let counts: BTreeMap<String, u64> = if spec.effective_quality(settings) {
        source.clone()
    } else {
        IntervalStatistics::reduce_qualities(source)
    };

    let entries = sorted_entries(&counts, &spec);

    if spec.graph {
        let (categories, bars): (Vec<String>, Vec<u64>) = entries.into_iter().unzip();
        return Ok(ReportOutput::Histograms(vec![HistogramData {
            title: None,
            categories,
            counts: bars,
        }]));
    }

    let mut post = String::from("All the Intervals:\n------------------\n");
    for (label, count) in &entries {
        post.push_str(&format!("{}: {}\n", label, count));
    }
    post.push('\n');
    Ok(ReportOutput::Text(post))
}

/// Orders the label/count pairs per the specification. Starting from the
/// map's own label order makes frequency ties deterministic under the
/// stable sort.
fn sorted_entries(counts: &BTreeMap<String, u64>, spec: &ReportSpec) -> Vec<(String, u64)> {
    let mut entries: Vec<(String, u64)> = counts
        .iter()
        .map(|(label, &count)| (label.clone(), count))
        .collect();
    match spec.sort_by {
        SortBy::Frequency => match spec.direction() {
            SortDirection::Ascending => entries.sort_by_key(|(_, count)| *count),
            SortDirection::Descending => {
                entries.sort_by(|a, b| b.1.cmp(&a.1));
            }
        },
        SortBy::Label => {
            entries.sort_by(|a, b| interval_sorter(&a.0, &b.0));
            if spec.direction() == SortDirection::Descending {
                entries.reverse();
            }
        }
    }
    entries
}
