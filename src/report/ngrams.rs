//! N-gram listings, retrograde pairing, and power-law regression
//!
//! All three reports share the same front half: pick the cardinalities to
//! cover, then regroup each bucket under the requested quality sensitivity
//! so that entries differing only in quality merge when quality is not
//! heeded.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::errors::{AnalysisError, Result};
use crate::models::ngram::{ngram_sorter, NGram};
use crate::report::chart::{GroupedBarData, HistogramData, RetrogradePair};
use crate::report::regression;
use crate::report::spec::{ReportSpec, SortBy, SortDirection};
use crate::report::{AnalysisSettings, ReportOutput};
use crate::stats::IntervalStatistics;

/// Figures out which cardinalities a report should cover.
///
/// An explicit `n=` list is validated against the store: values below 2,
/// beyond the largest bucket, or with an empty bucket are dropped with a
/// diagnostic line (also logged). Without `n=`, every populated cardinality
/// is covered. Ending up with nothing to report is an error.
fn select_ns(stats: &IntervalStatistics, spec: &ReportSpec) -> Result<(Vec<usize>, String)> {
    let mut diagnostics = String::new();
    let selected: Vec<usize> = match &spec.ns {
        Some(requested) => requested
            .iter()
            .copied()
            .filter(|&n| {
                let usable = n >= 2
                    && n <= stats.max_cardinality()
                    && stats.ngram_bucket(n).map_or(false, |b| !b.is_empty());
                if !usable {
                    log::warn!("no {}-grams recorded; dropping from report", n);
                    diagnostics.push_str(&format!(
                        "Not printing {}-grams; there are none for that \"n\" value.\n",
                        n
                    ));
                }
                usable
            })
            .collect(),
        None => stats.populated_cardinalities(),
    };
    if selected.is_empty() {
        return Err(AnalysisError::NoData(
            "All of the 'n' values appear to have no n-grams".into(),
        ));
    }
    Ok((selected, diagnostics))
}

/// One cardinality's bucket regrouped under `heed_quality`: every key is
/// rewritten to carry the flag, and keys that collide afterwards (quality
/// variants, when quality is not heeded) merge by summing their counts.
fn regrouped_bucket(
    stats: &IntervalStatistics,
    n: usize,
    heed_quality: bool,
) -> HashMap<NGram, u64> {
    let mut regrouped = HashMap::new();
    if let Some(bucket) = stats.ngram_bucket(n) {
        for (ngram, &count) in bucket {
            *regrouped
                .entry(ngram.with_heed_quality(heed_quality))
                .or_insert(0) += count;
        }
    }
    regrouped
}

/// The regrouped bucket flattened to a deterministic order: the n-gram
/// total order on identity strings. Callers layering a frequency sort on
/// top get deterministic ties because the sort is stable.
fn ordered_entries(bucket: HashMap<NGram, u64>) -> Vec<(NGram, u64)> {
    let mut entries: Vec<(NGram, u64)> = bucket.into_iter().collect();
    entries.sort_by(|a, b| ngram_sorter(&a.0.identity_string(), &b.0.identity_string()));
    entries
}

/// Produces an n-gram report per the specification string: the tally of
/// every recorded n-gram of the covered cardinalities, as text (one block
/// per cardinality) or as one histogram per cardinality.
pub fn format_ngrams(
    stats: &IntervalStatistics,
    settings: &AnalysisSettings,
    specs: &str,
) -> Result<ReportOutput> {
    let spec = ReportSpec::parse(specs);
    log::debug!("n-gram report requested: {:?}", spec);
    let (list_of_n, diagnostics) = select_ns(stats, &spec)?;

    if spec.total {
        let total: u64 = list_of_n
            .iter()
            .filter_map(|&n| stats.ngram_bucket(n))
            .flat_map(|bucket| bucket.values())
            .sum();
        return Ok(ReportOutput::Text(total.to_string()));
    }

    let heed_quality = spec.effective_quality(settings);
    let form = spec.effective_form(settings);

    if spec.graph {
        let mut charts = Vec::new();
        for &n in &list_of_n {
            let entries = sorted_for_spec(regrouped_bucket(stats, n, heed_quality), &spec);
            let mut categories = Vec::new();
            let mut counts = Vec::new();
            for (ngram, count) in entries {
                categories.push(ngram.string_version(heed_quality, form));
                counts.push(count);
            }
            charts.push(HistogramData {
                title: Some(format!("{}-Grams", n)),
                categories,
                counts,
            });
        }
        return Ok(ReportOutput::Histograms(charts));
    }

    let mut post = diagnostics;
    for &n in &list_of_n {
        post.push_str(&format!("All the {}-grams:\n-----------------------------\n", n));
        for (ngram, count) in sorted_for_spec(regrouped_bucket(stats, n, heed_quality), &spec) {
            post.push_str(&format!(
                "{}: {}\n",
                ngram.string_version(heed_quality, form),
                count
            ));
        }
        post.push('\n');
    }
    Ok(ReportOutput::Text(post))
}

fn sorted_for_spec(bucket: HashMap<NGram, u64>, spec: &ReportSpec) -> Vec<(NGram, u64)> {
    let mut entries = ordered_entries(bucket);
    match spec.sort_by {
        SortBy::Frequency => match spec.direction() {
            SortDirection::Ascending => entries.sort_by_key(|(_, count)| *count),
            SortDirection::Descending => {
                entries.sort_by(|a, b| b.1.cmp(&a.1));
            }
        },
        SortBy::Label => {
            if spec.direction() == SortDirection::Descending {
                entries.reverse();
            }
        }
    }
    entries
}

/// Pairs each n-gram with its retrograde.
///
/// Walking the entries in count-ascending order, each not-yet-consumed
/// n-gram claims its retrograde: if the retrograde was also recorded, the
/// two merge into one pairing (so each appears in at most one); if not, the
/// pairing gets a synthetic zero-count partner. Output is text lines or
/// grouped-bar data sorted by how balanced each pairing is.
pub fn retrogrades(
    stats: &IntervalStatistics,
    settings: &AnalysisSettings,
    specs: &str,
) -> Result<ReportOutput> {
    let spec = ReportSpec::parse(specs);
    let (list_of_n, _diagnostics) = select_ns(stats, &spec)?;
    let heed_quality = spec.effective_quality(settings);
    let form = spec.effective_form(settings);

    let mut pairs_per_n: Vec<(usize, Vec<RetrogradePair>)> = Vec::new();
    for &n in &list_of_n {
        let bucket = regrouped_bucket(stats, n, heed_quality);
        let mut entries = ordered_entries(bucket.clone());
        entries.sort_by_key(|(_, count)| *count);

        let mut consumed: Vec<NGram> = Vec::new();
        let mut pairs = Vec::new();
        for (ngram, count) in &entries {
            if consumed.contains(ngram) {
                continue;
            }
            let retrograde = ngram.retrograde()?;
            let retrograde_count = bucket.get(&retrograde).copied().unwrap_or(0);
            consumed.push(retrograde.clone());
            pairs.push(RetrogradePair {
                label: ngram.string_version(heed_quality, form),
                retrograde_label: retrograde.string_version(heed_quality, form),
                count: *count,
                retrograde_count,
            });
        }
        pairs_per_n.push((n, pairs));
    }

    if spec.graph {
        let charts = pairs_per_n
            .into_iter()
            .map(|(n, mut pairs)| {
                // Most-balanced pairings first: retrograde share descending.
                pairs.sort_by(|a, b| {
                    let ratio_a = a.retrograde_count as f64 / a.count as f64;
                    let ratio_b = b.retrograde_count as f64 / b.count as f64;
                    ratio_b.partial_cmp(&ratio_a).unwrap_or(Ordering::Equal)
                });
                GroupedBarData {
                    title: format!("{}-Grams", n),
                    groups: pairs,
                }
            })
            .collect();
        return Ok(ReportOutput::GroupedBars(charts));
    }

    let mut post = String::new();
    for (n, pairs) in pairs_per_n {
        post.push_str(&format!(
            "All the {}-grams with retrogrades:\n-----------------------------\n",
            n
        ));
        for pair in pairs {
            post.push_str(&format!(
                "{}: {}; {}: {}\n",
                pair.label, pair.count, pair.retrograde_label, pair.retrograde_count
            ));
        }
    }
    Ok(ReportOutput::Text(post))
}

/// Fits a power law to each populated cardinality's rank/frequency data.
///
/// Counts sorted most-common-first get 1-indexed ranks; ordinary least
/// squares on the log/log data gives the (negated, so positive) exponent,
/// reported along with the (likewise negated) correlation coefficient.
pub fn power_law_analysis(
    stats: &IntervalStatistics,
    settings: &AnalysisSettings,
) -> Result<String> {
    let list_of_n = stats.populated_cardinalities();
    if list_of_n.is_empty() {
        return Err(AnalysisError::NoData(
            "All of the 'n' values appear to have no n-grams".into(),
        ));
    }

    let mut post = String::new();
    for n in list_of_n {
        let mut entries = ordered_entries(regrouped_bucket(stats, n, settings.heed_quality));
        entries.sort_by(|a, b| b.1.cmp(&a.1));

        let xs: Vec<f64> = (1..=entries.len()).map(|rank| (rank as f64).ln()).collect();
        let ys: Vec<f64> = entries.iter().map(|(_, count)| (*count as f64).ln()).collect();
        let (slope, _intercept) = regression::least_squares(&xs, &ys);
        let correlation = regression::pearson(&xs, &ys);
        post.push_str(&format!(
            "\nthe power law exponent for the {}-grams is {}; correlation coefficient {}",
            n, -slope, -correlation
        ));
    }
    Ok(post)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::interval::Interval;
    use crate::models::pitch::Pitch;

    fn vertical(low: &str, high: &str) -> Interval {
        Interval::between(low.parse::<Pitch>().unwrap(), high.parse::<Pitch>().unwrap()).unwrap()
    }

    fn ngram(pairs: &[(&str, &str)]) -> NGram {
        let verticals = pairs.iter().map(|&(a, b)| vertical(a, b)).collect();
        NGram::new(verticals, true).unwrap()
    }

    // m3 +P4 M3: C4/E-4 moving up a fourth to F4/A4.
    fn m3_p4_m3() -> NGram {
        ngram(&[("C4", "Eb4"), ("F4", "A4")])
    }

    // M3 +P4 m3: C4/E4 moving up a fourth to F4/Ab4.
    fn maj3_p4_m3() -> NGram {
        ngram(&[("C4", "E4"), ("F4", "Ab4")])
    }

    #[test]
    fn test_no_ngrams_is_no_data() {
        let stats = IntervalStatistics::new();
        let settings = AnalysisSettings::default();
        assert!(matches!(
            format_ngrams(&stats, &settings, ""),
            Err(AnalysisError::NoData(_))
        ));
        assert!(matches!(
            power_law_analysis(&stats, &settings),
            Err(AnalysisError::NoData(_))
        ));
    }

    #[test]
    fn test_invalid_n_values_get_diagnostics() {
        let mut stats = IntervalStatistics::new();
        stats.add_ngram(&m3_p4_m3());
        let settings = AnalysisSettings::default();

        let out = format_ngrams(&stats, &settings, "n=2,5 ").unwrap();
        let text = out.as_text().unwrap();
        assert!(text
            .starts_with("Not printing 5-grams; there are none for that \"n\" value.\n"));
        assert!(text.contains("All the 2-grams:"));

        // Every requested n invalid: nothing left to report.
        assert!(matches!(
            format_ngrams(&stats, &settings, "n=5 "),
            Err(AnalysisError::NoData(_))
        ));
    }

    #[test]
    fn test_total_counts_selected_cardinalities() {
        let mut stats = IntervalStatistics::new();
        stats.add_ngram(&m3_p4_m3());
        stats.add_ngram(&m3_p4_m3());
        stats.add_ngram(&maj3_p4_m3());
        let settings = AnalysisSettings::default();
        let out = format_ngrams(&stats, &settings, "total").unwrap();
        assert_eq!(out.as_text(), Some("3"));
    }

    #[test]
    fn test_quality_insensitive_listing_merges_variants() {
        let mut stats = IntervalStatistics::new();
        stats.add_ngram(&m3_p4_m3());
        stats.add_ngram(&maj3_p4_m3());
        let settings = AnalysisSettings::default();
        let out = format_ngrams(&stats, &settings, "").unwrap();
        assert_eq!(
            out.as_text(),
            Some("All the 2-grams:\n-----------------------------\n3 +4 3: 2\n\n")
        );
    }

    #[test]
    fn test_quality_sensitive_listing_keeps_variants() {
        let mut stats = IntervalStatistics::new();
        stats.add_ngram(&m3_p4_m3());
        stats.add_ngram(&m3_p4_m3());
        stats.add_ngram(&maj3_p4_m3());
        let settings = AnalysisSettings::default();
        let out = format_ngrams(&stats, &settings, "quality by frequency").unwrap();
        assert_eq!(
            out.as_text(),
            Some("All the 2-grams:\n-----------------------------\nm3 +P4 M3: 2\nM3 +P4 m3: 1\n\n")
        );
    }

    #[test]
    fn test_graph_histogram_per_cardinality() {
        let mut stats = IntervalStatistics::new();
        stats.add_ngram(&m3_p4_m3());
        let settings = AnalysisSettings::default();
        let out = format_ngrams(&stats, &settings, "graph quality").unwrap();
        match out {
            ReportOutput::Histograms(charts) => {
                assert_eq!(charts.len(), 1);
                assert_eq!(charts[0].title.as_deref(), Some("2-Grams"));
                assert_eq!(charts[0].categories, vec!["m3 +P4 M3"]);
                assert_eq!(charts[0].counts, vec![1]);
            }
            other => panic!("expected histogram output, got {:?}", other),
        }
    }

    #[test]
    fn test_retrograde_pairing_with_zero_partner() {
        let mut stats = IntervalStatistics::new();
        // M3 +P4 m3 and its retrograde m3 -P4 M3, plus an unpaired m3 +P4 M3.
        let forward = maj3_p4_m3();
        let backward = forward.retrograde().unwrap();
        stats.add_ngram(&forward);
        stats.add_ngram(&backward);
        stats.add_ngram(&backward);
        stats.add_ngram(&m3_p4_m3());
        let settings = AnalysisSettings::default();

        let out = retrogrades(&stats, &settings, "quality").unwrap();
        let text = out.as_text().unwrap();
        assert!(text.starts_with(
            "All the 2-grams with retrogrades:\n-----------------------------\n"
        ));
        // The forward/backward pair appears exactly once, in either column order.
        let saw_pair = text.contains("M3 +P4 m3: 1; m3 -P4 M3: 2")
            || text.contains("m3 -P4 M3: 2; M3 +P4 m3: 1");
        assert!(saw_pair, "missing merged pairing in: {}", text);
        // The unpaired n-gram gets a synthetic zero partner.
        assert!(text.contains("m3 +P4 M3: 1; M3 -P4 m3: 0"), "got: {}", text);
        assert_eq!(text.matches('\n').count(), 4);
    }

    #[test]
    fn test_retrograde_chart_sorted_by_balance() {
        let mut stats = IntervalStatistics::new();
        let forward = maj3_p4_m3();
        let backward = forward.retrograde().unwrap();
        stats.add_ngram(&forward);
        stats.add_ngram(&backward);
        stats.add_ngram(&m3_p4_m3());
        stats.add_ngram(&m3_p4_m3());
        let settings = AnalysisSettings::default();

        let out = retrogrades(&stats, &settings, "quality graph").unwrap();
        match out {
            ReportOutput::GroupedBars(charts) => {
                assert_eq!(charts.len(), 1);
                assert_eq!(charts[0].title, "2-Grams");
                assert_eq!(charts[0].groups.len(), 2);
                // The balanced pairing (ratio 1.0) sorts before the
                // zero-partner pairing (ratio 0.0).
                assert!(charts[0].groups[0].retrograde_count > 0);
                assert_eq!(charts[0].groups[1].retrograde_count, 0);
            }
            other => panic!("expected grouped bars, got {:?}", other),
        }
    }

    #[test]
    fn test_power_law_from_descending_counts() {
        let mut stats = IntervalStatistics::new();
        // Two distinct quality-sensitive 2-grams with counts 4 and 2.
        for _ in 0..4 {
            stats.add_ngram(&m3_p4_m3());
        }
        for _ in 0..2 {
            stats.add_ngram(&maj3_p4_m3());
        }
        let settings = AnalysisSettings {
            heed_quality: true,
            ..AnalysisSettings::default()
        };
        let post = power_law_analysis(&stats, &settings).unwrap();
        let prefix = "\nthe power law exponent for the 2-grams is ";
        assert!(post.starts_with(prefix), "got: {}", post);
        let rest = &post[prefix.len()..];
        let (exponent, correlation) = rest.split_once("; correlation coefficient ").unwrap();
        let exponent: f64 = exponent.parse().unwrap();
        let correlation: f64 = correlation.parse().unwrap();
        // Two points: exponent = ln(2)/ln(2) = 1, perfectly correlated.
        assert!((exponent - 1.0).abs() < 1e-9, "exponent {}", exponent);
        assert!((correlation - 1.0).abs() < 1e-9, "correlation {}", correlation);
    }
}
