// End-to-end reporting tests: store a handful of observations, then check
// the formatted listings and chart data that come back

use interval_stats::models::interval::Interval;
use interval_stats::models::ngram::NGram;
use interval_stats::models::pitch::Pitch;
use interval_stats::report::{format_intervals, format_ngrams};
use interval_stats::{AnalysisError, AnalysisSettings, IntervalStatistics, ReportOutput};

/// Helper to build an anchored interval between two spelled pitches
fn iv(start: &str, end: &str) -> Interval {
    Interval::between(
        start.parse::<Pitch>().unwrap(),
        end.parse::<Pitch>().unwrap(),
    )
    .unwrap()
}

/// Helper to build an n-gram from anchor pitch pairs
fn ng(pairs: &[(&str, &str)]) -> NGram {
    let verticals = pairs.iter().map(|&(a, b)| iv(a, b)).collect();
    NGram::new(verticals, false).unwrap()
}

/// A small store: one each of P5, M3, M6, P8.
fn small_store() -> IntervalStatistics {
    let mut stats = IntervalStatistics::new();
    stats.add_interval(&iv("C4", "G4"));
    stats.add_interval(&iv("C4", "E4"));
    stats.add_interval(&iv("C4", "A4"));
    stats.add_interval(&iv("C4", "C5"));
    stats
}

#[test]
fn test_interval_listing_defaults() {
    let stats = small_store();
    let out = format_intervals(&stats, &AnalysisSettings::default(), "by interval").unwrap();
    assert_eq!(
        out.as_text(),
        Some("All the Intervals:\n------------------\n3: 1\n5: 1\n6: 1\n8: 1\n\n")
    );
}

#[test]
fn test_interval_listing_with_quality() {
    let stats = small_store();
    let out = format_intervals(&stats, &AnalysisSettings::default(), "quality by interval")
        .unwrap();
    assert_eq!(
        out.as_text(),
        Some("All the Intervals:\n------------------\nM3: 1\nP5: 1\nM6: 1\nP8: 1\n\n")
    );
}

#[test]
fn test_session_quality_overridden_by_no_quality_token() {
    let stats = small_store();
    let settings = AnalysisSettings {
        heed_quality: true,
        ..AnalysisSettings::default()
    };
    // The session heeds quality but the request says noQuality.
    let out = format_intervals(&stats, &settings, "noQuality by interval").unwrap();
    assert_eq!(
        out.as_text(),
        Some("All the Intervals:\n------------------\n3: 1\n5: 1\n6: 1\n8: 1\n\n")
    );
}

#[test]
fn test_interval_total() {
    let stats = small_store();
    let out = format_intervals(&stats, &AnalysisSettings::default(), "total").unwrap();
    assert_eq!(out.as_text(), Some("4"));
}

#[test]
fn test_interval_frequency_sort_defaults_descending() {
    let mut stats = small_store();
    stats.add_interval(&iv("C4", "G4"));
    stats.add_interval(&iv("C4", "G4"));
    stats.add_interval(&iv("C4", "E4"));
    let out = format_intervals(&stats, &AnalysisSettings::default(), "by frequency").unwrap();
    let text = out.as_text().unwrap();
    // Fifths (3 of them) lead, thirds (2) next, then the singletons in
    // label order.
    assert_eq!(
        text,
        "All the Intervals:\n------------------\n5: 3\n3: 2\n6: 1\n8: 1\n\n"
    );
}

#[test]
fn test_interval_graph_output() {
    let stats = small_store();
    let out = format_intervals(&stats, &AnalysisSettings::default(), "graph").unwrap();
    match out {
        ReportOutput::Histograms(charts) => {
            assert_eq!(charts.len(), 1);
            assert_eq!(charts[0].title, None);
            assert_eq!(charts[0].categories, vec!["3", "5", "6", "8"]);
            assert_eq!(charts[0].counts, vec![1, 1, 1, 1]);
            // Ticks are derived, one per bar, centered.
            assert_eq!(charts[0].x_ticks()[0], (0.4, "3".to_string()));
            assert_eq!(charts[0].y_ticks(), vec![0, 1]);
        }
        other => panic!("expected histogram output, got {:?}", other),
    }
}

#[test]
fn test_ngram_listing_and_n_selection() {
    let mut stats = IntervalStatistics::new();
    let two_gram = ng(&[("A4", "C5"), ("D5", "F5")]); // m3 +P4 m3
    let four_gram = ng(&[
        ("A4", "C5"),
        ("D5", "E5"),
        ("F#4", "C#5"),
        ("G##5", "E#4"),
    ]);
    stats.add_ngram(&two_gram);
    stats.add_ngram(&four_gram);
    let settings = AnalysisSettings::default();

    // No n= list: every populated cardinality, in order.
    let out = format_ngrams(&stats, &settings, "").unwrap();
    assert_eq!(
        out.as_text(),
        Some(
            "All the 2-grams:\n-----------------------------\n3 +4 3: 1\n\n\
             All the 4-grams:\n-----------------------------\n3 +4 2 -6 5 -2 10: 1\n\n"
        )
    );

    // An explicit list narrows the report. Note the trailing space.
    let out = format_ngrams(&stats, &settings, "n=4 ").unwrap();
    assert_eq!(
        out.as_text(),
        Some("All the 4-grams:\n-----------------------------\n3 +4 2 -6 5 -2 10: 1\n\n")
    );

    // Unterminated n= lists lose their final character; "n=4" narrows to
    // nothing usable.
    assert!(matches!(
        format_ngrams(&stats, &settings, "n=4"),
        Err(AnalysisError::NoData(_))
    ));
}

#[test]
fn test_ngram_simple_form_rendering() {
    let mut stats = IntervalStatistics::new();
    stats.add_ngram(&ng(&[
        ("A4", "C5"),
        ("D5", "E5"),
        ("F#4", "C#5"),
        ("G##5", "E#4"),
    ]));
    let settings = AnalysisSettings::default();
    let out = format_ngrams(&stats, &settings, "quality simple").unwrap();
    assert_eq!(
        out.as_text(),
        Some(
            "All the 4-grams:\n-----------------------------\nm3 +P4 M2 -m6 P5 -m2 M3: 1\n\n"
        )
    );
}

#[test]
fn test_ngram_total_ignores_quality_regrouping() {
    let mut stats = IntervalStatistics::new();
    let a = ng(&[("A4", "C5"), ("D5", "F5")]); // m3 +P4 m3
    let d = ng(&[("C5", "A4"), ("D5", "F#5")]); // m3 +P4 M3
    stats.add_ngram(&a);
    stats.add_ngram(&a);
    stats.add_ngram(&d);
    let out = format_ngrams(&stats, &AnalysisSettings::default(), "total").unwrap();
    assert_eq!(out.as_text(), Some("3"));
}
