//! The statistics store
//!
//! `IntervalStatistics` accumulates occurrence counts for vertical intervals
//! (simple and compound forms kept side by side) and for n-grams bucketed by
//! cardinality. It is the only
//! mutable state in the crate: `add_interval` and `add_ngram` are the sole
//! mutators, every report is a read-only consumer.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::errors::Result;
use crate::models::interval::{Interval, Quality, SimpleOrCompound};
use crate::models::ngram::NGram;

/// Occurrence statistics for one analysis session. Created empty, filled by
/// the extraction pipeline, queried by the reporting engine, then discarded.
#[derive(Debug, Clone, Default)]
pub struct IntervalStatistics {
    simple_interval_counts: BTreeMap<String, u64>,
    compound_interval_counts: BTreeMap<String, u64>,
    /// Indexed by cardinality; 0 and 1 are never used but keeping them makes
    /// the index arithmetic direct. Grown on demand by `add_ngram`.
    ngram_counts: Vec<HashMap<NGram, u64>>,
}

impl IntervalStatistics {
    pub fn new() -> Self {
        Self {
            simple_interval_counts: BTreeMap::new(),
            compound_interval_counts: BTreeMap::new(),
            ngram_counts: vec![HashMap::new(), HashMap::new(), HashMap::new()],
        }
    }

    /// Records one vertical interval: exactly one simple-count entry and one
    /// compound-count entry are incremented, created at 1 if absent.
    ///
    /// Keys use the counting label form, where a descending interval's sign
    /// sits between quality letter and digits (`"M-3"`, never `"-M3"`).
    pub fn add_interval(&mut self, interval: &Interval) {
        let simple = interval.counting_label(true);
        let compound = interval.counting_label(false);
        log::trace!("recording interval {} / {}", simple, compound);
        *self.simple_interval_counts.entry(simple).or_insert(0) += 1;
        *self.compound_interval_counts.entry(compound).or_insert(0) += 1;
    }

    fn counts_for(&self, mode: &str) -> Result<&BTreeMap<String, u64>> {
        match mode.parse::<SimpleOrCompound>()? {
            SimpleOrCompound::Simple => Ok(&self.simple_interval_counts),
            SimpleOrCompound::Compound => Ok(&self.compound_interval_counts),
        }
    }

    /// Occurrences of a particular interval label. `mode` must be the literal
    /// `"simple"` or `"compound"`; anything else is an `InvalidMode` error.
    ///
    /// A digit-only label, or one starting with a direction sign, is a
    /// quality-agnostic query and sums the counts of all five quality
    /// variants of that generic size. An unknown but well-formed label is 0,
    /// never an error.
    pub fn get_interval_occurrences(&self, label: &str, mode: &str) -> Result<u64> {
        let counts = self.counts_for(mode)?;
        let quality_agnostic = label.chars().all(|c| c.is_ascii_digit())
            || label.starts_with('-')
            || label.starts_with('+');
        if quality_agnostic {
            // "m" + "-3" is "m-3": the sign-leading query form lines up with
            // the descending counting labels by construction.
            Ok(Quality::LETTERS
                .iter()
                .filter_map(|q| counts.get(&format!("{}{}", q, label)))
                .sum())
        } else {
            Ok(counts.get(label).copied().unwrap_or(0))
        }
    }

    /// Records one n-gram under its quality-sensitive identity, growing the
    /// bucket list until the cardinality has a slot.
    pub fn add_ngram(&mut self, ngram: &NGram) {
        while self.ngram_counts.len() <= ngram.n() {
            self.ngram_counts.push(HashMap::new());
        }
        *self.ngram_counts[ngram.n()]
            .entry(ngram.clone())
            .or_insert(0) += 1;
    }

    /// The bucket for cardinality `n`; missing cardinalities behave as empty
    /// buckets, not errors.
    pub fn ngram_bucket(&self, n: usize) -> Option<&HashMap<NGram, u64>> {
        self.ngram_counts.get(n)
    }

    /// The largest cardinality with a slot (populated or not).
    pub fn max_cardinality(&self) -> usize {
        self.ngram_counts.len().saturating_sub(1)
    }

    /// Cardinalities (>= 2) whose buckets actually hold n-grams.
    pub fn populated_cardinalities(&self) -> Vec<usize> {
        (2..self.ngram_counts.len())
            .filter(|&n| !self.ngram_counts[n].is_empty())
            .collect()
    }

    /// Occurrences of an n-gram given as a rendered string. A query with
    /// letters in it matches quality renderings; a digits-and-signs query
    /// matches quality-insensitive renderings. Absent cardinality or label
    /// is 0.
    pub fn get_ngram_occurrences(&self, label: &str, n: usize) -> u64 {
        let Some(bucket) = self.ngram_counts.get(n) else {
            return 0;
        };
        let heed_quality = label.chars().any(|c| c.is_ascii_alphabetic());
        bucket
            .iter()
            .filter(|(ng, _)| ng.string_version(heed_quality, SimpleOrCompound::Compound) == label)
            .map(|(_, count)| count)
            .sum()
    }

    /// Collapses a quality-sensitive label map by generic size, summing the
    /// five quality variants, over the practical size range -30..30.
    /// `{"m3": 5, "M3": 6, "P4": 1}` becomes `{"3": 11, "4": 1}`; descending
    /// counting labels like `"m-3"` fold into `"-3"`.
    pub fn reduce_qualities(counts: &BTreeMap<String, u64>) -> BTreeMap<String, u64> {
        let mut reduced = BTreeMap::new();
        for size in -30..30 {
            for quality in Quality::LETTERS {
                let look_for = format!("{}{}", quality, size);
                if let Some(count) = counts.get(&look_for) {
                    *reduced.entry(size.to_string()).or_insert(0) += count;
                }
            }
        }
        reduced
    }

    pub fn simple_interval_counts(&self) -> &BTreeMap<String, u64> {
        &self.simple_interval_counts
    }

    pub fn compound_interval_counts(&self) -> &BTreeMap<String, u64> {
        &self.compound_interval_counts
    }

    /// String-keyed copy of one cardinality's bucket, for display and
    /// debugging; n-gram keys are unreadable when dumped raw.
    pub fn ngram_dict(&self, n: usize) -> BTreeMap<String, u64> {
        match self.ngram_counts.get(n) {
            Some(bucket) => bucket
                .iter()
                .map(|(ng, &count)| (ng.identity_string(), count))
                .collect(),
            None => BTreeMap::new(),
        }
    }

    /// Sum of all recorded interval observations (simple side; both sides
    /// total the same by the add_interval invariant).
    pub fn total_interval_count(&self) -> u64 {
        self.simple_interval_counts.values().sum()
    }
}

impl fmt::Display for IntervalStatistics {
    /// Something like `<IntervalStatistics with 14 intervals; 26 2-grams; 19 3-grams>`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<IntervalStatistics with {} intervals",
            self.compound_interval_counts.len()
        )?;
        for n in 2..self.ngram_counts.len() {
            write!(f, "; {} {}-grams", self.ngram_counts[n].len(), n)?;
        }
        write!(f, ">")
    }
}
