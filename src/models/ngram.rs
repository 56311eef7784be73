//! N-grams of vertical intervals
//!
//! An n-gram is a sequence of n >= 2 vertical intervals plus the n-1 melodic
//! movement intervals connecting them. Movements are measured between the
//! lower anchor pitches of consecutive verticals, so every vertical must
//! carry its anchors; abstract quality/size pairs cannot form an n-gram.
//!
//! The quality-sensitivity flag is part of an n-gram's identity: two n-grams
//! rendering `"m3 P1 m3"` and `"m3 P1 M3"` are distinct while quality is
//! heeded, but both render `"3 1 3"` and merge when it is not.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::errors::{AnalysisError, Result};
use crate::models::interval::{interval_sorter, Interval, SimpleOrCompound};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NGram {
    verticals: Vec<Interval>,
    movements: Vec<Interval>,
    heed_quality: bool,
}

impl NGram {
    /// Builds an n-gram from anchored vertical intervals, computing the
    /// movement intervals between consecutive lower anchors.
    ///
    /// Fails with `MalformedInterval` when fewer than two verticals are given
    /// or when any vertical is missing an anchor pitch.
    pub fn new(verticals: Vec<Interval>, heed_quality: bool) -> Result<Self> {
        if verticals.len() < 2 {
            return Err(AnalysisError::MalformedInterval(
                "an n-gram needs at least two vertical intervals".into(),
            ));
        }
        for vertical in &verticals {
            if vertical.start().is_none() || vertical.end().is_none() {
                return Err(AnalysisError::MalformedInterval(format!(
                    "vertical interval {} has no anchor pitches",
                    vertical.name(true, false)
                )));
            }
        }
        let mut movements = Vec::with_capacity(verticals.len() - 1);
        for pair in verticals.windows(2) {
            // Anchors are checked above; reference_pitch cannot be None here.
            let from = pair[0]
                .reference_pitch()
                .ok_or_else(|| AnalysisError::MalformedInterval("missing anchor".into()))?;
            let to = pair[1]
                .reference_pitch()
                .ok_or_else(|| AnalysisError::MalformedInterval("missing anchor".into()))?;
            movements.push(Interval::between(from, to)?);
        }
        Ok(Self {
            verticals,
            movements,
            heed_quality,
        })
    }

    /// Cardinality: the number of vertical intervals.
    pub fn n(&self) -> usize {
        self.verticals.len()
    }

    pub fn heed_quality(&self) -> bool {
        self.heed_quality
    }

    pub fn verticals(&self) -> &[Interval] {
        &self.verticals
    }

    pub fn movements(&self) -> &[Interval] {
        &self.movements
    }

    /// A copy with the quality-sensitivity flag rewritten. The original is
    /// untouched; n-grams have value semantics.
    pub fn with_heed_quality(&self, heed_quality: bool) -> NGram {
        NGram {
            verticals: self.verticals.clone(),
            movements: self.movements.clone(),
            heed_quality,
        }
    }

    fn movement_label(movement: &Interval, heed_quality: bool, simple: bool) -> String {
        let name = movement.name(heed_quality, simple);
        if movement.is_unison() {
            name
        } else if movement.is_descending() {
            format!("-{}", name)
        } else {
            format!("+{}", name)
        }
    }

    /// Alternating vertical and movement labels, single-space separated.
    /// Verticals render unsigned; movements carry an explicit `+`/`-` except
    /// the unison, which renders `"1"`/`"P1"` with no sign.
    pub fn string_version(&self, heed_quality: bool, form: SimpleOrCompound) -> String {
        let simple = form.is_simple();
        let mut tokens = Vec::with_capacity(self.verticals.len() + self.movements.len());
        for (i, vertical) in self.verticals.iter().enumerate() {
            tokens.push(vertical.name(heed_quality, simple));
            if let Some(movement) = self.movements.get(i) {
                tokens.push(Self::movement_label(movement, heed_quality, simple));
            }
        }
        tokens.join(" ")
    }

    /// The rendering that defines this n-gram's identity: compound form under
    /// its own quality-sensitivity flag.
    pub fn identity_string(&self) -> String {
        self.string_version(self.heed_quality, SimpleOrCompound::Compound)
    }

    /// The reverse-order reading: vertical sequence reversed, movements
    /// recomputed from the reversed anchor sequence (not a string reversal).
    pub fn retrograde(&self) -> Result<NGram> {
        let reversed: Vec<Interval> = self.verticals.iter().rev().cloned().collect();
        NGram::new(reversed, self.heed_quality)
    }
}

impl PartialEq for NGram {
    fn eq(&self, other: &Self) -> bool {
        self.heed_quality == other.heed_quality
            && self.n() == other.n()
            && self.identity_string() == other.identity_string()
    }
}

impl Eq for NGram {}

impl Hash for NGram {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.heed_quality.hash(state);
        self.n().hash(state);
        self.identity_string().hash(state);
    }
}

impl fmt::Display for NGram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identity_string())
    }
}

/// Total order over rendered n-gram strings: token-by-token left to right
/// using the interval order, with a strict prefix sorting first. Tokens are
/// split on single spaces.
pub fn ngram_sorter(a: &str, b: &str) -> Ordering {
    let mut x_tokens = a.trim().split(' ');
    let mut y_tokens = b.trim().split(' ');
    loop {
        match (x_tokens.next(), y_tokens.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => match interval_sorter(x, y) {
                Ordering::Equal => continue,
                unequal => return unequal,
            },
        }
    }
}
