//! Interval representation and label forms
//!
//! An interval is a labeled, directed distance between two pitches: a quality
//! (diminished through Augmented), a generic size (1 = unison, 2 = second, ...,
//! compound sizes exceed 8), and a direction. Intervals built from anchor
//! pitches keep them, which is what lets an n-gram derive its movement
//! intervals later.
//!
//! Three string forms of the same interval exist, and their differences are
//! load-bearing for the statistics store:
//! - plain: `"m3"`, `"M10"` (no sign, direction ignored)
//! - canonical: `"-M10"` descending, `"M10"` ascending
//! - counting: `"M-10"` descending, `"M10"` ascending (sign between quality
//!   letter and digits; this is the exact key format of the store maps)

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{AnalysisError, Result};
use crate::models::pitch::Pitch;

/// Interval quality. Major and Perfect never apply to the same generic size,
/// so the comparison order ranks them equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quality {
    Diminished,
    Minor,
    Major,
    Perfect,
    Augmented,
}

impl Quality {
    pub fn letter(&self) -> char {
        match self {
            Quality::Diminished => 'd',
            Quality::Minor => 'm',
            Quality::Major => 'M',
            Quality::Perfect => 'P',
            Quality::Augmented => 'A',
        }
    }

    pub fn from_letter(c: char) -> Option<Quality> {
        match c {
            'd' => Some(Quality::Diminished),
            'm' => Some(Quality::Minor),
            'M' => Some(Quality::Major),
            'P' => Some(Quality::Perfect),
            'A' => Some(Quality::Augmented),
            _ => None,
        }
    }

    /// The five letters in comparison order; also the iteration set for
    /// quality-agnostic store queries.
    pub const LETTERS: [char; 5] = ['d', 'm', 'M', 'P', 'A'];

    /// Comparison rank: d < m < (M = P) < A.
    fn rank(&self) -> u8 {
        match self {
            Quality::Diminished => 0,
            Quality::Minor => 1,
            Quality::Major | Quality::Perfect => 2,
            Quality::Augmented => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Ascending or unison.
    Ascending,
    Descending,
}

/// Whether labels use the octave-reduced simple size or the true compound
/// size. The two string literals are the only recognized mode values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SimpleOrCompound {
    Simple,
    Compound,
}

impl SimpleOrCompound {
    pub fn is_simple(&self) -> bool {
        matches!(self, SimpleOrCompound::Simple)
    }
}

impl std::str::FromStr for SimpleOrCompound {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "simple" => Ok(SimpleOrCompound::Simple),
            "compound" => Ok(SimpleOrCompound::Compound),
            other => Err(AnalysisError::InvalidMode(format!(
                "mode must be \"simple\" or \"compound\", not '{}'",
                other
            ))),
        }
    }
}

/// A directed interval with quality and generic size, optionally anchored on
/// the two pitches it was observed between.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub quality: Quality,
    /// Generic size, 1-based; compound sizes exceed 8.
    pub size: u32,
    pub direction: Direction,
    start: Option<Pitch>,
    end: Option<Pitch>,
}

/// Expected semitone span of a Perfect/Major interval of the given generic
/// size, used to derive quality from anchor pitches.
fn expected_semitones(size: u32) -> i32 {
    let simple = ((size - 1) % 7) as i32; // 0-based degree within the octave
    let octaves = ((size - 1) / 7) as i32;
    let base = match simple {
        0 => 0,  // unison / octave
        1 => 2,  // second
        2 => 4,  // third
        3 => 5,  // fourth
        4 => 7,  // fifth
        5 => 9,  // sixth
        _ => 11, // seventh
    };
    base + 12 * octaves
}

/// Whether the generic size belongs to the perfect family (unison, fourth,
/// fifth and their compounds) rather than the major/minor family.
fn perfect_family(size: u32) -> bool {
    matches!((size - 1) % 7, 0 | 3 | 4)
}

impl Interval {
    /// An abstract interval with no anchor pitches. Usable for occurrence
    /// counting but not for n-gram movement computation.
    pub fn new(quality: Quality, size: u32, direction: Direction) -> Self {
        Self {
            quality,
            size,
            direction,
            start: None,
            end: None,
        }
    }

    /// The directed interval between two anchor pitches, anchors retained.
    ///
    /// The generic size comes from the staff-position span, the quality from
    /// the chromatic span measured against the expected span for that size.
    /// A chromatic deviation outside the five supported qualities is a
    /// `MalformedInterval` error.
    pub fn between(start: Pitch, end: Pitch) -> Result<Self> {
        let span = end.diatonic_index() - start.diatonic_index();
        let semitones = end.midi_number() - start.midi_number();
        let size = span.unsigned_abs() + 1;
        let direction = if span < 0 || (span == 0 && semitones < 0) {
            Direction::Descending
        } else {
            Direction::Ascending
        };
        let deviation = semitones.abs() - expected_semitones(size);
        let quality = if perfect_family(size) {
            match deviation {
                -1 => Quality::Diminished,
                0 => Quality::Perfect,
                1 => Quality::Augmented,
                _ => {
                    return Err(AnalysisError::MalformedInterval(format!(
                        "no quality for generic {} spanning {} semitones ({} to {})",
                        size, semitones, start, end
                    )))
                }
            }
        } else {
            match deviation {
                -2 => Quality::Diminished,
                -1 => Quality::Minor,
                0 => Quality::Major,
                1 => Quality::Augmented,
                _ => {
                    return Err(AnalysisError::MalformedInterval(format!(
                        "no quality for generic {} spanning {} semitones ({} to {})",
                        size, semitones, start, end
                    )))
                }
            }
        };
        Ok(Self {
            quality,
            size,
            direction,
            start: Some(start),
            end: Some(end),
        })
    }

    pub fn start(&self) -> Option<Pitch> {
        self.start
    }

    pub fn end(&self) -> Option<Pitch> {
        self.end
    }

    /// The anchor of the lower voice: the start pitch for ascending or unison
    /// intervals, the end pitch for descending ones. Melodic movement between
    /// consecutive vertical intervals is measured between these.
    pub fn reference_pitch(&self) -> Option<Pitch> {
        match self.direction {
            Direction::Ascending => self.start,
            Direction::Descending => self.end,
        }
    }

    pub fn is_descending(&self) -> bool {
        self.direction == Direction::Descending
    }

    pub fn is_unison(&self) -> bool {
        self.size == 1 && self.quality == Quality::Perfect
    }

    /// Octave reduction to 1..=8 keeping octave multiples at 8
    /// (10 -> 3, 15 -> 8, 8 -> 8, 1 -> 1).
    pub fn simple_size(&self) -> u32 {
        if self.size == 1 {
            return 1;
        }
        let r = (self.size - 1) % 7;
        if r == 0 {
            8
        } else {
            r + 1
        }
    }

    fn label_size(&self, simple: bool) -> u32 {
        if simple {
            self.simple_size()
        } else {
            self.size
        }
    }

    /// Plain unsigned label: `"m3"` with quality, `"3"` without.
    pub fn name(&self, heed_quality: bool, simple: bool) -> String {
        let size = self.label_size(simple);
        if heed_quality {
            format!("{}{}", self.quality.letter(), size)
        } else {
            size.to_string()
        }
    }

    /// Canonical label with a leading `-` when descending: `"-M10"`.
    pub fn canonical(&self, simple: bool) -> String {
        let name = self.name(true, simple);
        if self.is_descending() {
            format!("-{}", name)
        } else {
            name
        }
    }

    /// Canonical (simple, compound) label pair.
    pub fn normalize(&self) -> (String, String) {
        (self.canonical(true), self.canonical(false))
    }

    /// Store-key label with the descending sign between quality letter and
    /// digits: `"M-3"`, never `"-M3"`. This asymmetry is an exact contract.
    pub fn counting_label(&self, simple: bool) -> String {
        let size = self.label_size(simple);
        if self.is_descending() {
            format!("{}-{}", self.quality.letter(), size)
        } else {
            format!("{}{}", self.quality.letter(), size)
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical(false))
    }
}

/// Removes the quality letter from a label, keeping any direction sign in
/// place. Digit-only or sign-and-digit labels come back unchanged.
pub fn strip_quality(label: &str) -> String {
    let mut removed = false;
    label
        .chars()
        .filter(|c| {
            if !removed && Quality::from_letter(*c).is_some() {
                removed = true;
                false
            } else {
                true
            }
        })
        .collect()
}

fn split_label(label: &str) -> (Option<Quality>, u32) {
    let mut chars = label.chars();
    match chars.clone().next().and_then(Quality::from_letter) {
        Some(q) => {
            chars.next();
            (Some(q), chars.as_str().parse().unwrap_or(0))
        }
        None => (None, label.parse().unwrap_or(0)),
    }
}

/// Total order over interval labels: generic size first, then quality rank
/// (d < m < M = P < A), with quality-less labels ranked as Perfect. Direction
/// signs anywhere in the label are irrelevant and stripped.
pub fn interval_sorter(x: &str, y: &str) -> Ordering {
    let xs: String = x.chars().filter(|c| *c != '+' && *c != '-').collect();
    let ys: String = y.chars().filter(|c| *c != '+' && *c != '-').collect();
    if xs == ys {
        return Ordering::Equal;
    }
    let (x_quality, x_size) = split_label(&xs);
    let (y_quality, y_size) = split_label(&ys);
    match x_size.cmp(&y_size) {
        Ordering::Equal => {}
        unequal => return unequal,
    }
    let x_rank = x_quality.unwrap_or(Quality::Perfect).rank();
    let y_rank = y_quality.unwrap_or(Quality::Perfect).rank();
    x_rank.cmp(&y_rank)
}
