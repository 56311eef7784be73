//! Anchor pitches for interval observations
//!
//! An interval observation is anchored on two pitches. The statistics engine
//! never interprets pitches musically beyond two ordinals: the diatonic index
//! (staff position, which fixes generic interval size and direction) and the
//! MIDI number (chromatic position, which fixes interval quality).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AnalysisError;

/// The seven letter names, C-based so the octave boundary falls between B and C.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Letter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Letter {
    /// Diatonic degree within the octave (C = 0 .. B = 6).
    pub fn degree(&self) -> i32 {
        match self {
            Letter::C => 0,
            Letter::D => 1,
            Letter::E => 2,
            Letter::F => 3,
            Letter::G => 4,
            Letter::A => 5,
            Letter::B => 6,
        }
    }

    /// Semitones above C for the natural letter.
    pub fn semitone(&self) -> i32 {
        match self {
            Letter::C => 0,
            Letter::D => 2,
            Letter::E => 4,
            Letter::F => 5,
            Letter::G => 7,
            Letter::A => 9,
            Letter::B => 11,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Letter::C => "C",
            Letter::D => "D",
            Letter::E => "E",
            Letter::F => "F",
            Letter::G => "G",
            Letter::A => "A",
            Letter::B => "B",
        }
    }
}

/// A concrete pitch in scientific notation: letter, accidental offset in
/// semitones (`#` = +1, `b` = -1, doubles allowed), octave with C4 = middle C.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pitch {
    pub letter: Letter,
    pub accidental: i8,
    pub octave: i8,
}

impl Pitch {
    pub fn new(letter: Letter, accidental: i8, octave: i8) -> Self {
        Self {
            letter,
            accidental,
            octave,
        }
    }

    /// Absolute staff-position ordinal. Consecutive values are a generic
    /// second apart; the difference of two indexes is the generic interval
    /// span regardless of accidentals.
    pub fn diatonic_index(&self) -> i32 {
        self.octave as i32 * 7 + self.letter.degree()
    }

    /// Absolute chromatic position (C4 = 60).
    pub fn midi_number(&self) -> i32 {
        (self.octave as i32 + 1) * 12 + self.letter.semitone() + self.accidental as i32
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter.as_str())?;
        if self.accidental >= 0 {
            for _ in 0..self.accidental {
                write!(f, "#")?;
            }
        } else {
            for _ in 0..-self.accidental {
                write!(f, "b")?;
            }
        }
        write!(f, "{}", self.octave)
    }
}

impl FromStr for Pitch {
    type Err = AnalysisError;

    /// Parses forms like `"A4"`, `"C#5"`, `"G##5"`, `"Eb3"`, `"Bbb2"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || AnalysisError::MalformedInterval(format!("unparseable pitch '{}'", s));
        let mut chars = s.chars().peekable();
        let letter = match chars.next().map(|c| c.to_ascii_uppercase()) {
            Some('C') => Letter::C,
            Some('D') => Letter::D,
            Some('E') => Letter::E,
            Some('F') => Letter::F,
            Some('G') => Letter::G,
            Some('A') => Letter::A,
            Some('B') => Letter::B,
            _ => return Err(bad()),
        };
        let mut accidental: i8 = 0;
        while let Some(&c) = chars.peek() {
            match c {
                '#' => accidental += 1,
                'b' => accidental -= 1,
                _ => break,
            }
            chars.next();
        }
        let rest: String = chars.collect();
        let octave = rest.parse::<i8>().map_err(|_| bad())?;
        Ok(Pitch::new(letter, accidental, octave))
    }
}
