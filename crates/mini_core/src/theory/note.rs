//! Spelled pitches (`C4`, `Eb3`, `F#`).

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::{Interval, TheoryError};

const LETTERS: [char; 7] = ['C', 'D', 'E', 'F', 'G', 'A', 'B'];
const NATURAL_SEMITONES: [i32; 7] = [0, 2, 4, 5, 7, 9, 11];

lazy_static! {
    static ref NOTE_NAME: Regex = Regex::new(r"^([a-gA-G])(#+|b+|x+|)(-?\d+)?$").unwrap();
}

/// A note name: letter, alteration and optional octave.
///
/// Without an octave the pitch is a pitch class and stays one when
/// transposed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pitch {
    /// Letter index, C = 0 through B = 6.
    step: u8,
    /// Sharps (positive) or flats (negative).
    alteration: i32,
    octave: Option<i32>,
}

impl Pitch {
    /// Middle C, the fallback scale tonic.
    pub const C4: Pitch = Pitch {
        step: 0,
        alteration: 0,
        octave: Some(4),
    };

    pub fn parse(name: &str) -> Result<Pitch, TheoryError> {
        let invalid = || TheoryError::InvalidNote(name.to_string());
        let caps = NOTE_NAME.captures(name.trim()).ok_or_else(invalid)?;

        let letter = caps[1].to_ascii_uppercase();
        let step = LETTERS
            .iter()
            .position(|c| letter.starts_with(*c))
            .ok_or_else(invalid)? as u8;

        let accidentals = &caps[2];
        let count = accidentals.len() as i32;
        let alteration = match accidentals.chars().next() {
            Some('#') => count,
            Some('x') => 2 * count,
            Some('b') => -count,
            _ => 0,
        };

        let octave = match caps.get(3) {
            Some(m) => Some(m.as_str().parse::<i32>().map_err(|_| invalid())?),
            None => None,
        };

        Ok(Pitch {
            step,
            alteration,
            octave,
        })
    }

    pub fn octave(&self) -> Option<i32> {
        self.octave
    }

    /// Semitones above C of the same octave, alteration included.
    pub fn chroma(&self) -> i32 {
        NATURAL_SEMITONES[self.step as usize] + self.alteration
    }

    /// Move the pitch by a spelled interval.
    ///
    /// The letter moves by the interval's diatonic steps and the
    /// accidental absorbs whatever the semitone count needs. `None` when
    /// the octave or accidental would overflow.
    pub fn transpose(&self, interval: Interval) -> Option<Pitch> {
        let moved = i32::from(self.step).checked_add(interval.steps)?;
        let step = moved.rem_euclid(7);
        let octave_shift = moved.div_euclid(7);

        let target = self.chroma().checked_add(interval.semitones)?;
        let natural = octave_shift
            .checked_mul(12)?
            .checked_add(NATURAL_SEMITONES[step as usize])?;
        let octave = match self.octave {
            Some(o) => Some(o.checked_add(octave_shift)?),
            None => None,
        };

        Some(Pitch {
            step: step as u8,
            alteration: target.checked_sub(natural)?,
            octave,
        })
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", LETTERS[self.step as usize])?;
        let accidental = if self.alteration >= 0 { "#" } else { "b" };
        f.write_str(&accidental.repeat(self.alteration.unsigned_abs() as usize))?;
        if let Some(octave) = self.octave {
            write!(f, "{}", octave)?;
        }
        Ok(())
    }
}

impl FromStr for Pitch {
    type Err = TheoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pitch::parse(s)
    }
}

impl Serialize for Pitch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Pitch {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Pitch::parse(&name).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(name: &str) -> Pitch {
        Pitch::parse(name).unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!(p("C4"), Pitch::C4);
        assert_eq!(p("eb3").to_string(), "Eb3");
        assert_eq!(p("F#").to_string(), "F#");
        assert_eq!(p("Cx2").to_string(), "C##2");
        assert_eq!(p("Bbb-1").to_string(), "Bbb-1");
        assert!(Pitch::parse("H4").is_err());
        assert!(Pitch::parse("major").is_err());
        assert!(Pitch::parse("").is_err());
    }

    fn up(pitch: Pitch, interval: Interval) -> String {
        pitch.transpose(interval).unwrap().to_string()
    }

    #[test]
    fn test_transpose_spelling() {
        let c4 = Pitch::C4;
        assert_eq!(up(c4, Interval::new(2, 4)), "E4");
        assert_eq!(up(c4, Interval::new(2, 3)), "Eb4");
        assert_eq!(up(c4, Interval::OCTAVE), "C5");
        assert_eq!(up(c4, Interval::new(-3, -5)), "G3");
        assert_eq!(up(p("B3"), Interval::new(1, 1)), "C4");
        assert_eq!(up(p("D"), Interval::new(2, 3)), "F");
    }

    #[test]
    fn test_transpose_pitch_class_ignores_octaves() {
        assert_eq!(p("E").transpose(Interval::new(-14, -24)), Some(p("E")));
    }

    #[test]
    fn test_transpose_out_of_range() {
        assert_eq!(Pitch::C4.transpose(Interval::new(i32::MAX, 0)), None);
        assert_eq!(p("B").transpose(Interval::new(0, i32::MAX)), None);
        assert_eq!(p("C2147483647").transpose(Interval::OCTAVE), None);
    }

    #[test]
    fn test_serde() {
        let pitch: Pitch = serde_json::from_str("\"G2\"").unwrap();
        assert_eq!(pitch, p("G2"));
        assert!(serde_json::from_str::<Pitch>("\"Q\"").is_err());
    }
}
