//! Spelled intervals.
//!
//! An interval is a pair of diatonic steps and chromatic semitones, which is
//! what keeps `C + 3m` spelled `Eb` rather than `D#`. Both components add
//! independently, so interval addition is plain vector addition.

use std::fmt;
use std::ops::{Add, Neg};

/// Semitones of the major/perfect interval for each simple step.
const NATURAL_SEMITONES: [i32; 7] = [0, 2, 4, 5, 7, 9, 11];

/// Diatonic step and quality chosen for each semitone count inside an octave.
const SEMITONE_STEPS: [i32; 12] = [0, 1, 1, 2, 2, 3, 4, 4, 5, 5, 6, 6];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Interval {
    /// Diatonic distance, 0 for a unison, 7 for an octave.
    pub steps: i32,
    pub semitones: i32,
}

impl Interval {
    pub const UNISON: Interval = Interval::new(0, 0);
    pub const OCTAVE: Interval = Interval::new(7, 12);

    pub const fn new(steps: i32, semitones: i32) -> Self {
        Self { steps, semitones }
    }

    /// The conventional spelling of a semitone count:
    /// `1P 2m 2M 3m 3M 4P 5d 5P 6m 6M 7m 7M`, extended by octaves and
    /// mirrored for negative counts.
    pub fn from_semitones(semitones: i32) -> Self {
        let magnitude = semitones.abs();
        let octaves = magnitude / 12;
        let steps = SEMITONE_STEPS[(magnitude % 12) as usize] + 7 * octaves;
        let interval = Interval::new(steps, magnitude);
        if semitones < 0 { -interval } else { interval }
    }

    /// Whole octaves, positive or negative. `None` past the `i32` range.
    pub fn octaves(count: i32) -> Option<Self> {
        Some(Interval::new(count.checked_mul(7)?, count.checked_mul(12)?))
    }

    pub fn checked_add(self, other: Interval) -> Option<Interval> {
        Some(Interval::new(
            self.steps.checked_add(other.steps)?,
            self.semitones.checked_add(other.semitones)?,
        ))
    }

    fn is_descending(&self) -> bool {
        self.steps < 0 || (self.steps == 0 && self.semitones < 0)
    }

    fn quality(&self) -> String {
        let simple = self.steps.rem_euclid(7);
        let octaves = self.steps.div_euclid(7);
        let alteration = self.semitones - (NATURAL_SEMITONES[simple as usize] + 12 * octaves);
        let perfect = matches!(simple, 0 | 3 | 4);

        match alteration {
            0 if perfect => "P".to_string(),
            0 => "M".to_string(),
            -1 if !perfect => "m".to_string(),
            a if a > 0 => "A".repeat(a as usize),
            a if perfect => "d".repeat((-a) as usize),
            a => "d".repeat((-a - 1) as usize),
        }
    }
}

impl Add for Interval {
    type Output = Interval;

    fn add(self, other: Interval) -> Interval {
        Interval::new(self.steps + other.steps, self.semitones + other.semitones)
    }
}

impl Neg for Interval {
    type Output = Interval;

    fn neg(self) -> Interval {
        Interval::new(-self.steps, -self.semitones)
    }
}

/// Shorthand name, e.g. `3M`, `5P`, `-8P`.
impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_descending() {
            let up = -*self;
            write!(f, "-{}{}", up.steps + 1, up.quality())
        } else {
            write!(f, "{}{}", self.steps + 1, self.quality())
        }
    }
}
