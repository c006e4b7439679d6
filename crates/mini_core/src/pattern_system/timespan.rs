//! Half-open time intervals.

use super::Fraction;

/// Half-open time interval `[begin, end)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimeSpan {
    pub begin: Fraction,
    pub end: Fraction,
}

impl TimeSpan {
    pub fn new(begin: Fraction, end: Fraction) -> Self {
        Self { begin, end }
    }

    pub fn from_integers(begin: i64, end: i64) -> Self {
        Self::new(Fraction::from_integer(begin), Fraction::from_integer(end))
    }

    pub fn duration(&self) -> Fraction {
        &self.end - &self.begin
    }

    /// Split the span at cycle boundaries.
    ///
    /// `[1/2, 5/2)` becomes `[1/2, 1)`, `[1, 2)`, `[2, 5/2)`. A zero-width
    /// span is returned as-is; a reversed span yields nothing.
    pub fn span_cycles(&self) -> Vec<TimeSpan> {
        if self.begin == self.end {
            return vec![self.clone()];
        }

        let mut spans = Vec::new();
        let mut begin = self.begin.clone();
        let end_sam = self.end.sam();

        while self.end > begin {
            if begin.sam() == end_sam {
                spans.push(TimeSpan::new(begin, self.end.clone()));
                break;
            }
            let next_begin = begin.next_sam();
            spans.push(TimeSpan::new(begin, next_begin.clone()));
            begin = next_begin;
        }

        spans
    }

    /// Intersection of two spans, `None` if they are disjoint.
    ///
    /// A point intersection sitting on the exclusive end of a non-empty
    /// span does not count.
    pub fn intersection(&self, other: &TimeSpan) -> Option<TimeSpan> {
        let begin = self.begin.max_of(&other.begin);
        let end = self.end.min_of(&other.end);

        if begin > end {
            return None;
        }

        if begin == end {
            if begin == self.end && self.begin < self.end {
                return None;
            }
            if begin == other.end && other.begin < other.end {
                return None;
            }
        }

        Some(TimeSpan::new(begin, end))
    }

    /// Apply a function to both ends.
    pub fn with_time<F>(&self, f: F) -> TimeSpan
    where
        F: Fn(&Fraction) -> Fraction,
    {
        TimeSpan::new(f(&self.begin), f(&self.end))
    }

    pub fn contains(&self, time: &Fraction) -> bool {
        time >= &self.begin && time < &self.end
    }
}

impl Default for TimeSpan {
    fn default() -> Self {
        TimeSpan::from_integers(0, 1)
    }
}

impl std::fmt::Display for TimeSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.begin, self.end)
    }
}
