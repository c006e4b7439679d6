//! Speed scaling.
//!
//! `fast(n)` squeezes `n` cycles of the pattern into one; `slow(n)` stretches
//! one cycle over `n`. For any positive `n`, `p.slow(n).fast(n)` has the same
//! events as `p`.

use super::{Fraction, Pattern, constructors::silence};

impl<T: Clone + Send + Sync + 'static> Pattern<T> {
    /// Speed the pattern up by `factor`.
    ///
    /// A non-positive factor has no meaningful timing and yields silence.
    pub fn fast(&self, factor: Fraction) -> Pattern<T> {
        if !factor.is_positive() {
            return silence();
        }
        if factor.is_one() {
            return self.clone();
        }

        let query_factor = factor.clone();
        self.with_query_time(move |t| t * &query_factor)
            .with_hap_time(move |t| t / &factor)
    }

    /// Slow the pattern down by `factor`.
    pub fn slow(&self, factor: Fraction) -> Pattern<T> {
        match factor.recip() {
            Some(speed) => self.fast(speed),
            None => silence(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern_system::{TimeSpan, pure, sequence};

    #[test]
    fn test_fast() {
        let haps = pure(42).fast(Fraction::from_integer(2)).query_cycle(0);

        assert_eq!(haps.len(), 2);
        assert_eq!(haps[0].whole, Some(TimeSpan::new(Fraction::zero(), Fraction::new(1, 2))));
    }

    #[test]
    fn test_slow() {
        let haps = pure(42).slow(Fraction::from_integer(2)).query_cycle(0);

        // One event spanning two cycles, cut by the query.
        assert_eq!(haps.len(), 1);
        assert_eq!(haps[0].whole_duration(), Some(Fraction::from_integer(2)));
        assert!(haps[0].has_onset());
    }

    #[test]
    fn test_slow_then_fast_is_identity() {
        let pat = sequence(vec![pure(1), pure(2), pure(3)]);
        let amount = Fraction::new(3, 2);
        let round_trip = pat.slow(amount.clone()).fast(amount);

        for cycle in 0..3 {
            assert_eq!(pat.query_cycle(cycle), round_trip.query_cycle(cycle));
        }
    }

    #[test]
    fn test_non_positive_factor() {
        assert!(pure(1).fast(Fraction::zero()).query_cycle(0).is_empty());
        assert!(pure(1).fast(Fraction::from_integer(-1)).query_cycle(0).is_empty());
        assert!(pure(1).slow(Fraction::zero()).query_cycle(0).is_empty());
    }
}
