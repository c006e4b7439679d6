//! Query context for pattern evaluation.

use super::TimeSpan;

/// What a pattern is being asked about: the span of time to return events for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct State {
    pub span: TimeSpan,
}

impl State {
    pub fn new(span: TimeSpan) -> Self {
        Self { span }
    }

    /// Same query, different span.
    pub fn set_span(&self, span: TimeSpan) -> Self {
        Self { span }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern_system::Fraction;

    #[test]
    fn test_state_set_span() {
        let state = State::new(TimeSpan::from_integers(0, 1));
        let moved = state.set_span(TimeSpan::new(Fraction::new(1, 2), Fraction::one()));

        assert_eq!(moved.span.begin, Fraction::new(1, 2));
        assert_eq!(state.span, TimeSpan::from_integers(0, 1));
    }
}
