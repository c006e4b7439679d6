//! Basic pattern constructors.
//!
//! - `pure(value)` - one event per cycle
//! - `pure_with_span(value, span)` - same, tagged with its source location
//! - `silence()` - no events at all

use super::{Hap, HapContext, Pattern, SourceSpan, State};

/// A pattern that repeats a single value once per cycle.
///
/// # Example
/// ```
/// use mini_core::pattern_system::{Fraction, pure};
///
/// let haps = pure(440.0).query_arc(Fraction::from_integer(0), Fraction::from_integer(2));
/// assert_eq!(haps.len(), 2);
/// ```
pub fn pure<T: Clone + Send + Sync + 'static>(value: T) -> Pattern<T> {
    cyclic(value, HapContext::default())
}

/// Like [`pure`], with the source location attached to every hap.
pub fn pure_with_span<T: Clone + Send + Sync + 'static>(value: T, span: SourceSpan) -> Pattern<T> {
    cyclic(value, HapContext::with_span(span))
}

fn cyclic<T: Clone + Send + Sync + 'static>(value: T, context: HapContext) -> Pattern<T> {
    Pattern::new(move |state: &State| {
        state
            .span
            .span_cycles()
            .into_iter()
            .map(|subspan| {
                let whole = subspan.begin.whole_cycle();
                Hap::with_context(Some(whole), subspan, value.clone(), context.clone())
            })
            .collect()
    })
}

/// A pattern with no events.
pub fn silence<T: Clone + Send + Sync + 'static>() -> Pattern<T> {
    Pattern::new(|_state: &State| Vec::new())
}
