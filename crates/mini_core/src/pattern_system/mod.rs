//! Cyclic pattern algebra.
//!
//! A `Pattern<T>` is a lazy query function: given a span of time it returns
//! the events (haps) active in that span. Time is measured in cycles and kept
//! exact with rational numbers, so patterns can be sequenced, stacked and
//! rescaled without ever materializing a timeline.
//!
//! # Example
//!
//! ```
//! use mini_core::pattern_system::{Fraction, pure, sequence};
//!
//! let pat = sequence(vec![pure(0), pure(1), pure(2)]);
//! let haps = pat.query_arc(Fraction::from_integer(0), Fraction::from_integer(1));
//! assert_eq!(haps.len(), 3);
//! ```

mod fraction;
mod hap;
mod state;
mod timespan;

pub mod combinators;
pub mod constructors;
pub mod temporal;

pub use fraction::Fraction;
pub use hap::{Hap, HapContext, SourceSpan};
pub use state::State;
pub use timespan::TimeSpan;

pub use combinators::{fastcat, sequence, slowcat, stack};
pub use constructors::{pure, pure_with_span, silence};

use std::sync::Arc;

/// The query function type: takes a State, returns events.
pub type QueryFn<T> = Arc<dyn Fn(&State) -> Vec<Hap<T>> + Send + Sync>;

/// A lazy, query-based generator of time-varying values.
///
/// Cloning is cheap: clones share the query closure.
#[derive(Clone)]
pub struct Pattern<T> {
    query: QueryFn<T>,
}

impl<T: Clone + Send + Sync + 'static> Pattern<T> {
    pub fn new<F>(query: F) -> Self
    where
        F: Fn(&State) -> Vec<Hap<T>> + Send + Sync + 'static,
    {
        Pattern {
            query: Arc::new(query),
        }
    }

    pub fn query(&self, state: &State) -> Vec<Hap<T>> {
        (self.query)(state)
    }

    /// Query for the events between `begin` and `end`.
    pub fn query_arc(&self, begin: Fraction, end: Fraction) -> Vec<Hap<T>> {
        self.query(&State::new(TimeSpan::new(begin, end)))
    }

    /// Events of a single cycle, sorted by onset.
    pub fn query_cycle(&self, cycle: i64) -> Vec<Hap<T>> {
        let mut haps = self.query(&State::new(TimeSpan::from_integers(cycle, cycle + 1)));
        haps.sort_by(|a, b| a.part.begin.cmp(&b.part.begin));
        haps
    }

    /// Map a function over every value, leaving timing untouched.
    pub fn fmap<U, F>(&self, f: F) -> Pattern<U>
    where
        U: Clone + Send + Sync + 'static,
        F: Fn(&T) -> U + Send + Sync + 'static,
    {
        let query = self.query.clone();
        Pattern::new(move |state| {
            query(state)
                .into_iter()
                .map(|hap| hap.with_value(&f))
                .collect()
        })
    }

    /// Split queries at cycle boundaries, so the inner query never spans
    /// more than one cycle.
    pub fn split_queries(&self) -> Pattern<T> {
        let query = self.query.clone();
        Pattern::new(move |state| {
            state
                .span
                .span_cycles()
                .into_iter()
                .flat_map(|span| query(&state.set_span(span)))
                .collect()
        })
    }

    /// Transform the query span before it reaches this pattern.
    pub fn with_query_time<F>(&self, f: F) -> Pattern<T>
    where
        F: Fn(&Fraction) -> Fraction + Send + Sync + 'static,
    {
        let query = self.query.clone();
        Pattern::new(move |state| query(&state.set_span(state.span.with_time(&f))))
    }

    /// Transform the spans of every returned hap.
    pub fn with_hap_time<F>(&self, f: F) -> Pattern<T>
    where
        F: Fn(&Fraction) -> Fraction + Send + Sync + 'static,
    {
        let query = self.query.clone();
        Pattern::new(move |state| {
            query(state)
                .into_iter()
                .map(|hap| hap.with_span_transform(|span| span.with_time(&f)))
                .collect()
        })
    }
}

impl<T> std::fmt::Debug for Pattern<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Pattern { .. }")
    }
}
