//! Hap (happening): one event produced by querying a pattern.
//!
//! `whole` is the full logical extent of the event, `part` the fragment of it
//! that falls inside the query. Events cut by a query boundary have
//! `part != whole`; only the fragment containing `whole.begin` has an onset.

use super::{Fraction, TimeSpan};

/// Byte range in the notation source that produced an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct SourceSpan {
    pub start: usize,
    pub end: usize,
}

impl SourceSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Move the span by `offset` bytes (can be negative).
    pub fn shifted(&self, offset: isize) -> Self {
        Self {
            start: self.start.saturating_add_signed(offset),
            end: self.end.saturating_add_signed(offset),
        }
    }

    pub fn to_tuple(&self) -> (usize, usize) {
        (self.start, self.end)
    }
}

/// Metadata travelling with a hap, for editor highlighting.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HapContext {
    pub source_span: Option<SourceSpan>,
}

impl HapContext {
    pub fn with_span(span: SourceSpan) -> Self {
        Self {
            source_span: Some(span),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Hap<T> {
    /// Full extent of the event.
    pub whole: Option<TimeSpan>,
    /// Portion visible in the current query.
    pub part: TimeSpan,
    pub value: T,
    pub context: HapContext,
}

impl<T: Clone> Hap<T> {
    pub fn new(whole: Option<TimeSpan>, part: TimeSpan, value: T) -> Self {
        Self {
            whole,
            part,
            value,
            context: HapContext::default(),
        }
    }

    pub fn with_context(
        whole: Option<TimeSpan>,
        part: TimeSpan,
        value: T,
        context: HapContext,
    ) -> Self {
        Self {
            whole,
            part,
            value,
            context,
        }
    }

    /// True if this fragment contains the start of the event.
    pub fn has_onset(&self) -> bool {
        match &self.whole {
            Some(whole) => whole.begin == self.part.begin,
            None => false,
        }
    }

    pub fn whole_or_part(&self) -> &TimeSpan {
        self.whole.as_ref().unwrap_or(&self.part)
    }

    pub fn whole_duration(&self) -> Option<Fraction> {
        self.whole.as_ref().map(TimeSpan::duration)
    }

    /// Transform the value, keeping timing and context.
    pub fn with_value<U, F>(&self, f: F) -> Hap<U>
    where
        F: FnOnce(&T) -> U,
    {
        Hap {
            whole: self.whole.clone(),
            part: self.part.clone(),
            value: f(&self.value),
            context: self.context.clone(),
        }
    }

    /// Transform both `whole` and `part`.
    pub fn with_span_transform<F>(&self, f: F) -> Hap<T>
    where
        F: Fn(&TimeSpan) -> TimeSpan,
    {
        Hap {
            whole: self.whole.as_ref().map(&f),
            part: f(&self.part),
            value: self.value.clone(),
            context: self.context.clone(),
        }
    }
}
