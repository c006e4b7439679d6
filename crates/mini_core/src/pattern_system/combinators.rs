//! Combining several patterns into one.
//!
//! - `stack` - play patterns simultaneously
//! - `slowcat` - one pattern per cycle
//! - `fastcat` / `sequence` - all patterns within one cycle, equal shares

use super::{Fraction, Pattern, State, constructors::silence};

/// Play multiple patterns simultaneously.
///
/// Stacking never moves events in time: each layer answers the same query.
pub fn stack<T: Clone + Send + Sync + 'static>(pats: Vec<Pattern<T>>) -> Pattern<T> {
    match pats.len() {
        0 => silence(),
        1 => pats.into_iter().next().unwrap_or_else(silence),
        _ => Pattern::new(move |state: &State| {
            pats.iter().flat_map(|pat| pat.query(state)).collect()
        }),
    }
}

/// Concatenate patterns, one pattern per cycle.
///
/// Cycle `c` plays pattern `c mod n`. Each pattern keeps its own cycle
/// count, so the second pattern's first turn plays its cycle 0, not its
/// cycle 1.
pub fn slowcat<T: Clone + Send + Sync + 'static>(pats: Vec<Pattern<T>>) -> Pattern<T> {
    if pats.is_empty() {
        return silence();
    }

    let n = pats.len() as i64;
    let n_frac = Fraction::from_integer(n);

    Pattern::new(move |state: &State| {
        state
            .span
            .span_cycles()
            .into_iter()
            .flat_map(|subspan| {
                let cycle = subspan.begin.sam();
                let index = cycle.to_f64() as i64;
                let pat = &pats[index.rem_euclid(n) as usize];

                // Shift so the chosen pattern sees its own consecutive cycles.
                let offset = &cycle - (&cycle / &n_frac).floor();
                pat.query(&state.set_span(subspan.with_time(|t| t - &offset)))
                    .into_iter()
                    .map(|hap| hap.with_span_transform(|span| span.with_time(|t| t + &offset)))
                    .collect::<Vec<_>>()
            })
            .collect()
    })
}

/// Concatenate patterns within one cycle, each taking `1/n` of it.
///
/// # Example
/// ```
/// use mini_core::pattern_system::{fastcat, pure};
///
/// let haps = fastcat(vec![pure(0), pure(1), pure(2)]).query_cycle(0);
/// assert_eq!(haps[1].value, 1);
/// ```
pub fn fastcat<T: Clone + Send + Sync + 'static>(pats: Vec<Pattern<T>>) -> Pattern<T> {
    match pats.len() {
        0 => silence(),
        1 => pats.into_iter().next().unwrap_or_else(silence),
        n => slowcat(pats).fast(Fraction::from(n)),
    }
}

/// Alias for fastcat (Tidal/Strudel naming).
pub fn sequence<T: Clone + Send + Sync + 'static>(pats: Vec<Pattern<T>>) -> Pattern<T> {
    fastcat(pats)
}
