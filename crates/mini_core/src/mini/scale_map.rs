//! Reading event values as scale steps.

use crate::theory::{Interval, Pitch};
use crate::value::Value;

use super::diagnostics::{Diagnostic, Diagnostics};

/// Pitch of `step` in the scale built from `tonic` and `intervals`.
///
/// Steps wrap around the scale an octave at a time in both directions:
/// with seven intervals, step 7 is the tonic an octave up and step -1 is the
/// last degree an octave down. Non-integer steps give the tonic. `None` when
/// the step is too far from the tonic to name a pitch.
pub fn step_to_pitch(tonic: &Pitch, intervals: &[Interval], step: f64) -> Option<Pitch> {
    if !step.is_finite() {
        return None;
    }
    if intervals.is_empty() || step.fract() != 0.0 {
        return Some(*tonic);
    }
    tonic.transpose(step_interval(intervals, step)?)
}

fn step_interval(intervals: &[Interval], step: f64) -> Option<Interval> {
    let len = intervals.len() as i64;
    let step = step as i64;

    let octaves = i32::try_from(step.div_euclid(len)).ok()?;
    let index = step.rem_euclid(len) as usize;

    intervals.get(index)?.checked_add(Interval::octaves(octaves)?)
}

/// Map one event value, reporting values that are not numbers or that fall
/// outside the pitch range. Reported values pass through unchanged.
pub fn map_value(
    tonic: &Pitch,
    intervals: &[Interval],
    value: &Value,
    diagnostics: &Diagnostics,
) -> Value {
    let Some(step) = value.as_number() else {
        diagnostics.report(Diagnostic::NonNumericScaleStep {
            step: value.to_string(),
        });
        return value.clone();
    };

    match step_to_pitch(tonic, intervals, step) {
        Some(pitch) => Value::Text(pitch.to_string()),
        None => {
            diagnostics.report(Diagnostic::ScaleStepOutOfRange {
                step: value.to_string(),
            });
            value.clone()
        }
    }
}
