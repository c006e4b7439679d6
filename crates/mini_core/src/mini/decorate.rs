//! Per-element operators and options.

use crate::pattern_system::Pattern;
use crate::value::Value;

use super::ast::{Operator, Options};
use super::compile::CompileError;
use super::diagnostics::{Diagnostic, Diagnostics};

pub type OperatorFn = fn(Pattern<Value>, &Operator) -> Result<Pattern<Value>, CompileError>;

/// Operators the compiler knows how to apply.
const OPERATORS: &[(&str, OperatorFn)] = &[("stretch", stretch)];

/// Option keys consumed by [`decorate`]; anything else is reported.
pub const HANDLED_OPTION_KEYS: &[&str] = &["operator"];

pub fn lookup_operator(kind: &str) -> Option<OperatorFn> {
    OPERATORS
        .iter()
        .find(|(name, _)| *name == kind)
        .map(|(_, apply)| *apply)
}

/// Apply an element's options to its compiled pattern.
///
/// Unknown operators and unhandled keys are reported and otherwise ignored;
/// an operator with bad arguments fails the element.
pub fn decorate(
    pattern: Pattern<Value>,
    options: Option<&Options>,
    diagnostics: &Diagnostics,
) -> Result<Pattern<Value>, CompileError> {
    let Some(options) = options else {
        return Ok(pattern);
    };

    let mut pattern = pattern;
    if let Some(operator) = &options.operator {
        match lookup_operator(&operator.kind) {
            Some(apply) => pattern = apply(pattern, operator)?,
            None => diagnostics.report(Diagnostic::UnimplementedOperator {
                operator: operator.kind.clone(),
            }),
        }
    }

    let unhandled: Vec<String> = options
        .keys()
        .into_iter()
        .filter(|key| !HANDLED_OPTION_KEYS.contains(&key.as_str()))
        .collect();
    if !unhandled.is_empty() {
        diagnostics.report(Diagnostic::UnimplementedOptions { keys: unhandled });
    }

    Ok(pattern)
}

/// `amount` is a duration multiplier, so the pattern is sped up by its inverse.
fn stretch(pattern: Pattern<Value>, operator: &Operator) -> Result<Pattern<Value>, CompileError> {
    let amount = operator
        .arguments
        .amount
        .as_ref()
        .ok_or_else(|| CompileError::MissingArgument {
            operator: operator.kind.clone(),
            argument: "amount",
        })?;

    match amount.recip() {
        Some(speed) if amount.is_positive() => Ok(pattern.fast(speed)),
        _ => Err(CompileError::InvalidStretchAmount {
            amount: amount.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mini::ast::Euclid;
    use crate::pattern_system::{Fraction, TimeSpan, pure};

    #[test]
    fn test_no_options_is_identity() {
        let diagnostics = Diagnostics::new();
        let pat = decorate(pure(Value::text("c")), None, &diagnostics).unwrap();
        assert_eq!(pat.query_cycle(0).len(), 1);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_stretch_halves_duration() {
        let diagnostics = Diagnostics::new();
        let options = Options::with_operator(Operator::stretch(Fraction::new(1, 2)));
        let pat = decorate(pure(Value::text("c")), Some(&options), &diagnostics).unwrap();

        let haps = pat.query_cycle(0);
        assert_eq!(haps.len(), 2);
        assert_eq!(haps[0].whole, Some(TimeSpan::new(Fraction::zero(), Fraction::new(1, 2))));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_stretch_rejects_bad_amounts() {
        let diagnostics = Diagnostics::new();

        let zero = Options::with_operator(Operator::stretch(Fraction::zero()));
        assert_eq!(
            decorate(pure(Value::text("c")), Some(&zero), &diagnostics).unwrap_err(),
            CompileError::InvalidStretchAmount {
                amount: Fraction::zero()
            }
        );

        let negative = Options::with_operator(Operator::stretch(Fraction::from_integer(-2)));
        assert!(decorate(pure(Value::text("c")), Some(&negative), &diagnostics).is_err());

        let missing = Options::with_operator(Operator::new("stretch", None));
        assert!(matches!(
            decorate(pure(Value::text("c")), Some(&missing), &diagnostics),
            Err(CompileError::MissingArgument { argument: "amount", .. })
        ));
    }

    #[test]
    fn test_unknown_operator_reported() {
        let diagnostics = Diagnostics::new();
        let options = Options::with_operator(Operator::new("degrade", None));
        let pat = decorate(pure(Value::text("c")), Some(&options), &diagnostics).unwrap();

        assert_eq!(pat.query_cycle(0).len(), 1);
        assert_eq!(
            diagnostics.snapshot(),
            vec![Diagnostic::UnimplementedOperator {
                operator: "degrade".to_string()
            }]
        );
    }

    #[test]
    fn test_unhandled_keys_batched() {
        let diagnostics = Diagnostics::new();
        let options = Options {
            weight: Some(Fraction::from_integer(3)),
            euclid: Some(Euclid {
                pulses: 3,
                steps: 8,
                rotation: None,
            }),
            ..Options::default()
        };
        decorate(pure(Value::text("c")), Some(&options), &diagnostics).unwrap();

        assert_eq!(
            diagnostics.snapshot(),
            vec![Diagnostic::UnimplementedOptions {
                keys: vec!["weight".to_string(), "euclid".to_string()]
            }]
        );
    }
}
