//! Pest parser for mini notation.
//!
//! Builds [`AstNode`] trees directly; there is no separate concrete syntax
//! tree. Element locations are byte spans into the text the caller passed in.

use pest::Parser;
use pest::error::InputLocation;
use pest::iterators::Pair;
use pest_derive::Parser;
use thiserror::Error;

use super::ast::{AstNode, ElementNode, ElementSource, Euclid, Operator, Options};
use crate::pattern_system::{Fraction, SourceSpan};
use crate::value::Value;

#[derive(Parser)]
#[grammar = "mini/grammar.pest"]
pub struct MiniParser;

#[derive(Debug, Clone, PartialEq, Error)]
#[error("parse error{}: {}", describe_span(.span), .message)]
pub struct ParseError {
    pub message: String,
    pub span: Option<SourceSpan>,
}

fn describe_span(span: &Option<SourceSpan>) -> String {
    match span {
        Some(span) => format!(" at {}-{}", span.start, span.end),
        None => String::new(),
    }
}

impl ParseError {
    fn new(message: impl Into<String>, span: Option<SourceSpan>) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }

    fn at(pair: &Pair<'_, Rule>, message: impl Into<String>) -> Self {
        let span = pair.as_span();
        Self::new(message, Some(SourceSpan::new(span.start(), span.end())))
    }

    fn shifted(self, offset: isize) -> Self {
        Self {
            span: self.span.map(|s| s.shifted(offset)),
            ..self
        }
    }
}

impl From<pest::error::Error<Rule>> for ParseError {
    fn from(err: pest::error::Error<Rule>) -> Self {
        let span = match err.location {
            InputLocation::Pos(pos) => SourceSpan::new(pos, pos),
            InputLocation::Span((start, end)) => SourceSpan::new(start, end),
        };
        ParseError::new(err.variant.message().into_owned(), Some(span))
    }
}

/// Parse raw notation: a quoted mini-notation string, optionally preceded
/// by `op args $` applications.
///
/// The root is always a pattern node; an operator expression is wrapped in
/// a one-child sequence.
pub fn parse_ast(source: &str) -> Result<AstNode, ParseError> {
    AstBuilder { offset: 0 }.program(source)
}

/// Parse bare mini notation (`c e [g a]`) as if it had been quoted.
///
/// Locations refer to `input` itself, not to the quoted text.
pub fn parse_mini(input: &str) -> Result<AstNode, ParseError> {
    let quoted = format!("\"{}\"", input);
    AstBuilder { offset: -1 }
        .program(&quoted)
        .map_err(|err| err.shifted(-1))
}

struct AstBuilder {
    /// Added to every recorded location.
    offset: isize,
}

impl AstBuilder {
    fn program(&self, source: &str) -> Result<AstNode, ParseError> {
        let program = MiniParser::parse(Rule::program, source)?
            .next()
            .ok_or_else(|| ParseError::new("empty input", None))?;
        let expression = first_inner(program)?;

        Ok(match self.expression(expression)? {
            root @ AstNode::Pattern(_) => root,
            other => AstNode::sequence(vec![other]),
        })
    }

    fn expression(&self, pair: Pair<'_, Rule>) -> Result<AstNode, ParseError> {
        match pair.as_rule() {
            Rule::quoted => self.stack_or_sequence(first_inner(pair)?),
            Rule::application => {
                let mut inner = pair.clone().into_inner();
                let (Some(call), Some(operand)) = (inner.next(), inner.next()) else {
                    return Err(ParseError::at(&pair, "incomplete operator application"));
                };
                let child = self.expression(operand)?;
                self.operator_call(call, child)
            }
            rule => Err(ParseError::at(&pair, format!("unexpected {:?}", rule))),
        }
    }

    fn operator_call(&self, call: Pair<'_, Rule>, child: AstNode) -> Result<AstNode, ParseError> {
        match call.as_rule() {
            Rule::slow_call => {
                let amount = number(first_inner(call)?)?;
                Ok(AstNode::stretch(child, amount))
            }
            Rule::fast_call => {
                // `fast 0` gets a zero amount, which the compiler rejects.
                let speed = number(first_inner(call)?)?;
                Ok(AstNode::stretch(child, speed.recip().unwrap_or_default()))
            }
            Rule::scale_call => {
                let name = first_inner(first_inner(call)?)?;
                Ok(AstNode::scale(child, name.as_str()))
            }
            Rule::named_call => {
                let name = first_inner(call)?;
                Ok(AstNode::unknown(name.as_str(), vec![child]))
            }
            rule => Err(ParseError::at(&call, format!("unexpected {:?}", rule))),
        }
    }

    fn stack_or_sequence(&self, pair: Pair<'_, Rule>) -> Result<AstNode, ParseError> {
        let mut sequences = pair
            .into_inner()
            .map(|seq| self.sequence(seq))
            .collect::<Result<Vec<_>, _>>()?;

        if sequences.len() == 1 {
            Ok(sequences.remove(0))
        } else {
            Ok(AstNode::stack(sequences))
        }
    }

    fn sequence(&self, pair: Pair<'_, Rule>) -> Result<AstNode, ParseError> {
        let steps = pair
            .into_inner()
            .map(|slice| self.slice(slice).map(AstNode::Element))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(AstNode::sequence(steps))
    }

    fn slice(&self, pair: Pair<'_, Rule>) -> Result<ElementNode, ParseError> {
        let mut inner = pair.clone().into_inner();
        let Some(head) = inner.next() else {
            return Err(ParseError::at(&pair, "expected a step"));
        };

        let location = Some(self.location(&head));
        let source = match head.as_rule() {
            Rule::step => ElementSource::Value(Value::text(head.as_str())),
            Rule::sub_cycle => ElementSource::Node(Box::new(self.stack_or_sequence(first_inner(head)?)?)),
            rule => return Err(ParseError::at(&head, format!("unexpected {:?}", rule))),
        };

        let mut element = ElementNode {
            source,
            options: None,
            location,
        };
        for op in inner {
            element = apply_op(element, op)?;
        }
        Ok(element)
    }

    fn location(&self, pair: &Pair<'_, Rule>) -> SourceSpan {
        let span = pair.as_span();
        SourceSpan::new(span.start(), span.end()).shifted(self.offset)
    }
}

fn apply_op(mut element: ElementNode, op: Pair<'_, Rule>) -> Result<ElementNode, ParseError> {
    match op.as_rule() {
        Rule::op_fast => {
            let speed = number(first_inner(op)?)?;
            Ok(with_operator(element, Operator::stretch(speed.recip().unwrap_or_default())))
        }
        Rule::op_slow => {
            let amount = number(first_inner(op)?)?;
            Ok(with_operator(element, Operator::stretch(amount)))
        }
        Rule::op_fixed_step => {
            let amount = number(first_inner(op)?)?;
            Ok(with_operator(element, Operator::new("fixed-step", Some(amount))))
        }
        Rule::op_degrade => {
            let amount = op.into_inner().next().map(number).transpose()?;
            Ok(with_operator(element, Operator::new("degrade", amount)))
        }
        Rule::op_weight => {
            let weight = number(first_inner(op)?)?;
            element.options.get_or_insert_with(Options::default).weight = Some(weight);
            Ok(element)
        }
        Rule::op_replicate => {
            let reps = op.into_inner().next().map(int).transpose()?.unwrap_or(2);
            element.options.get_or_insert_with(Options::default).reps = Some(reps);
            Ok(element)
        }
        Rule::op_euclid => {
            let args = op.into_inner().map(int).collect::<Result<Vec<_>, _>>()?;
            let euclid = Euclid {
                pulses: args.first().copied().unwrap_or_default(),
                steps: args.get(1).copied().unwrap_or_default(),
                rotation: args.get(2).copied(),
            };
            element.options.get_or_insert_with(Options::default).euclid = Some(euclid);
            Ok(element)
        }
        rule => Err(ParseError::at(&op, format!("unexpected {:?}", rule))),
    }
}

/// Set the element's operator. An element holds one operator, so a second
/// one wraps the element as it stands and decorates the wrapper.
fn with_operator(mut element: ElementNode, operator: Operator) -> ElementNode {
    let options = element.options.get_or_insert_with(Options::default);
    if options.operator.is_none() {
        options.operator = Some(operator);
        return element;
    }

    let location = element.location;
    ElementNode {
        source: ElementSource::Node(Box::new(AstNode::sequence(vec![AstNode::Element(element)]))),
        options: Some(Options::with_operator(operator)),
        location,
    }
}

fn first_inner(pair: Pair<'_, Rule>) -> Result<Pair<'_, Rule>, ParseError> {
    let err = ParseError::at(&pair, format!("empty {:?}", pair.as_rule()));
    pair.into_inner().next().ok_or(err)
}

fn number(pair: Pair<'_, Rule>) -> Result<Fraction, ParseError> {
    Fraction::parse(pair.as_str()).ok_or_else(|| ParseError::at(&pair, "invalid number"))
}

fn int(pair: Pair<'_, Rule>) -> Result<u32, ParseError> {
    pair.as_str()
        .parse()
        .map_err(|_| ParseError::at(&pair, "invalid integer"))
}
