//! AST to pattern compilation.
//!
//! The walk is total from the outside: [`Compiler::compile`] always returns
//! a pattern. Failures inside a sub-tree are contained at the nearest
//! enclosing pattern node, which keeps its other children and plays silence
//! in the failed slot.

use thiserror::Error;
use tracing::{debug, trace};

use crate::config::CompilerConfig;
use crate::pattern_system::{Fraction, Pattern, pure, pure_with_span, sequence, silence, stack};
use crate::theory::scale;
use crate::value::Value;

use super::ast::{Alignment, AstNode, ElementNode, ElementSource, PatternNode, ScaleNode, StretchNode};
use super::decorate::decorate;
use super::diagnostics::{Diagnostic, Diagnostics};
use super::scale_map::map_value;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    #[error("invalid stretch amount {amount}: must be positive")]
    InvalidStretchAmount { amount: Fraction },

    #[error("operator \"{operator}\" is missing its \"{argument}\" argument")]
    MissingArgument {
        operator: String,
        argument: &'static str,
    },

    #[error("{kind} node has no child")]
    MissingChild { kind: &'static str },

    #[error("nesting deeper than {limit} levels")]
    MaxDepthExceeded { limit: usize },
}

/// A compiled pattern and the sink its diagnostics go to.
///
/// Scale steps are only seen when the pattern is queried, so `diagnostics`
/// can keep growing after compilation.
#[derive(Clone, Debug)]
pub struct Compilation {
    pub pattern: Pattern<Value>,
    pub diagnostics: Diagnostics,
}

#[derive(Clone, Debug, Default)]
pub struct Compiler {
    config: CompilerConfig,
    shared: Option<Diagnostics>,
}

impl Compiler {
    pub fn new(config: CompilerConfig) -> Self {
        Self {
            config,
            shared: None,
        }
    }

    /// Report every compilation into one existing sink.
    ///
    /// Without this each compilation starts with an empty sink of its own.
    pub fn with_diagnostics(config: CompilerConfig, diagnostics: Diagnostics) -> Self {
        Self {
            config,
            shared: Some(diagnostics),
        }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compile a tree. Never fails; a failing root compiles to silence.
    pub fn compile(&self, node: &AstNode) -> Compilation {
        let walk = self.walk();
        let pattern = walk
            .compile_node(node, 0)
            .unwrap_or_else(|error| walk.contain(error));
        walk.finish(pattern)
    }

    /// Compile a tree, returning the root's error instead of containing it.
    ///
    /// Failures below a pattern node are still contained there.
    pub fn try_compile(&self, node: &AstNode) -> Result<Compilation, CompileError> {
        let walk = self.walk();
        let pattern = walk.compile_node(node, 0)?;
        Ok(walk.finish(pattern))
    }

    fn walk(&self) -> Walk<'_> {
        Walk {
            config: &self.config,
            diagnostics: self.shared.clone().unwrap_or_default(),
        }
    }
}

/// State of a single compilation.
struct Walk<'a> {
    config: &'a CompilerConfig,
    diagnostics: Diagnostics,
}

impl Walk<'_> {
    fn finish(self, pattern: Pattern<Value>) -> Compilation {
        Compilation {
            pattern,
            diagnostics: self.diagnostics,
        }
    }

    fn compile_node(&self, node: &AstNode, depth: usize) -> Result<Pattern<Value>, CompileError> {
        if depth > self.config.max_depth {
            return Err(CompileError::MaxDepthExceeded {
                limit: self.config.max_depth,
            });
        }
        trace!(kind = node.kind(), depth, "compiling node");

        match node {
            AstNode::Pattern(pattern) => Ok(self.compile_pattern(pattern, depth)),
            AstNode::Element(element) => self.compile_element(element, depth),
            AstNode::Stretch(stretch) => self.compile_stretch(stretch, depth),
            AstNode::Scale(scale) => self.compile_scale(scale, depth),
            AstNode::Unknown(unknown) => {
                self.diagnostics.report(Diagnostic::UnknownNodeKind {
                    kind: unknown.kind.clone(),
                });
                Ok(silence())
            }
        }
    }

    fn compile_pattern(&self, node: &PatternNode, depth: usize) -> Pattern<Value> {
        let children: Vec<Pattern<Value>> = node
            .children
            .iter()
            .map(|child| {
                self.compile_node(child, depth + 1)
                    .and_then(|pattern| decorate(pattern, child.options(), &self.diagnostics))
                    .unwrap_or_else(|error| self.contain(error))
            })
            .collect();

        match node.alignment {
            Alignment::Vertical => stack(children),
            Alignment::Horizontal => sequence(children),
        }
    }

    fn compile_element(&self, node: &ElementNode, depth: usize) -> Result<Pattern<Value>, CompileError> {
        match &node.source {
            ElementSource::Value(value) if value.is_rest() => Ok(silence()),
            ElementSource::Value(value) => Ok(match node.location {
                Some(span) => pure_with_span(value.clone(), span),
                None => pure(value.clone()),
            }),
            ElementSource::Node(child) => self.compile_node(child, depth + 1),
        }
    }

    fn compile_stretch(&self, node: &StretchNode, depth: usize) -> Result<Pattern<Value>, CompileError> {
        let child = node
            .child
            .as_deref()
            .ok_or(CompileError::MissingChild { kind: "stretch" })?;
        if !node.amount.is_positive() {
            return Err(CompileError::InvalidStretchAmount {
                amount: node.amount.clone(),
            });
        }
        Ok(self.compile_node(child, depth + 1)?.slow(node.amount.clone()))
    }

    fn compile_scale(&self, node: &ScaleNode, depth: usize) -> Result<Pattern<Value>, CompileError> {
        let child = node
            .child
            .as_deref()
            .ok_or(CompileError::MissingChild { kind: "scale" })?;
        let pattern = self.compile_node(child, depth + 1)?;

        let (tonic, scale_type) = scale::tokenize(&node.scale);
        let tonic = tonic.unwrap_or(self.config.default_tonic);
        let intervals = match scale::intervals(&scale_type) {
            Ok(intervals) => intervals,
            Err(error) => {
                debug!(%error, "scale lookup failed");
                self.diagnostics.report(Diagnostic::UnknownScale {
                    scale: node.scale.clone(),
                });
                return Ok(pattern);
            }
        };
        debug!(%tonic, scale = %scale_type, degrees = intervals.len(), "resolved scale");

        let diagnostics = self.diagnostics.clone();
        Ok(pattern.fmap(move |value| map_value(&tonic, &intervals, value, &diagnostics)))
    }

    fn contain(&self, error: CompileError) -> Pattern<Value> {
        self.diagnostics.report(Diagnostic::SubtreeFailed { error });
        silence()
    }
}
