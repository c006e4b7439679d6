//! Non-fatal findings reported while compiling or querying a pattern.

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

use super::compile::CompileError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Diagnostic {
    /// A node tag the compiler has no rule for.
    UnknownNodeKind { kind: String },
    UnimplementedOperator { operator: String },
    /// Option keys present on one element that nothing handles.
    UnimplementedOptions { keys: Vec<String> },
    NonNumericScaleStep { step: String },
    /// A numeric step too far from the tonic to name a pitch.
    ScaleStepOutOfRange { step: String },
    UnknownScale { scale: String },
    /// A sub-tree failed to compile and was replaced by silence.
    SubtreeFailed { error: CompileError },
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        match self {
            Diagnostic::SubtreeFailed { .. } => Severity::Error,
            _ => Severity::Warning,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnknownNodeKind { kind } => {
                write!(f, "node type \"{}\" not implemented -> returning silence", kind)
            }
            Diagnostic::UnimplementedOperator { operator } => {
                write!(f, "operator \"{}\" not implemented", operator)
            }
            Diagnostic::UnimplementedOptions { keys } => {
                let quoted: Vec<String> = keys.iter().map(|k| format!("\"{}\"", k)).collect();
                let noun = if keys.len() == 1 { "option" } else { "options" };
                write!(f, "{} {} not implemented", noun, quoted.join(", "))
            }
            Diagnostic::NonNumericScaleStep { step } => {
                write!(f, "scale step \"{}\" not a number", step)
            }
            Diagnostic::ScaleStepOutOfRange { step } => {
                write!(f, "scale step \"{}\" out of range -> left unmapped", step)
            }
            Diagnostic::UnknownScale { scale } => {
                write!(f, "scale \"{}\" not found -> steps left unmapped", scale)
            }
            Diagnostic::SubtreeFailed { error } => {
                write!(f, "{} -> returning silence", error)
            }
        }
    }
}

/// Append-only diagnostic sink.
///
/// Clones share the same buffer, so a clone can be moved into a pattern's
/// query closure and still report to whoever holds the original.
#[derive(Clone, Default)]
pub struct Diagnostics {
    entries: Arc<Mutex<Vec<Diagnostic>>>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&self, diagnostic: Diagnostic) {
        match diagnostic.severity() {
            Severity::Warning => tracing::warn!("{}", diagnostic),
            Severity::Error => tracing::error!("{}", diagnostic),
        }
        self.entries.lock().push(diagnostic);
    }

    /// Copy of everything reported so far.
    pub fn snapshot(&self) -> Vec<Diagnostic> {
        self.entries.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.lock().iter()).finish()
    }
}
