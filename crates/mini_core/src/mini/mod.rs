//! Mini notation: text to [`AstNode`] to [`Pattern`].
//!
//! ```
//! use mini_core::mini;
//!
//! let compilation = mini::mini("c e g").unwrap();
//! let notes: Vec<String> = compilation
//!     .pattern
//!     .query_cycle(0)
//!     .iter()
//!     .map(|hap| hap.value.to_string())
//!     .collect();
//! assert_eq!(notes, ["c", "e", "g"]);
//! ```
//!
//! [`Pattern`]: crate::pattern_system::Pattern

pub mod ast;
pub mod compile;
pub mod decorate;
pub mod diagnostics;
pub mod parser;
pub mod scale_map;

pub use ast::AstNode;
pub use compile::{Compilation, CompileError, Compiler};
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use parser::{ParseError, parse_ast, parse_mini};

impl Compiler {
    /// Parse and compile bare mini notation.
    pub fn mini(&self, input: &str) -> Result<Compilation, ParseError> {
        Ok(self.compile(&parse_mini(input)?))
    }

    /// Several mini-notation strings played one after another within a cycle.
    pub fn mini_seq(&self, inputs: &[&str]) -> Result<Compilation, ParseError> {
        let roots = inputs
            .iter()
            .map(|input| parse_mini(input).map(AstNode::group))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.compile(&AstNode::sequence(roots)))
    }

    /// Parse and compile raw notation such as `slow 2 $ "c e"`.
    pub fn raw(&self, input: &str) -> Result<Compilation, ParseError> {
        Ok(self.compile(&parse_ast(input)?))
    }
}

/// [`Compiler::mini`] with the default configuration.
pub fn mini(input: &str) -> Result<Compilation, ParseError> {
    Compiler::default().mini(input)
}

/// [`Compiler::mini_seq`] with the default configuration.
pub fn mini_seq(inputs: &[&str]) -> Result<Compilation, ParseError> {
    Compiler::default().mini_seq(inputs)
}

/// [`Compiler::raw`] with the default configuration.
pub fn raw(input: &str) -> Result<Compilation, ParseError> {
    Compiler::default().raw(input)
}
