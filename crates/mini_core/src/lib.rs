//! Mini-notation pattern compiler.
//!
//! Turns rhythm/melody strings like `"c e [g a]"` or
//! `scale "C4 minor" $ "0 2 4"` into lazily queried, cycle-based patterns.
//! Unsupported notation does not fail compilation: it is reported as a
//! [`Diagnostic`] and played as silence or left undecorated.

pub mod config;
pub mod mini;
pub mod pattern_system;
pub mod theory;
pub mod value;

pub use config::{CompilerConfig, ConfigError};
pub use mini::{
    AstNode, Compilation, CompileError, Compiler, Diagnostic, Diagnostics, ParseError, mini,
    mini_seq, raw,
};
pub use value::Value;
