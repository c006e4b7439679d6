//! Music-theory lookups used by scale mapping.
//!
//! Only what the compiler needs: spelled pitches, intervals that can be
//! added and built from semitone counts, and scale-name resolution.

mod interval;
mod note;
pub mod scale;

pub use interval::Interval;
pub use note::Pitch;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TheoryError {
    #[error("unknown scale type \"{0}\"")]
    UnknownScale(String),

    #[error("invalid note name \"{0}\"")]
    InvalidNote(String),
}
