//! Error types for the assembly-dialect parser/emitter.

use thiserror::Error;

/// Errors that can occur during parsing or emission.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// The input file could not be opened.
    #[error("input file not found: {0}")]
    Io(#[from] std::io::Error),

    /// The lexer could not recognize a token.
    #[error("line {line}: unrecognized token at byte offset {offset}")]
    LexerError { line: usize, offset: usize },

    /// A gate line did not match the expected grammar.
    #[error("line {line}: unexpected {found}, expected {expected}")]
    UnexpectedToken {
        line: usize,
        expected: &'static str,
        found: String,
    },

    /// A gate line ended before the grammar was satisfied.
    #[error("line {line}: unexpected end of line, expected {expected}")]
    UnexpectedEof { line: usize, expected: &'static str },

    /// A qubit was used by gates of more than one rotation-axis family.
    #[error("line {line}: {source}")]
    AxisConflict {
        line: usize,
        #[source]
        source: rotfold_ir::IrError,
    },

    /// In same-angle mode, a gate's angle did not match the first gate's.
    #[error(
        "line {line}: all angles must be identical in same-angle mode (first was {first}, got {found})"
    )]
    SameAngleMismatch { line: usize, first: f64, found: f64 },
}

/// Result type for parsing/emission operations.
pub type ParseResult<T> = Result<T, ParseError>;
