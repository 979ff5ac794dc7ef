//! Error types for the bit-table optimizer.

use thiserror::Error;

/// Errors that can occur while building or optimizing a bit table.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// The requested fixed-point precision is unusable (must be at least 1).
    #[error("precision must be at least 1 bit, got {0}")]
    InvalidPrecision(u32),

    /// A gate referenced a row outside the table's precision.
    #[error("row index {row} out of bounds for precision {precision}")]
    RowOutOfBounds { row: usize, precision: usize },

    /// The optimizer's internal accounting became inconsistent — this
    /// indicates a bug in the driver rather than bad input.
    #[error("accounting invariant violated: {0}")]
    InvariantViolation(String),
}

/// Result type for bit-table construction and optimization.
pub type CompileResult<T> = Result<T, CompileError>;
