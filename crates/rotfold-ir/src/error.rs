//! Error types for the IR crate.

use thiserror::Error;

use crate::gate::AxisClass;
use crate::qubit::QubitId;

/// Errors that can occur while building or validating a gate list.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// A qubit appeared in gates from more than one rotation-axis family.
    ///
    /// The original implementation treats this as fatal before
    /// optimization starts (spec.md §6's semantic constraint); we keep
    /// that as a hard error rather than attempting to reconcile axes.
    #[error(
        "qubit {qubit} appears in gates with different rotation-axis types: already {existing}, now {found}"
    )]
    AxisConflict {
        /// The offending qubit.
        qubit: QubitId,
        /// The axis family it was already committed to.
        existing: AxisClass,
        /// The axis family the new gate would add.
        found: AxisClass,
    },

    /// A gate line supplied the wrong number of qubit operands for its kind.
    #[error("gate '{kind}' expects {expected} qubits, got {got}")]
    WrongQubitCount {
        /// Keyword of the gate kind.
        kind: &'static str,
        /// Expected operand count.
        expected: usize,
        /// Actual operand count.
        got: usize,
    },
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
