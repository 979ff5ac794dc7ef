//! Statement shapes for the restricted rotation-assembly dialect.

use rotfold_ir::GateKind;

/// A parsed reference to a register slot, e.g. `q[3]`.
#[derive(Debug, Clone, PartialEq)]
pub struct QubitRef {
    /// Register name (typically `q`, but the dialect doesn't assume it).
    pub register: String,
    /// Index within the register.
    pub index: u32,
}

/// One line of the input dialect, after comment-stripping.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// A register declaration, version pragma, or include — preserved
    /// verbatim to the output header.
    Header(String),

    /// A rotation-gate line.
    GateStmt {
        /// Which of the eight rotation kinds.
        kind: GateKind,
        /// Rotation angle in radians, as written in the source.
        angle: f64,
        /// Qubit operands, in source order.
        qubits: Vec<QubitRef>,
    },
}
