//! Gate and qubit primitives for rotation-synthesis.
//!
//! This crate is the narrow foundation `rotfold-qasm` and
//! `rotfold-compile` build on: it has no notion of a circuit DAG, gate
//! ordering, or simulation — every rotation in this domain contributes
//! independently to a shared Fourier-basis accumulator, so there is
//! nothing for a DAG to schedule. What's left is exactly what the
//! optimizer needs to identify a gate and its qubits: [`GateId`],
//! [`QubitId`], [`GateKind`], [`AxisClass`], and the [`Gate`] record
//! itself.

pub mod error;
pub mod gate;
pub mod qubit;

pub use error::{IrError, IrResult};
pub use gate::{AxisClass, AxisTracker, Gate, GateId, GateKind};
pub use qubit::QubitId;
