//! Gate records and rotation-axis classification.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error::{IrError, IrResult};
use crate::qubit::QubitId;

/// Unique, dense identifier for a gate, assigned in input order.
///
/// Stable for the lifetime of one optimizer run: every bit in the table
/// references its originating gate by this id rather than by pointer, so
/// the gate list can be a flat, owned `Vec<Gate>` indexed by `.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GateId(pub u32);

impl fmt::Display for GateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl GateId {
    /// Index into a `Vec<Gate>` / `Vec<T>` keyed by gate id.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The eight rotation kinds this synthesizer accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateKind {
    /// Single-qubit rotation around X.
    Rx,
    /// Single-qubit rotation around Y.
    Ry,
    /// Single-qubit rotation around Z.
    Rz,
    /// Two-qubit XX rotation.
    Rxx,
    /// Two-qubit YY rotation.
    Ryy,
    /// Two-qubit ZZ rotation.
    Rzz,
    /// Phase gate (single-qubit Z-axis, no basis change needed).
    P,
    /// Controlled phase gate (two-qubit Z-axis).
    Cp,
}

impl GateKind {
    /// Parse a gate keyword as it appears in the input dialect.
    pub fn from_keyword(word: &str) -> Option<Self> {
        Some(match word {
            "rx" => GateKind::Rx,
            "ry" => GateKind::Ry,
            "rz" => GateKind::Rz,
            "rxx" => GateKind::Rxx,
            "ryy" => GateKind::Ryy,
            "rzz" => GateKind::Rzz,
            "p" => GateKind::P,
            "cp" => GateKind::Cp,
            _ => return None,
        })
    }

    /// The keyword this kind is written as in the input/output dialect.
    pub fn as_keyword(self) -> &'static str {
        match self {
            GateKind::Rx => "rx",
            GateKind::Ry => "ry",
            GateKind::Rz => "rz",
            GateKind::Rxx => "rxx",
            GateKind::Ryy => "ryy",
            GateKind::Rzz => "rzz",
            GateKind::P => "p",
            GateKind::Cp => "cp",
        }
    }

    /// Number of qubit operands this kind takes.
    pub fn num_qubits(self) -> usize {
        match self {
            GateKind::Rx | GateKind::Ry | GateKind::Rz | GateKind::P => 1,
            GateKind::Rxx | GateKind::Ryy | GateKind::Rzz | GateKind::Cp => 2,
        }
    }

    /// True for the two-qubit kinds, which need one ancilla wire each
    /// during emission (a CNOT-parity bit for Rxx/Ryy/Rzz, a Toffoli
    /// target for Cp).
    pub fn is_two_qubit(self) -> bool {
        self.num_qubits() == 2
    }

    /// The rotation axis this kind acts on, for the semantic
    /// one-axis-per-qubit constraint (spec.md §6).
    pub fn axis(self) -> AxisClass {
        match self {
            GateKind::Rx | GateKind::Rxx => AxisClass::X,
            GateKind::Ry | GateKind::Ryy => AxisClass::Y,
            GateKind::Rz | GateKind::Rzz | GateKind::P | GateKind::Cp => AxisClass::Z,
        }
    }
}

/// Which rotation-axis family a qubit is committed to.
///
/// A qubit may be driven by `X`-axis gates (Rx/Rxx) or `Y`-axis gates
/// (Ry/Ryy) or `Z`-axis gates (Rz/Rzz/P/Cp), never more than one family —
/// mixing axes on one qubit would require basis changes that interleave
/// incompatibly with the synthesized adder block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisClass {
    /// Rx/Rxx.
    X,
    /// Ry/Ryy.
    Y,
    /// Rz/Rzz/P/Cp.
    Z,
}

impl fmt::Display for AxisClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AxisClass::X => "x",
            AxisClass::Y => "y",
            AxisClass::Z => "z",
        };
        write!(f, "{s}")
    }
}

/// An immutable rotation-gate record.
///
/// Carries no angle: the angle is only needed transiently while encoding
/// bits into the table (C2), the same way the original implementation's
/// `Gate` class stores no angle field. A gate's *carrier name* (the wire
/// that represents it for downstream control lines) is resolved only
/// after optimization, by the emitter glue — it lives in a side table
/// rather than as a mutable field here, so `Gate` stays a genuine
/// immutable record end to end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gate {
    /// Dense, stable identifier.
    pub id: GateId,
    /// Rotation-axis kind.
    pub kind: GateKind,
    /// The qubit operands, in source order.
    pub qubits: Vec<QubitId>,
}

impl Gate {
    /// Construct a new gate record.
    pub fn new(id: GateId, kind: GateKind, qubits: Vec<QubitId>) -> Self {
        Self { id, kind, qubits }
    }
}

/// Tracks which rotation-axis family each qubit has committed to, so
/// ingestion can reject a qubit driven by gates of more than one axis
/// (spec.md §6).
#[derive(Debug, Default)]
pub struct AxisTracker {
    committed: HashMap<QubitId, AxisClass>,
}

impl AxisTracker {
    /// Create a fresh, empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `qubit` is driven by a gate of the given axis,
    /// erroring if it was already committed to a different axis.
    pub fn observe(&mut self, qubit: QubitId, axis: AxisClass) -> IrResult<()> {
        match self.committed.get(&qubit) {
            Some(&existing) if existing != axis => Err(IrError::AxisConflict {
                qubit,
                existing,
                found: axis,
            }),
            Some(_) => Ok(()),
            None => {
                self.committed.insert(qubit, axis);
                Ok(())
            }
        }
    }
}
