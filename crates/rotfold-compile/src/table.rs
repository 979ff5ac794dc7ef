//! The bit table itself (C3).
//!
//! Grounded on the `Bit` design note in spec.md §9: rather than the
//! original C++ class's single struct with optional/blurred fields for
//! "is this a gate-bit or a carry-bit", rows hold a tagged sum so a
//! carry-bit's inputs are only reachable where they're meaningful.

use rotfold_ir::GateId;

/// One cell of the bit table: either a signed contribution from a
/// source gate, or a carry bit produced by collapsing a counter.
#[derive(Debug, Clone, PartialEq)]
pub enum Bit {
    /// A positive (un-negated) contribution from the named gate.
    Pos(GateId),
    /// A negated contribution from the named gate (produced by Booth
    /// encoding or by a single-gate exclusion's residual bookkeeping).
    Neg(GateId),
    /// A carry bit produced by collapsing a counter at a lower (more
    /// significant) row. `power` counts how many doublings separate
    /// this bit from the row it was produced at; `inputs` is the list
    /// of bits the counter consumed to produce it, kept by value so a
    /// carry chain can be walked without touching the table it came
    /// from.
    Carry { power: u32, inputs: Vec<Bit> },
}

impl Bit {
    /// The originating gate, if this is a gate-bit.
    pub fn gate_id(&self) -> Option<GateId> {
        match self {
            Bit::Pos(g) | Bit::Neg(g) => Some(*g),
            Bit::Carry { .. } => None,
        }
    }

    /// Whether this is a gate-bit with positive sign.
    pub fn is_positive(&self) -> bool {
        matches!(self, Bit::Pos(_))
    }

    /// Flip the sign of a gate-bit; a no-op on carry bits.
    pub fn flip_sign(&mut self) {
        match *self {
            Bit::Pos(g) => *self = Bit::Neg(g),
            Bit::Neg(g) => *self = Bit::Pos(g),
            Bit::Carry { .. } => {}
        }
    }
}

/// A `precision`-row accumulator table. Row 0 is the most significant
/// bit (weight `2⁻¹`); row `precision - 1` is the least significant.
#[derive(Debug, Clone)]
pub struct BitTable {
    rows: Vec<Vec<Bit>>,
}

impl BitTable {
    /// An empty table with `precision` rows.
    pub fn new(precision: usize) -> Self {
        Self {
            rows: vec![Vec::new(); precision],
        }
    }

    /// Number of rows (the fixed-point precision).
    pub fn precision(&self) -> usize {
        self.rows.len()
    }

    /// Append a bit to the end of `row`.
    pub fn push(&mut self, row: usize, bit: Bit) {
        self.rows[row].push(bit);
    }

    /// Read-only view of a row's current contents.
    pub fn row(&self, row: usize) -> &[Bit] {
        &self.rows[row]
    }

    /// Mutable view of a row.
    pub fn row_mut(&mut self, row: usize) -> &mut Vec<Bit> {
        &mut self.rows[row]
    }

    /// Current population of `row`.
    pub fn height(&self, row: usize) -> usize {
        self.rows[row].len()
    }

    /// Remove and return the last bit of `row`, if any.
    pub fn pop(&mut self, row: usize) -> Option<Bit> {
        self.rows[row].pop()
    }

    /// Remove the first `n` bits of `row` (in place order) for
    /// consumption by a counter.
    pub fn drain_front(&mut self, row: usize, n: usize) -> Vec<Bit> {
        self.rows[row].drain(0..n).collect()
    }

    /// Remove every bit belonging to `gate` from `row`, returning how
    /// many were removed. Used when a gate is excluded into a single
    /// rotation and its remaining contributions must vanish from the
    /// table.
    pub fn remove_gate(&mut self, row: usize, gate: GateId) -> usize {
        let before = self.rows[row].len();
        self.rows[row].retain(|b| b.gate_id() != Some(gate));
        before - self.rows[row].len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_height() {
        let mut table = BitTable::new(4);
        table.push(1, Bit::Pos(GateId(0)));
        table.push(1, Bit::Neg(GateId(1)));
        assert_eq!(table.height(1), 2);
        assert_eq!(table.height(0), 0);
    }

    #[test]
    fn test_remove_gate() {
        let mut table = BitTable::new(2);
        table.push(0, Bit::Pos(GateId(0)));
        table.push(0, Bit::Pos(GateId(1)));
        table.push(0, Bit::Neg(GateId(0)));
        let removed = table.remove_gate(0, GateId(0));
        assert_eq!(removed, 2);
        assert_eq!(table.height(0), 1);
    }

    #[test]
    fn test_flip_sign() {
        let mut bit = Bit::Pos(GateId(3));
        bit.flip_sign();
        assert_eq!(bit, Bit::Neg(GateId(3)));
    }
}
