//! Concretization (C8): once the driver has finished, reconcile the
//! physical bit table against the accounting that was tracking its
//! future shape (spec.md §9's accounting-vs-reality split) and drain
//! it down to its final, renderable contents.
//!
//! Grounded on `original_source/src/optimize.cpp`'s post-loop
//! concretization pass: step 1 resolves any split whose destination
//! was only ever recorded as the `_n` ("any gate") sentinel, step 2
//! drains every committed counter into a power-0 carry at its own row
//! plus one carry per power level above it.

use crate::accounting::TableAccounting;
use crate::counter::concretize_counter;
use crate::error::{CompileError, CompileResult};
use crate::split::{distribute, find_splittable_gate, SplitTarget};
use crate::table::BitTable;

/// Reconcile `table` against `acc`'s final bookkeeping in place.
///
/// Step 1 resolves any row still owing a deferred (`Any`-target) split
/// by popping one of its real bits and relocating it via a fresh scan.
/// This is an approximation: accounting only tracks *how many* bits a
/// row is owed from splits elsewhere, not which row each one was
/// originally meant to land on, so a bit resolved here may land on a
/// different row than the one accounting guessed at optimization time.
/// The stale guesses are stripped by zeroing `n_split_to` once every
/// owed bit has been placed for real. Step 2 drains every committed
/// counter into its carry bits. The table is left with exactly
/// `acc.height[i]` bits at every row `i`.
pub fn concretize(table: &mut BitTable, acc: &mut TableAccounting) -> CompileResult<()> {
    let precision = table.precision();

    for i in 0..precision {
        while acc.n_split_from[i] > 0 {
            acc.n_split_from[i] -= 1;
            if table.height(i) == 0 {
                // the row has nothing left to carry; the reservation was
                // an artifact of a deferred split whose bit already
                // moved by some other route.
                continue;
            }
            match find_splittable_gate(table, acc, i, precision) {
                Some((SplitTarget::Gate(gate), discharge_row)) => {
                    let pos = table
                        .row(i)
                        .iter()
                        .position(|b| b.gate_id() == Some(gate))
                        .expect("find_splittable_gate found this gate at row i");
                    let bit = table.row_mut(i).remove(pos);
                    let sign_positive = bit.is_positive();
                    distribute(table, acc, i, gate, sign_positive, discharge_row);
                }
                _ => {
                    // no concrete opposite-sign target anywhere below:
                    // park the bit one row down at its own (halved)
                    // weight, same destination the deferred `Any` split
                    // would have used had it resolved immediately.
                    let bit = table.pop(i).expect("height checked above");
                    let dest = (i + 1).min(precision.saturating_sub(1));
                    table.push(dest, bit);
                    acc.height[dest] += 1;
                }
            }
        }
    }
    for i in 0..precision {
        acc.height[i] -= acc.n_split_to[i];
        acc.n_split_to[i] = 0;
    }

    for row in (0..precision).rev() {
        while let Some(size) = acc.counter_sizes[row].pop() {
            acc.n_counter[row] -= size;
            concretize_counter(table, acc, row, size);
        }
    }

    for row in 0..precision {
        if table.height(row) as i64 != acc.height[row] {
            return Err(CompileError::InvariantViolation(format!(
                "row {row}: table height {} does not match accounted height {}",
                table.height(row),
                acc.height[row]
            )));
        }
    }
    let leftover: i64 = acc.n_split_from.iter().sum::<i64>()
        + acc.n_split_to.iter().sum::<i64>()
        + acc.n_carry.iter().sum::<i64>()
        + acc.n_counter.iter().sum::<i64>();
    if leftover != 0 {
        return Err(CompileError::InvariantViolation(format!(
            "concretization left {leftover} unresolved accounting units"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Bit;
    use rotfold_ir::GateId;

    #[test]
    fn test_concretize_is_noop_on_already_single_bit_rows() {
        let mut table = BitTable::new(3);
        table.push(1, Bit::Pos(GateId(0)));
        let mut acc = TableAccounting::new(3, vec![0, 1, 0]);
        acc.update_peaks();
        concretize(&mut table, &mut acc).unwrap();
        assert_eq!(table.height(1), 1);
    }

    #[test]
    fn test_concretize_drains_committed_counter() {
        let mut table = BitTable::new(3);
        table.push(1, Bit::Pos(GateId(0)));
        table.push(1, Bit::Pos(GateId(1)));
        let mut acc = TableAccounting::new(3, vec![0, 0, 0]);
        acc.counter_sizes[1] = vec![2];
        acc.n_counter[1] = 2;
        acc.n_carry[0] = 1;
        acc.height[1] = 1;
        acc.height[0] = 1;
        acc.update_peaks();
        concretize(&mut table, &mut acc).unwrap();
        assert_eq!(table.height(1), 1);
        assert_eq!(table.height(0), 1);
        assert_eq!(acc.n_carry[0], 0);
        assert_eq!(acc.n_counter[1], 0);
    }

    #[test]
    fn test_concretize_rejects_mismatched_accounting() {
        let mut table = BitTable::new(2);
        table.push(0, Bit::Pos(GateId(0)));
        table.push(0, Bit::Pos(GateId(1)));
        let mut acc = TableAccounting::new(2, vec![1, 0]);
        acc.update_peaks();
        assert!(concretize(&mut table, &mut acc).is_err());
    }
}
