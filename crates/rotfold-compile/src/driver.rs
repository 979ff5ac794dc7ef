//! The optimization driver (C7): the main iteration loop that reduces a
//! bit table's peak height to at most one bit per row.
//!
//! Grounded on `original_source/src/optimize.cpp`'s `Optimizer::optimize`.
//! Every iteration first tries to relieve each peak by splitting a bit
//! down to a lower row (spec.md §4.7 step 4); whatever peaks that
//! leaves unrelieved are priced two ways — folding them through a
//! population counter ([`crate::counter::do_counter`]) or excluding
//! gates as standalone rotations ([`crate::single::do_single`]) — and
//! the cheaper move is committed. Counter commits only update
//! `self.acc`; the concrete carry bits they imply are materialized
//! later, by [`crate::concretize`], per spec.md §9's accounting-vs-
//! reality split.

use rustc_hash::FxHashMap;
use tracing::{debug, info, instrument};

use rotfold_ir::GateId;

use crate::accounting::TableAccounting;
use crate::cost::{adder_cost, COST_TOFFOLI};
use crate::counter::do_counter;
use crate::single::{do_single, exclude_gates};
use crate::split::{can_split, find_splittable_gate, split_gate};
use crate::table::BitTable;

/// Outcome of a full optimization run.
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    /// Total accounted T-count, including ancilla/Fourier overhead and
    /// the final adder sweep.
    pub total_cost: i64,
    /// Gates that were pulled out as standalone single rotations, in
    /// the order they were excluded.
    pub excluded_gates: Vec<GateId>,
    /// Each excluded gate's residual angle in radians — the signed sum
    /// of the bit weights actually removed from the table, which can
    /// be smaller in magnitude than the gate's original angle if some
    /// of its bits were already folded into a counter before exclusion.
    pub excluded_angles: FxHashMap<GateId, f64>,
}

/// Drives one bit table to a minimal-height form, tracking accounted
/// T-count along the way.
pub struct Optimizer {
    table: BitTable,
    acc: TableAccounting,
    single_rotation_cost: i64,
    excluded_gates: Vec<GateId>,
    excluded_angles: FxHashMap<GateId, f64>,
    total_cost: i64,
}

/// The largest height strictly below `acc.max_height`, and the
/// lowest-weight (highest row index) row that attains it — the pair
/// spec.md §4.7 step 3 uses to bound how far a split may travel.
/// Falls back to the first peak when every row is already at
/// `max_height` (no second tier exists yet).
fn second_height_index(acc: &TableAccounting, peaks: &[usize]) -> usize {
    let second_height = acc
        .height
        .iter()
        .copied()
        .filter(|&h| h < acc.max_height)
        .max();
    match second_height {
        Some(h) => acc
            .height
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v >= h)
            .map(|(i, _)| i)
            .max()
            .unwrap_or(peaks[0]),
        None => peaks[0],
    }
}

impl Optimizer {
    /// Start a fresh optimization over `table`, pricing every excluded
    /// gate's standalone synthesis at `single_rotation_cost`.
    ///
    /// `two_qubit_gate_count` charges one Toffoli per two-qubit
    /// rotation up front (each needs its own ancilla-control Toffoli
    /// regardless of how its bits are later folded). When
    /// `same_angle_mode` is set, one extra Fourier-transform pass over
    /// the whole accumulator is charged at one Toffoli per row.
    pub fn new(
        table: BitTable,
        single_rotation_cost: i64,
        two_qubit_gate_count: i64,
        same_angle_mode: bool,
    ) -> Self {
        let precision = table.precision();
        let initial_height = (0..precision).map(|r| table.height(r) as i64).collect();
        let acc = TableAccounting::new(precision, initial_height);

        let mut total_cost = two_qubit_gate_count * COST_TOFFOLI;
        if same_angle_mode {
            total_cost += precision as i64 * COST_TOFFOLI;
        }

        Self {
            table,
            acc,
            single_rotation_cost,
            excluded_gates: Vec::new(),
            excluded_angles: FxHashMap::default(),
            total_cost,
        }
    }

    /// Run the reduction loop to completion. Leaves `self` holding the
    /// final table, readable afterward via [`Optimizer::into_table`].
    #[instrument(skip(self))]
    pub fn optimize(&mut self) -> OptimizationResult {
        loop {
            let peaks = self.acc.update_peaks();
            if self.acc.max_height == 0 {
                break;
            }
            debug!(max_height = self.acc.max_height, peaks = peaks.len(), "peak round");

            let index_bound = 2 * second_height_index(&self.acc, &peaks);
            let mut remaining = Vec::new();
            for &row in &peaks {
                if can_split(&self.acc, row) {
                    if let Some((target, discharge_row)) =
                        find_splittable_gate(&self.table, &self.acc, row, index_bound)
                    {
                        split_gate(&mut self.table, &mut self.acc, row, target, discharge_row);
                        continue;
                    }
                }
                remaining.push(row);
            }

            if remaining.is_empty() {
                continue;
            }

            let mut counter_trial = self.acc.clone();
            let (cost_counter, handled) = do_counter(&mut counter_trial, &remaining);
            let single_result =
                do_single(&self.table, &self.acc, &remaining, self.single_rotation_cost);

            let use_single = match &single_result {
                Some((cost_single, _)) => *cost_single < cost_counter,
                None => false,
            };

            if use_single {
                let (cost_single, gates) = single_result.expect("checked above");
                let residuals = exclude_gates(&mut self.table, &mut self.acc, &gates);
                info!(gates = gates.len(), cost = cost_single, "excluded as single rotations");
                self.excluded_gates.extend(gates);
                self.excluded_angles.extend(residuals);
                self.total_cost += cost_single;
            } else {
                let tail = if handled < remaining.len() {
                    adder_cost(remaining[handled] as i64)
                } else {
                    0
                };
                self.acc = counter_trial;
                self.total_cost += cost_counter - tail;
                info!(
                    handled,
                    remaining = remaining.len(),
                    cost = cost_counter - tail,
                    "committed counter moves"
                );
                if handled < remaining.len() {
                    // a later peak in `remaining` wasn't cheaper to fold;
                    // the multi-pass adder sweep below picks up its tail.
                    break;
                }
            }

            debug_assert!(
                self.acc.check_invariants().is_ok(),
                "accounting invariants violated: {:?}",
                self.acc.check_invariants()
            );
        }

        let mut n_adders = 0i64;
        for row in (0..self.table.precision()).rev() {
            if self.acc.height[row] > n_adders {
                let cost = (self.acc.height[row] - n_adders) * adder_cost(row as i64);
                self.total_cost += cost;
                n_adders = self.acc.height[row];
                info!(row, cost, "final adder pass");
            }
        }

        OptimizationResult {
            total_cost: self.total_cost,
            excluded_gates: self.excluded_gates.clone(),
            excluded_angles: self.excluded_angles.clone(),
        }
    }

    /// The table as mutated so far, for callers that need to
    /// concretize and emit the final structure (C8/C9).
    pub fn into_table(self) -> BitTable {
        self.table
    }

    /// The accounting state as it stood when optimization finished,
    /// for [`crate::concretize::concretize`] to drain.
    pub fn into_table_and_accounting(self) -> (BitTable, TableAccounting) {
        (self.table, self.acc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Bit;

    fn table_with_column(precision: usize, row: usize, gates: &[u32]) -> BitTable {
        let mut table = BitTable::new(precision);
        for &g in gates {
            table.push(row, Bit::Pos(GateId(g)));
        }
        table
    }

    #[test]
    fn test_single_bit_column_needs_no_work() {
        let table = table_with_column(4, 2, &[0]);
        let mut optimizer = Optimizer::new(table, 1000, 0, false);
        let result = optimizer.optimize();
        assert_eq!(result.total_cost, 0);
        assert!(result.excluded_gates.is_empty());
    }

    #[test]
    fn test_two_bit_column_uses_counter_when_cheaper_than_single() {
        let table = table_with_column(4, 1, &[0, 1]);
        let mut optimizer = Optimizer::new(table, 1000, 0, false);
        let result = optimizer.optimize();
        assert!(result.excluded_gates.is_empty());
        assert!(result.total_cost > 0);
    }

    #[test]
    fn test_expensive_counter_triggers_exclusion() {
        // A wide column at the LSB (far from the head) makes the
        // counter's carry chain expensive; with single rotations this
        // cheap, the optimizer excludes gates instead of ever
        // committing a counter.
        let table = table_with_column(4, 3, &[0, 1, 2, 3]);
        let mut optimizer = Optimizer::new(table, 1, 0, false);
        let result = optimizer.optimize();
        assert!(!result.excluded_gates.is_empty());
        assert_eq!(result.total_cost, result.excluded_gates.len() as i64);
    }

    #[test]
    fn test_into_table_available_after_optimize() {
        let table = table_with_column(3, 1, &[0, 1]);
        let mut optimizer = Optimizer::new(table, 1000, 0, false);
        optimizer.optimize();
        let final_table = optimizer.into_table();
        assert_eq!(final_table.precision(), 3);
    }

    #[test]
    fn test_two_qubit_gate_count_is_charged_up_front() {
        let table = table_with_column(2, 0, &[0]);
        let mut optimizer = Optimizer::new(table, 1000, 3, false);
        let result = optimizer.optimize();
        assert_eq!(result.total_cost, 3 * COST_TOFFOLI);
    }

    #[test]
    fn test_same_angle_mode_charges_one_toffoli_per_row() {
        let table = table_with_column(5, 0, &[0]);
        let mut optimizer = Optimizer::new(table, 1000, 0, true);
        let result = optimizer.optimize();
        assert_eq!(result.total_cost, 5 * COST_TOFFOLI);
    }
}
