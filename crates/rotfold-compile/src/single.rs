//! Single-gate exclusion (C6): pulling rotations entirely out of the
//! shared accumulator and synthesizing them on their own, when that is
//! cheaper than reducing a column's peaks through a counter.
//!
//! Grounded on `original_source/src/optimize.cpp`'s `doSingle` and
//! `exportQasmWriteSingle`: a greedy set cover over the peak rows a
//! counter move couldn't relieve, priced as one standalone synthesis
//! per excluded gate.

use std::f64::consts::TAU;

use rotfold_ir::GateId;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::accounting::TableAccounting;
use crate::table::BitTable;

/// Speculatively price covering every row in `peaks` by excluding
/// gates, without mutating `table` or `acc`. Infeasible (`None`) if any
/// peak has no bit left that isn't already spoken for by a carry — a
/// counter is the only way to relieve such a peak. Otherwise repeats
/// "exclude the gate touching the most still-uncovered peaks" (ties
/// broken by lowest gate id) until every peak is covered, and prices
/// the result at `cost_single` per excluded gate.
pub fn do_single(
    table: &BitTable,
    acc: &TableAccounting,
    peaks: &[usize],
    cost_single: i64,
) -> Option<(i64, Vec<GateId>)> {
    for &peak in peaks {
        if acc.height[peak] - acc.n_carry[peak] <= 0 {
            return None;
        }
    }

    let mut uncovered: FxHashSet<usize> = peaks.iter().copied().collect();
    let mut excluded = Vec::new();

    while !uncovered.is_empty() {
        let mut coverage: FxHashMap<GateId, i64> = FxHashMap::default();
        for &row in &uncovered {
            for bit in table.row(row) {
                if let Some(gate) = bit.gate_id() {
                    *coverage.entry(gate).or_insert(0) += 1;
                }
            }
        }
        let best = coverage
            .into_iter()
            .min_by_key(|&(gate, count)| (-count, gate.0))
            .map(|(gate, _)| gate)?;

        uncovered.retain(|&row| {
            !table
                .row(row)
                .iter()
                .any(|b| b.gate_id() == Some(best))
        });
        excluded.push(best);
    }

    Some((cost_single * excluded.len() as i64, excluded))
}

/// Commit the exclusion of `gates`: remove every one of their bits from
/// every row of `table` (not just the peaks considered by
/// [`do_single`] — a gate's other contributions must vanish from the
/// accumulator too), updating `acc.height` to match, and return each
/// gate's *residual* angle — the signed sum of the weights of the bits
/// actually removed, in radians. A gate excluded after some of its
/// bits were already folded into an earlier counter has a residual
/// strictly smaller in magnitude than its original angle; the emitter
/// must synthesize the residual, not the original.
pub fn exclude_gates(
    table: &mut BitTable,
    acc: &mut TableAccounting,
    gates: &[GateId],
) -> FxHashMap<GateId, f64> {
    let wanted: FxHashSet<GateId> = gates.iter().copied().collect();
    let mut residual: FxHashMap<GateId, f64> =
        gates.iter().map(|&g| (g, 0.0)).collect();

    for row in 0..table.precision() {
        let weight = TAU / 2f64.powi(row as i32 + 1);
        for bit in table.row(row) {
            if let Some(gate) = bit.gate_id() {
                if wanted.contains(&gate) {
                    let sign = if bit.is_positive() { 1.0 } else { -1.0 };
                    *residual.entry(gate).or_insert(0.0) += sign * weight;
                }
            }
        }
        for &gate in gates {
            let removed = table.remove_gate(row, gate);
            acc.height[row] -= removed as i64;
        }
    }

    residual
}
