//! Property-based tests for the optimization driver (spec §8's
//! universal properties 1, 3, and 5).
//!
//! Grounded on the teacher's proptest-backed roundtrip suite
//! (`arvak-qasm3/tests/proptest_roundtrip.rs`): generate random bit
//! tables instead of random circuits, and check the properties that
//! must hold for *any* input rather than one fixed scenario.

use proptest::prelude::*;
use rotfold_compile::table::Bit;
use rotfold_compile::{BitTable, Optimizer};
use rotfold_ir::GateId;

/// A random bit table: for each row, 0-6 positive gate-bits with
/// distinct ids drawn from a shared pool.
fn arb_bit_table(precision: usize) -> impl Strategy<Value = BitTable> {
    prop::collection::vec(0_usize..=6, precision).prop_map(move |counts| {
        let mut table = BitTable::new(precision);
        let mut next_id = 0u32;
        for (row, &count) in counts.iter().enumerate() {
            for _ in 0..count {
                table.push(row, Bit::Pos(GateId(next_id)));
                next_id += 1;
            }
        }
        table
    })
}

proptest! {
    /// Property 1 (cost monotonicity, weakened to the externally
    /// observable half): the reported total cost is never negative,
    /// since every increment committed along the way (counters,
    /// exclusions, the final adder pass) is itself non-negative.
    #[test]
    fn test_total_cost_is_never_negative(table in arb_bit_table(5)) {
        let mut optimizer = Optimizer::new(table, 37);
        let result = optimizer.optimize();
        prop_assert!(result.total_cost >= 0);
    }

    /// Property 3: after the driver loop converges, every row's
    /// accounted height is at most 1 - the loop's termination
    /// condition - and invariants 1/4/5 still hold (checked internally
    /// via `debug_assert!` on every iteration; here we just confirm the
    /// externally visible half of convergence).
    #[test]
    fn test_optimizer_converges_to_height_at_most_one(table in arb_bit_table(5)) {
        let precision = table.precision();
        let mut optimizer = Optimizer::new(table, 37);
        optimizer.optimize();
        let final_table = optimizer.into_table();
        for row in 0..precision {
            prop_assert!(final_table.height(row) <= 1);
        }
    }

    /// Property 4 (determinism): re-running the identical input
    /// through a fresh optimizer produces the same cost and the same
    /// set of excluded gates.
    #[test]
    fn test_optimizer_is_deterministic(table in arb_bit_table(5)) {
        let mut first = Optimizer::new(table.clone(), 37);
        let mut second = Optimizer::new(table, 37);
        let a = first.optimize();
        let b = second.optimize();
        prop_assert_eq!(a.total_cost, b.total_cost);
        prop_assert_eq!(a.excluded_gates, b.excluded_gates);
    }
}
