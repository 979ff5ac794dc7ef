//! Closed-form Toffoli-equivalent (T-count) cost estimators (C1).
//!
//! Grounded on `original_source/src/external.cpp` (`nCr`, `countAdderCost`,
//! `countCounterCost`) and `src/main.cpp`'s `getCostSingle`. Costs are
//! integers throughout — spec.md §9 Open Question 2 resolves the
//! float-vs-integer ambiguity in favor of `i64` everywhere, so cost
//! monotonicity (Testable property 1) is exact rather than
//! float-accumulation-fuzzy.

/// T-count of a single (recoverable) Toffoli gate.
///
/// A named constant rather than the original's mutable
/// `extern float COST_TOFFOLI` (spec.md §9).
pub const COST_TOFFOLI: i64 = 4;

/// `n` choose `k`, computed with the symmetric reduction and integer
/// accumulation. All inputs in this domain are small (≤ precision `r`),
/// so overflow is not a concern.
pub fn n_choose_r(n: i64, k: i64) -> i64 {
    if n < k {
        return 0;
    }
    let k = if k > n - k { n - k } else { k };

    let mut ans: i64 = 1;
    let mut n = n;
    for i in 1..=k {
        ans *= n;
        ans /= i;
        n -= 1;
    }
    ans
}

/// T-count of one ripple-carry adder pass whose lowest involved bit is at
/// row `min_bit`. Derived from a ripple adder using one Toffoli per bit
/// above position 0.
pub fn adder_cost(min_bit: i64) -> i64 {
    min_bit * COST_TOFFOLI
}

/// T-count of a population counter over `counter_size` same-column
/// inputs, whose output bits are distributed into `dis_to_head` rows
/// above it (bounding how many output bits actually fit before the
/// accumulator's MSB).
///
/// By storing the target bits of a previous `k/2`-controlled Toffoli, a
/// `k`-controlled Toffoli with `k > 2` is obtained from a single
/// 2-controlled Toffoli — so each power-of-two block of inputs
/// contributes exactly one Toffoli via carry-save reduction.
pub fn counter_cost(counter_size: i64, dis_to_head: i64) -> i64 {
    let mut n_toffoli = 0i64;
    let mut comb = 2i64;
    let mut dis_to_head = dis_to_head;
    while comb <= counter_size && dis_to_head > 0 {
        n_toffoli += n_choose_r(counter_size, comb);
        comb *= 2;
        dis_to_head -= 1;
    }
    n_toffoli * COST_TOFFOLI
}

/// Default single-rotation cost: the minimum of three standard
/// decomposition formulas (HST, RUS, PQF) over the given precision,
/// rounded to the nearest integer T-count.
pub fn default_single_rotation_cost(precision: u32) -> i64 {
    let p = f64::from(precision + 1);
    let hst = 3.0 * p + p.log2();
    let rus = 1.149 * p + 9.2;
    let pqf = p + 4.0 * p.log2() + 1.187;
    hst.min(rus).min(pqf).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_n_choose_r() {
        assert_eq!(n_choose_r(2, 2), 1);
        assert_eq!(n_choose_r(4, 2), 6);
        assert_eq!(n_choose_r(5, 0), 1);
        assert_eq!(n_choose_r(3, 5), 0);
    }

    #[test]
    fn test_adder_cost() {
        assert_eq!(adder_cost(0), 0);
        assert_eq!(adder_cost(1), 4);
    }

    #[test]
    fn test_counter_cost_two_inputs() {
        // S2: counter of size 2 at row 1 (dis_to_head = 1 row above it to MSB).
        assert_eq!(counter_cost(2, 1), n_choose_r(2, 2) * COST_TOFFOLI);
        assert_eq!(counter_cost(2, 1), 4);
    }

    #[test]
    fn test_counter_cost_bounded_by_head_distance() {
        // With no room to the head, no output bits fit and cost is zero.
        assert_eq!(counter_cost(4, 0), 0);
    }
}
