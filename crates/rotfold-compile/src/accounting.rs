//! Accounting vectors that track the optimizer's bookkeeping separately
//! from the concrete bit table, reconciled only at concretization (C8).
//!
//! Grounded on `original_source/src/optimize.cpp`'s `Optimizer`
//! constructor, which sizes one vector per row for each of these
//! quantities, and `updatePeaks`.

/// Per-row bookkeeping the driver mutates every iteration without
/// touching the concrete [`crate::table::BitTable`].
#[derive(Debug, Clone)]
pub struct TableAccounting {
    /// Current (accounted) population of each row.
    pub height: Vec<i64>,
    /// Sizes of the counters placed at each row, largest first.
    pub counter_sizes: Vec<Vec<i64>>,
    /// How many bits were split away from each row.
    pub n_split_from: Vec<i64>,
    /// How many split bits a row received from a higher row.
    pub n_split_to: Vec<i64>,
    /// How many carry bits a row received from a counter below it.
    pub n_carry: Vec<i64>,
    /// How many counters have been placed at each row.
    pub n_counter: Vec<i64>,
    /// Cached maximum of `height`, refreshed by [`TableAccounting::update_peaks`].
    pub max_height: i64,
}

impl TableAccounting {
    /// A fresh accounting state for a `precision`-row table, with
    /// `initial_height` seeded from the table's starting population.
    pub fn new(precision: usize, initial_height: Vec<i64>) -> Self {
        Self {
            height: initial_height,
            counter_sizes: vec![Vec::new(); precision],
            n_split_from: vec![0; precision],
            n_split_to: vec![0; precision],
            n_carry: vec![0; precision],
            n_counter: vec![0; precision],
            max_height: 0,
        }
    }

    /// Recompute `max_height` and return the rows currently at it,
    /// ordered from the most significant (highest-weight) row to the
    /// least significant.
    pub fn update_peaks(&mut self) -> Vec<usize> {
        self.max_height = self.height.iter().copied().max().unwrap_or(0);
        if self.max_height == 0 {
            return Vec::new();
        }
        (0..self.height.len())
            .filter(|&i| self.height[i] == self.max_height)
            .collect()
    }

    /// Total accounted T-count contributed by counters at `row`.
    pub fn counter_count(&self, row: usize) -> i64 {
        self.n_counter[row]
    }

    /// Check invariants 1, 2, 4, and 5 from the data model: every row's
    /// accounted height covers its non-splittable slots, the counter
    /// sizes recorded at a row sum to exactly the row's consumed-input
    /// count, each row's counter sizes stay non-increasing, and
    /// `max_height` is actually the maximum.
    pub fn check_invariants(&self) -> Result<(), String> {
        for i in 0..self.height.len() {
            let non_splittable = self.n_carry[i] + self.counter_sizes[i].len() as i64;
            if self.height[i] < non_splittable {
                return Err(format!(
                    "row {i}: height {} below non-splittable floor {non_splittable}",
                    self.height[i]
                ));
            }
            let consumed: i64 = self.counter_sizes[i].iter().sum();
            if consumed != self.n_counter[i] {
                return Err(format!(
                    "row {i}: counter_sizes sum {consumed} does not match n_counter {}",
                    self.n_counter[i]
                ));
            }
            if self.counter_sizes[i].windows(2).any(|w| w[0] < w[1]) {
                return Err(format!("row {i}: counter_sizes not non-increasing"));
            }
        }
        let actual_max = self.height.iter().copied().max().unwrap_or(0);
        if actual_max != self.max_height {
            return Err(format!(
                "max_height {} does not match actual max {actual_max}",
                self.max_height
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_peaks_orders_msb_first() {
        let mut acc = TableAccounting::new(4, vec![2, 3, 3, 1]);
        let peaks = acc.update_peaks();
        assert_eq!(acc.max_height, 3);
        assert_eq!(peaks, vec![1, 2]);
    }

    #[test]
    fn test_update_peaks_all_zero() {
        let mut acc = TableAccounting::new(3, vec![0, 0, 0]);
        let peaks = acc.update_peaks();
        assert!(peaks.is_empty());
        assert_eq!(acc.max_height, 0);
    }

    #[test]
    fn test_check_invariants_passes_on_fresh_state() {
        let mut acc = TableAccounting::new(4, vec![2, 0, 0, 0]);
        acc.update_peaks();
        assert!(acc.check_invariants().is_ok());
    }

    #[test]
    fn test_check_invariants_catches_stale_max_height() {
        let acc = TableAccounting {
            height: vec![2, 0],
            counter_sizes: vec![Vec::new(); 2],
            n_split_from: vec![0; 2],
            n_split_to: vec![0; 2],
            n_carry: vec![0; 2],
            n_counter: vec![0; 2],
            max_height: 5,
        };
        assert!(acc.check_invariants().is_err());
    }
}
