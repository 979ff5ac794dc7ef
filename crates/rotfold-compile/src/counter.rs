//! Population counters (C5): the accounting-level create/grow/merge
//! moves spec.md §4.5 describes, plus the concrete drain that turns a
//! committed counter into real carry bits at concretization (C8).
//!
//! Grounded on spec.md §4.5 (`doCounter`/`mergeCounter`); the literal
//! C++ bodies were filtered out of the retrieval pack, so the
//! three-move bookkeeping below is built from the spec prose, styled
//! after the speculative-trial pattern spec.md §9 calls out.

use crate::accounting::TableAccounting;
use crate::cost::{adder_cost, counter_cost};
use crate::table::{Bit, BitTable};

fn floor_log2(mut n: i64) -> u32 {
    let mut p = 0u32;
    while n > 1 {
        n /= 2;
        p += 1;
    }
    p
}

fn insert_sorted(sizes: &mut Vec<i64>, value: i64) {
    let pos = sizes.partition_point(|&s| s >= value);
    sizes.insert(pos, value);
}

/// Resize an existing counter at `index` from `old_size` to
/// `old_size + 1` in `sizes`, returning the marginal cost and, if a new
/// power level becomes reachable, the row that should receive one more
/// carry bit.
fn grow_counter_size(
    sizes: &mut Vec<i64>,
    index: usize,
    dis_to_head: i64,
    old_size: i64,
) -> (i64, Option<usize>) {
    let pos = sizes
        .iter()
        .position(|&s| s == old_size)
        .expect("counter size present");
    sizes.remove(pos);
    let new_size = old_size + 1;
    insert_sorted(sizes, new_size);

    let cost = counter_cost(new_size, dis_to_head) - counter_cost(old_size, dis_to_head);
    let old_p = floor_log2(old_size);
    let new_p = floor_log2(new_size);
    let carry_row = if new_p > old_p && index as i64 >= new_p as i64 {
        Some(index - new_p as usize)
    } else {
        None
    };
    (cost, carry_row)
}

fn undo_counter_carries(acc: &mut TableAccounting, index: usize, size: i64, dis_to_head: i64) {
    let mut remaining = size;
    let mut output_row = index as i64 - 1;
    let mut produced = 0i64;
    while remaining > 1 && output_row >= 0 && produced < dis_to_head {
        acc.height[output_row as usize] -= 1;
        acc.n_carry[output_row as usize] -= 1;
        remaining /= 2;
        output_row -= 1;
        produced += 1;
    }
}

fn try_create(trial: &TableAccounting, index: usize) -> Option<(i64, TableAccounting)> {
    let available =
        trial.height[index] - trial.n_carry[index] - trial.counter_sizes[index].len() as i64;
    if available < 2 {
        return None;
    }
    let mut t = trial.clone();
    t.height[index] -= 1;
    t.n_counter[index] += 2;
    insert_sorted(&mut t.counter_sizes[index], 2);
    if index > 0 {
        t.height[index - 1] += 1;
        t.n_carry[index - 1] += 1;
    }
    Some((counter_cost(2, index as i64), t))
}

fn try_grow(trial: &TableAccounting, index: usize) -> Option<(i64, TableAccounting)> {
    let available =
        trial.height[index] - trial.n_carry[index] - trial.counter_sizes[index].len() as i64;
    if available < 1 || trial.counter_sizes[index].is_empty() {
        return None;
    }
    let mut t = trial.clone();
    t.height[index] -= 1;
    t.n_counter[index] += 1;
    let old_size = *t.counter_sizes[index].last().unwrap();
    let (cost, carry_bump) =
        grow_counter_size(&mut t.counter_sizes[index], index, index as i64, old_size);
    if let Some(row) = carry_bump {
        t.height[row] += 1;
        t.n_carry[row] += 1;
    }
    Some((cost, t))
}

fn try_merge(trial: &TableAccounting, index: usize) -> Option<(i64, TableAccounting)> {
    if trial.counter_sizes[index].len() < 2 {
        return None;
    }
    let mut t = trial.clone();
    let dis_to_head = index as i64;
    let removed_size = t.counter_sizes[index].pop().unwrap();
    undo_counter_carries(&mut t, index, removed_size, dis_to_head);
    let mut total_cost = -counter_cost(removed_size, dis_to_head);

    for _ in 0..removed_size {
        if t.counter_sizes[index].is_empty() {
            return None;
        }
        let old_size = *t.counter_sizes[index].last().unwrap();
        let (cost, carry_bump) =
            grow_counter_size(&mut t.counter_sizes[index], index, dis_to_head, old_size);
        total_cost += cost;
        if let Some(row) = carry_bump {
            if t.height[row] + 1 >= t.max_height {
                return None;
            }
            t.height[row] += 1;
            t.n_carry[row] += 1;
        }
    }
    Some((total_cost, t))
}

fn attempt_move(trial: &TableAccounting, index: usize) -> Option<(i64, TableAccounting)> {
    try_create(trial, index)
        .or_else(|| try_grow(trial, index))
        .or_else(|| try_merge(trial, index))
}

/// Attempt the counter moves for every peak in `remaining`, in order,
/// mutating `trial` as each peak is committed. A peak's move commits
/// only if its cost beats the adder-cost alternative it would have
/// paid otherwise; the first peak that either has no valid move or
/// isn't cheaper than the adder stops the scan, and the returned cost
/// folds in one adder-cost charge for the unhandled tail (so the
/// caller can subtract it back out before committing, per spec.md
/// §4.7 step 6). Returns `(total_cost, peaks_handled)`.
pub fn do_counter(trial: &mut TableAccounting, remaining: &[usize]) -> (i64, usize) {
    let mut total = 0i64;
    let mut handled = 0usize;

    for (k, &index) in remaining.iter().enumerate() {
        let Some((move_cost, next_trial)) = attempt_move(trial, index) else {
            break;
        };
        let adder_saving = if k + 1 < remaining.len() {
            adder_cost(index as i64) - adder_cost(remaining[k + 1] as i64)
        } else {
            adder_cost(index as i64)
        };
        if move_cost >= adder_saving {
            break;
        }
        *trial = next_trial;
        total += move_cost;
        handled += 1;
    }

    let tail = if handled < remaining.len() {
        adder_cost(remaining[handled] as i64)
    } else {
        0
    };
    (total + tail, handled)
}

/// Drain a committed counter of `size` inputs from the front of `row`,
/// replacing them with one power-0 carry bit at `row` itself and one
/// carry bit of each power `1 ..= floor(log2 size)` at the rows above,
/// per spec.md §4.8 step 2.
pub fn concretize_counter(table: &mut BitTable, acc: &mut TableAccounting, row: usize, size: i64) {
    let inputs = table.drain_front(row, size as usize);
    table.push(
        row,
        Bit::Carry {
            power: 0,
            inputs: inputs.clone(),
        },
    );

    let max_power = floor_log2(size);
    for power in 1..=max_power {
        let target = row as i64 - power as i64;
        if target < 0 {
            break;
        }
        table.push(
            target as usize,
            Bit::Carry {
                power,
                inputs: inputs.clone(),
            },
        );
        acc.n_carry[target as usize] -= 1;
    }
}
