//! Bit-table optimizer for rotation-gate synthesis.
//!
//! A sequence of `rx`/`ry`/`rz`/`rxx`/`ryy`/`rzz`/`p`/`cp` rotations that
//! all share an axis can be synthesized by one fixed-precision adder
//! instead of one per gate: each gate contributes a signed bit string to
//! a shared accumulator, and [`driver::Optimizer`] collapses that
//! accumulator's columns down to a single ripple-carry adder pass —
//! splitting, counting, or excluding gates entirely where that is
//! cheaper than carrying their bits through.
//!
//! # Pipeline
//!
//! 1. [`encode`]: normalize each gate's angle and expand it into a
//!    Booth-encoded bit string ([`encode::angle_to_bits`],
//!    [`encode::booth_encode`]).
//! 2. [`table`]: place those bits into a [`table::BitTable`].
//! 3. [`driver`]: run [`driver::Optimizer::optimize`] to reduce the
//!    table's peak column height, splitting ([`split`]), counting
//!    ([`counter`]), or excluding ([`single`]) gates, pricing every
//!    move with [`cost`].
//! 4. [`concretize`]: drain the accounting the driver accumulated back
//!    into the table, producing its final, renderable contents.
//!
//! A renderer (`rotfold-qasm`'s emitter) walks the concretized table
//! and the optimizer's excluded-gate residuals directly; there is no
//! intermediate op stream in this crate.

pub mod accounting;
pub mod concretize;
pub mod cost;
pub mod counter;
pub mod driver;
pub mod encode;
pub mod error;
pub mod single;
pub mod split;
pub mod table;

pub use cost::COST_TOFFOLI;
pub use driver::{OptimizationResult, Optimizer};
pub use error::{CompileError, CompileResult};
pub use table::{Bit, BitTable};
