//! Ingestion and emission plumbing for the restricted rotation-assembly
//! dialect (spec.md §6): a line-oriented, comment-tolerant format with
//! eight gate keywords (`rx`, `ry`, `rz`, `rxx`, `ryy`, `rzz`, `p`,
//! `cp`) and a handful of header lines preserved verbatim.
//!
//! ```
//! use rotfold_qasm::parse;
//!
//! let source = "OPENQASM 3.0;\nqreg q[1];\nrz(0.5) q[0];\n";
//! let program = parse(source, false).unwrap();
//! assert_eq!(program.gates.len(), 1);
//! ```

pub mod ast;
pub mod emitter;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod registry;

pub use emitter::emit;
pub use error::{ParseError, ParseResult};
pub use parser::{parse, ParsedProgram};
pub use registry::Registry;
