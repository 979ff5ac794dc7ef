//! CLI argument parsing and end-to-end pipeline tests.
//!
//! The CLI is a binary crate, so its `Cli` struct isn't importable here;
//! we mirror the flag shape the way the teacher's own CLI tests did, and
//! exercise the actual read -> optimize -> emit pipeline through the
//! library crates `main.rs` calls into.

use std::io::Write;

use clap::Parser;

#[derive(Parser)]
struct MirrorCli {
    #[arg(short, long)]
    input: std::path::PathBuf,
    #[arg(short, long)]
    output: Option<std::path::PathBuf>,
    #[arg(long, default_value_t = 30)]
    prec: u32,
    #[arg(long, default_value_t = 1000)]
    cost: i64,
    #[arg(long)]
    same: bool,
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

mod arg_parsing {
    use super::*;

    #[test]
    fn test_defaults_apply_without_optional_flags() {
        let cli = MirrorCli::try_parse_from(["rotfold", "-i", "in.qasm"]).unwrap();
        assert_eq!(cli.prec, 30);
        assert_eq!(cli.cost, 1000);
        assert!(!cli.same);
        assert_eq!(cli.verbose, 0);
        assert!(cli.output.is_none());
    }

    #[test]
    fn test_missing_input_is_rejected() {
        assert!(MirrorCli::try_parse_from(["rotfold"]).is_err());
    }

    #[test]
    fn test_verbose_count_accumulates() {
        let cli = MirrorCli::try_parse_from(["rotfold", "-i", "in.qasm", "-vvv"]).unwrap();
        assert_eq!(cli.verbose, 3);
    }

    #[test]
    fn test_same_flag_and_explicit_cost() {
        let cli =
            MirrorCli::try_parse_from(["rotfold", "-i", "in.qasm", "--same", "--cost", "7"])
                .unwrap();
        assert!(cli.same);
        assert_eq!(cli.cost, 7);
    }
}

mod pipeline {
    use rotfold_compile::cost::default_single_rotation_cost;
    use rotfold_compile::{encode, Bit, BitTable, Optimizer};
    use rotfold_qasm::{emitter::emit, parser::parse};

    fn run_pipeline(source: &str, precision: u32, same: bool, cost: i64) -> String {
        let program = parse(source, same).unwrap();
        let mut table = BitTable::new(precision as usize);
        for (gate, &angle) in program.gates.iter().zip(program.angles.iter()) {
            let normalized = encode::normalize_angle(angle, precision);
            let mut bits = encode::angle_to_bits(normalized, precision);
            if same {
                if let Some(row) = encode::least_significant_set_bit(&bits) {
                    table.push(row, Bit::Pos(gate.id));
                }
            } else {
                encode::booth_encode(&mut bits);
                for (row, &bit) in bits.iter().enumerate() {
                    match bit {
                        1 => table.push(row, Bit::Pos(gate.id)),
                        -1 => table.push(row, Bit::Neg(gate.id)),
                        _ => {}
                    }
                }
            }
        }

        let single_rotation_cost = if cost > 0 {
            cost
        } else {
            default_single_rotation_cost(precision)
        };
        let two_qubit_gate_count = program.gates.iter().filter(|g| g.kind.is_two_qubit()).count() as i64;
        let mut optimizer = Optimizer::new(table, single_rotation_cost, two_qubit_gate_count, same);
        let result = optimizer.optimize();
        let (mut final_table, mut acc) = optimizer.into_table_and_accounting();
        rotfold_compile::concretize::concretize(&mut final_table, &mut acc).unwrap();
        emit(&program, &final_table, &result.excluded_angles, precision, same).unwrap()
    }

    #[test]
    fn test_pipeline_round_trips_a_small_program() {
        let source = "OPENQASM 3.0;\nqreg q[2];\nrz(0.125) q[0];\nrz(0.125) q[1];\n";
        let text = run_pipeline(source, 8, false, 1000);
        assert!(text.starts_with("OPENQASM 3.0;\nqreg q[2];\n"));
        assert!(text.contains("qreg add[9];"));
    }

    #[test]
    fn test_pipeline_emits_basis_change_for_rx() {
        let source = "rx(0.3) q[0];\n";
        let text = run_pipeline(source, 6, false, 1000);
        assert!(text.contains("h q[0];"));
    }

    #[test]
    fn test_pipeline_reads_from_a_temp_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "rz(0.25) q[0];").unwrap();
        let source = std::fs::read_to_string(file.path()).unwrap();
        let text = run_pipeline(&source, 8, false, 1000);
        assert!(text.contains("qreg frs[8];"));
    }

    #[test]
    fn test_pipeline_same_angle_mode_uses_single_bit_per_gate() {
        let source = "rz(0.25) q[0];\nrz(0.25) q[1];\n";
        let text = run_pipeline(source, 8, true, 1000);
        assert!(text.contains("qreg add[9];"));
    }
}
