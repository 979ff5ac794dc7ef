//! Command-line entry point for the bit-table rotation-synthesis
//! optimizer.
//!
//! Grounded on the teacher CLI's shape (`clap` derive parser,
//! `console`-styled error reporting, `tracing-subscriber` verbosity
//! wired to `-v` count, `mimalloc` as the global allocator) but with a
//! single flat action instead of a subcommand tree — this tool does
//! exactly one thing: read a rotation program, optimize it, write the
//! synthesized program back out.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use console::style;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rotfold_compile::{cost::default_single_rotation_cost, Optimizer};
use rotfold_qasm::emitter::emit;
use rotfold_qasm::parser::parse;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Synthesize a batch of same-axis rotation gates into a shared
/// fixed-precision adder network instead of one decomposition per gate.
#[derive(Parser)]
#[command(name = "rotfold")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input rotation-assembly source file.
    #[arg(short, long)]
    input: PathBuf,

    /// Output file (defaults to stdout if omitted).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Fixed-point precision, in bits, for the shared accumulator.
    #[arg(long, default_value_t = 30)]
    prec: u32,

    /// T-count of one standalone single-rotation synthesis, used when
    /// deciding whether to exclude a gate rather than fold it in.
    #[arg(long, default_value_t = 1000)]
    cost: i64,

    /// Treat every gate's angle as identical, emitting only the
    /// least-significant bit per gate instead of a full Booth-encoded
    /// string.
    #[arg(long)]
    same: bool,

    /// Increase verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn run(cli: &Cli) -> anyhow::Result<String> {
    let source = fs::read_to_string(&cli.input)?;
    let program = parse(&source, cli.same)?;
    info!(gates = program.gates.len(), qubits = program.registry.len(), "parsed program");

    let mut table = rotfold_compile::BitTable::new(cli.prec as usize);
    for (gate, &angle) in program.gates.iter().zip(program.angles.iter()) {
        let normalized = rotfold_compile::encode::normalize_angle(angle, cli.prec);
        let mut bits = rotfold_compile::encode::angle_to_bits(normalized, cli.prec);
        if cli.same {
            if let Some(row) = rotfold_compile::encode::least_significant_set_bit(&bits) {
                table.push(row, rotfold_compile::Bit::Pos(gate.id));
            }
        } else {
            rotfold_compile::encode::booth_encode(&mut bits);
            for (row, &bit) in bits.iter().enumerate() {
                match bit {
                    1 => table.push(row, rotfold_compile::Bit::Pos(gate.id)),
                    -1 => table.push(row, rotfold_compile::Bit::Neg(gate.id)),
                    _ => {}
                }
            }
        }
    }

    let single_rotation_cost = if cli.cost > 0 {
        cli.cost
    } else {
        default_single_rotation_cost(cli.prec)
    };
    let two_qubit_gate_count = program.gates.iter().filter(|g| g.kind.is_two_qubit()).count() as i64;

    let mut optimizer = Optimizer::new(table, single_rotation_cost, two_qubit_gate_count, cli.same);
    let result = optimizer.optimize();
    info!(
        total_cost = result.total_cost,
        excluded = result.excluded_gates.len(),
        "optimization complete"
    );

    let (mut final_table, mut acc) = optimizer.into_table_and_accounting();
    rotfold_compile::concretize::concretize(&mut final_table, &mut acc)?;

    Ok(emit(&program, &final_table, &result.excluded_angles, cli.prec, cli.same)?)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    match run(&cli) {
        Ok(text) => {
            match &cli.output {
                Some(path) => fs::write(path, text)?,
                None => print!("{text}"),
            }
            Ok(())
        }
        Err(err) => {
            eprintln!("{} {err}", style("error:").red().bold());
            std::process::exit(255);
        }
    }
}
