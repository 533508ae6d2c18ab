//! The interpreter's command-line driver. Takes a source file, parses it,
//! and runs the evaluator against the real process stdin/stderr.
//!
//! Run with `--help` for more info.

use std::io::{self, Write};
use std::process::ExitCode;

use cinterp::error::Error;
use cinterp::eval;
use cinterp::front::parse;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// The C source file to evaluate.
    file: String,
    /// Print the parsed AST instead of running it.
    #[arg(long, default_value_t = false)]
    ast: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let input = match std::fs::read_to_string(&args.file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("cinterp: could not read '{}': {e}", args.file);
            return ExitCode::FAILURE;
        }
    };

    let program = match parse(&input) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("cinterp: {e}");
            return ExitCode::FAILURE;
        }
    };

    if args.ast {
        println!("{:#?}", program.ast);
        return ExitCode::SUCCESS;
    }

    let stdin = io::stdin().lock();
    let stderr = io::stderr().lock();
    match eval::run(&program, stdin, stderr) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e);
            ExitCode::FAILURE
        }
    }
}

fn report(e: &Error) {
    let _ = writeln!(io::stderr(), "cinterp: {e}");
}
