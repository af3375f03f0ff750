//! Command-line interface for rdparse-calc.
//!
//! Evaluates an integer expression given on the command line or read from a
//! file and prints the result.
use clap::Parser;
use rdparse_calc::{eval, eval_file, sum_operands};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Expression to evaluate, e.g. `2 * (3 + 4)`.
    #[arg(conflicts_with = "file")]
    expr: Option<String>,

    /// File holding the expression to evaluate.
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Parse the input as a sum and print its operands instead.
    #[arg(short, long)]
    sum: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let result = match (&args.expr, &args.file) {
        (Some(expr), _) if args.sum => sum_operands(expr).map(|ops| format!("{:?}", ops)),
        (Some(expr), _) => eval(expr).map(|v| v.to_string()),
        (None, Some(path)) => eval_file(path).map(|v| v.to_string()),
        (None, None) => {
            eprintln!("nothing to evaluate: pass an expression or --file");
            return ExitCode::FAILURE;
        }
    };

    match result {
        Ok(text) => {
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
