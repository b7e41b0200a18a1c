//! Command-line entry point: run one input document and write the report.

use energy_market_core_rs::io::run_file;
use energy_market_core_rs::orchestrator::report_hash;
use std::process::ExitCode;

const USAGE: &str = "Usage: energy-market-cli <input.json> <output.json> [--hash]";

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if matches!(args.first().map(|s| s.as_str()), Some("--help") | Some("-h")) {
        println!("{USAGE}");
        return ExitCode::SUCCESS;
    }

    let (input, output) = match (args.first(), args.get(1)) {
        (Some(input), Some(output)) => (input, output),
        _ => {
            eprintln!("{USAGE}");
            return ExitCode::FAILURE;
        }
    };
    let print_hash = args.iter().skip(2).any(|arg| arg == "--hash");

    let report = match run_file(input, output) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    if print_hash {
        match report_hash(&report) {
            Ok(hash) => println!("{hash}"),
            Err(err) => {
                eprintln!("error: {err}");
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
