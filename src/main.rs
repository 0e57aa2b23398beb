//! emission-trace CLI entry point
//!
//! Refines chemical sensor readings and traces them back to factories

use emission_trace::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
