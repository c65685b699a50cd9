mod args;
mod cli;

use args::Args;
use std::process;

fn main() {
    let args = Args::parse().unwrap_or_else(|e| e.exit());
    cli::init_logger(args.verbosity);
    if let Err(e) = cli::run(args) {
        eprintln!("error: {:#}", e);
        process::exit(1);
    }
}
