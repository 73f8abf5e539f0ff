use clap::Parser;
use momentum_screener::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
