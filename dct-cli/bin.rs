use std::process::ExitCode;

use clap::Parser;
use dct_cli::{log_level, run, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG, when set, overrides -v
    env_logger::Builder::new()
        .filter_level(log_level(cli.verbose))
        .parse_default_env()
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            let mut source = std::error::Error::source(&err);
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}
