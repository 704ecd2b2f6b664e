//! Command-line entry point for chuong

use chuong_cli::commands::Commands;
use chuong_cli::error::exit_code;
use clap::Parser;
use std::process::ExitCode;

/// Split Vietnamese novels into chapter-aligned chunks and polish them
#[derive(Debug, Parser)]
#[command(name = "chuong", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress logging and progress output
    #[arg(short, long, global = true)]
    quiet: bool,
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);
    log::debug!("Arguments: {cli:?}");

    match cli.command.execute(cli.quiet) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}
