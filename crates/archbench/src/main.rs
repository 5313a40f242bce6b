use std::process::ExitCode;
use std::time::Instant;

use anstream::eprintln;
use anyhow::Result;
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use archbench_logging::{Level, setup_logging};

use crate::run::RunArgs;

mod run;

#[derive(Parser)]
#[command(name = "archbench", author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Use verbose output, repeat for more.
    #[arg(global = true, short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Run benchmark cases and print the time of each iteration.
    Run(RunArgs),
}

#[instrument(skip_all)] // Anchor span to check for overhead
fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Run(args) => run::run(args)?,
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = setup_logging(Level::from_verbosity(cli.verbose)) {
        eprintln!("{}: {err}", "error".red().bold());
        return ExitCode::FAILURE;
    }

    let start = Instant::now();
    let result = run(cli);
    debug!("Took {}ms", start.elapsed().as_millis());
    if let Err(err) = result {
        eprintln!("{}", "archbench failed".red().bold());
        for err in err.chain() {
            eprintln!("  {}: {}", "Caused by".red().bold(), err);
        }
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
