//! kiln CLI - build-matrix planner.
//!
//! Entry point: parses arguments, initializes logging, and dispatches the
//! command. Errors surface as miette diagnostics with a non-zero exit.

use clap::Parser;
use kiln_cli::{cli, commands, error, logger};
use miette::Result;

fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);

    let result = match args.command {
        cli::Command::Plan(plan_args) => commands::plan_execute(plan_args),
    };

    result.map_err(error::cli_error_to_miette)
}
