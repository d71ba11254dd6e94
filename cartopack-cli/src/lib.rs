//! Command-line interface for cartopack's offline import stages.
#![forbid(unsafe_code)]

use std::io;

use clap::{Parser, Subcommand};

mod error;
mod optimize;

pub use error::CliError;

use optimize::{OptimizeArgs, run_optimize, write_summary};

pub(crate) const ARG_DESTINATION_DIR: &str = "destination-dir";
pub(crate) const ARG_TYPE_CONFIG: &str = "type-config";
pub(crate) const ENV_DESTINATION_DIR: &str = "CARTOPACK_CMDS_OPTIMIZE_DESTINATION_DIR";
pub(crate) const ENV_TYPE_CONFIG: &str = "CARTOPACK_CMDS_OPTIMIZE_TYPE_CONFIG";

/// Run the cartopack CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns a [`CliError`] when argument parsing, configuration layering,
/// input validation or the selected stage fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Optimize(args) => {
            let report = run_optimize(args)?;
            write_summary(&mut io::stdout().lock(), &report).map_err(CliError::WriteOutput)?;
        }
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(
    name = "cartopack",
    about = "Offline import stages for compact map databases",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Drop node ids that do not join routable areas and ways.
    Optimize(OptimizeArgs),
}

#[cfg(test)]
mod tests;
