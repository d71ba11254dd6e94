//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use std::io;

use cartopack_cli::CliError;
use structured_logger::Builder;
use structured_logger::json::new_writer;

/// Environment variable overriding the log level.
const LOG_LEVEL_ENV: &str = "CARTOPACK_LOG";

fn setup_logging() {
    let level = std::env::var(LOG_LEVEL_ENV).unwrap_or_else(|_| "info".to_owned());
    Builder::with_level(&level)
        .with_target_writer("*", new_writer(io::stderr()))
        .init();
}

#[expect(clippy::print_stderr, reason = "final error line for the terminal")]
fn main() {
    setup_logging();
    if let Err(err) = cartopack_cli::run() {
        if let CliError::ArgumentParsing(parse_err) = &err {
            parse_err.exit();
        }
        log::error!("{err}");
        eprintln!("cartopack: {err}");
        std::process::exit(1);
    }
}
