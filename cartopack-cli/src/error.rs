//! Error types emitted by the cartopack CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use cartopack_core::TypeConfigError;
use cartopack_data::OptimizeError;
use thiserror::Error;

/// Errors emitted by the cartopack CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Command-line flag name.
        field: &'static str,
        /// Environment variable that can supply the value.
        env: &'static str,
    },
    /// A referenced input file does not exist.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Option or stage input that named the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Option or stage input that named the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Option or stage input that named the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The destination directory does not exist.
    #[error("destination directory {path:?} does not exist")]
    MissingDestinationDirectory {
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// The destination path exists but is not a directory.
    #[error("destination {path:?} is not a directory")]
    DestinationNotDirectory {
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// The type definition file could not be opened.
    #[error("failed to open type config at {path:?}: {source}")]
    OpenTypeConfig {
        /// Type definition file.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The type definition file is not a valid registry.
    #[error("invalid type config at {path:?}: {source}")]
    LoadTypeConfig {
        /// Type definition file.
        path: Utf8PathBuf,
        /// Registry error.
        #[source]
        source: TypeConfigError,
    },
    /// The optimisation stage failed.
    #[error("optimisation failed: {0}")]
    Optimize(#[from] OptimizeError),
    /// Writing the command summary failed.
    #[error("failed to write summary: {0}")]
    WriteOutput(#[source] std::io::Error),
}
