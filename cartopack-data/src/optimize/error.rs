//! Errors raised by the optimisation stage and record-file helpers.

use camino::Utf8PathBuf;
use cartopack_core::CodecError;
use thiserror::Error;

/// Failure of a record-file pass; every variant names the file involved.
///
/// Record numbers are 1-based; record 0 stands for the file header.
#[derive(Debug, Error)]
pub enum OptimizeError {
    /// An input file could not be opened.
    #[error("cannot open '{path}': {source}")]
    Open {
        /// Input file.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// An output file could not be created.
    #[error("cannot create '{path}': {source}")]
    Create {
        /// Output file.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A record could not be read.
    #[error("cannot read record {record} of '{path}': {source}")]
    Decode {
        /// Input file.
        path: Utf8PathBuf,
        /// Failing record number.
        record: u32,
        /// Codec failure.
        #[source]
        source: CodecError,
    },
    /// A record could not be written.
    #[error("cannot write record {record} to '{path}': {source}")]
    Encode {
        /// Output file.
        path: Utf8PathBuf,
        /// Failing record number.
        record: u32,
        /// Codec failure.
        #[source]
        source: CodecError,
    },
    /// The record count could not be patched into the header.
    #[error("cannot patch the record count of '{path}': {source}")]
    PatchHeader {
        /// Output file.
        path: Utf8PathBuf,
        /// Codec failure.
        #[source]
        source: CodecError,
    },
    /// Flushing the output to disk failed.
    #[error("cannot sync '{path}': {source}")]
    Sync {
        /// Output file.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The output holds a different number of records than the input.
    #[error("'{path}' holds {found} records but {expected} were read")]
    CountMismatch {
        /// Output file.
        path: Utf8PathBuf,
        /// Records announced by the input.
        expected: u32,
        /// Records written to the output.
        found: u32,
    },
}

impl OptimizeError {
    /// File the failure refers to.
    #[must_use]
    pub fn path(&self) -> &Utf8PathBuf {
        match self {
            Self::Open { path, .. }
            | Self::Create { path, .. }
            | Self::Decode { path, .. }
            | Self::Encode { path, .. }
            | Self::PatchHeader { path, .. }
            | Self::Sync { path, .. }
            | Self::CountMismatch { path, .. } => path,
        }
    }
}
