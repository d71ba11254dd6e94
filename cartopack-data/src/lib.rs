//! Record files and the area/way id optimisation stage.
//!
//! Responsibilities:
//! - Stream counted record files in and out of the destination directory.
//! - Count node usage across routable areas and ways.
//! - Rewrite area and way files keeping only ids of shared nodes.
//!
//! Boundaries:
//! - Record layouts and the type registry live in `cartopack-core`.
//! - Blocking, single-threaded I/O only.

pub mod datafile;
pub mod optimize;

pub use datafile::{
    Record, RecordHeader, RecordReader, RecordWriter, SourceKind, read_record_file,
    write_record_file,
};
pub use optimize::{
    AREAS_INPUT, AREAS_OUTPUT, FrozenUsage, NodeUsageCounter, OptimizeAreaWayIds, OptimizeError,
    OptimizeReport, PassReport, UsageScan, WAYS_INPUT, WAYS_OUTPUT,
};
