//! Facade crate for the cartopack import toolkit.
//!
//! This crate re-exports the core record types and codecs and, behind the
//! `optimize` feature, the node-id optimisation stage.

#![forbid(unsafe_code)]

pub use cartopack_core::{
    Area, CodecError, CodecMode, DataScanner, DataWriter, FeatureKind, FeatureValues, GeoCoord,
    Id, ImportModule, ImportParameter, LogProgress, ModuleDescription, Progress, Ring, RingRole,
    TypeConfig, TypeConfigError, TypeDefinition, TypeInfo, TypeInfoRef, Way, codec,
};

#[cfg(feature = "optimize")]
pub use cartopack_data::{
    NodeUsageCounter, OptimizeAreaWayIds, OptimizeError, OptimizeReport, PassReport,
    read_record_file, write_record_file,
};
