//! Core data model and binary codecs for the cartopack map build pipeline.
//!
//! The crate describes area and way records as they travel between import
//! stages, the registry of feature types that gives those records meaning,
//! and the stream codecs that serialise them. Stages themselves implement
//! [`ImportModule`] and report through a [`Progress`] sink.

pub mod area;
pub mod codec;
pub mod coord;
pub mod features;
pub mod import;
pub mod progress;
pub mod types;
pub mod way;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use area::{Area, Id, Ring, RingRole};
pub use codec::{CodecError, CodecMode, DataScanner, DataWriter};
pub use coord::{CoordError, GeoCoord};
pub use features::FeatureValues;
pub use import::{ImportModule, ImportParameter, ModuleDescription};
pub use progress::{LogProgress, Progress};
pub use types::{
    FeatureKind, TypeConfig, TypeConfigError, TypeDefinition, TypeId, TypeInfo, TypeInfoRef,
};
pub use way::Way;
