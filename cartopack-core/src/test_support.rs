//! Fixtures shared by unit and behaviour tests.
//!
//! The helpers build a small registry and records whose ids are easy to
//! follow through encode, scan and compaction.
#![expect(
    clippy::expect_used,
    reason = "fixtures are built from static data and may panic on misuse"
)]

use std::sync::Arc;

use crate::area::{Area, Id, Ring, RingRole};
use crate::coord::GeoCoord;
use crate::progress::Progress;
use crate::types::{TypeConfig, TypeDefinition, TypeInfoRef};
use crate::way::Way;

/// Registry with routable and non-routable area and way types.
///
/// | name                  | area | way | routable | features |
/// |-----------------------|------|-----|----------|----------|
/// | `highway_residential` |      | yes | yes      | `name`   |
/// | `highway_pedestrian`  | yes  | yes | yes      | `name`   |
/// | `landuse_park`        | yes  |     |          | `name`   |
/// | `waterway_river`      |      | yes |          |          |
#[must_use]
pub fn sample_types() -> TypeConfig {
    TypeConfig::from_definitions([
        TypeDefinition::new("highway_residential")
            .way()
            .routable()
            .feature("name"),
        TypeDefinition::new("highway_pedestrian")
            .area()
            .way()
            .routable()
            .feature("name"),
        TypeDefinition::new("landuse_park").area().feature("name"),
        TypeDefinition::new("waterway_river").way(),
    ])
    .expect("sample definitions are unique")
}

/// Look up a registered type by name.
///
/// # Panics
///
/// Panics when `name` is not registered.
#[must_use]
pub fn type_named(types: &TypeConfig, name: &str) -> TypeInfoRef {
    Arc::clone(types.type_by_name(name).expect("type is registered"))
}

/// `len` distinct coordinates walking north-east from the equator.
#[must_use]
pub fn nodes(len: usize) -> Vec<GeoCoord> {
    (0..len)
        .map(|index| {
            let step = u32::try_from(index).expect("small fixture") * 1_000;
            GeoCoord::from_raw(900_000_000 + step, 1_800_000_000 + step)
        })
        .collect()
}

/// Outer ring of type `name` with four nodes carrying `ids`.
///
/// # Panics
///
/// Panics when `name` is not registered.
#[must_use]
pub fn square_ring(types: &TypeConfig, name: &str, ids: [Id; 4]) -> Ring {
    Ring::new(type_named(types, name), RingRole::Outer).with_nodes(nodes(4), ids.to_vec())
}

/// Area with a master ring, two outer rings and one hole.
///
/// Ring ids: park outer `10..=13`, pedestrian outer `1..=4`, park hole
/// `20..=22`. Only the pedestrian ring is routable.
///
/// # Panics
///
/// Panics when `types` lacks the [`sample_types`] entries.
#[must_use]
pub fn multi_ring_area(types: &TypeConfig) -> Area {
    let mut master = Ring::new(type_named(types, "landuse_park"), RingRole::Master);
    master.features.set(0, Some("Riverside Park".to_owned()));
    let park = square_ring(types, "landuse_park", [10, 11, 12, 13]);
    let plaza = square_ring(types, "highway_pedestrian", [1, 2, 3, 4]);
    let hole = Ring::new(type_named(types, "landuse_park"), RingRole::Inner { outer: 1 })
        .with_nodes(nodes(3), vec![20, 21, 22]);
    Area {
        rings: vec![master, park, plaza, hole],
    }
}

/// Way of type `name` with one node per id.
///
/// # Panics
///
/// Panics when `name` is not a registered way type.
#[must_use]
pub fn line_way(types: &TypeConfig, name: &str, ids: &[Id]) -> Way {
    Way::new(type_named(types, name)).with_nodes(nodes(ids.len()), ids.to_vec())
}

/// Kind of message captured by [`RecordingProgress`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// An action started.
    Action(String),
    /// Informational message.
    Info(String),
    /// Warning message.
    Warning(String),
    /// Error message.
    Error(String),
}

/// [`Progress`] sink that records messages for assertions.
#[derive(Debug, Default)]
pub struct RecordingProgress {
    /// Messages in arrival order; progress ticks are counted separately.
    pub events: Vec<ProgressEvent>,
    /// Number of `set_progress` calls.
    pub ticks: usize,
}

impl RecordingProgress {
    /// Actions started, in order.
    #[must_use]
    pub fn actions(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                ProgressEvent::Action(action) => Some(action.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Error messages, in order.
    #[must_use]
    pub fn errors(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                ProgressEvent::Error(message) => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Progress for RecordingProgress {
    fn set_action(&mut self, action: &str) {
        self.events.push(ProgressEvent::Action(action.to_owned()));
    }

    fn set_progress(&mut self, _current: u64, _total: u64) {
        self.ticks += 1;
    }

    fn info(&mut self, message: &str) {
        self.events.push(ProgressEvent::Info(message.to_owned()));
    }

    fn warning(&mut self, message: &str) {
        self.events.push(ProgressEvent::Warning(message.to_owned()));
    }

    fn error(&mut self, message: &str) {
        self.events.push(ProgressEvent::Error(message.to_owned()));
    }
}
