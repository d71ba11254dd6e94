//! Shared fixtures for stage tests: a temporary destination directory with
//! merged area and way files.

use camino::{Utf8Path, Utf8PathBuf};
use cartopack_core::{Area, Id, TypeConfig, Way};
use cartopack_core::test_support::{line_way, square_ring};
use cartopack_data::{
    AREAS_INPUT, RecordHeader, SourceKind, WAYS_INPUT, write_record_file,
};
use tempfile::TempDir;

/// Temporary destination directory that lives as long as the value.
pub struct Destination {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Destination {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir");
        Self { _dir: dir, root }
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub fn path_of(&self, file_name: &str) -> Utf8PathBuf {
        self.root.join(file_name)
    }

    pub fn write_areas(&self, types: &TypeConfig, areas: Vec<Area>) {
        let records: Vec<(RecordHeader, Area)> = (1_u64..)
            .zip(areas)
            .map(|(id, area)| (RecordHeader::new(SourceKind::WAY, id), area))
            .collect();
        write_record_file(&self.path_of(AREAS_INPUT), types, &records).expect("write areas");
    }

    pub fn write_ways(&self, types: &TypeConfig, ways: Vec<Way>) {
        let records: Vec<(RecordHeader, Way)> = (100_u64..)
            .zip(ways)
            .map(|(id, way)| (RecordHeader::new(SourceKind::WAY, id), way))
            .collect();
        write_record_file(&self.path_of(WAYS_INPUT), types, &records).expect("write ways");
    }
}

/// Area holding one routable four-node ring.
pub fn routable_square(types: &TypeConfig, ids: [Id; 4]) -> Area {
    Area::simple(square_ring(types, "highway_pedestrian", ids))
}

/// Routable residential street.
pub fn street(types: &TypeConfig, ids: &[Id]) -> Way {
    line_way(types, "highway_residential", ids)
}

/// Non-routable river.
pub fn river(types: &TypeConfig, ids: &[Id]) -> Way {
    line_way(types, "waterway_river", ids)
}
