//! Test helpers for laying out a destination directory.

use camino::{Utf8Path, Utf8PathBuf};
use cartopack_core::test_support::{line_way, sample_types, square_ring};
use cartopack_core::{Area, TypeConfig, Way};
use cartopack_data::{AREAS_INPUT, RecordHeader, SourceKind, WAYS_INPUT, write_record_file};
use std::fs;
use tempfile::TempDir;

use crate::optimize::OptimizeConfig;

/// Type document equivalent to [`sample_types`].
pub(super) const SAMPLE_TYPES_JSON: &str = r#"{"types": [
    {"name": "highway_residential", "way": true, "can_route": true, "features": ["name"]},
    {"name": "highway_pedestrian", "area": true, "way": true, "can_route": true, "features": ["name"]},
    {"name": "landuse_park", "area": true, "features": ["name"]},
    {"name": "waterway_river", "way": true}
]}"#;

pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 tempdir");
        Self { _dir: dir, root }
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub(super) fn path_of(&self, file_name: &str) -> Utf8PathBuf {
        self.root.join(file_name)
    }

    pub(super) fn write_type_config(&self) -> Utf8PathBuf {
        let path = self.path_of("types.json");
        fs::write(&path, SAMPLE_TYPES_JSON).expect("write type config");
        path
    }

    /// Plaza ring `1..=4`, street `4, 5, 6` and river `6, 7`.
    pub(super) fn write_junction_inputs(&self) {
        let types = sample_types();
        let areas = [(
            RecordHeader::new(SourceKind::WAY, 1),
            Area::simple(square_ring(&types, "highway_pedestrian", [1, 2, 3, 4])),
        )];
        let ways: [(RecordHeader, Way); 2] = [
            (
                RecordHeader::new(SourceKind::WAY, 2),
                line_way(&types, "highway_residential", &[4, 5, 6]),
            ),
            (
                RecordHeader::new(SourceKind::WAY, 3),
                line_way(&types, "waterway_river", &[6, 7]),
            ),
        ];
        write_record_file(&self.path_of(AREAS_INPUT), &types, &areas).expect("write areas");
        write_record_file(&self.path_of(WAYS_INPUT), &types, &ways).expect("write ways");
    }

    pub(super) fn config(&self, type_config: Utf8PathBuf) -> OptimizeConfig {
        OptimizeConfig {
            destination_dir: self.root.clone(),
            type_config,
        }
    }
}

pub(super) fn loaded_types(path: &Utf8Path) -> TypeConfig {
    let file = fs::File::open(path).expect("open type config");
    TypeConfig::from_json_reader(file).expect("valid type config")
}
