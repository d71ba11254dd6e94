//! Property-based tests for the record codecs.
//!
//! # Invariants tested
//!
//! - **Id arrays:** any array, sparse or dense, decodes to its input.
//! - **Areas:** import-mode encode then decode reproduces every ring.
//! - **Cross-mode reads:** reduced encodings never desynchronise a decoder.

use std::io::Cursor;
use std::sync::Arc;

use cartopack_core::codec::{read_area, read_id_array, write_area, write_id_array};
use cartopack_core::{
    Area, CodecMode, DataScanner, DataWriter, GeoCoord, Id, Ring, RingRole, TypeConfig,
    TypeDefinition,
};
use proptest::prelude::*;

fn registry() -> TypeConfig {
    TypeConfig::from_definitions([
        TypeDefinition::new("highway_pedestrian").area().routable().feature("name"),
        TypeDefinition::new("building").area().feature("name").feature("height"),
    ])
    .expect("valid definitions")
}

fn ids_strategy() -> impl Strategy<Value = Vec<Id>> {
    prop::collection::vec(
        prop_oneof![Just(0_u64), 1_u64..1_000, (1_u64 << 40)..(1_u64 << 41)],
        0..40,
    )
}

fn ring_strategy() -> impl Strategy<Value = (bool, Vec<(u32, u32)>, Vec<Id>, bool, Option<String>)> {
    (any::<bool>(), 0_usize..12).prop_flat_map(|(routable, len)| {
        (
            Just(routable),
            prop::collection::vec((any::<u32>(), any::<u32>()), len),
            prop::collection::vec(prop_oneof![Just(0_u64), 1_u64..500], len),
            any::<bool>(),
            prop::option::of("[a-z ]{0,12}"),
        )
    })
}

fn build_area(
    types: &TypeConfig,
    specs: Vec<(bool, Vec<(u32, u32)>, Vec<Id>, bool, Option<String>)>,
) -> Area {
    let multi = specs.len() > 1;
    let rings = specs
        .into_iter()
        .enumerate()
        .map(|(index, (routable, coords, ids, keep_ids, name))| {
            let type_name = if routable { "highway_pedestrian" } else { "building" };
            let type_info = Arc::clone(types.type_by_name(type_name).expect("registered"));
            let role = match index {
                0 if multi => RingRole::Master,
                0 => RingRole::Outer,
                _ if index & 1 == 0 => RingRole::Inner { outer: 1 },
                _ => RingRole::Outer,
            };
            let nodes = coords
                .into_iter()
                .map(|(lat, lon)| GeoCoord::from_raw(lat, lon))
                .collect();
            let mut ring = Ring::new(type_info, role).with_nodes(nodes, if keep_ids { ids } else { Vec::new() });
            ring.features.set(0, name);
            ring
        })
        .collect();
    Area { rings }
}

fn encode(area: &Area, types: &TypeConfig, mode: CodecMode) -> Vec<u8> {
    let mut writer = DataWriter::new(Vec::new());
    write_area(&mut writer, area, types, mode).expect("encode");
    writer.into_inner()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn id_arrays_round_trip(ids in ids_strategy()) {
        let mut writer = DataWriter::new(Vec::new());
        write_id_array(&mut writer, &ids).expect("encode");
        let mut scanner = DataScanner::new(Cursor::new(writer.into_inner()));
        let decoded = read_id_array(&mut scanner, ids.len(), true).expect("decode");
        prop_assert_eq!(decoded, ids);
    }

    #[test]
    fn uniform_arrays_store_zero_deltas(value in 1_u64..u64::MAX, len in 1_usize..30) {
        let ids = vec![value; len];
        let mut writer = DataWriter::new(Vec::new());
        write_id_array(&mut writer, &ids).expect("encode");
        let bytes = writer.into_inner();
        let mut scanner = DataScanner::new(Cursor::new(bytes));
        prop_assert_eq!(scanner.read_number().expect("minimum"), value);
        let mut deltas = 0;
        let mut remaining = len;
        while remaining > 0 {
            let block = remaining.min(8);
            let mask = scanner.read_u8().expect("mask");
            prop_assert_eq!(mask.count_ones() as usize, block);
            for _ in 0..block {
                prop_assert_eq!(scanner.read_number().expect("delta"), 0);
                deltas += 1;
            }
            remaining -= block;
        }
        prop_assert_eq!(deltas, len);
    }

    #[test]
    fn areas_round_trip_in_import_mode(specs in prop::collection::vec(ring_strategy(), 1..5)) {
        let types = registry();
        let area = build_area(&types, specs);
        let bytes = encode(&area, &types, CodecMode::Import);
        let mut scanner = DataScanner::new(Cursor::new(bytes));
        let decoded = read_area(&mut scanner, &types, CodecMode::Import).expect("decode");
        prop_assert_eq!(decoded, area);
    }

    #[test]
    fn decoders_stay_in_sync_across_modes(
        first in prop::collection::vec(ring_strategy(), 1..4),
        second in prop::collection::vec(ring_strategy(), 1..4),
        write_mode in prop_oneof![Just(CodecMode::Import), Just(CodecMode::Optimized), Just(CodecMode::Render)],
        read_mode in prop_oneof![Just(CodecMode::Import), Just(CodecMode::Optimized), Just(CodecMode::Render)],
    ) {
        let types = registry();
        let areas = [build_area(&types, first), build_area(&types, second)];
        let bytes: Vec<u8> = areas
            .iter()
            .flat_map(|area| encode(area, &types, write_mode))
            .collect();

        let mut scanner = DataScanner::new(Cursor::new(bytes));
        for area in &areas {
            let decoded = read_area(&mut scanner, &types, read_mode).expect("decode");
            prop_assert_eq!(decoded.rings.len(), area.rings.len());
            for (ring, original) in decoded.rings.iter().zip(&area.rings) {
                prop_assert_eq!(&ring.nodes, &original.nodes);
                prop_assert_eq!(ring.role, original.role);
                prop_assert_eq!(&ring.type_info.name, &original.type_info.name);
            }
        }
    }
}
