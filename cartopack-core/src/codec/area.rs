//! Area record layout.
//!
//! ```text
//! type(ring 0) features(ring 0, flag = multi) [additional ring count]
//! nodes(ring 0) [id section]
//! { type [features] role nodes [id section] } for every further ring
//! ```

use std::io::{Read, Write};
use std::sync::Arc;

use super::ids::{read_id_section, write_id_section};
use super::{CodecError, CodecMode, DataScanner, DataWriter, MAX_PREALLOCATION};
use crate::area::{Area, Ring, RingRole};
use crate::features::FeatureValues;
use crate::types::{FeatureKind, TypeConfig, TypeInfoRef};

/// Decode one area record.
///
/// # Errors
///
/// Returns a [`CodecError`] for short reads, unknown type codes, bad role or
/// presence bytes and arithmetic overflow; no partial area is returned.
pub fn read_area<R: Read>(
    scanner: &mut DataScanner<R>,
    types: &TypeConfig,
    mode: CodecMode,
) -> Result<Area, CodecError> {
    let width = types.area_type_id_bytes();
    let head_type = read_type(scanner, types, width)?;
    let (features, multi) = scanner.read_features(head_type.feature_count())?;
    let ring_count = if multi {
        total_rings(scanner.read_count()?)?
    } else {
        1
    };

    let mut rings = Vec::with_capacity(ring_count.min(MAX_PREALLOCATION));
    let role = if multi { RingRole::Master } else { RingRole::Outer };
    rings.push(read_geometry(scanner, head_type, features, role, mode)?);

    for index in 1..ring_count {
        let type_info = read_type(scanner, types, width)?;
        let ring_features = if type_info.ignore {
            FeatureValues::for_type(&type_info)
        } else {
            scanner.read_features(type_info.feature_count())?.0
        };
        let byte = scanner.read_u8()?;
        let ring_role = RingRole::from_byte(byte);
        if ring_role == RingRole::Master {
            return Err(CodecError::InvalidRingRole { ring: index, byte });
        }
        rings.push(read_geometry(scanner, type_info, ring_features, ring_role, mode)?);
    }
    Ok(Area { rings })
}

/// Encode one area record.
///
/// The area is validated with [`validate_area`] before anything is written.
///
/// # Errors
///
/// Returns a [`CodecError`] for invariant violations, types without an area
/// code and stream failures.
pub fn write_area<W: Write>(
    writer: &mut DataWriter<W>,
    area: &Area,
    types: &TypeConfig,
    mode: CodecMode,
) -> Result<(), CodecError> {
    validate_area(area)?;
    let width = types.area_type_id_bytes();
    let mut rings = area.rings.iter();
    let Some(head) = rings.next() else {
        return Err(CodecError::EmptyArea);
    };

    write_type(writer, &head.type_info, width)?;
    writer.write_features(&head.features, area.is_multi())?;
    if area.is_multi() {
        writer.write_count(area.rings.len() - 1)?;
    }
    // The head ring keeps its ids on import whatever its type.
    let head_ids = matches!(mode, CodecMode::Import) || mode.emits_ids(&head.type_info);
    write_geometry(writer, head, head_ids)?;

    for ring in rings {
        write_type(writer, &ring.type_info, width)?;
        if !ring.type_info.ignore {
            writer.write_features(&ring.features, false)?;
        }
        writer.write_u8(ring.role.to_byte())?;
        write_geometry(writer, ring, mode.emits_ids(&ring.type_info))?;
    }
    Ok(())
}

/// Check the structural invariants an area must satisfy to be written.
///
/// # Errors
///
/// Returns [`CodecError::EmptyArea`], [`CodecError::RoleMismatch`],
/// [`CodecError::IdCountMismatch`] or [`CodecError::FeatureCountMismatch`]
/// for the first violation found.
pub fn validate_area(area: &Area) -> Result<(), CodecError> {
    if area.rings.is_empty() {
        return Err(CodecError::EmptyArea);
    }
    for (index, ring) in area.rings.iter().enumerate() {
        let expected_head = if area.is_multi() { RingRole::Master } else { RingRole::Outer };
        let role_ok = match ring.role {
            role if index == 0 => role == expected_head,
            RingRole::Master => false,
            RingRole::Outer => true,
            RingRole::Inner { outer } => outer <= u8::MAX - 2,
        };
        if !role_ok {
            return Err(CodecError::RoleMismatch {
                ring: index,
                role: ring.role,
            });
        }
        if ring.has_ids() && ring.ids.len() != ring.nodes.len() {
            return Err(CodecError::IdCountMismatch {
                ring: index,
                nodes: ring.nodes.len(),
                ids: ring.ids.len(),
            });
        }
        let written = index == 0 || !ring.type_info.ignore;
        if written && ring.features.len() != ring.type_info.feature_count() {
            return Err(CodecError::FeatureCountMismatch {
                name: ring.type_info.name.clone(),
                expected: ring.type_info.feature_count(),
                found: ring.features.len(),
            });
        }
    }
    Ok(())
}

/// Ring total for a multipolygon announcing `additional` rings after the head.
fn total_rings(additional: usize) -> Result<usize, CodecError> {
    if additional == 0 {
        return Err(CodecError::RoleMismatch {
            ring: 0,
            role: RingRole::Master,
        });
    }
    additional.checked_add(1).ok_or_else(|| {
        CodecError::CountOverflow(u64::try_from(additional).map_or(u64::MAX, |n| n.saturating_add(1)))
    })
}

fn read_type<R: Read>(
    scanner: &mut DataScanner<R>,
    types: &TypeConfig,
    width: u8,
) -> Result<TypeInfoRef, CodecError> {
    let id = scanner.read_type_id(width)?;
    types.area_type(id).map(Arc::clone).ok_or(CodecError::UnknownType {
        kind: FeatureKind::Area,
        id,
    })
}

fn write_type<W: Write>(
    writer: &mut DataWriter<W>,
    type_info: &TypeInfoRef,
    width: u8,
) -> Result<(), CodecError> {
    let id = type_info.id_for(FeatureKind::Area).ok_or_else(|| CodecError::MissingTypeId {
        kind: FeatureKind::Area,
        name: type_info.name.clone(),
    })?;
    writer.write_type_id(id, width)
}

fn read_geometry<R: Read>(
    scanner: &mut DataScanner<R>,
    type_info: TypeInfoRef,
    features: FeatureValues,
    role: RingRole,
    mode: CodecMode,
) -> Result<Ring, CodecError> {
    let nodes = scanner.read_coords()?;
    let ids = if nodes.is_empty() {
        Vec::new()
    } else {
        read_id_section(scanner, nodes.len(), mode.keeps_ids(&type_info))?
    };
    Ok(Ring {
        type_info,
        features,
        role,
        nodes,
        ids,
    })
}

fn write_geometry<W: Write>(
    writer: &mut DataWriter<W>,
    ring: &Ring,
    emit_ids: bool,
) -> Result<(), CodecError> {
    writer.write_coords(&ring.nodes)?;
    if ring.nodes.is_empty() {
        return Ok(());
    }
    let emitted = (emit_ids && ring.has_ids()).then_some(ring.ids.as_slice());
    write_id_section(writer, emitted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{multi_ring_area, nodes, sample_types, square_ring};
    use rstest::{fixture, rstest};
    use std::io::Cursor;

    #[fixture]
    fn types() -> TypeConfig {
        sample_types()
    }

    fn encode(area: &Area, types: &TypeConfig, mode: CodecMode) -> Vec<u8> {
        let mut writer = DataWriter::new(Vec::new());
        write_area(&mut writer, area, types, mode).expect("encode");
        writer.into_inner()
    }

    fn decode(bytes: Vec<u8>, types: &TypeConfig, mode: CodecMode) -> Result<Area, CodecError> {
        let mut scanner = DataScanner::new(Cursor::new(bytes));
        let area = read_area(&mut scanner, types, mode)?;
        let mut rest = Vec::new();
        scanner.get_mut().read_to_end(&mut rest)?;
        assert!(rest.is_empty(), "decoder left {} bytes", rest.len());
        Ok(area)
    }

    #[rstest]
    fn simple_area_round_trips(types: TypeConfig) {
        let area = Area::simple(square_ring(&types, "highway_pedestrian", [1, 2, 3, 4]));
        let bytes = encode(&area, &types, CodecMode::Import);
        assert_eq!(decode(bytes, &types, CodecMode::Import).expect("decode"), area);
    }

    #[rstest]
    fn multi_ring_area_round_trips(types: TypeConfig) {
        let area = multi_ring_area(&types);
        let bytes = encode(&area, &types, CodecMode::Import);
        let decoded = decode(bytes, &types, CodecMode::Import).expect("decode");
        assert_eq!(decoded, area);
        assert_eq!(decoded.rings.first().map(|r| r.role), Some(RingRole::Master));
    }

    #[rstest]
    fn ignore_typed_head_keeps_ids_on_import(types: TypeConfig) {
        let ring = Ring::new(Arc::clone(types.ignore_type()), RingRole::Outer)
            .with_nodes(nodes(4), vec![1, 2, 3, 4]);
        let area = Area::simple(ring);
        let decoded = decode(encode(&area, &types, CodecMode::Import), &types, CodecMode::Import)
            .expect("decode");
        assert_eq!(decoded, area);
        assert_eq!(decoded.rings.first().map(|r| r.ids.clone()), Some(vec![1, 2, 3, 4]));
    }

    #[rstest]
    #[case(CodecMode::Import, [true, true, true])]
    #[case(CodecMode::Optimized, [false, true, false])]
    #[case(CodecMode::Render, [false, false, false])]
    fn decoder_mode_decides_kept_ids(
        types: TypeConfig,
        #[case] mode: CodecMode,
        #[case] kept: [bool; 3],
    ) {
        let area = multi_ring_area(&types);
        let bytes = encode(&area, &types, CodecMode::Import);
        let decoded = decode(bytes, &types, mode).expect("decode");
        let has_ids: Vec<bool> = decoded.rings.iter().skip(1).map(Ring::has_ids).collect();
        assert_eq!(has_ids, kept);
    }

    #[rstest]
    #[case(CodecMode::Optimized)]
    #[case(CodecMode::Render)]
    fn reduced_encodings_read_back_in_import_mode(types: TypeConfig, #[case] mode: CodecMode) {
        let area = multi_ring_area(&types);
        let decoded = decode(encode(&area, &types, mode), &types, CodecMode::Import).expect("decode");
        for (original, ring) in area.rings.iter().zip(&decoded.rings) {
            assert_eq!(ring.nodes, original.nodes);
            assert_eq!(ring.role, original.role);
            let expected = mode.emits_ids(&original.type_info) && original.has_ids();
            assert_eq!(ring.has_ids(), expected);
        }
    }

    #[rstest]
    fn unknown_type_is_rejected(types: TypeConfig) {
        let err = decode(vec![200, 0, 0], &types, CodecMode::Import).expect_err("unknown type");
        assert!(matches!(
            err,
            CodecError::UnknownType {
                kind: FeatureKind::Area,
                id: 200
            }
        ));
    }

    #[rstest]
    fn master_role_after_head_is_rejected(types: TypeConfig) {
        let park = types.type_by_name("landuse_park").expect("park");
        let head = Ring::new(Arc::clone(park), RingRole::Master);
        let hole = Ring::new(Arc::clone(types.ignore_type()), RingRole::Outer);
        let mut bytes = encode(&Area { rings: vec![head, hole] }, &types, CodecMode::Import);
        // The ignore ring ends the record with its type, role and node count.
        let role_at = bytes.len() - 2;
        if let Some(byte) = bytes.get_mut(role_at) {
            *byte = 0;
        }
        let err = decode(bytes, &types, CodecMode::Import).expect_err("bad role");
        assert!(matches!(err, CodecError::InvalidRingRole { ring: 1, byte: 0 }));
    }

    #[rstest]
    #[case(1, Some(2))]
    #[case(3, Some(4))]
    #[case(0, None)]
    fn additional_ring_count_sets_the_total(#[case] additional: usize, #[case] total: Option<usize>) {
        match (total_rings(additional), total) {
            (Ok(found), Some(expected)) => assert_eq!(found, expected),
            (Err(err), None) => assert!(matches!(
                err,
                CodecError::RoleMismatch { ring: 0, role: RingRole::Master }
            )),
            (other, _) => panic!("unexpected ring total {other:?}"),
        }
    }

    #[test]
    fn overflowing_ring_total_reports_the_wanted_count() {
        let err = total_rings(usize::MAX).expect_err("overflow");
        let wanted = u64::try_from(usize::MAX).map_or(u64::MAX, |n| n.saturating_add(1));
        assert!(matches!(err, CodecError::CountOverflow(count) if count == wanted));
    }

    #[rstest]
    fn truncated_record_fails(types: TypeConfig) {
        let area = Area::simple(square_ring(&types, "highway_pedestrian", [1, 2, 3, 4]));
        let mut bytes = encode(&area, &types, CodecMode::Import);
        bytes.truncate(bytes.len() - 1);
        assert!(decode(bytes, &types, CodecMode::Import).expect_err("short").is_truncation());
    }

    #[rstest]
    fn encode_rejects_invariant_violations(types: TypeConfig) {
        let mut ring = square_ring(&types, "highway_pedestrian", [1, 2, 3, 4]);
        ring.ids.pop();
        let mut writer = DataWriter::new(Vec::new());
        let err = write_area(&mut writer, &Area::simple(ring), &types, CodecMode::Import)
            .expect_err("mismatched ids");
        assert!(matches!(err, CodecError::IdCountMismatch { ring: 0, nodes: 4, ids: 3 }));
        assert!(writer.into_inner().is_empty());

        let err = validate_area(&Area { rings: Vec::new() }).expect_err("empty");
        assert!(matches!(err, CodecError::EmptyArea));

        let mut single = Area::simple(square_ring(&types, "landuse_park", [0; 4]));
        if let Some(head) = single.rings.first_mut() {
            head.role = RingRole::Master;
        }
        assert!(matches!(
            validate_area(&single),
            Err(CodecError::RoleMismatch { ring: 0, role: RingRole::Master })
        ));
    }
}
