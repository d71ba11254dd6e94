//! Way record layout: type, features, nodes and an optional id section.

use std::io::{Read, Write};
use std::sync::Arc;

use super::ids::{read_id_section, write_id_section};
use super::{CodecError, CodecMode, DataScanner, DataWriter};
use crate::types::{FeatureKind, TypeConfig};
use crate::way::Way;

/// Decode one way record.
///
/// # Errors
///
/// Returns a [`CodecError`] for short reads, unknown type codes, bad
/// presence bytes and arithmetic overflow.
pub fn read_way<R: Read>(
    scanner: &mut DataScanner<R>,
    types: &TypeConfig,
    mode: CodecMode,
) -> Result<Way, CodecError> {
    let id = scanner.read_type_id(types.way_type_id_bytes())?;
    let type_info = types
        .way_type(id)
        .map(Arc::clone)
        .ok_or(CodecError::UnknownType {
            kind: FeatureKind::Way,
            id,
        })?;
    let (features, _) = scanner.read_features(type_info.feature_count())?;
    let nodes = scanner.read_coords()?;
    let ids = if nodes.is_empty() {
        Vec::new()
    } else {
        read_id_section(scanner, nodes.len(), mode.keeps_ids(&type_info))?
    };
    Ok(Way {
        type_info,
        features,
        nodes,
        ids,
    })
}

/// Encode one way record.
///
/// # Errors
///
/// Returns a [`CodecError`] for invariant violations, types without a way
/// code and stream failures.
pub fn write_way<W: Write>(
    writer: &mut DataWriter<W>,
    way: &Way,
    types: &TypeConfig,
    mode: CodecMode,
) -> Result<(), CodecError> {
    validate_way(way)?;
    let id = way.type_info.id_for(FeatureKind::Way).ok_or_else(|| CodecError::MissingTypeId {
        kind: FeatureKind::Way,
        name: way.type_info.name.clone(),
    })?;
    writer.write_type_id(id, types.way_type_id_bytes())?;
    writer.write_features(&way.features, false)?;
    writer.write_coords(&way.nodes)?;
    if way.nodes.is_empty() {
        return Ok(());
    }
    let emitted = (!way.ids.is_empty() && mode.emits_ids(&way.type_info)).then_some(way.ids.as_slice());
    write_id_section(writer, emitted)
}

/// Check that ids parallel the nodes and attributes match the type.
///
/// # Errors
///
/// Returns [`CodecError::IdCountMismatch`] or
/// [`CodecError::FeatureCountMismatch`].
pub fn validate_way(way: &Way) -> Result<(), CodecError> {
    if !way.ids.is_empty() && way.ids.len() != way.nodes.len() {
        return Err(CodecError::IdCountMismatch {
            ring: 0,
            nodes: way.nodes.len(),
            ids: way.ids.len(),
        });
    }
    if way.features.len() != way.type_info.feature_count() {
        return Err(CodecError::FeatureCountMismatch {
            name: way.type_info.name.clone(),
            expected: way.type_info.feature_count(),
            found: way.features.len(),
        });
    }
    Ok(())
}
