//! Binary codecs for area and way records.
//!
//! Records are written with [`DataWriter`] and read back with
//! [`DataScanner`]. Each ring (or way) with geometry is followed by an id
//! section whose leading presence byte says whether an id array follows, so
//! a decoder in any [`CodecMode`] can read output written in any other mode.

mod area;
mod ids;
mod stream;
mod way;

use std::io;

use thiserror::Error;

use crate::area::RingRole;
use crate::types::{FeatureKind, TypeId, TypeInfo};

pub use area::{read_area, validate_area, write_area};
pub use ids::{read_id_array, write_id_array};
pub use stream::{DataScanner, DataWriter};
pub use way::{read_way, validate_way, write_way};

/// Upper bound on capacity reserved up front from a count read off disk.
pub(crate) const MAX_PREALLOCATION: usize = 1 << 16;

/// Which consumer a record is coded for; decides whether id arrays are kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CodecMode {
    /// Full fidelity: every id array is kept.
    #[default]
    Import,
    /// Id arrays are kept only for routable types.
    Optimized,
    /// Id arrays are dropped.
    Render,
}

impl CodecMode {
    /// Whether an encoder in this mode writes the ids of a `type_info` ring.
    #[must_use]
    pub const fn emits_ids(self, type_info: &TypeInfo) -> bool {
        match self {
            Self::Import => !type_info.ignore,
            Self::Optimized => !type_info.ignore && type_info.can_route,
            Self::Render => false,
        }
    }

    /// Whether a decoder in this mode keeps the ids of a `type_info` ring.
    #[must_use]
    pub const fn keeps_ids(self, type_info: &TypeInfo) -> bool {
        match self {
            Self::Import => true,
            Self::Optimized => type_info.can_route,
            Self::Render => false,
        }
    }
}

/// Errors raised while encoding or decoding a record.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Reading or writing the underlying stream failed, including short reads.
    #[error("record i/o failed: {0}")]
    Io(#[from] io::Error),
    /// A type code is not registered.
    #[error("unknown {kind} type id {id}")]
    UnknownType {
        /// Id space the code was read from.
        kind: FeatureKind,
        /// Code found in the stream.
        id: TypeId,
    },
    /// A type has no code in the id space it is written to.
    #[error("type {name} has no {kind} type id")]
    MissingTypeId {
        /// Id space being written.
        kind: FeatureKind,
        /// Name of the offending type.
        name: String,
    },
    /// A ring after the first carried the master role byte.
    #[error("ring {ring} has invalid role byte {byte}")]
    InvalidRingRole {
        /// Index of the ring within its area.
        ring: usize,
        /// Role byte found in the stream.
        byte: u8,
    },
    /// The id presence byte was neither 0 nor 1.
    #[error("invalid id presence byte {0}")]
    InvalidIdPresence(u8),
    /// A presence mask marked entries past the end of the id array.
    #[error("presence mask {mask:#010b} marks entries beyond the {entries} left")]
    InvalidIdMask {
        /// Mask byte read from the stream.
        mask: u8,
        /// Entries remaining in the final block.
        entries: usize,
    },
    /// A string payload was not UTF-8.
    #[error("string payload is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
    /// A count or type code did not fit the width it is stored in.
    #[error("value {0} does not fit its target width")]
    CountOverflow(u64),
    /// A variable-length number ran past 64 bits.
    #[error("variable-length number exceeds 64 bits")]
    NumberOverflow,
    /// Rebuilding an id from base and delta overflowed.
    #[error("id delta {delta} overflows base {base}")]
    IdOverflow {
        /// Minimum id of the array.
        base: u64,
        /// Delta read from the stream.
        delta: u64,
    },
    /// A coordinate delta left the raw coordinate range.
    #[error("coordinate delta leaves the raw coordinate range")]
    CoordinateOverflow,
    /// An area without rings cannot be written.
    #[error("area has no rings")]
    EmptyArea,
    /// The id array is neither empty nor parallel to the nodes.
    #[error("ring {ring} carries {ids} ids for {nodes} nodes")]
    IdCountMismatch {
        /// Index of the ring, or 0 for a way.
        ring: usize,
        /// Number of nodes.
        nodes: usize,
        /// Number of ids.
        ids: usize,
    },
    /// A ring's role is not valid at its position.
    #[error("ring {ring} cannot have role {role:?}")]
    RoleMismatch {
        /// Index of the ring within its area.
        ring: usize,
        /// Role found on the ring.
        role: RingRole,
    },
    /// The attribute buffer does not match the type's attribute list.
    #[error("type {name} declares {expected} attributes but {found} were supplied")]
    FeatureCountMismatch {
        /// Name of the ring or way type.
        name: String,
        /// Attributes declared by the type.
        expected: usize,
        /// Slots in the supplied buffer.
        found: usize,
    },
}

impl CodecError {
    /// Whether the stream ended in the middle of a record.
    #[must_use]
    pub fn is_truncation(&self) -> bool {
        matches!(self, Self::Io(err) if err.kind() == io::ErrorKind::UnexpectedEof)
    }
}
