//! Multi-ring area records.

use crate::coord::GeoCoord;
use crate::features::FeatureValues;
use crate::types::TypeInfoRef;

/// Global node identifier; `0` means no id is recorded.
pub type Id = u64;

/// Position of a ring within its area.
///
/// On disk the role is one byte: `0` master, `1` outer and `k + 2` for an
/// inner ring belonging to outer ring `k`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RingRole {
    /// Attribute-only container heading an area with several rings.
    Master,
    /// Outer boundary.
    Outer,
    /// Hole inside an outer boundary.
    Inner {
        /// Index of the outer ring the hole belongs to.
        outer: u8,
    },
}

impl RingRole {
    /// Serialised role byte.
    ///
    /// Inner rings past outer index 253 saturate at byte 255.
    #[must_use]
    pub const fn to_byte(self) -> u8 {
        match self {
            Self::Master => 0,
            Self::Outer => 1,
            Self::Inner { outer } => outer.saturating_add(2),
        }
    }

    /// Role for a serialised byte.
    #[must_use]
    pub const fn from_byte(byte: u8) -> Self {
        match byte {
            0 => Self::Master,
            1 => Self::Outer,
            other => Self::Inner { outer: other - 2 },
        }
    }
}

/// One boundary of an area, or the master container of a multi-ring area.
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    /// Feature type of the ring.
    pub type_info: TypeInfoRef,
    /// Attribute values of the ring.
    pub features: FeatureValues,
    /// Position of the ring in its area.
    pub role: RingRole,
    /// Ring geometry.
    pub nodes: Vec<GeoCoord>,
    /// Node ids parallel to `nodes`, or empty when none are kept.
    pub ids: Vec<Id>,
}

impl Ring {
    /// A ring without geometry, attributes or ids.
    #[must_use]
    pub fn new(type_info: TypeInfoRef, role: RingRole) -> Self {
        let features = FeatureValues::for_type(&type_info);
        Self {
            type_info,
            features,
            role,
            nodes: Vec::new(),
            ids: Vec::new(),
        }
    }

    /// Attach geometry and its parallel ids.
    #[must_use]
    pub fn with_nodes(mut self, nodes: Vec<GeoCoord>, ids: Vec<Id>) -> Self {
        self.nodes = nodes;
        self.ids = ids;
        self
    }

    /// Whether the ring carries an id array.
    #[must_use]
    pub const fn has_ids(&self) -> bool {
        !self.ids.is_empty()
    }
}

/// An ordered, non-empty set of rings.
///
/// A single-ring area has one `Outer` ring. Multi-ring areas start with a
/// `Master` ring followed by outer and inner rings.
#[derive(Debug, Clone, PartialEq)]
pub struct Area {
    /// Rings in storage order.
    pub rings: Vec<Ring>,
}

impl Area {
    /// Area consisting of one outer ring.
    #[must_use]
    pub fn simple(mut ring: Ring) -> Self {
        ring.role = RingRole::Outer;
        Self { rings: vec![ring] }
    }

    /// Whether the area is headed by a master ring.
    #[must_use]
    pub const fn is_multi(&self) -> bool {
        self.rings.len() > 1
    }

    /// Iterate over the id arrays of every ring.
    pub fn ids(&self) -> impl Iterator<Item = &[Id]> {
        self.rings.iter().map(|ring| ring.ids.as_slice())
    }
}
