//! Linear way records.

use crate::area::Id;
use crate::coord::GeoCoord;
use crate::features::FeatureValues;
use crate::types::TypeInfoRef;

/// A polyline with attributes and optional node ids.
#[derive(Debug, Clone, PartialEq)]
pub struct Way {
    /// Feature type of the way.
    pub type_info: TypeInfoRef,
    /// Attribute values of the way.
    pub features: FeatureValues,
    /// Way geometry.
    pub nodes: Vec<GeoCoord>,
    /// Node ids parallel to `nodes`, or empty when none are kept.
    pub ids: Vec<Id>,
}

impl Way {
    /// A way without geometry, attributes or ids.
    #[must_use]
    pub fn new(type_info: TypeInfoRef) -> Self {
        let features = FeatureValues::for_type(&type_info);
        Self {
            type_info,
            features,
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

    /// Whether the first and last ids name the same, non-zero node.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        match (self.ids.first(), self.ids.last()) {
            (Some(&first), Some(&last)) => first != 0 && first == last,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_types;
    use rstest::rstest;

    #[rstest]
    #[case(vec![5, 7, 9, 5], true)]
    #[case(vec![5, 7, 9], false)]
    #[case(vec![0, 7, 0], false)]
    #[case(vec![], false)]
    fn closed_ways_share_a_non_zero_endpoint(#[case] ids: Vec<Id>, #[case] closed: bool) {
        let types = sample_types();
        let road = types.type_by_name("highway_residential").expect("road");
        let nodes = vec![GeoCoord::default(); ids.len()];
        let way = Way::new(std::sync::Arc::clone(road)).with_nodes(nodes, ids);
        assert_eq!(way.is_closed(), closed);
    }
}
