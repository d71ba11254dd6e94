//! Per-record attribute values.

use crate::types::TypeInfo;

/// One optional string per attribute declared by the owning type.
///
/// # Examples
///
/// ```
/// use cartopack_core::{FeatureValues, TypeDefinition, TypeConfig};
///
/// # fn main() -> Result<(), cartopack_core::TypeConfigError> {
/// let types = TypeConfig::from_definitions([
///     TypeDefinition::new("building").area().feature("name").feature("height"),
/// ])?;
/// let building = types.type_by_name("building").expect("registered");
/// let mut values = FeatureValues::for_type(building);
/// assert!(values.set(0, Some("Town hall".to_owned())));
/// assert_eq!(values.get(0), Some("Town hall"));
/// assert_eq!(values.get(1), None);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureValues {
    values: Vec<Option<String>>,
}

impl FeatureValues {
    /// Empty buffer sized for `type_info`'s attributes.
    #[must_use]
    pub fn for_type(type_info: &TypeInfo) -> Self {
        Self::with_len(type_info.feature_count())
    }

    /// Empty buffer with `len` slots.
    #[must_use]
    pub fn with_len(len: usize) -> Self {
        Self {
            values: vec![None; len],
        }
    }

    /// Value in slot `index`, if set.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.values.get(index).and_then(Option::as_deref)
    }

    /// Replace slot `index`; returns `false` when the slot does not exist.
    pub fn set(&mut self, index: usize, value: Option<String>) -> bool {
        self.values
            .get_mut(index)
            .map(|slot| *slot = value)
            .is_some()
    }

    /// Number of slots.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the buffer has no slots.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over the slots in index order.
    pub fn iter(&self) -> impl Iterator<Item = Option<&str>> {
        self.values.iter().map(Option::as_deref)
    }
}
