//! Registry of feature types.
//!
//! Area and way records refer to their type by a small numeric code. The
//! registry assigns those codes and hands out shared [`TypeInfo`] descriptors
//! so decoded records can ask whether they are routable or ignored.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// Numeric type code as stored in area and way records.
pub type TypeId = u16;

/// Shared handle to an immutable [`TypeInfo`] owned by the registry.
pub type TypeInfoRef = Arc<TypeInfo>;

/// Name under which the ignore type is registered.
pub const IGNORE_TYPE_NAME: &str = "ignore";

/// Which of the two type-id spaces a code belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureKind {
    /// Polygonal features stored in the area files.
    Area,
    /// Linear features stored in the way files.
    Way,
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Area => f.write_str("area"),
            Self::Way => f.write_str("way"),
        }
    }
}

/// Descriptor of one feature type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeInfo {
    /// Unique type name.
    pub name: String,
    /// Code in the area id space, if the type applies to areas.
    pub area_id: Option<TypeId>,
    /// Code in the way id space, if the type applies to ways.
    pub way_id: Option<TypeId>,
    /// Whether features of this type take part in routing.
    pub can_route: bool,
    /// Marks the sentinel type whose rings carry no attributes.
    pub ignore: bool,
    /// Ordered attribute names; a record stores one optional value per name.
    pub features: Vec<String>,
}

impl TypeInfo {
    /// Number of attribute slots records of this type carry.
    #[must_use]
    pub const fn feature_count(&self) -> usize {
        self.features.len()
    }

    /// Index of the attribute called `name`.
    #[must_use]
    pub fn feature_index(&self, name: &str) -> Option<usize> {
        self.features.iter().position(|feature| feature == name)
    }

    /// Code of this type within `kind`'s id space.
    #[must_use]
    pub const fn id_for(&self, kind: FeatureKind) -> Option<TypeId> {
        match kind {
            FeatureKind::Area => self.area_id,
            FeatureKind::Way => self.way_id,
        }
    }
}

/// Declarative description of a type, as read from a type definition file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeDefinition {
    /// Unique type name.
    pub name: String,
    /// Register the type in the area id space.
    #[cfg_attr(feature = "serde", serde(default))]
    pub area: bool,
    /// Register the type in the way id space.
    #[cfg_attr(feature = "serde", serde(default))]
    pub way: bool,
    /// Whether features of this type take part in routing.
    #[cfg_attr(feature = "serde", serde(default))]
    pub can_route: bool,
    /// Ordered attribute names.
    #[cfg_attr(feature = "serde", serde(default))]
    pub features: Vec<String>,
}

impl TypeDefinition {
    /// Start a definition with no id spaces and no attributes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Register the type for areas.
    #[must_use]
    pub const fn area(mut self) -> Self {
        self.area = true;
        self
    }

    /// Register the type for ways.
    #[must_use]
    pub const fn way(mut self) -> Self {
        self.way = true;
        self
    }

    /// Mark the type as routable.
    #[must_use]
    pub const fn routable(mut self) -> Self {
        self.can_route = true;
        self
    }

    /// Append an attribute slot.
    #[must_use]
    pub fn feature(mut self, name: impl Into<String>) -> Self {
        self.features.push(name.into());
        self
    }
}

/// Errors raised while building a [`TypeConfig`].
#[derive(Debug, Error)]
pub enum TypeConfigError {
    /// Two definitions share a name, or a definition reuses the ignore name.
    #[error("type {0} is defined more than once")]
    DuplicateName(String),
    /// More types were defined for one id space than a [`TypeId`] can address.
    #[error("too many {0} types for a 16-bit type id")]
    TooManyTypes(FeatureKind),
    /// The type definition document could not be parsed.
    #[cfg(feature = "serde")]
    #[error("invalid type definition document: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct TypeDocument {
    types: Vec<TypeDefinition>,
}

/// Immutable registry mapping type codes to shared descriptors.
///
/// The ignore type always holds code 0 in both id spaces; defined types get
/// codes from 1 in definition order.
///
/// # Examples
///
/// ```
/// use cartopack_core::{TypeConfig, TypeDefinition};
///
/// # fn main() -> Result<(), cartopack_core::TypeConfigError> {
/// let types = TypeConfig::from_definitions([
///     TypeDefinition::new("highway_residential").way().routable(),
///     TypeDefinition::new("landuse_park").area(),
/// ])?;
/// assert_eq!(types.way_type(1).map(|t| t.name.as_str()), Some("highway_residential"));
/// assert_eq!(types.area_type(1).map(|t| t.name.as_str()), Some("landuse_park"));
/// assert!(types.area_type(0).is_some_and(|t| t.ignore));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TypeConfig {
    ignore: TypeInfoRef,
    by_name: HashMap<String, TypeInfoRef>,
    areas: Vec<TypeInfoRef>,
    ways: Vec<TypeInfoRef>,
}

impl TypeConfig {
    /// Build the registry from definitions in order.
    ///
    /// # Errors
    ///
    /// Returns [`TypeConfigError::DuplicateName`] for repeated names and
    /// [`TypeConfigError::TooManyTypes`] when an id space overflows.
    pub fn from_definitions<I>(definitions: I) -> Result<Self, TypeConfigError>
    where
        I: IntoIterator<Item = TypeDefinition>,
    {
        let ignore = Arc::new(TypeInfo {
            name: IGNORE_TYPE_NAME.to_owned(),
            area_id: Some(0),
            way_id: Some(0),
            can_route: false,
            ignore: true,
            features: Vec::new(),
        });
        let mut by_name = HashMap::from([(ignore.name.clone(), Arc::clone(&ignore))]);
        let mut areas = vec![Arc::clone(&ignore)];
        let mut ways = vec![Arc::clone(&ignore)];

        for definition in definitions {
            if by_name.contains_key(&definition.name) {
                return Err(TypeConfigError::DuplicateName(definition.name));
            }
            let area_id = next_id(definition.area, &areas, FeatureKind::Area)?;
            let way_id = next_id(definition.way, &ways, FeatureKind::Way)?;
            let info = Arc::new(TypeInfo {
                name: definition.name,
                area_id,
                way_id,
                can_route: definition.can_route,
                ignore: false,
                features: definition.features,
            });
            if area_id.is_some() {
                areas.push(Arc::clone(&info));
            }
            if way_id.is_some() {
                ways.push(Arc::clone(&info));
            }
            by_name.insert(info.name.clone(), info);
        }

        Ok(Self {
            ignore,
            by_name,
            areas,
            ways,
        })
    }

    /// Parse a `{"types": [...]}` document.
    ///
    /// # Errors
    ///
    /// Returns [`TypeConfigError::Json`] for malformed documents and any
    /// error [`TypeConfig::from_definitions`] reports.
    #[cfg(feature = "serde")]
    pub fn from_json_reader<R: std::io::Read>(reader: R) -> Result<Self, TypeConfigError> {
        let document: TypeDocument = serde_json::from_reader(reader)?;
        Self::from_definitions(document.types)
    }

    /// Parse a `{"types": [...]}` document held in memory.
    ///
    /// # Errors
    ///
    /// See [`TypeConfig::from_json_reader`].
    #[cfg(feature = "serde")]
    pub fn from_json_str(json: &str) -> Result<Self, TypeConfigError> {
        let document: TypeDocument = serde_json::from_str(json)?;
        Self::from_definitions(document.types)
    }

    /// The sentinel ignore type.
    #[must_use]
    pub const fn ignore_type(&self) -> &TypeInfoRef {
        &self.ignore
    }

    /// Look up an area type by code.
    #[must_use]
    pub fn area_type(&self, id: TypeId) -> Option<&TypeInfoRef> {
        self.areas.get(usize::from(id))
    }

    /// Look up a way type by code.
    #[must_use]
    pub fn way_type(&self, id: TypeId) -> Option<&TypeInfoRef> {
        self.ways.get(usize::from(id))
    }

    /// Look up a type by code within `kind`'s id space.
    #[must_use]
    pub fn type_for(&self, kind: FeatureKind, id: TypeId) -> Option<&TypeInfoRef> {
        match kind {
            FeatureKind::Area => self.area_type(id),
            FeatureKind::Way => self.way_type(id),
        }
    }

    /// Look up a type by name.
    #[must_use]
    pub fn type_by_name(&self, name: &str) -> Option<&TypeInfoRef> {
        self.by_name.get(name)
    }

    /// Bytes used to store an area type code.
    #[must_use]
    pub const fn area_type_id_bytes(&self) -> u8 {
        id_bytes(self.areas.len())
    }

    /// Bytes used to store a way type code.
    #[must_use]
    pub const fn way_type_id_bytes(&self) -> u8 {
        id_bytes(self.ways.len())
    }

    /// Bytes used to store a type code within `kind`'s id space.
    #[must_use]
    pub const fn type_id_bytes(&self, kind: FeatureKind) -> u8 {
        match kind {
            FeatureKind::Area => self.area_type_id_bytes(),
            FeatureKind::Way => self.way_type_id_bytes(),
        }
    }

    /// Number of registered types, including the ignore type.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Always false; the ignore type is registered unconditionally.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

fn next_id(
    wanted: bool,
    registered: &[TypeInfoRef],
    kind: FeatureKind,
) -> Result<Option<TypeId>, TypeConfigError> {
    if !wanted {
        return Ok(None);
    }
    TypeId::try_from(registered.len())
        .map(Some)
        .map_err(|_| TypeConfigError::TooManyTypes(kind))
}

const fn id_bytes(registered: usize) -> u8 {
    if registered <= 256 { 1 } else { 2 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn types() -> TypeConfig {
        TypeConfig::from_definitions([
            TypeDefinition::new("highway_footway").area().way().routable(),
            TypeDefinition::new("building").area().feature("name"),
            TypeDefinition::new("highway_primary").way().routable().feature("ref"),
        ])
        .expect("valid definitions")
    }

    #[rstest]
    fn assigns_codes_per_id_space(types: TypeConfig) {
        let footway = types.type_by_name("highway_footway").expect("footway");
        assert_eq!((footway.area_id, footway.way_id), (Some(1), Some(1)));
        let building = types.type_by_name("building").expect("building");
        assert_eq!((building.area_id, building.way_id), (Some(2), None));
        let primary = types.type_by_name("highway_primary").expect("primary");
        assert_eq!((primary.area_id, primary.way_id), (None, Some(2)));
        assert_eq!(types.len(), 4);
    }

    #[rstest]
    fn ignore_type_holds_code_zero(types: TypeConfig) {
        let ignore = types.ignore_type();
        assert!(ignore.ignore && !ignore.can_route);
        assert!(types.area_type(0).is_some_and(|t| Arc::ptr_eq(t, ignore)));
        assert!(types.way_type(0).is_some_and(|t| Arc::ptr_eq(t, ignore)));
    }

    #[rstest]
    fn unknown_codes_are_absent(types: TypeConfig) {
        assert!(types.area_type(3).is_none());
        assert!(types.type_for(FeatureKind::Way, 9).is_none());
    }

    #[rstest]
    #[case(255, 1)]
    #[case(256, 2)]
    fn type_id_width_follows_largest_code(#[case] defined: usize, #[case] expected: u8) {
        let types = TypeConfig::from_definitions(
            (0..defined).map(|index| TypeDefinition::new(format!("type_{index}")).area()),
        )
        .expect("valid definitions");
        assert_eq!(types.area_type_id_bytes(), expected);
        assert_eq!(types.way_type_id_bytes(), 1);
    }

    #[rstest]
    #[case("building")]
    #[case(IGNORE_TYPE_NAME)]
    fn rejects_duplicate_names(#[case] name: &str) {
        let err = TypeConfig::from_definitions([
            TypeDefinition::new("building").area(),
            TypeDefinition::new(name).way(),
        ])
        .expect_err("duplicate name");
        assert!(matches!(err, TypeConfigError::DuplicateName(found) if found == name));
    }

    #[test]
    fn rejects_overflowing_id_space() {
        let definitions =
            (0..=usize::from(u16::MAX)).map(|index| TypeDefinition::new(format!("t{index}")).way());
        let err = TypeConfig::from_definitions(definitions).expect_err("too many types");
        assert!(matches!(err, TypeConfigError::TooManyTypes(FeatureKind::Way)));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn loads_json_document() {
        let json = r#"{"types": [
            {"name": "highway_service", "way": true, "can_route": true, "features": ["name"]},
            {"name": "natural_water", "area": true}
        ]}"#;
        let types = TypeConfig::from_json_str(json).expect("valid document");
        let service = types.way_type(1).expect("service");
        assert!(service.can_route);
        assert_eq!(service.feature_index("name"), Some(0));
        assert!(types.area_type(1).is_some_and(|t| t.name == "natural_water"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn rejects_malformed_json() {
        let err = TypeConfig::from_json_str("{\"types\": 3}").expect_err("bad document");
        assert!(matches!(err, TypeConfigError::Json(_)));
    }
}
