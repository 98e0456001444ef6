//! Feature identifiers, properties and reconstructed geometries.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::Geometry;
use crate::opaque::OpaqueData;

/// Identifier of a feature, unique across all collections of a source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureId(pub u64);

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "feature#{}", self.0)
    }
}

/// Handle of a reconstructed feature collection (a map layer).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectionId(pub u32);

impl fmt::Display for CollectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "collection#{}", self.0)
    }
}

/// A named top-level feature property.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureProperty {
    pub name: String,
    pub value: OpaqueData,
}

/// A feature with its properties.
///
/// Property names are not unique; lookups return the first match.
/// Shapefile attributes are imported key/value pairs kept apart from the
/// top-level properties.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub id: FeatureId,
    #[serde(default)]
    pub properties: Vec<FeatureProperty>,
    #[serde(default)]
    pub shapefile_attributes: Vec<(String, OpaqueData)>,
}

impl Feature {
    /// Create an empty feature.
    pub fn new(id: FeatureId) -> Self {
        Self {
            id,
            properties: Vec::new(),
            shapefile_attributes: Vec::new(),
        }
    }

    /// Builder-style property setter. Repeated names are kept.
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<OpaqueData>) -> Self {
        self.properties.push(FeatureProperty {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Builder-style shapefile attribute setter.
    pub fn with_shapefile_attribute(
        mut self,
        name: impl Into<String>,
        value: impl Into<OpaqueData>,
    ) -> Self {
        self.shapefile_attributes.push((name.into(), value.into()));
        self
    }

    /// First top-level property with the given name.
    pub fn property(&self, name: &str) -> Option<&OpaqueData> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.value)
    }

    /// Number of top-level properties with the given name.
    pub fn property_count(&self, name: &str) -> usize {
        self.properties.iter().filter(|p| p.name == name).count()
    }

    /// First shapefile attribute with the given name.
    pub fn shapefile_attribute(&self, name: &str) -> Option<&OpaqueData> {
        self.shapefile_attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }
}

/// Reconstructed feature geometry: one geometry of a feature at the
/// reconstruction time, tagged with its owning feature.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReconstructedGeometry {
    pub feature: FeatureId,
    pub geometry: Geometry,
}

impl ReconstructedGeometry {
    pub fn new(feature: FeatureId, geometry: Geometry) -> Self {
        Self { feature, geometry }
    }
}
