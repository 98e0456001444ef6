//! One column of the co-registration output: what to associate, extract and reduce.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::source::CollectionId;

use super::defaults;
use super::filter::FilterConfig;

/// What the mapper extracts from associated features.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    /// Named top-level feature property.
    Property,
    /// Shortest distance from each associated feature to the seed.
    Distance,
    /// Whether anything was associated.
    Presence,
    /// How many features were associated.
    PresenceCount,
    /// Named attribute from imported shapefile attributes.
    ShapefileProperty,
}

impl AttributeType {
    /// Relational attributes collapse all candidates into a single value.
    pub fn is_collapsing(&self) -> bool {
        matches!(self, AttributeType::Presence | AttributeType::PresenceCount)
    }
}

/// How mapped values collapse into a single cell.
///
/// Unit variants are plain strings in YAML; `percentile` carries its rank as
/// a tagged value (`!percentile 90`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReducerType {
    Min,
    Max,
    Mean,
    Median,
    Lookup,
    Vote,
    WeightedMean,
    /// Nearest-rank percentile, 0..=100.
    Percentile(u8),
}

impl ReducerType {
    pub fn name(&self) -> &'static str {
        match self {
            ReducerType::Min => "min",
            ReducerType::Max => "max",
            ReducerType::Mean => "mean",
            ReducerType::Median => "median",
            ReducerType::Lookup => "lookup",
            ReducerType::Vote => "vote",
            ReducerType::WeightedMean => "weighted_mean",
            ReducerType::Percentile(_) => "percentile",
        }
    }
}

impl fmt::Display for ReducerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReducerType::Percentile(p) => write!(f, "percentile({})", p),
            other => f.write_str(other.name()),
        }
    }
}

/// A single co-registration request.
///
/// `index` is the row's position before canonicalization. It is assigned by
/// [`ConfigurationTable::optimize`](super::ConfigurationTable::optimize) and
/// does not take part in equality.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConfigurationRow {
    /// Collection searched for associated features.
    pub target_layer: CollectionId,
    pub filter: FilterConfig,
    pub attribute_name: String,
    #[serde(default)]
    pub layer_name: String,
    #[serde(default)]
    pub association_name: String,
    #[serde(default = "defaults::attribute_type")]
    pub attribute_type: AttributeType,
    #[serde(default = "defaults::reducer")]
    pub reducer: ReducerType,
    #[serde(default)]
    pub raster_level_of_detail: u32,
    #[serde(default = "defaults::raster_fill_polygons")]
    pub raster_fill_polygons: bool,
    #[serde(skip)]
    pub index: Option<usize>,
}

impl ConfigurationRow {
    /// Create a row with default names and raster settings.
    pub fn new(
        target_layer: CollectionId,
        filter: FilterConfig,
        attribute_name: impl Into<String>,
        attribute_type: AttributeType,
        reducer: ReducerType,
    ) -> Self {
        Self {
            target_layer,
            filter,
            attribute_name: attribute_name.into(),
            layer_name: String::new(),
            association_name: String::new(),
            attribute_type,
            reducer,
            raster_level_of_detail: 0,
            raster_fill_polygons: defaults::raster_fill_polygons(),
            index: None,
        }
    }

    /// Builder-style setter for the layer name.
    pub fn with_layer_name(mut self, name: impl Into<String>) -> Self {
        self.layer_name = name.into();
        self
    }

    /// Builder-style setter for the association name.
    pub fn with_association_name(mut self, name: impl Into<String>) -> Self {
        self.association_name = name.into();
        self
    }

    /// Copy of this row with a different filter.
    pub fn with_filter(&self, filter: FilterConfig) -> Self {
        Self {
            filter,
            ..self.clone()
        }
    }

    /// Canonical order within a (target layer, filter kind) group.
    ///
    /// Filter order first, then the remaining fields. `None` when the filters
    /// cannot be ordered.
    pub fn canonical_cmp(&self, other: &ConfigurationRow) -> Option<Ordering> {
        let by_filter = self.filter.try_cmp(&other.filter)?;
        Some(
            by_filter
                .then_with(|| self.attribute_name.cmp(&other.attribute_name))
                .then_with(|| self.layer_name.cmp(&other.layer_name))
                .then_with(|| self.association_name.cmp(&other.association_name))
                .then_with(|| self.attribute_type.cmp(&other.attribute_type))
                .then_with(|| self.reducer.cmp(&other.reducer))
                .then_with(|| self.raster_level_of_detail.cmp(&other.raster_level_of_detail))
                .then_with(|| self.raster_fill_polygons.cmp(&other.raster_fill_polygons)),
        )
    }
}

impl PartialEq for ConfigurationRow {
    fn eq(&self, other: &Self) -> bool {
        self.target_layer == other.target_layer
            && self.filter == other.filter
            && self.attribute_name == other.attribute_name
            && self.layer_name == other.layer_name
            && self.association_name == other.association_name
            && self.attribute_type == other.attribute_type
            && self.reducer == other.reducer
            && self.raster_level_of_detail == other.raster_level_of_detail
            && self.raster_fill_polygons == other.raster_fill_polygons
    }
}
