//! In-memory feature source.

use std::collections::{BTreeMap, HashMap};

use crate::geometry::{Geometry, GeometryOps, PlanarGeometry};

use super::{CollectionId, Feature, FeatureId, FeatureSource, ReconstructedGeometry};

/// Feature source backed by plain collections in memory.
///
/// # Example
/// ```rust
/// use sanchay::geometry::{Geometry, Point};
/// use sanchay::source::{CollectionId, Feature, FeatureId, FeatureSource, FeatureStore};
///
/// let mut store = FeatureStore::new(10.0);
/// store.insert(
///     CollectionId(1),
///     Feature::new(FeatureId(1)).with_property("age", 42),
///     vec![Geometry::Point(Point::new(0.0, 0.0))],
/// );
/// assert!(store.contains(CollectionId(1), FeatureId(1)));
/// ```
pub struct FeatureStore<G: GeometryOps = PlanarGeometry> {
    reconstruction_time: f64,
    ops: G,
    collections: BTreeMap<CollectionId, Vec<ReconstructedGeometry>>,
    features: HashMap<FeatureId, Feature>,
}

impl FeatureStore<PlanarGeometry> {
    /// Create an empty store using the planar geometry backend.
    pub fn new(reconstruction_time: f64) -> Self {
        Self::with_geometry_ops(reconstruction_time, PlanarGeometry)
    }
}

impl<G: GeometryOps> FeatureStore<G> {
    /// Create an empty store with a custom geometry backend.
    pub fn with_geometry_ops(reconstruction_time: f64, ops: G) -> Self {
        Self {
            reconstruction_time,
            ops,
            collections: BTreeMap::new(),
            features: HashMap::new(),
        }
    }

    /// Register an empty collection so its handle is valid.
    pub fn add_collection(&mut self, collection: CollectionId) {
        self.collections.entry(collection).or_default();
    }

    /// Add a feature and its reconstructed geometries to a collection.
    ///
    /// A feature may appear in several collections; the last inserted
    /// property set wins.
    pub fn insert(&mut self, collection: CollectionId, feature: Feature, geometries: Vec<Geometry>) {
        let id = feature.id;
        let rfgs = self.collections.entry(collection).or_default();
        rfgs.extend(
            geometries
                .into_iter()
                .map(|geometry| ReconstructedGeometry::new(id, geometry)),
        );
        self.features.insert(id, feature);
    }

    /// Number of collections.
    pub fn collection_count(&self) -> usize {
        self.collections.len()
    }

    /// Number of distinct features.
    pub fn feature_count(&self) -> usize {
        self.features.len()
    }
}

impl<G: GeometryOps> FeatureSource for FeatureStore<G> {
    fn reconstruction_time(&self) -> f64 {
        self.reconstruction_time
    }

    fn geometry_ops(&self) -> &dyn GeometryOps {
        &self.ops
    }

    fn reconstructed_geometries(
        &self,
        collection: CollectionId,
    ) -> Option<&[ReconstructedGeometry]> {
        self.collections.get(&collection).map(Vec::as_slice)
    }

    fn feature(&self, id: FeatureId) -> Option<&Feature> {
        self.features.get(&id)
    }
}
