//! Feature source trait for reconstruction abstraction.
//!
//! The co-registration pipeline only reads features: it never reconstructs
//! anything itself. A [`FeatureSource`] hands out the reconstructed
//! geometries of each collection, named property lookup on features, and the
//! geometry backend used for distances and areas.

mod feature;
mod store;

pub use feature::{CollectionId, Feature, FeatureId, FeatureProperty, ReconstructedGeometry};
pub use store::FeatureStore;

use crate::geometry::GeometryOps;

/// Trait for providing reconstructed features to the pipeline.
///
/// Implement this trait to connect the data selector to a reconstruction
/// engine, a file loader, or a test fixture.
///
/// # Example
///
/// ```ignore
/// struct Snapshot {
///     time: f64,
///     layers: HashMap<CollectionId, Vec<ReconstructedGeometry>>,
///     features: HashMap<FeatureId, Feature>,
/// }
///
/// impl FeatureSource for Snapshot {
///     fn reconstruction_time(&self) -> f64 {
///         self.time
///     }
///
///     fn geometry_ops(&self) -> &dyn GeometryOps {
///         &PlanarGeometry
///     }
///
///     fn reconstructed_geometries(&self, id: CollectionId) -> Option<&[ReconstructedGeometry]> {
///         self.layers.get(&id).map(Vec::as_slice)
///     }
///
///     fn feature(&self, id: FeatureId) -> Option<&Feature> {
///         self.features.get(&id)
///     }
/// }
/// ```
pub trait FeatureSource {
    /// Reconstruction time (Ma) of the geometries handed out.
    fn reconstruction_time(&self) -> f64;

    /// Geometry backend for distance and area calculations.
    fn geometry_ops(&self) -> &dyn GeometryOps;

    /// Reconstructed geometries of a collection.
    ///
    /// Returns `None` if the handle does not refer to a loaded collection.
    fn reconstructed_geometries(
        &self,
        collection: CollectionId,
    ) -> Option<&[ReconstructedGeometry]>;

    /// Look up a feature by id.
    fn feature(&self, id: FeatureId) -> Option<&Feature>;

    /// Check whether a collection contains a feature.
    fn contains(&self, collection: CollectionId, feature: FeatureId) -> bool {
        self.reconstructed_geometries(collection)
            .is_some_and(|rfgs| rfgs.iter().any(|rfg| rfg.feature == feature))
    }
}
