//! Test fixtures for Sanchay integration tests.
//!
//! Builds small feature stores with known distances and a geometry backend
//! that counts how often it is asked for a distance.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use sanchay::config::{AttributeType, ConfigurationRow, FilterConfig, ReducerType};
use sanchay::geometry::{Geometry, GeometryOps, PlanarGeometry, Point};
use sanchay::source::{CollectionId, Feature, FeatureId, FeatureStore};

pub const SEEDS: CollectionId = CollectionId(0);
pub const TARGETS: CollectionId = CollectionId(1);
pub const PLATES: CollectionId = CollectionId(2);

/// Initialise logging once per test binary.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Planar backend that counts distance evaluations.
///
/// Clones share the counter, so a test can keep one clone while the store
/// owns another.
#[derive(Clone, Debug, Default)]
pub struct CountingGeometry {
    inner: PlanarGeometry,
    calls: Arc<AtomicUsize>,
}

impl CountingGeometry {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.calls.store(0, Ordering::Relaxed);
    }
}

impl GeometryOps for CountingGeometry {
    fn distance(&self, a: &Geometry, b: &Geometry) -> f64 {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.inner.distance(a, b)
    }

    fn area(&self, geometry: &Geometry) -> Option<f64> {
        self.inner.area(geometry)
    }
}

pub fn point(x: f64, y: f64) -> Vec<Geometry> {
    vec![Geometry::Point(Point::new(x, y))]
}

/// Axis-aligned square polygon centred on (cx, cy).
pub fn square(cx: f64, cy: f64, half: f64) -> Vec<Geometry> {
    vec![Geometry::Polygon(vec![
        Point::new(cx - half, cy - half),
        Point::new(cx + half, cy - half),
        Point::new(cx + half, cy + half),
        Point::new(cx - half, cy + half),
    ])]
}

/// One seed at the origin and candidates at distances 5, 15 and 25
/// carrying ages 10, 20 and 30.
pub fn fill_basic<G: GeometryOps>(store: &mut FeatureStore<G>) {
    store.insert(SEEDS, Feature::new(FeatureId(100)), point(0.0, 0.0));
    for (id, x, age) in [(1, 5.0, 10), (2, 15.0, 20), (3, 25.0, 30)] {
        store.insert(
            TARGETS,
            Feature::new(FeatureId(id))
                .with_property("age", age)
                .with_property("name", format!("target-{}", id)),
            point(x, 0.0),
        );
    }
}

pub fn basic_store() -> FeatureStore {
    let mut store = FeatureStore::new(0.0);
    fill_basic(&mut store);
    store
}

/// A grid of seeds and targets, with nested plate polygons around the origin.
pub fn grid_store(n: usize) -> FeatureStore {
    let mut store = FeatureStore::new(100.0);
    let mut id = 1;
    for i in 0..n {
        for j in 0..n {
            let (x, y) = (i as f64 * 10.0, j as f64 * 10.0);
            store.insert(SEEDS, Feature::new(FeatureId(id)), point(x, y));
            store.insert(
                TARGETS,
                Feature::new(FeatureId(id + 1_000_000))
                    .with_property("age", (i * n + j) as f64)
                    .with_property("kind", if (i + j) % 3 == 0 { "ridge" } else { "arc" }),
                point(x + 3.0, y + 4.0),
            );
            id += 1;
        }
    }
    let extent = n as f64 * 10.0;
    store.insert(
        PLATES,
        Feature::new(FeatureId(5_000_001)).with_shapefile_attribute("PLATEID1", 801),
        square(extent / 2.0, extent / 2.0, extent),
    );
    store.insert(
        PLATES,
        Feature::new(FeatureId(5_000_002)).with_shapefile_attribute("PLATEID1", 802),
        square(0.0, 0.0, 12.0),
    );
    store
}

pub fn row(
    target: CollectionId,
    range: f64,
    name: &str,
    attribute_type: AttributeType,
    reducer: ReducerType,
) -> ConfigurationRow {
    ConfigurationRow::new(
        target,
        FilterConfig::region_of_interest(range),
        name,
        attribute_type,
        reducer,
    )
}

/// A mixed configuration touching every stage.
pub fn mixed_rows() -> Vec<ConfigurationRow> {
    vec![
        row(TARGETS, 30.0, "age", AttributeType::Property, ReducerType::Mean),
        row(TARGETS, 10.0, "age", AttributeType::Property, ReducerType::Lookup),
        row(TARGETS, 50.0, "kind", AttributeType::Property, ReducerType::Vote),
        row(TARGETS, 30.0, "", AttributeType::PresenceCount, ReducerType::Max),
        row(TARGETS, 30.0, "", AttributeType::Distance, ReducerType::Min),
        row(TARGETS, 50.0, "age", AttributeType::Property, ReducerType::Percentile(90)),
        row(PLATES, 0.0, "PLATEID1", AttributeType::ShapefileProperty, ReducerType::Lookup),
        row(SEEDS, 0.0, "", AttributeType::Presence, ReducerType::Max),
    ]
}
