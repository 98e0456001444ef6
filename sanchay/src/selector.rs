//! Data selector: runs the configuration table for every seed feature.
//!
//! ```text
//!   seed collections ──► seeds (distinct features, first-appearance order)
//!                          │
//!                          ▼   one AssociationCache per seed
//!   ┌──────────────────────────────────────────────────────────┐
//!   │ for each canonical row:                                  │
//!   │   cache lookup ──miss──► Filter ──► insert               │
//!   │        │                                                 │
//!   │        └──► Mapper ──► Reducer ──► cell                  │
//!   └──────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼
//!                      DataTable row
//! ```
//!
//! Seeds share nothing but read-only inputs, so with
//! [`SelectorConfig::parallel`] they are spread over the rayon thread pool.
//! The row order of the output never depends on that setting.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::cache::{AssociatedCollection, AssociationCache, CacheStats};
use crate::config::{ConfigurationRow, ConfigurationTable, FilterConfig};
use crate::error::{CoregError, Result};
use crate::opaque::OpaqueData;
use crate::pipeline::{AssociationRecord, Filter, Mapper, Reducer, ReducerInput, RowStages};
use crate::source::{CollectionId, FeatureId, FeatureSource, ReconstructedGeometry};
use crate::table::{ColumnDescriptor, DataRow, DataTable};

/// Data selector settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Process seed features on the rayon thread pool.
    #[serde(default = "crate::config::default_parallel")]
    pub parallel: bool,

    /// Log a [`SelectionStats`] summary after each run.
    #[serde(default = "crate::config::default_log_stats")]
    pub log_stats: bool,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            parallel: crate::config::default_parallel(),
            log_stats: crate::config::default_log_stats(),
        }
    }
}

/// Summary of one selection run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SelectionStats {
    /// Distinct seed features found.
    pub seeds: usize,
    /// Seeds that produced a row.
    pub processed: usize,
    /// Rows answered with the seed's own geometries.
    pub seed_self_rows: usize,
    /// Cells left `Empty` because a stage failed or was disabled.
    pub degraded_cells: usize,
    pub cache: CacheStats,
    /// Run ended early on the stop flag.
    pub stopped: bool,
}

impl SelectionStats {
    fn merge(&mut self, other: &SelectionStats) {
        self.processed += other.processed;
        self.seed_self_rows += other.seed_self_rows;
        self.degraded_cells += other.degraded_cells;
        self.cache.merge(&other.cache);
    }
}

/// A seed feature and its reconstructed geometries.
struct Seed<'a> {
    id: FeatureId,
    geometries: Vec<&'a ReconstructedGeometry>,
}

/// Builds a [`DataTable`] from a configuration table and a feature source.
#[derive(Clone, Debug)]
pub struct DataSelector {
    table: ConfigurationTable,
    stages: Vec<RowStages>,
    columns: Vec<ColumnDescriptor>,
    config: SelectorConfig,
}

impl DataSelector {
    /// Canonicalize `table` and prepare the stages of every row.
    pub fn new(mut table: ConfigurationTable, config: SelectorConfig) -> Self {
        table.optimize();

        let stages = table.iter().map(RowStages::for_row).collect();
        let columns = table
            .iter()
            .enumerate()
            .map(|(i, row)| ColumnDescriptor::from_row(row, i))
            .collect();

        debug!(
            "[DataSelector] {} rows in {} groups",
            table.len(),
            table.groups().len()
        );

        Self {
            table,
            stages,
            columns,
            config,
        }
    }

    /// Canonical configuration table.
    pub fn table(&self) -> &ConfigurationTable {
        &self.table
    }

    /// Output columns, in canonical row order.
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    /// Build the table, or return an empty one on a configuration error.
    pub fn select<S>(&self, source: &S, seed_collections: &[CollectionId]) -> DataTable
    where
        S: FeatureSource + Sync + ?Sized,
    {
        match self.try_select(source, seed_collections) {
            Ok(table) => table,
            Err(e) => {
                warn!("[DataSelector] {}, returning empty table", e);
                DataTable::empty(source.reconstruction_time())
            }
        }
    }

    /// Build the table.
    ///
    /// Fails with [`CoregError::MissingCollection`] before any work is done
    /// if a row or seed collection is not available in `source`.
    pub fn try_select<S>(&self, source: &S, seed_collections: &[CollectionId]) -> Result<DataTable>
    where
        S: FeatureSource + Sync + ?Sized,
    {
        let never = AtomicBool::new(false);
        self.try_select_with_stop(source, seed_collections, &never)
    }

    /// Build the table, checking `stop` before each seed feature.
    ///
    /// Rows finished before the stop are returned in order.
    pub fn try_select_with_stop<S>(
        &self,
        source: &S,
        seed_collections: &[CollectionId],
        stop: &AtomicBool,
    ) -> Result<DataTable>
    where
        S: FeatureSource + Sync + ?Sized,
    {
        self.try_select_with_stats(source, seed_collections, stop)
            .map(|(table, _)| table)
    }

    /// Build the table and report what happened along the way.
    pub fn try_select_with_stats<S>(
        &self,
        source: &S,
        seed_collections: &[CollectionId],
        stop: &AtomicBool,
    ) -> Result<(DataTable, SelectionStats)>
    where
        S: FeatureSource + Sync + ?Sized,
    {
        self.validate(source, seed_collections)?;

        let seeds = collect_seeds(source, seed_collections);
        let mut stats = SelectionStats {
            seeds: seeds.len(),
            ..SelectionStats::default()
        };

        let outcomes: Vec<Option<(DataRow, SelectionStats)>> = if self.config.parallel {
            seeds
                .par_iter()
                .map(|seed| {
                    if stop.load(Ordering::Relaxed) {
                        None
                    } else {
                        Some(self.process_seed(source, seed))
                    }
                })
                .collect()
        } else {
            let mut outcomes = Vec::with_capacity(seeds.len());
            for seed in &seeds {
                if stop.load(Ordering::Relaxed) {
                    break;
                }
                outcomes.push(Some(self.process_seed(source, seed)));
            }
            outcomes
        };

        let mut table = DataTable::new(self.columns.clone(), source.reconstruction_time());
        // Keep only the uninterrupted prefix so the output stays in seed order
        for (row, seed_stats) in outcomes.into_iter().map_while(|outcome| outcome) {
            stats.merge(&seed_stats);
            table.push_row(row);
        }
        stats.stopped = stats.processed < stats.seeds;

        if self.config.log_stats {
            info!(
                "[DataSelector] {}/{} seeds, {} columns, {} seed-self rows, {} degraded cells, \
                 cache: {} exact / {} derived / {} misses{}",
                stats.processed,
                stats.seeds,
                self.columns.len(),
                stats.seed_self_rows,
                stats.degraded_cells,
                stats.cache.exact_hits,
                stats.cache.derived_hits,
                stats.cache.misses,
                if stats.stopped { " (stopped)" } else { "" }
            );
        }

        Ok((table, stats))
    }

    fn validate<S>(&self, source: &S, seed_collections: &[CollectionId]) -> Result<()>
    where
        S: FeatureSource + ?Sized,
    {
        let targets = self.table.iter().map(|row| row.target_layer);
        for collection in targets.chain(seed_collections.iter().copied()) {
            if source.reconstructed_geometries(collection).is_none() {
                return Err(CoregError::MissingCollection(collection));
            }
        }
        Ok(())
    }

    /// Compute all cells for one seed with a fresh cache.
    fn process_seed<'a, S>(&self, source: &'a S, seed: &Seed<'a>) -> (DataRow, SelectionStats)
    where
        S: FeatureSource + ?Sized,
    {
        let mut cache = AssociationCache::new();
        let mut stats = SelectionStats {
            processed: 1,
            ..SelectionStats::default()
        };

        let cells = self
            .table
            .iter()
            .zip(&self.stages)
            .map(|(row, stages)| self.process_row(source, seed, row, stages, &mut cache, &mut stats))
            .collect();

        stats.cache = cache.stats();

        let row = DataRow {
            seed: seed.id,
            cells,
            seed_geometries: seed.geometries.iter().map(|rfg| rfg.geometry.clone()).collect(),
        };
        (row, stats)
    }

    fn process_row<'a, S>(
        &self,
        source: &'a S,
        seed: &Seed<'a>,
        row: &ConfigurationRow,
        stages: &RowStages,
        cache: &mut AssociationCache<'a>,
        stats: &mut SelectionStats,
    ) -> OpaqueData
    where
        S: FeatureSource + ?Sized,
    {
        // A zero-range search of a collection holding the seed is the seed itself
        let (filter_config, filter) =
            if row.filter.is_zero_range_roi() && source.contains(row.target_layer, seed.id) {
                stats.seed_self_rows += 1;
                (FilterConfig::SeedSelf, Filter::SeedSelf)
            } else {
                (row.filter.clone(), stages.filter)
            };

        let records = associate(source, seed, row.target_layer, filter_config, filter, cache);

        let ops = source.geometry_ops();
        let values = stages.mapper.process(&records, &seed.geometries, source);
        let input = ReducerInput {
            values: &values,
            records: &records,
            ops,
        };

        if filter == Filter::NoOp || stages.mapper == Mapper::NoOp || stages.reducer == Reducer::NoOp
        {
            stats.degraded_cells += 1;
        }

        match stages.reducer.reduce(&input) {
            Ok(cell) => cell,
            Err(e) => {
                warn!(
                    "[DataSelector] {} column '{}': {}",
                    seed.id, row.attribute_name, e
                );
                stats.degraded_cells += 1;
                OpaqueData::Empty
            }
        }
    }
}

/// Cached or freshly filtered association of `seed` with `target`.
fn associate<'a, S>(
    source: &'a S,
    seed: &Seed<'a>,
    target: CollectionId,
    filter_config: FilterConfig,
    filter: Filter,
    cache: &mut AssociationCache<'a>,
) -> Vec<AssociationRecord<'a>>
where
    S: FeatureSource + ?Sized,
{
    if let Some(records) = cache.lookup(target, &filter_config) {
        return records;
    }

    let candidates = source.reconstructed_geometries(target).unwrap_or_default();
    let records = filter.process(candidates, &seed.geometries, source.geometry_ops());

    cache.insert(AssociatedCollection {
        seed: seed.id,
        reconstruction_time: source.reconstruction_time(),
        target,
        filter: filter_config,
        records: records.clone(),
    });
    records
}

/// Distinct features of the seed collections, in first-appearance order.
fn collect_seeds<'a, S>(source: &'a S, seed_collections: &[CollectionId]) -> Vec<Seed<'a>>
where
    S: FeatureSource + ?Sized,
{
    let mut seeds: Vec<Seed<'a>> = Vec::new();
    let mut position: HashMap<FeatureId, usize> = HashMap::new();

    for &collection in seed_collections {
        let rfgs = source.reconstructed_geometries(collection).unwrap_or_default();
        for rfg in rfgs {
            let i = *position.entry(rfg.feature).or_insert_with(|| {
                seeds.push(Seed {
                    id: rfg.feature,
                    geometries: Vec::new(),
                });
                seeds.len() - 1
            });
            seeds[i].geometries.push(rfg);
        }
    }

    seeds
}
