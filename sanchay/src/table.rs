//! Co-registration output table.

use std::fmt;

use log::warn;
use serde::Serialize;

use crate::config::{AttributeType, ConfigurationRow, ReducerType};
use crate::geometry::Geometry;
use crate::opaque::OpaqueData;
use crate::source::FeatureId;

/// Header of one output column.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ColumnDescriptor {
    /// Column name (the row's attribute name).
    pub name: String,
    pub layer_name: String,
    pub association_name: String,
    pub attribute_type: AttributeType,
    pub reducer: ReducerType,
    /// Position of the configuration row before canonicalization.
    pub source_index: usize,
}

impl ColumnDescriptor {
    pub fn from_row(row: &ConfigurationRow, fallback_index: usize) -> Self {
        Self {
            name: row.attribute_name.clone(),
            layer_name: row.layer_name.clone(),
            association_name: row.association_name.clone(),
            attribute_type: row.attribute_type,
            reducer: row.reducer,
            source_index: row.index.unwrap_or(fallback_index),
        }
    }
}

/// One output row: the cells computed for a single seed feature.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DataRow {
    pub seed: FeatureId,
    /// One cell per column, in column order.
    pub cells: Vec<OpaqueData>,
    /// Reconstructed geometries of the seed feature.
    pub seed_geometries: Vec<Geometry>,
}

/// Append-only table of co-registration results.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DataTable {
    pub columns: Vec<ColumnDescriptor>,
    pub rows: Vec<DataRow>,
    pub reconstruction_time: f64,
}

impl DataTable {
    pub fn new(columns: Vec<ColumnDescriptor>, reconstruction_time: f64) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            reconstruction_time,
        }
    }

    /// Table with no columns and no rows.
    pub fn empty(reconstruction_time: f64) -> Self {
        Self::new(Vec::new(), reconstruction_time)
    }

    /// Append a row.
    ///
    /// Rows with a mismatched cell count are padded with `Empty` or
    /// truncated so every row lines up with the header.
    pub fn push_row(&mut self, mut row: DataRow) {
        if row.cells.len() != self.columns.len() {
            warn!(
                "[DataTable] row for {} has {} cells, expected {}",
                row.seed,
                row.cells.len(),
                self.columns.len()
            );
            row.cells.resize(self.columns.len(), OpaqueData::Empty);
        }
        self.rows.push(row);
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Index of the first column with the given name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Cell at (row, column).
    pub fn cell(&self, row: usize, column: usize) -> Option<&OpaqueData> {
        self.rows.get(row)?.cells.get(column)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl fmt::Display for DataTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("seed")?;
        for column in &self.columns {
            write!(f, "\t{}", column.name)?;
        }
        writeln!(f)?;

        for row in &self.rows {
            write!(f, "{}", row.seed.0)?;
            for cell in &row.cells {
                write!(f, "\t{}", cell)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
