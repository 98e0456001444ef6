//! Ordered set of configuration rows and its canonical form.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::source::CollectionId;

use super::filter::FilterKind;
use super::row::ConfigurationRow;

/// Ordered sequence of co-registration rows, one per output column.
///
/// # Canonical Form
///
/// [`optimize`](Self::optimize) reorders rows so that:
///
/// ```text
/// target layer ──► filter type name ──► filter order ──► remaining fields
///   (grouped)          (grouped)          (sorted)         (tie-break)
/// ```
///
/// Rows that share a target layer and filter kind end up contiguous, so their
/// associations can be served from one cache group, and two tables built from
/// the same rows in any order compare equal once both are canonical.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigurationTable {
    rows: Vec<ConfigurationRow>,
}

impl ConfigurationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row. Any position recorded by another table is cleared.
    pub fn push(&mut self, mut row: ConfigurationRow) {
        row.index = None;
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[ConfigurationRow] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ConfigurationRow> {
        self.rows.iter()
    }

    /// Reorder rows into canonical form.
    ///
    /// Each row's `index` records its position in this table before the
    /// first canonicalization. Rows added through `push`, `From` or
    /// `collect` start without one. Every sort is stable, so rows that compare equal
    /// keep their relative order. Running this on a canonical table changes
    /// nothing.
    pub fn optimize(&mut self) {
        for (position, row) in self.rows.iter_mut().enumerate() {
            row.index.get_or_insert(position);
        }

        self.rows.sort_by_key(|row| row.target_layer);

        for layer_run in self
            .rows
            .chunk_by_mut(|a, b| a.target_layer == b.target_layer)
        {
            layer_run.sort_by_key(|row| row.filter.type_name());

            for kind_run in layer_run.chunk_by_mut(|a, b| a.filter.kind() == b.filter.kind()) {
                // NoOp rows have no order and stay as inserted
                if !kind_run[0].filter.is_orderable() {
                    continue;
                }
                kind_run.sort_by(|a, b| a.canonical_cmp(b).unwrap_or(Ordering::Equal));
            }
        }
    }

    /// Contiguous (target layer, filter kind) groups, in row order.
    pub fn groups(&self) -> Vec<(CollectionId, FilterKind, &[ConfigurationRow])> {
        self.rows
            .chunk_by(|a, b| a.target_layer == b.target_layer && a.filter.kind() == b.filter.kind())
            .map(|group| (group[0].target_layer, group[0].filter.kind(), group))
            .collect()
    }
}

impl From<Vec<ConfigurationRow>> for ConfigurationTable {
    fn from(rows: Vec<ConfigurationRow>) -> Self {
        rows.into_iter().collect()
    }
}

// Positions belong to the table a row was canonicalized in
impl FromIterator<ConfigurationRow> for ConfigurationTable {
    fn from_iter<I: IntoIterator<Item = ConfigurationRow>>(iter: I) -> Self {
        Self {
            rows: iter
                .into_iter()
                .map(|mut row| {
                    row.index = None;
                    row
                })
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ConfigurationTable {
    type Item = &'a ConfigurationRow;
    type IntoIter = std::slice::Iter<'a, ConfigurationRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
