//! Tabular dataset handed over by a decoding collaborator.

use std::collections::BTreeMap;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::error::Result;

use super::value::CellValue;

/// One row: column name to cell value, in insertion order.
pub type Row = IndexMap<String, CellValue>;

/// An ordered header list plus ordered rows.
///
/// The engine treats a dataset as an immutable snapshot. Operations that
/// change data (see [`crate::cleaning`]) return a new `Dataset`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Column headers in display order.
    #[serde(default)]
    pub headers: Vec<String>,
    /// Row data. A header missing from a row is a missing value.
    pub rows: Vec<Row>,
}

/// The first rows of a dataset for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetPreview {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
    pub total_rows: usize,
}

impl Dataset {
    /// Create a dataset with an explicit header list.
    pub fn new(headers: Vec<String>, rows: Vec<Row>) -> Self {
        Self { headers, rows }
    }

    /// Create a dataset whose headers are the union of row keys in first-seen order.
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let mut headers: IndexSet<String> = IndexSet::new();
        for row in &rows {
            for key in row.keys() {
                if !headers.contains(key) {
                    headers.insert(key.clone());
                }
            }
        }
        Self {
            headers: headers.into_iter().collect(),
            rows,
        }
    }

    /// Parse `{ "headers": [...], "rows": [{...}] }`. Without headers, the
    /// row key union is used.
    pub fn from_json(json: &str) -> Result<Self> {
        let dataset: Dataset = serde_json::from_str(json)?;
        if dataset.headers.is_empty() {
            Ok(Self::from_rows(dataset.rows))
        } else {
            Ok(dataset)
        }
    }

    /// Build a dataset from string cells laid out row-major.
    pub fn from_records(headers: &[&str], records: &[Vec<&str>]) -> Self {
        let rows = records
            .iter()
            .map(|record| {
                headers
                    .iter()
                    .zip(record.iter())
                    .map(|(h, v)| (h.to_string(), CellValue::text(*v)))
                    .collect()
            })
            .collect();
        Self::new(headers.iter().map(|h| h.to_string()).collect(), rows)
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// True when there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Check whether a column exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    /// Get a specific cell. `None` means the row lacks this column.
    pub fn cell(&self, row: usize, column: &str) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    /// Get every value of a column, one entry per row.
    pub fn column(&self, name: &str) -> Vec<Option<&CellValue>> {
        self.rows.iter().map(|row| row.get(name)).collect()
    }

    /// The first `n` rows plus headers and the total row count.
    pub fn preview(&self, n: usize) -> DatasetPreview {
        DatasetPreview {
            headers: self.headers.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
            total_rows: self.rows.len(),
        }
    }

    /// Key-order-independent serialization of a row.
    pub fn canonical_row_key(row: &Row) -> String {
        let sorted: BTreeMap<&str, Value> = row
            .iter()
            .map(|(k, v)| (k.as_str(), Value::from(v.clone())))
            .collect();
        serde_json::to_string(&sorted).unwrap_or_default()
    }

    /// SHA-256 fingerprint over headers and canonical rows.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.headers.join("\u{1f}").as_bytes());
        hasher.update(b"\n");
        for row in &self.rows {
            hasher.update(Self::canonical_row_key(row).as_bytes());
            hasher.update(b"\n");
        }
        format!("sha256:{:x}", hasher.finalize())
    }

    /// Share of cells (headers × rows) that hold a non-missing value.
    ///
    /// Missing headers, `Null`, blank text and literal null markers all count
    /// as invalid. An empty table scores 0.
    pub fn completeness_score(&self) -> f64 {
        let total = self.headers.len() * self.rows.len();
        if total == 0 {
            return 0.0;
        }

        let valid = self
            .rows
            .iter()
            .map(|row| {
                self.headers
                    .iter()
                    .filter(|h| row.get(*h).is_some_and(|v| !v.is_missing_marker()))
                    .count()
            })
            .sum::<usize>();

        valid as f64 / total as f64
    }
}
