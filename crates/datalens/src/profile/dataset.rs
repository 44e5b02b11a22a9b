//! Dataset-level profile.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::charts::ChartRecommendation;
use crate::error::Result;
use crate::quality::QualityReport;

use super::column::ColumnProfile;
use super::relationship::{ColumnRelationship, DataPattern};
use super::types::InferredType;

/// Aggregate view over all column profiles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub row_count: usize,
    pub column_count: usize,
    pub numeric_columns: usize,
    pub categorical_columns: usize,
    pub date_columns: usize,
    /// Null, empty and null-marker cells across all columns.
    pub total_missing: usize,
    /// Mean of column completeness.
    pub completeness: f64,
    /// Mean of column validity.
    pub validity: f64,
    /// Mean of column consistency.
    pub consistency: f64,
    /// Mean of column uniqueness.
    pub uniqueness: f64,
}

impl DatasetSummary {
    /// Summarize column profiles. Means are 0 when there are no columns.
    pub fn from_columns(columns: &[ColumnProfile], row_count: usize) -> Self {
        let count_type = |t: InferredType| columns.iter().filter(|c| c.inferred_type == t).count();
        let mean = |f: fn(&ColumnProfile) -> f64| {
            if columns.is_empty() {
                0.0
            } else {
                columns.iter().map(f).sum::<f64>() / columns.len() as f64
            }
        };

        Self {
            row_count,
            column_count: columns.len(),
            numeric_columns: count_type(InferredType::Number),
            categorical_columns: count_type(InferredType::Categorical),
            date_columns: count_type(InferredType::Date),
            total_missing: columns.iter().map(|c| c.statistics.null_count).sum(),
            completeness: mean(|c| c.quality.completeness),
            validity: mean(|c| c.quality.validity),
            consistency: mean(|c| c.quality.consistency),
            uniqueness: mean(|c| c.quality.uniqueness),
        }
    }
}

/// The complete result of one profiling pass over one dataset snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetProfile {
    pub columns: Vec<ColumnProfile>,
    pub summary: DatasetSummary,
    pub quality: QualityReport,
    #[serde(default)]
    pub relationships: Vec<ColumnRelationship>,
    #[serde(default)]
    pub patterns: Vec<DataPattern>,
    #[serde(default)]
    pub recommendations: Vec<ChartRecommendation>,
    /// Fingerprint of the profiled snapshot.
    pub dataset_hash: String,
    pub generated_at: DateTime<Utc>,
}

impl DatasetProfile {
    /// Get a column profile by name.
    pub fn column(&self, name: &str) -> Option<&ColumnProfile> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Serialize the profile as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Columns of a given inferred type, in dataset order.
    pub fn columns_of_type(&self, inferred: InferredType) -> impl Iterator<Item = &ColumnProfile> {
        self.columns.iter().filter(move |c| c.inferred_type == inferred)
    }
}
