//! Column profile definition and statistics.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::types::InferredType;

/// Statistics computed for a column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnStatistics {
    /// Total number of values (including nulls).
    pub count: usize,
    /// Number of null, empty or null-marker values such as `"N/A"`.
    pub null_count: usize,
    /// Number of distinct non-null values.
    pub unique_count: usize,
    /// Most frequent value(s), in first-seen order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mode: Vec<String>,
    /// Smallest and largest value for the column's type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<ValueRange>,
    /// Numeric statistics (for number columns).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric: Option<NumericStatistics>,
}

/// Value bounds, typed by column kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValueRange {
    Numeric { min: f64, max: f64 },
    Date { min: NaiveDate, max: NaiveDate },
    /// Lexicographic bounds.
    Text { min: String, max: String },
}

/// Statistics for number columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericStatistics {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    /// Population standard deviation.
    pub std: f64,
    /// Population variance.
    pub variance: f64,
    /// Value at sorted index `floor(n * 0.25)`.
    pub q1: f64,
    /// Value at sorted index `floor(n * 0.5)`.
    pub q2: f64,
    /// Value at sorted index `floor(n * 0.75)`.
    pub q3: f64,
    /// Sample skewness; `None` below four values or with zero spread.
    pub skewness: Option<f64>,
    /// Sample excess kurtosis; `None` below four values or with zero spread.
    pub kurtosis: Option<f64>,
}

/// Quality sub-scores, each in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityScores {
    pub completeness: f64,
    pub validity: f64,
    pub consistency: f64,
    pub uniqueness: f64,
    /// Diagnostics worth surfacing to the user.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

/// A structural value signature such as `AAA-9999`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternInfo {
    pub pattern: String,
    pub count: usize,
    /// Share of non-null values, as a percentage.
    pub percentage: f64,
    pub examples: Vec<String>,
}

/// Shape of a column's values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Distribution {
    /// Equal-width bins over [min, max].
    Histogram { bins: Vec<HistogramBin> },
    /// Most frequent values.
    Frequency { values: Vec<FrequencyEntry> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyEntry {
    pub value: String,
    pub count: usize,
    /// Share of non-null values, as a percentage.
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniquenessInfo {
    pub unique_ratio: f64,
    pub is_unique: bool,
    pub is_primary_key_candidate: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NullabilityInfo {
    pub null_count: usize,
    pub null_ratio: f64,
    /// Null-like literals observed in this column (`null`, `undefined`, `""`, `NULL`, `N/A`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub null_representations: Vec<String>,
}

/// Profile for a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    /// Column name.
    pub name: String,
    /// Zero-based position in the dataset headers.
    pub position: usize,
    pub inferred_type: InferredType,
    pub statistics: ColumnStatistics,
    pub quality: QualityScores,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub patterns: Vec<PatternInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution: Option<Distribution>,
    pub uniqueness: UniquenessInfo,
    pub nullability: NullabilityInfo,
}

impl ColumnProfile {
    /// Number of non-null values.
    pub fn non_null_count(&self) -> usize {
        self.statistics.count - self.statistics.null_count
    }

    /// Get the null percentage.
    pub fn null_percentage(&self) -> f64 {
        if self.statistics.count == 0 {
            0.0
        } else {
            (self.statistics.null_count as f64 / self.statistics.count as f64) * 100.0
        }
    }
}
