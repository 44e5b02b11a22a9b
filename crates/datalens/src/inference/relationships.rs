//! Pairwise correlations between numeric columns and single-column patterns.

use serde::{Deserialize, Serialize};

use crate::input::Dataset;
use crate::profile::{
    ColumnProfile, ColumnRelationship, CorrelationDirection, DataPattern, InferredType,
    PatternKind, RelationshipKind,
};

use super::stats;

/// Minimum |r| for a correlation to be reported.
const DEFAULT_CORRELATION_THRESHOLD: f64 = 0.5;
/// |r| above which a correlation is described as strong.
const STRONG_CORRELATION: f64 = 0.8;
/// Standard deviations from the mean for an outlier.
const OUTLIER_Z: f64 = 3.0;
/// Values needed before outlier clusters are considered.
const MIN_OUTLIER_SAMPLE: usize = 10;
/// Outliers needed to call it a cluster.
const MIN_OUTLIER_CLUSTER: usize = 2;

/// Relationships and patterns found in one dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationshipAnalysis {
    pub relationships: Vec<ColumnRelationship>,
    pub patterns: Vec<DataPattern>,
}

/// Finds correlated numeric columns and classifies column patterns.
#[derive(Debug, Clone)]
pub struct RelationshipAnalyzer {
    threshold: f64,
}

impl RelationshipAnalyzer {
    pub fn new() -> Self {
        Self {
            threshold: DEFAULT_CORRELATION_THRESHOLD,
        }
    }

    /// Run correlation and pattern analysis.
    pub fn analyze(&self, dataset: &Dataset, columns: &[ColumnProfile]) -> RelationshipAnalysis {
        RelationshipAnalysis {
            relationships: self.correlations(dataset, columns),
            patterns: self.patterns(dataset, columns),
        }
    }

    /// Report every numeric column pair with |r| above the threshold.
    ///
    /// Pairs are visited in column order, so `column1` always precedes
    /// `column2` and no pair repeats.
    pub fn correlations(&self, dataset: &Dataset, columns: &[ColumnProfile]) -> Vec<ColumnRelationship> {
        let numeric: Vec<(&str, Vec<f64>)> = columns
            .iter()
            .filter(|c| c.inferred_type == InferredType::Number)
            .map(|c| (c.name.as_str(), finite_values(dataset, &c.name)))
            .collect();

        let mut relationships = Vec::new();
        for (i, (name1, x)) in numeric.iter().enumerate() {
            for (name2, y) in &numeric[i + 1..] {
                let r = stats::pearson(x, y);
                if r.abs() <= self.threshold {
                    continue;
                }

                let direction = CorrelationDirection::from_coefficient(r);
                let label = if r.abs() > STRONG_CORRELATION { "Strong" } else { "Moderate" };
                relationships.push(ColumnRelationship {
                    column1: name1.to_string(),
                    column2: name2.to_string(),
                    kind: RelationshipKind::Correlation,
                    direction,
                    coefficient: r,
                    strength: r.abs(),
                    description: format!(
                        "{} {} correlation (r = {:.2}) between {} and {}",
                        label,
                        direction.as_str(),
                        r,
                        name1,
                        name2
                    ),
                });
            }
        }

        relationships
    }

    /// The `n` relationships with the largest |r|, strongest first.
    pub fn strongest(relationships: &[ColumnRelationship], n: usize) -> Vec<&ColumnRelationship> {
        let mut sorted: Vec<&ColumnRelationship> = relationships.iter().collect();
        sorted.sort_by(|a, b| b.strength.total_cmp(&a.strength));
        sorted.truncate(n);
        sorted
    }

    /// Classify temporal, identifier and outlier-cluster columns.
    pub fn patterns(&self, dataset: &Dataset, columns: &[ColumnProfile]) -> Vec<DataPattern> {
        let mut patterns = Vec::new();

        for column in columns {
            let lower = column.name.to_lowercase();

            if column.inferred_type == InferredType::Date
                || lower.contains("date")
                || lower.contains("time")
            {
                patterns.push(DataPattern {
                    column: column.name.clone(),
                    kind: PatternKind::Temporal,
                    description: format!("{} holds dates or timestamps", column.name),
                });
            }

            let id_named = column.uniqueness.is_primary_key_candidate && lower.ends_with("id");
            let unique_text =
                column.uniqueness.is_unique && column.inferred_type == InferredType::String;
            if id_named || unique_text {
                patterns.push(DataPattern {
                    column: column.name.clone(),
                    kind: PatternKind::Identifier,
                    description: format!("{} uniquely identifies rows", column.name),
                });
            }

            if column.inferred_type == InferredType::Number {
                let values = finite_values(dataset, &column.name);
                if values.len() >= MIN_OUTLIER_SAMPLE {
                    let outliers = stats::z_score_outliers(&values, OUTLIER_Z);
                    if outliers.len() >= MIN_OUTLIER_CLUSTER {
                        patterns.push(DataPattern {
                            column: column.name.clone(),
                            kind: PatternKind::OutlierCluster,
                            description: format!(
                                "{} has {} values beyond {} standard deviations",
                                column.name,
                                outliers.len(),
                                OUTLIER_Z
                            ),
                        });
                    }
                }
            }
        }

        patterns
    }
}

impl Default for RelationshipAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Finite numeric values of a column, in row order.
pub(crate) fn finite_values(dataset: &Dataset, column: &str) -> Vec<f64> {
    dataset
        .column(column)
        .into_iter()
        .flatten()
        .filter_map(|v| v.as_f64())
        .collect()
}
