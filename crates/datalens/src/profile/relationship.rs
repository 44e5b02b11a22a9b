//! Cross-column relationships and column-level patterns.

use serde::{Deserialize, Serialize};

/// Kind of relationship between two columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    /// Linear (Pearson) correlation.
    Correlation,
    /// Reserved: one column determines another.
    FunctionalDependency,
}

/// Sign of a correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationDirection {
    Positive,
    Negative,
    None,
}

impl CorrelationDirection {
    /// Classify a coefficient: beyond ±0.1 has a direction.
    pub fn from_coefficient(r: f64) -> Self {
        if r > 0.1 {
            CorrelationDirection::Positive
        } else if r < -0.1 {
            CorrelationDirection::Negative
        } else {
            CorrelationDirection::None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CorrelationDirection::Positive => "positive",
            CorrelationDirection::Negative => "negative",
            CorrelationDirection::None => "none",
        }
    }
}

/// A reportable relationship between two columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnRelationship {
    /// Earlier column in numeric-column order.
    pub column1: String,
    pub column2: String,
    #[serde(rename = "type")]
    pub kind: RelationshipKind,
    pub direction: CorrelationDirection,
    /// Signed Pearson coefficient.
    pub coefficient: f64,
    /// Absolute coefficient, in [0, 1].
    pub strength: f64,
    pub description: String,
}

/// Kind of single-column pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    /// Dates or timestamps.
    Temporal,
    /// Row identifiers.
    Identifier,
    /// Several values far from the mean.
    OutlierCluster,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPattern {
    pub column: String,
    pub kind: PatternKind,
    pub description: String,
}
