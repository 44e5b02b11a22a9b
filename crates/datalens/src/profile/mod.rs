//! Profile types describing the structure and statistics of a dataset.

mod column;
mod dataset;
mod relationship;
mod types;

pub use column::{
    ColumnProfile, ColumnStatistics, Distribution, FrequencyEntry, HistogramBin,
    NullabilityInfo, NumericStatistics, PatternInfo, QualityScores, UniquenessInfo, ValueRange,
};
pub use dataset::{DatasetProfile, DatasetSummary};
pub use relationship::{
    ColumnRelationship, CorrelationDirection, DataPattern, PatternKind, RelationshipKind,
};
pub use types::InferredType;
