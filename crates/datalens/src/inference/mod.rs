//! Type inference, column profiling, cross-column analysis and hypothesis tests.

mod column_profiler;
pub mod hypothesis;
mod relationships;
pub mod stats;
mod type_detector;

pub use column_profiler::ColumnProfiler;
pub use hypothesis::HypothesisTestResult;
pub use relationships::{RelationshipAnalysis, RelationshipAnalyzer};
pub(crate) use relationships::finite_values;
pub use type_detector::TypeDetector;
