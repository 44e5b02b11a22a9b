//! Datalens: profiling, data quality and chart recommendations for tabular datasets.
//!
//! Datalens takes a decoded table (headers plus rows of named cells) and
//! produces per-column profiles, a quality report with suggested fixes,
//! correlations between columns and ranked chart recommendations. Numeric
//! columns can also be compared with t-tests and one-way ANOVA.
//!
//! # Core Principles
//!
//! - **Deterministic**: every score is a fixed heuristic, repeated runs agree
//! - **Non-destructive**: the input dataset is never modified
//! - **Serializable**: every output is plain data ready for JSON
//!
//! # Example
//!
//! ```
//! use datalens::{Datalens, Dataset};
//!
//! let dataset = Dataset::from_records(
//!     &["region", "sales"],
//!     &[vec!["north", "120"], vec!["south", "95"], vec!["north", ""]],
//! );
//!
//! let profile = Datalens::new().profile(&dataset).unwrap();
//! println!("Columns: {}", profile.columns.len());
//! println!("Issues: {}", profile.quality.issues.len());
//! ```

pub mod charts;
pub mod cleaning;
pub mod error;
pub mod inference;
pub mod input;
pub mod profile;
pub mod quality;

mod datalens;

pub use crate::datalens::{Anomaly, AnomalyReport, Datalens, DatalensConfig, ProfileConfig};
pub use charts::{ChartConfig, ChartRecommendation, ChartType};
pub use cleaning::{CleaningRecommendation, CleaningResult, SelectedFix};
pub use error::{DatalensError, Result};
pub use inference::HypothesisTestResult;
pub use input::{CellValue, Dataset, Row};
pub use profile::{ColumnProfile, DatasetProfile, InferredType};
pub use quality::{FixMethod, IssueType, QualityIssue, QualityReport, Severity};
