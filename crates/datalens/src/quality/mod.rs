//! Data quality scans, issues and the overall quality report.

mod detector;
mod issue;
mod report;

pub use detector::{
    DomainValidityScan, DuplicateRowScan, EncodingScan, FormatConsistencyScan, MissingValueScan,
    OutlierScan, QualityIssueDetector, QualityScan,
};
pub use issue::{
    FixMethod, IssueType, QualityIssue, Severity, SuggestedFix, ALL_COLUMNS, AUTO_FIX_CONFIDENCE,
};
pub use report::{overall_score, IssueCounts, QualityReport};
