//! Quality issue types.

use serde::{Deserialize, Serialize};

/// Confidence at or above which a fix may be applied without review.
pub const AUTO_FIX_CONFIDENCE: f64 = 0.8;
/// Maximum examples attached to an issue.
pub const MAX_EXAMPLES: usize = 5;
/// Column label for issues that span whole rows.
pub const ALL_COLUMNS: &str = "All columns";

/// Category of a detected defect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    /// Missing, null or placeholder values.
    MissingValues,
    /// Rows repeated in full.
    Duplicates,
    /// Several date shapes, or numbers carrying formatting characters.
    InconsistentFormat,
    /// Values far from the column mean.
    Outliers,
    /// Values violating a domain rule (email, phone, non-negative amount).
    InvalidData,
    /// Replacement characters, mojibake or control characters.
    EncodingIssues,
}

impl IssueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::MissingValues => "missing_values",
            IssueType::Duplicates => "duplicates",
            IssueType::InconsistentFormat => "inconsistent_format",
            IssueType::Outliers => "outliers",
            IssueType::InvalidData => "invalid_data",
            IssueType::EncodingIssues => "encoding_issues",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            IssueType::MissingValues => "Missing Values",
            IssueType::Duplicates => "Duplicate Rows",
            IssueType::InconsistentFormat => "Inconsistent Format",
            IssueType::Outliers => "Outliers",
            IssueType::InvalidData => "Invalid Data",
            IssueType::EncodingIssues => "Encoding Issues",
        }
    }
}

/// Severity level of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Penalty subtracted from the overall quality score per issue.
    pub fn penalty(&self) -> f64 {
        match self {
            Severity::Critical => 0.2,
            Severity::High => 0.1,
            Severity::Medium => 0.05,
            Severity::Low => 0.02,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Critical => "Critical",
        }
    }
}

/// Remedy attached to an issue.
///
/// Methods this crate does not recognise deserialize to `Other` so stored
/// reports from newer versions still load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixMethod {
    FillWithMedian,
    FillWithMean,
    FillWithMode,
    FillWithPlaceholder,
    RemoveRows,
    RemoveDuplicates,
    StandardizeDateFormat,
    CleanNumberFormat,
    CapOutliers,
    FlagForReview,
    FixEncoding,
    #[serde(other)]
    Other,
}

impl FixMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            FixMethod::FillWithMedian => "fill_with_median",
            FixMethod::FillWithMean => "fill_with_mean",
            FixMethod::FillWithMode => "fill_with_mode",
            FixMethod::FillWithPlaceholder => "fill_with_placeholder",
            FixMethod::RemoveRows => "remove_rows",
            FixMethod::RemoveDuplicates => "remove_duplicates",
            FixMethod::StandardizeDateFormat => "standardize_date_format",
            FixMethod::CleanNumberFormat => "clean_number_format",
            FixMethod::CapOutliers => "cap_outliers",
            FixMethod::FlagForReview => "flag_for_review",
            FixMethod::FixEncoding => "fix_encoding",
            FixMethod::Other => "other",
        }
    }
}

/// A suggested remedy with the detector's confidence in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedFix {
    pub method: FixMethod,
    pub description: String,
    /// What the data looks like after the fix.
    pub preview: String,
    /// Confidence in [0, 1].
    pub confidence: f64,
}

impl SuggestedFix {
    pub fn new(method: FixMethod, description: impl Into<String>, confidence: f64) -> Self {
        Self {
            method,
            description: description.into(),
            preview: String::new(),
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    pub fn with_preview(mut self, preview: impl Into<String>) -> Self {
        self.preview = preview.into();
        self
    }
}

/// A detected data quality defect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityIssue {
    /// `{type}_{column}`.
    pub id: String,
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    pub severity: Severity,
    /// Affected column, or "All columns".
    pub column: String,
    pub description: String,
    pub affected_rows: usize,
    /// `affected_rows / row_count * 100`.
    pub affected_percentage: f64,
    /// Up to five sample values or row references.
    #[serde(default)]
    pub examples: Vec<String>,
    pub suggested_fix: SuggestedFix,
    pub auto_fixable: bool,
}

impl QualityIssue {
    /// Create an issue. The fix defaults to flagging for review.
    pub fn new(
        issue_type: IssueType,
        severity: Severity,
        column: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let column = column.into();
        Self {
            id: format!("{}_{}", issue_type.as_str(), column),
            issue_type,
            severity,
            column,
            description: description.into(),
            affected_rows: 0,
            affected_percentage: 0.0,
            examples: Vec::new(),
            suggested_fix: SuggestedFix::new(FixMethod::FlagForReview, "Review manually", 0.0),
            auto_fixable: false,
        }
    }

    /// Set the affected row count and derive the percentage from `total_rows`.
    pub fn with_affected(mut self, affected_rows: usize, total_rows: usize) -> Self {
        self.affected_rows = affected_rows;
        self.affected_percentage = percentage(affected_rows, total_rows);
        self
    }

    pub fn with_examples(mut self, examples: impl IntoIterator<Item = String>) -> Self {
        self.examples = examples.into_iter().take(MAX_EXAMPLES).collect();
        self
    }

    /// Attach a fix; the issue becomes auto-fixable when its confidence allows.
    pub fn with_fix(mut self, fix: SuggestedFix) -> Self {
        self.auto_fixable = fix.confidence >= AUTO_FIX_CONFIDENCE;
        self.suggested_fix = fix;
        self
    }

    /// Force manual review regardless of fix confidence.
    pub fn requires_review(mut self) -> Self {
        self.auto_fixable = false;
        self
    }
}

/// `part / total * 100`, or 0 when `total` is 0.
pub(crate) fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}
