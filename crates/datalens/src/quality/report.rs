//! Quality report and issue-weighted score.

use serde::{Deserialize, Serialize};

use crate::cleaning::CleaningRecommendation;

use super::issue::{QualityIssue, Severity};

/// Counts of issues by severity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl IssueCounts {
    pub fn from_issues(issues: &[QualityIssue]) -> Self {
        let mut counts = Self::default();
        for issue in issues {
            match issue.severity {
                Severity::Critical => counts.critical += 1,
                Severity::High => counts.high += 1,
                Severity::Medium => counts.medium += 1,
                Severity::Low => counts.low += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.critical + self.high + self.medium + self.low
    }
}

/// Issues found in a dataset, the bundled remedies and an overall score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub issues: Vec<QualityIssue>,
    #[serde(default)]
    pub recommendations: Vec<CleaningRecommendation>,
    /// Issue-weighted score in [0, 1]. 0 for a dataset without rows.
    pub overall_score: f64,
    pub issue_counts: IssueCounts,
}

impl QualityReport {
    pub fn new(
        issues: Vec<QualityIssue>,
        recommendations: Vec<CleaningRecommendation>,
        row_count: usize,
    ) -> Self {
        Self {
            overall_score: overall_score(&issues, row_count),
            issue_counts: IssueCounts::from_issues(&issues),
            issues,
            recommendations,
        }
    }

    /// Issues reported against one column.
    pub fn issues_for_column<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a QualityIssue> {
        self.issues.iter().filter(move |i| i.column == column)
    }

    /// Issues whose suggested fix may be applied without review.
    pub fn auto_fixable(&self) -> impl Iterator<Item = &QualityIssue> {
        self.issues.iter().filter(|i| i.auto_fixable)
    }

    pub fn has_critical(&self) -> bool {
        self.issue_counts.critical > 0
    }
}

/// Start from 1.0 and subtract a penalty per issue by severity, clamped to [0, 1].
pub fn overall_score(issues: &[QualityIssue], row_count: usize) -> f64 {
    if row_count == 0 {
        return 0.0;
    }
    let penalty: f64 = issues.iter().map(|i| i.severity.penalty()).sum();
    (1.0 - penalty).clamp(0.0, 1.0)
}
