//! Applying approved fixes to a copy of a dataset.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::inference::{finite_values, stats};
use crate::input::{CellValue, Dataset, Row};
use crate::quality::{FixMethod, QualityIssue, ALL_COLUMNS};

/// A fix the caller approved for execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedFix {
    /// Issue the fix came from, if any.
    #[serde(default)]
    pub issue_id: Option<String>,
    /// Target column; `None` applies to whole rows.
    #[serde(default)]
    pub column: Option<String>,
    pub method: FixMethod,
}

impl SelectedFix {
    pub fn new(method: FixMethod) -> Self {
        Self {
            issue_id: None,
            column: None,
            method,
        }
    }

    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// Select the suggested fix of an issue.
    pub fn from_issue(issue: &QualityIssue) -> Self {
        Self {
            issue_id: Some(issue.id.clone()),
            column: (issue.column != ALL_COLUMNS).then(|| issue.column.clone()),
            method: issue.suggested_fix.method,
        }
    }
}

/// A fix that changed the data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedFix {
    pub issue_id: Option<String>,
    pub column: Option<String>,
    pub method: FixMethod,
    /// Rows filled or removed.
    pub rows_affected: usize,
}

/// A fix that was not executed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedFix {
    pub issue_id: Option<String>,
    pub column: Option<String>,
    pub method: FixMethod,
    pub reason: String,
}

/// Outcome of applying a fix set.
///
/// Quality values are dataset completeness ratios (valid cells over all cells).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningResult {
    pub cleaned_data: Dataset,
    pub applied: Vec<AppliedFix>,
    pub skipped: Vec<SkippedFix>,
    pub total_rows_affected: usize,
    pub quality_before: f64,
    pub quality_after: f64,
    /// `quality_after - quality_before`.
    pub quality_improvement: f64,
}

/// Executes fill and removal fixes. Every other method is skipped.
#[derive(Debug, Clone, Default)]
pub struct CleaningEngine;

impl CleaningEngine {
    pub fn new() -> Self {
        Self
    }

    /// Apply fixes in order to a clone of `dataset`.
    pub fn apply(&self, dataset: &Dataset, fixes: &[SelectedFix]) -> CleaningResult {
        let quality_before = dataset.completeness_score();
        let mut data = dataset.clone();
        let mut applied = Vec::new();
        let mut skipped = Vec::new();

        for fix in fixes {
            match self.apply_fix(fix, &mut data) {
                Ok(rows_affected) => {
                    debug!(method = fix.method.as_str(), rows_affected, "fix applied");
                    applied.push(AppliedFix {
                        issue_id: fix.issue_id.clone(),
                        column: fix.column.clone(),
                        method: fix.method,
                        rows_affected,
                    });
                }
                Err(reason) => {
                    warn!(
                        method = fix.method.as_str(),
                        column = fix.column.as_deref().unwrap_or(ALL_COLUMNS),
                        %reason,
                        "fix skipped"
                    );
                    skipped.push(SkippedFix {
                        issue_id: fix.issue_id.clone(),
                        column: fix.column.clone(),
                        method: fix.method,
                        reason,
                    });
                }
            }
        }

        let quality_after = data.completeness_score();
        CleaningResult {
            total_rows_affected: applied.iter().map(|a| a.rows_affected).sum(),
            cleaned_data: data,
            applied,
            skipped,
            quality_before,
            quality_after,
            quality_improvement: quality_after - quality_before,
        }
    }

    /// Run one fix, returning the rows it touched or why it was skipped.
    fn apply_fix(&self, fix: &SelectedFix, data: &mut Dataset) -> Result<usize, String> {
        match fix.method {
            FixMethod::FillWithMedian => {
                let column = Self::target_column(fix, data)?;
                let mut values = finite_values(data, column);
                values.sort_by(|a, b| a.total_cmp(b));
                let median = stats::median_sorted(&values)
                    .ok_or_else(|| format!("column '{}' has no numeric values", column))?;
                Ok(Self::fill_missing(data, column, median))
            }
            FixMethod::FillWithMean => {
                let column = Self::target_column(fix, data)?;
                let mean = stats::mean(&finite_values(data, column))
                    .ok_or_else(|| format!("column '{}' has no numeric values", column))?;
                Ok(Self::fill_missing(data, column, mean))
            }
            FixMethod::RemoveDuplicates => Ok(Self::remove_duplicates(data)),
            FixMethod::RemoveRows => {
                let columns: Vec<String> = match &fix.column {
                    Some(_) => vec![Self::target_column(fix, data)?.to_string()],
                    None => data.headers.clone(),
                };
                Ok(Self::remove_incomplete_rows(data, &columns))
            }
            other => Err(format!("'{}' cannot be applied automatically", other.as_str())),
        }
    }

    fn target_column<'a>(fix: &'a SelectedFix, data: &Dataset) -> Result<&'a str, String> {
        let column = fix
            .column
            .as_deref()
            .ok_or_else(|| format!("'{}' needs a target column", fix.method.as_str()))?;
        if !data.has_column(column) {
            return Err(format!("column '{}' not found", column));
        }
        Ok(column)
    }

    fn fill_missing(data: &mut Dataset, column: &str, value: f64) -> usize {
        let mut filled = 0;
        for row in &mut data.rows {
            if row.get(column).is_none_or(CellValue::is_missing_marker) {
                row.insert(column.to_string(), CellValue::Number(value));
                filled += 1;
            }
        }
        filled
    }

    /// Keep the first occurrence of each row.
    fn remove_duplicates(data: &mut Dataset) -> usize {
        let before = data.rows.len();
        let mut seen: IndexSet<String> = IndexSet::new();
        data.rows.retain(|row| seen.insert(Dataset::canonical_row_key(row)));
        before - data.rows.len()
    }

    fn remove_incomplete_rows(data: &mut Dataset, columns: &[String]) -> usize {
        let before = data.rows.len();
        let is_complete = |row: &Row| {
            columns
                .iter()
                .all(|c| row.get(c).is_some_and(|v| !v.is_missing_marker()))
        };
        data.rows.retain(is_complete);
        before - data.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_dataset(headers: Vec<&str>, rows: Vec<Vec<&str>>) -> Dataset {
        Dataset::from_records(&headers, &rows)
    }

    #[test]
    fn test_fill_with_median() {
        let dataset = make_dataset(
            vec!["age"],
            vec![vec!["10"], vec![""], vec!["30"], vec!["N/A"], vec!["20"]],
        );
        let fix = SelectedFix::new(FixMethod::FillWithMedian).with_column("age");
        let result = CleaningEngine::new().apply(&dataset, &[fix]);

        assert_eq!(result.applied.len(), 1);
        assert_eq!(result.applied[0].rows_affected, 2);
        assert_eq!(result.cleaned_data.cell(1, "age"), Some(&CellValue::Number(20.0)));
        assert_eq!(result.quality_after, 1.0);
        assert!((result.quality_improvement - 0.4).abs() < 1e-9);

        // Input is untouched
        assert_eq!(dataset.cell(1, "age"), Some(&CellValue::text("")));
    }

    #[test]
    fn test_fill_with_mean() {
        let dataset = make_dataset(vec!["x"], vec![vec!["1"], vec!["2"], vec![""], vec!["6"]]);
        let fix = SelectedFix::new(FixMethod::FillWithMean).with_column("x");
        let result = CleaningEngine::new().apply(&dataset, &[fix]);
        assert_eq!(result.cleaned_data.cell(2, "x"), Some(&CellValue::Number(3.0)));
    }

    #[test]
    fn test_remove_duplicates() {
        let dataset = make_dataset(
            vec!["a"],
            vec![vec!["1"], vec!["1"], vec!["2"], vec!["1"]],
        );
        let result =
            CleaningEngine::new().apply(&dataset, &[SelectedFix::new(FixMethod::RemoveDuplicates)]);
        assert_eq!(result.total_rows_affected, 2);
        assert_eq!(result.cleaned_data.row_count(), 2);
    }

    #[test]
    fn test_remove_rows() {
        let dataset = make_dataset(
            vec!["a", "b"],
            vec![vec!["1", ""], vec!["2", "x"], vec!["", "y"]],
        );

        let by_column = SelectedFix::new(FixMethod::RemoveRows).with_column("b");
        let result = CleaningEngine::new().apply(&dataset, &[by_column]);
        assert_eq!(result.total_rows_affected, 1);

        let any = SelectedFix::new(FixMethod::RemoveRows);
        let result = CleaningEngine::new().apply(&dataset, &[any]);
        assert_eq!(result.total_rows_affected, 2);
        assert_eq!(result.cleaned_data.row_count(), 1);
    }

    #[test]
    fn test_unsupported_methods_are_skipped() {
        let dataset = make_dataset(vec!["a"], vec![vec!["1"]]);
        let fixes = vec![
            SelectedFix::new(FixMethod::FixEncoding).with_column("a"),
            SelectedFix::new(FixMethod::Other),
            SelectedFix::new(FixMethod::FillWithMean).with_column("missing"),
        ];
        let result = CleaningEngine::new().apply(&dataset, &fixes);
        assert!(result.applied.is_empty());
        assert_eq!(result.skipped.len(), 3);
        assert_eq!(result.cleaned_data, dataset);
        assert_eq!(result.quality_improvement, 0.0);
    }

    #[test]
    fn test_from_issue() {
        use crate::quality::{IssueType, Severity, SuggestedFix};

        let issue = QualityIssue::new(IssueType::Duplicates, Severity::Low, ALL_COLUMNS, "d")
            .with_fix(SuggestedFix::new(FixMethod::RemoveDuplicates, "r", 0.95));
        let fix = SelectedFix::from_issue(&issue);
        assert_eq!(fix.column, None);
        assert_eq!(fix.issue_id.as_deref(), Some("duplicates_All columns"));
    }
}
