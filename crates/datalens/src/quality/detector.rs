//! Quality scans over a profiled dataset.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::inference::{finite_values, stats};
use crate::input::value::{format_number, parse_number};
use crate::input::Dataset;
use crate::profile::{ColumnProfile, InferredType};

use super::issue::{
    percentage, FixMethod, IssueType, QualityIssue, Severity, SuggestedFix, ALL_COLUMNS,
};

/// A single quality check.
pub trait QualityScan: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Run the scan. Never fails; columns the scan does not apply to are skipped.
    fn scan(&self, dataset: &Dataset, columns: &[ColumnProfile]) -> Vec<QualityIssue>;
}

/// Rendered values of a column, skipping missing cells and null markers.
fn present_values(dataset: &Dataset, column: &str) -> Vec<String> {
    dataset
        .column(column)
        .into_iter()
        .flatten()
        .filter(|cell| !cell.is_missing_marker())
        .map(|cell| cell.to_string())
        .collect()
}

// =============================================================================
// MISSING VALUES
// =============================================================================

/// Flags columns with missing, null or placeholder values.
pub struct MissingValueScan;

impl MissingValueScan {
    fn severity(pct: f64) -> Severity {
        if pct > 30.0 {
            Severity::Critical
        } else if pct > 15.0 {
            Severity::High
        } else if pct > 5.0 {
            Severity::Medium
        } else {
            Severity::Low
        }
    }

    fn suggest(column: &ColumnProfile, pct: f64) -> SuggestedFix {
        if column.inferred_type == InferredType::Number {
            let confidence = if pct < 5.0 {
                0.9
            } else if pct < 15.0 {
                0.75
            } else {
                0.6
            };
            if pct < 10.0 {
                SuggestedFix::new(
                    FixMethod::FillWithMedian,
                    "Fill missing values with the column median",
                    confidence,
                )
                .with_preview(match column.statistics.numeric.as_ref() {
                    Some(s) => format!("Missing values become {}", s.median),
                    None => "Missing values become the median".to_string(),
                })
            } else if pct < 30.0 {
                SuggestedFix::new(
                    FixMethod::FillWithMean,
                    "Fill missing values with the column mean",
                    confidence,
                )
                .with_preview(match column.statistics.numeric.as_ref() {
                    Some(s) => format!("Missing values become {:.2}", s.mean),
                    None => "Missing values become the mean".to_string(),
                })
            } else {
                SuggestedFix::new(
                    FixMethod::RemoveRows,
                    "Remove rows with missing values",
                    confidence,
                )
                .with_preview("Rows with missing values are dropped")
            }
        } else {
            let confidence = if pct < 5.0 {
                0.85
            } else if pct < 20.0 {
                0.7
            } else {
                0.6
            };
            if pct < 5.0 {
                let mode = column.statistics.mode.first().cloned().unwrap_or_default();
                SuggestedFix::new(
                    FixMethod::FillWithMode,
                    "Fill missing values with the most common value",
                    confidence,
                )
                .with_preview(format!("Missing values become \"{}\"", mode))
            } else if pct < 20.0 {
                SuggestedFix::new(
                    FixMethod::FillWithPlaceholder,
                    "Fill missing values with a placeholder",
                    confidence,
                )
                .with_preview("Missing values become \"Unknown\"")
            } else {
                SuggestedFix::new(
                    FixMethod::RemoveRows,
                    "Remove rows with missing values",
                    confidence,
                )
                .with_preview("Rows with missing values are dropped")
            }
        }
    }
}

impl QualityScan for MissingValueScan {
    fn name(&self) -> &'static str {
        "missing_values"
    }

    fn scan(&self, dataset: &Dataset, columns: &[ColumnProfile]) -> Vec<QualityIssue> {
        let total = dataset.row_count();
        let mut issues = Vec::new();

        for column in columns {
            let missing: Vec<usize> = dataset
                .column(&column.name)
                .into_iter()
                .enumerate()
                .filter(|(_, cell)| cell.is_none_or(|c| c.is_missing_marker()))
                .map(|(row, _)| row)
                .collect();
            if missing.is_empty() {
                continue;
            }

            let count = missing.len();
            let pct = percentage(count, total);
            issues.push(
                QualityIssue::new(
                    IssueType::MissingValues,
                    Self::severity(pct),
                    &column.name,
                    format!(
                        "{} missing values ({:.1}%) in column '{}'",
                        count, pct, column.name
                    ),
                )
                .with_affected(count, total)
                .with_examples(missing.iter().map(|r| format!("Row {}", r + 1)))
                .with_fix(Self::suggest(column, pct)),
            );
        }

        issues
    }
}

// =============================================================================
// DUPLICATE ROWS
// =============================================================================

/// Flags rows repeated in full, ignoring key order.
pub struct DuplicateRowScan;

impl QualityScan for DuplicateRowScan {
    fn name(&self) -> &'static str {
        "duplicates"
    }

    fn scan(&self, dataset: &Dataset, _columns: &[ColumnProfile]) -> Vec<QualityIssue> {
        let total = dataset.row_count();

        let mut row_map: IndexMap<String, Vec<usize>> = IndexMap::new();
        for (row_idx, row) in dataset.rows.iter().enumerate() {
            row_map
                .entry(Dataset::canonical_row_key(row))
                .or_default()
                .push(row_idx);
        }

        let duplicate_rows: Vec<usize> = row_map
            .values()
            .flat_map(|rows| rows.iter().skip(1))
            .copied()
            .collect();
        if duplicate_rows.is_empty() {
            return Vec::new();
        }

        let count = duplicate_rows.len();
        let pct = percentage(count, total);
        let severity = if pct > 10.0 {
            Severity::High
        } else if pct > 5.0 {
            Severity::Medium
        } else {
            Severity::Low
        };

        vec![
            QualityIssue::new(
                IssueType::Duplicates,
                severity,
                ALL_COLUMNS,
                format!("{} duplicate rows ({:.1}%) found", count, pct),
            )
            .with_affected(count, total)
            .with_examples(duplicate_rows.iter().map(|r| format!("Row {}", r + 1)))
            .with_fix(
                SuggestedFix::new(
                    FixMethod::RemoveDuplicates,
                    "Remove duplicate rows, keeping the first occurrence",
                    0.95,
                )
                .with_preview(format!("{} rows remain", total - count)),
            ),
        ]
    }
}

// =============================================================================
// INCONSISTENT FORMATS
// =============================================================================

/// Recognised date shapes, checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum DateShape {
    Iso,
    UsSlash,
    UsDash,
    ShortSlash,
}

static DATE_SHAPES: Lazy<Vec<(DateShape, Regex)>> = Lazy::new(|| {
    vec![
        (DateShape::Iso, Regex::new(r"^\d{4}-\d{2}-\d{2}").unwrap()),
        (DateShape::UsSlash, Regex::new(r"^\d{2}/\d{2}/\d{4}$").unwrap()),
        (DateShape::UsDash, Regex::new(r"^\d{2}-\d{2}-\d{4}$").unwrap()),
        (DateShape::ShortSlash, Regex::new(r"^\d{1,2}/\d{1,2}/\d{4}$").unwrap()),
    ]
});

/// Currency symbols, thousands separators and whitespace inside numbers.
static NUMBER_NOISE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[$€£¥,\s]").unwrap());

impl DateShape {
    fn detect(value: &str) -> Option<DateShape> {
        let trimmed = value.trim();
        DATE_SHAPES
            .iter()
            .find(|(_, re)| re.is_match(trimmed))
            .map(|(shape, _)| *shape)
    }

    fn description(&self) -> &'static str {
        match self {
            DateShape::Iso => "YYYY-MM-DD",
            DateShape::UsSlash => "MM/DD/YYYY",
            DateShape::UsDash => "MM-DD-YYYY",
            DateShape::ShortSlash => "M/D/YYYY",
        }
    }
}

/// Flags date columns mixing shapes and numbers carrying formatting characters.
pub struct FormatConsistencyScan;

impl FormatConsistencyScan {
    fn date_issue(&self, dataset: &Dataset, column: &ColumnProfile) -> Option<QualityIssue> {
        let shaped: Vec<(String, DateShape)> = present_values(dataset, &column.name)
            .into_iter()
            .filter_map(|v| DateShape::detect(&v).map(|s| (v, s)))
            .collect();

        let mut counts: IndexMap<DateShape, usize> = IndexMap::new();
        for (_, shape) in &shaped {
            *counts.entry(*shape).or_insert(0) += 1;
        }
        if counts.len() < 2 {
            return None;
        }

        // First-seen shape wins ties
        let mut dominant = DateShape::Iso;
        let mut dominant_count = 0;
        for (shape, count) in &counts {
            if *count > dominant_count {
                dominant = *shape;
                dominant_count = *count;
            }
        }

        let outliers: Vec<String> = shaped
            .into_iter()
            .filter(|(_, s)| *s != dominant)
            .map(|(v, _)| v)
            .collect();
        let total = dataset.row_count();
        let count = outliers.len();
        let pct = percentage(count, total);
        let formats: Vec<&str> = counts.keys().map(|s| s.description()).collect();

        Some(
            QualityIssue::new(
                IssueType::InconsistentFormat,
                if pct > 20.0 { Severity::High } else { Severity::Medium },
                &column.name,
                format!(
                    "Column '{}' mixes {} date formats: {}",
                    column.name,
                    counts.len(),
                    formats.join(", ")
                ),
            )
            .with_affected(count, total)
            .with_examples(outliers)
            .with_fix(
                SuggestedFix::new(
                    FixMethod::StandardizeDateFormat,
                    format!("Convert all dates to {}", dominant.description()),
                    0.8,
                )
                .with_preview(format!("Dates written as {}", dominant.description())),
            ),
        )
    }

    fn number_issue(&self, dataset: &Dataset, column: &ColumnProfile) -> Option<QualityIssue> {
        let noisy: Vec<String> = present_values(dataset, &column.name)
            .into_iter()
            .filter(|v| {
                let trimmed = v.trim();
                NUMBER_NOISE.is_match(trimmed)
                    && parse_number(&NUMBER_NOISE.replace_all(trimmed, "")).is_some()
            })
            .collect();
        if noisy.is_empty() {
            return None;
        }

        let total = dataset.row_count();
        let count = noisy.len();
        let pct = percentage(count, total);
        Some(
            QualityIssue::new(
                IssueType::InconsistentFormat,
                if pct > 15.0 { Severity::Medium } else { Severity::Low },
                &column.name,
                format!(
                    "{} values in column '{}' contain currency symbols, separators or spaces",
                    count, column.name
                ),
            )
            .with_affected(count, total)
            .with_examples(noisy)
            .with_fix(
                SuggestedFix::new(
                    FixMethod::CleanNumberFormat,
                    "Strip formatting characters and store plain numbers",
                    0.85,
                )
                .with_preview("\"$1,200\" becomes 1200"),
            ),
        )
    }
}

impl QualityScan for FormatConsistencyScan {
    fn name(&self) -> &'static str {
        "inconsistent_format"
    }

    fn scan(&self, dataset: &Dataset, columns: &[ColumnProfile]) -> Vec<QualityIssue> {
        let mut issues = Vec::new();

        for column in columns {
            let date_like = column.inferred_type == InferredType::Date
                || column.name.to_lowercase().contains("date");
            let date_issue = if date_like {
                self.date_issue(dataset, column)
            } else {
                None
            };

            // At most one format issue per column; the date check wins
            match date_issue {
                Some(issue) => issues.push(issue),
                None if matches!(
                    column.inferred_type,
                    InferredType::Number | InferredType::Mixed
                ) =>
                {
                    issues.extend(self.number_issue(dataset, column));
                }
                None => {}
            }
        }

        issues
    }
}

// =============================================================================
// OUTLIERS
// =============================================================================

/// Flags numeric values more than three standard deviations from the mean.
pub struct OutlierScan {
    threshold: f64,
    min_values: usize,
}

impl Default for OutlierScan {
    fn default() -> Self {
        Self {
            threshold: 3.0,
            min_values: 10,
        }
    }
}

impl QualityScan for OutlierScan {
    fn name(&self) -> &'static str {
        "outliers"
    }

    fn scan(&self, dataset: &Dataset, columns: &[ColumnProfile]) -> Vec<QualityIssue> {
        let total = dataset.row_count();
        let mut issues = Vec::new();

        for column in columns {
            if column.inferred_type != InferredType::Number {
                continue;
            }
            let values = finite_values(dataset, &column.name);
            if values.len() < self.min_values {
                continue;
            }

            let outliers = stats::z_score_outliers(&values, self.threshold);
            if outliers.is_empty() {
                continue;
            }

            let count = outliers.len();
            let pct = percentage(count, total);
            let (mean, std) = match (stats::mean(&values), stats::population_std(&values)) {
                (Some(m), Some(s)) => (m, s),
                _ => continue,
            };

            let fix = if pct > 5.0 {
                let (low, high) = (mean - 2.0 * std, mean + 2.0 * std);
                SuggestedFix::new(
                    FixMethod::CapOutliers,
                    "Cap values at two standard deviations from the mean",
                    0.7,
                )
                .with_preview(format!("Values limited to [{:.2}, {:.2}]", low, high))
            } else {
                SuggestedFix::new(
                    FixMethod::FlagForReview,
                    "Review the extreme values manually",
                    0.9,
                )
                .with_preview("Values are kept and flagged")
            };

            issues.push(
                QualityIssue::new(
                    IssueType::Outliers,
                    if pct > 10.0 { Severity::Medium } else { Severity::Low },
                    &column.name,
                    format!(
                        "{} values in column '{}' are more than {} standard deviations from the mean ({:.2})",
                        count, column.name, self.threshold, mean
                    ),
                )
                .with_affected(count, total)
                .with_examples(outliers.iter().map(|&i| format_number(values[i])))
                .with_fix(fix)
                .requires_review(),
            );
        }

        issues
    }
}

// =============================================================================
// INVALID DOMAIN DATA
// =============================================================================

static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

static PHONE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[\d\s\-\(\)\.]{7,20}$").unwrap());

/// Column name fragments whose numeric values must not be negative.
const NON_NEGATIVE_NAMES: &[&str] = &["price", "cost", "amount", "quantity"];

/// Flags emails, phone numbers and amounts that break their domain rules.
pub struct DomainValidityScan;

impl DomainValidityScan {
    fn invalid_values(dataset: &Dataset, column: &ColumnProfile) -> Option<(&'static str, Vec<String>)> {
        let lower = column.name.to_lowercase();

        if lower.contains("email") {
            let invalid = present_values(dataset, &column.name)
                .into_iter()
                .filter(|v| !EMAIL_REGEX.is_match(v.trim()))
                .collect();
            return Some(("invalid email addresses", invalid));
        }

        if lower.contains("phone") {
            let invalid = present_values(dataset, &column.name)
                .into_iter()
                .filter(|v| !PHONE_REGEX.is_match(v.trim()))
                .collect();
            return Some(("invalid phone numbers", invalid));
        }

        if column.inferred_type == InferredType::Number
            && NON_NEGATIVE_NAMES.iter().any(|n| lower.contains(n))
        {
            let invalid = finite_values(dataset, &column.name)
                .into_iter()
                .filter(|v| *v < 0.0)
                .map(format_number)
                .collect();
            return Some(("negative values", invalid));
        }

        None
    }
}

impl QualityScan for DomainValidityScan {
    fn name(&self) -> &'static str {
        "invalid_data"
    }

    fn scan(&self, dataset: &Dataset, columns: &[ColumnProfile]) -> Vec<QualityIssue> {
        let total = dataset.row_count();
        let mut issues = Vec::new();

        for column in columns {
            let Some((what, invalid)) = Self::invalid_values(dataset, column) else {
                continue;
            };
            if invalid.is_empty() {
                continue;
            }

            let count = invalid.len();
            let pct = percentage(count, total);
            issues.push(
                QualityIssue::new(
                    IssueType::InvalidData,
                    if pct > 10.0 { Severity::High } else { Severity::Medium },
                    &column.name,
                    format!("{} {} in column '{}'", count, what, column.name),
                )
                .with_affected(count, total)
                .with_examples(invalid)
                .with_fix(
                    SuggestedFix::new(FixMethod::FlagForReview, "Review and correct the values", 0.95)
                        .with_preview("Values are kept and flagged"),
                )
                .requires_review(),
            );
        }

        issues
    }
}

// =============================================================================
// ENCODING
// =============================================================================

/// UTF-8 text decoded as Latin-1 or Windows-1252.
static MOJIBAKE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Ã[\x{80}-\x{BF}]|Â[\x{80}-\x{BF}]|â€").unwrap());

/// Flags text with replacement characters, mojibake or control characters.
pub struct EncodingScan;

impl EncodingScan {
    pub(crate) fn is_garbled(value: &str) -> bool {
        value.contains('\u{FFFD}')
            || MOJIBAKE.is_match(value)
            || value
                .chars()
                .any(|c| c.is_control() && !matches!(c, '\t' | '\n' | '\r'))
    }
}

impl QualityScan for EncodingScan {
    fn name(&self) -> &'static str {
        "encoding_issues"
    }

    fn scan(&self, dataset: &Dataset, columns: &[ColumnProfile]) -> Vec<QualityIssue> {
        let total = dataset.row_count();
        let mut issues = Vec::new();

        for column in columns {
            if !matches!(
                column.inferred_type,
                InferredType::String | InferredType::Categorical | InferredType::Mixed
            ) {
                continue;
            }

            let garbled: Vec<String> = present_values(dataset, &column.name)
                .into_iter()
                .filter(|v| Self::is_garbled(v))
                .collect();
            if garbled.is_empty() {
                continue;
            }

            let count = garbled.len();
            let pct = percentage(count, total);
            issues.push(
                QualityIssue::new(
                    IssueType::EncodingIssues,
                    if pct > 5.0 { Severity::Medium } else { Severity::Low },
                    &column.name,
                    format!("{} values in column '{}' have encoding problems", count, column.name),
                )
                .with_affected(count, total)
                .with_examples(garbled)
                .with_fix(
                    SuggestedFix::new(FixMethod::FixEncoding, "Re-decode the text as UTF-8", 0.8)
                        .with_preview("\"cafÃ©\" becomes \"café\""),
                )
                .requires_review(),
            );
        }

        issues
    }
}

// =============================================================================
// DETECTOR
// =============================================================================

/// Runs every quality scan and concatenates the results.
pub struct QualityIssueDetector {
    scans: Vec<Box<dyn QualityScan>>,
}

impl QualityIssueDetector {
    /// Create a detector with all default scans.
    pub fn new() -> Self {
        Self {
            scans: vec![
                Box::new(MissingValueScan),
                Box::new(DuplicateRowScan),
                Box::new(FormatConsistencyScan),
                Box::new(OutlierScan::default()),
                Box::new(DomainValidityScan),
                Box::new(EncodingScan),
            ],
        }
    }

    /// Add a custom scan after the defaults.
    pub fn with_scan(mut self, scan: Box<dyn QualityScan>) -> Self {
        self.scans.push(scan);
        self
    }

    /// Run all scans. A dataset without rows has no issues.
    pub fn detect(&self, dataset: &Dataset, columns: &[ColumnProfile]) -> Vec<QualityIssue> {
        if dataset.row_count() == 0 {
            return Vec::new();
        }

        let mut all_issues = Vec::new();
        for scan in &self.scans {
            let issues = scan.scan(dataset, columns);
            debug!(scan = scan.name(), issues = issues.len(), "quality scan complete");
            all_issues.extend(issues);
        }
        all_issues
    }
}

impl Default for QualityIssueDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::ColumnProfiler;

    fn make_dataset(headers: Vec<&str>, rows: Vec<Vec<&str>>) -> Dataset {
        Dataset::from_records(&headers, &rows)
    }

    fn profiles(dataset: &Dataset) -> Vec<ColumnProfile> {
        let profiler = ColumnProfiler::new();
        (0..dataset.column_count())
            .filter_map(|i| profiler.profile_column(dataset, i))
            .collect()
    }

    fn run(scan: &dyn QualityScan, dataset: &Dataset) -> Vec<QualityIssue> {
        scan.scan(dataset, &profiles(dataset))
    }

    #[test]
    fn test_missing_values_numeric() {
        let mut rows: Vec<Vec<&str>> = (0..20).map(|_| vec!["42"]).collect();
        rows[3] = vec![""];
        rows[7] = vec!["N/A"];
        let dataset = make_dataset(vec!["age"], rows);

        let issues = run(&MissingValueScan, &dataset);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].affected_rows, 2);
        assert_eq!(issues[0].severity, Severity::Medium);
        assert_eq!(issues[0].suggested_fix.method, FixMethod::FillWithMean);
        assert_eq!(issues[0].suggested_fix.confidence, 0.75);
        assert!(!issues[0].auto_fixable);
        assert_eq!(issues[0].examples, vec!["Row 4", "Row 8"]);
    }

    #[test]
    fn test_missing_values_text() {
        let mut rows: Vec<Vec<&str>> = (0..10).map(|i| vec![if i % 2 == 0 { "a" } else { "b" }]).collect();
        rows[0] = vec!["null"];
        let dataset = make_dataset(vec!["label"], rows);

        let issues = run(&MissingValueScan, &dataset);
        assert_eq!(issues[0].severity, Severity::Medium);
        assert_eq!(issues[0].suggested_fix.method, FixMethod::FillWithPlaceholder);
        assert!(issues[0].suggested_fix.preview.contains("Unknown"));
    }

    #[test]
    fn test_duplicate_rows() {
        let dataset = make_dataset(
            vec!["a", "b"],
            vec![vec!["1", "x"], vec!["2", "y"], vec!["1", "x"], vec!["1", "x"]],
        );
        let issues = run(&DuplicateRowScan, &dataset);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].affected_rows, 2);
        assert_eq!(issues[0].column, ALL_COLUMNS);
        assert_eq!(issues[0].severity, Severity::High);
        assert!(issues[0].auto_fixable);
    }

    #[test]
    fn test_no_duplicates() {
        let dataset = make_dataset(vec!["a"], vec![vec!["1"], vec!["2"]]);
        assert!(run(&DuplicateRowScan, &dataset).is_empty());
    }

    #[test]
    fn test_mixed_date_formats() {
        let dataset = make_dataset(
            vec!["order_date"],
            vec![
                vec!["2024-01-15"],
                vec!["2024-02-20"],
                vec!["2024-03-05"],
                vec!["03/15/2024"],
                vec!["4/1/2024"],
            ],
        );
        let issues = run(&FormatConsistencyScan, &dataset);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].issue_type, IssueType::InconsistentFormat);
        assert_eq!(issues[0].affected_rows, 2);
        assert_eq!(issues[0].severity, Severity::High);
        assert_eq!(issues[0].suggested_fix.method, FixMethod::StandardizeDateFormat);
        assert!(issues[0].suggested_fix.description.contains("YYYY-MM-DD"));
    }

    #[test]
    fn test_short_slash_not_double_counted() {
        assert_eq!(DateShape::detect("03/15/2024"), Some(DateShape::UsSlash));
        assert_eq!(DateShape::detect("3/15/2024"), Some(DateShape::ShortSlash));
        assert_eq!(DateShape::detect("2024-01-15T10:00:00"), Some(DateShape::Iso));
        assert_eq!(DateShape::detect("yesterday"), None);
    }

    #[test]
    fn test_number_format_noise() {
        let mut rows: Vec<Vec<&str>> = (0..9).map(|_| vec!["100"]).collect();
        rows.push(vec!["$1,200"]);
        let dataset = make_dataset(vec!["revenue"], rows);
        let issues = run(&FormatConsistencyScan, &dataset);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].suggested_fix.method, FixMethod::CleanNumberFormat);
        assert_eq!(issues[0].severity, Severity::Low);
        assert_eq!(issues[0].examples, vec!["$1,200"]);
    }

    #[test]
    fn test_date_issue_suppresses_number_issue() {
        let conflicting = make_dataset(
            vec!["update_date"],
            vec![
                vec!["2024-01-15"],
                vec!["2024-02-20"],
                vec!["03/15/2024"],
                vec!["$1,200"],
                vec!["$3,400"],
            ],
        );
        let issues = run(&FormatConsistencyScan, &conflicting);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].id, "inconsistent_format_update_date");
        assert_eq!(issues[0].suggested_fix.method, FixMethod::StandardizeDateFormat);

        // A single date shape leaves room for the number check
        let single_shape = make_dataset(
            vec!["update_date"],
            vec![
                vec!["2024-01-15"],
                vec!["2024-02-20"],
                vec!["$1,200"],
                vec!["$3,400"],
                vec!["500"],
            ],
        );
        let issues = run(&FormatConsistencyScan, &single_shape);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].suggested_fix.method, FixMethod::CleanNumberFormat);
        assert_eq!(issues[0].affected_rows, 2);
    }

    #[test]
    fn test_outliers() {
        let mut rows: Vec<Vec<&str>> = (0..30).map(|_| vec!["10"]).collect();
        rows[0] = vec!["11"];
        rows.push(vec!["5000"]);
        let dataset = make_dataset(vec!["value"], rows);
        let issues = run(&OutlierScan::default(), &dataset);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].affected_rows, 1);
        assert_eq!(issues[0].severity, Severity::Low);
        assert_eq!(issues[0].suggested_fix.method, FixMethod::FlagForReview);
        assert!(!issues[0].auto_fixable);
        assert_eq!(issues[0].examples, vec!["5000"]);
    }

    #[test]
    fn test_outliers_need_ten_values() {
        let dataset = make_dataset(
            vec!["value"],
            vec![vec!["10"], vec!["11"], vec!["12"], vec!["9000"]],
        );
        assert!(run(&OutlierScan::default(), &dataset).is_empty());
    }

    #[test]
    fn test_invalid_emails() {
        let dataset = make_dataset(
            vec!["email"],
            vec![
                vec!["user@example.com"],
                vec!["test@domain.org"],
                vec!["invalid-email"],
                vec!["another@valid.net"],
            ],
        );
        let issues = run(&DomainValidityScan, &dataset);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].issue_type, IssueType::InvalidData);
        assert_eq!(issues[0].severity, Severity::High);
        assert_eq!(issues[0].examples, vec!["invalid-email"]);
        assert!(!issues[0].auto_fixable);
    }

    #[test]
    fn test_negative_prices() {
        let dataset = make_dataset(
            vec!["unit_price"],
            vec![vec!["9.99"], vec!["-5"], vec!["12.50"], vec!["3"], vec!["7"]],
        );
        let issues = run(&DomainValidityScan, &dataset);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].examples, vec!["-5"]);
    }

    #[test]
    fn test_encoding_issues() {
        assert!(EncodingScan::is_garbled("cafÃ©"));
        assert!(EncodingScan::is_garbled("bad \u{FFFD} char"));
        assert!(EncodingScan::is_garbled("bell\u{7}"));
        assert!(!EncodingScan::is_garbled("café"));
        assert!(!EncodingScan::is_garbled("line\nbreak"));

        let dataset = make_dataset(
            vec!["city"],
            vec![vec!["Paris"], vec!["MontrÃ©al"], vec!["Berlin"], vec!["Tokyo"]],
        );
        let issues = run(&EncodingScan, &dataset);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Medium);
    }

    #[test]
    fn test_detector_empty_dataset() {
        let dataset = make_dataset(vec!["a", "b"], vec![]);
        let detector = QualityIssueDetector::new();
        assert!(detector.detect(&dataset, &profiles(&dataset)).is_empty());
    }

    #[test]
    fn test_detector_clean_dataset() {
        let dataset = make_dataset(
            vec!["name", "score"],
            vec![
                vec!["alice", "10"],
                vec!["bob", "12"],
                vec!["carol", "11"],
            ],
        );
        let detector = QualityIssueDetector::new();
        assert!(detector.detect(&dataset, &profiles(&dataset)).is_empty());
    }
}
