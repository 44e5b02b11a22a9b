//! Per-column statistics, quality sub-scores, patterns and distributions.

use chrono::NaiveDate;
use indexmap::{IndexMap, IndexSet};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::input::{CellValue, Dataset};
use crate::profile::{
    ColumnProfile, ColumnStatistics, Distribution, FrequencyEntry, InferredType, NullabilityInfo,
    PatternInfo, QualityScores, UniquenessInfo, ValueRange,
};

use super::stats;
use super::type_detector::TypeDetector;

// =============================================================================
// SHAPE BUCKETS
// =============================================================================
// Coarse value shapes used for the consistency score, checked in order.

static SHAPE_BUCKETS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    vec![
        ("digits", Regex::new(r"^\d+$").unwrap()),
        ("uppercase", Regex::new(r"^[A-Z]+$").unwrap()),
        ("lowercase", Regex::new(r"^[a-z]+$").unwrap()),
        ("alpha_space", Regex::new(r"^[A-Za-z\s]+$").unwrap()),
        ("email", Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap()),
        ("phone", Regex::new(r"^[\d\s\-\(\)\+\.]+$").unwrap()),
    ]
});

/// Shape bucket for values matching none of the patterns.
const MIXED_SHAPE: &str = "mixed";
/// Consistency below this gets a note.
const CONSISTENCY_NOTE_THRESHOLD: f64 = 0.8;
/// Maximum value signatures kept per column.
const MAX_PATTERNS: usize = 5;
/// Literal examples kept per signature.
const MAX_PATTERN_EXAMPLES: usize = 3;
/// Entries in a frequency table.
const MAX_FREQUENCY_ENTRIES: usize = 10;
/// Seed for reproducible type-detection samples.
const SAMPLE_SEED: u64 = 0x5eed_da7a;

/// Computes a [`ColumnProfile`] from a column's values.
#[derive(Debug, Clone)]
pub struct ColumnProfiler {
    detector: TypeDetector,
    /// Maximum values used for type detection (None = all).
    sample_size: Option<usize>,
    /// Whether to derive value signatures for text columns.
    include_patterns: bool,
}

impl ColumnProfiler {
    /// Create a profiler that samples every value and derives patterns.
    pub fn new() -> Self {
        Self {
            detector: TypeDetector::new(),
            sample_size: None,
            include_patterns: true,
        }
    }

    /// Limit type detection to a reproducible sample of `size` values.
    pub fn with_sample_size(mut self, size: Option<usize>) -> Self {
        self.sample_size = size;
        self
    }

    /// Enable or disable value signature extraction.
    pub fn with_patterns(mut self, include: bool) -> Self {
        self.include_patterns = include;
        self
    }

    /// Profile the column at `position` in the dataset headers.
    pub fn profile_column(&self, dataset: &Dataset, position: usize) -> Option<ColumnProfile> {
        let name = dataset.headers.get(position)?;
        let values = dataset.column(name);
        Some(self.profile(name, position, &values))
    }

    /// Detect the column type and profile it.
    pub fn profile(&self, name: &str, position: usize, values: &[Option<&CellValue>]) -> ColumnProfile {
        let non_null: Vec<&CellValue> = values
            .iter()
            .flatten()
            .copied()
            .filter(|v| !v.is_missing_marker())
            .collect();
        let sample = self.sample(&non_null);

        let mut inferred_type = self.detector.detect(&sample);
        if inferred_type == InferredType::String && self.detector.is_categorical(&sample) {
            inferred_type = InferredType::Categorical;
        }

        self.profile_with_type(name, position, values, inferred_type)
    }

    /// Profile a column whose type is already known.
    pub fn profile_with_type(
        &self,
        name: &str,
        position: usize,
        values: &[Option<&CellValue>],
        inferred_type: InferredType,
    ) -> ColumnProfile {
        let count = values.len();

        // Separate null and non-null values, remembering how nulls were written
        let mut null_count = 0usize;
        let mut null_representations: IndexSet<&'static str> = IndexSet::new();
        let mut non_null: Vec<&CellValue> = Vec::with_capacity(count);
        for value in values {
            match value {
                None => {
                    null_count += 1;
                    null_representations.insert("undefined");
                }
                Some(cell) => {
                    if let Some(repr) = cell.null_representation() {
                        null_representations.insert(repr);
                    }
                    if cell.is_missing_marker() {
                        null_count += 1;
                    } else {
                        non_null.push(cell);
                    }
                }
            }
        }

        // Frequencies of rendered values, in first-seen order
        let rendered: Vec<String> = non_null.iter().map(|v| v.to_string()).collect();
        let mut value_counts: IndexMap<&str, usize> = IndexMap::new();
        for v in &rendered {
            *value_counts.entry(v.as_str()).or_insert(0) += 1;
        }
        let unique_count = value_counts.len();
        let mode = Self::mode(&value_counts);

        // Type-specific parsing
        let numbers: Vec<f64> = if inferred_type == InferredType::Number {
            non_null.iter().filter_map(|v| v.as_f64()).collect()
        } else {
            Vec::new()
        };
        let dates: Vec<NaiveDate> = if inferred_type == InferredType::Date {
            non_null.iter().filter_map(|v| v.as_date()).collect()
        } else {
            Vec::new()
        };

        let numeric = stats::numeric_statistics(&numbers);
        let range = match inferred_type {
            InferredType::Number => numeric.as_ref().map(|s| ValueRange::Numeric {
                min: s.min,
                max: s.max,
            }),
            InferredType::Date => match (dates.iter().min(), dates.iter().max()) {
                (Some(min), Some(max)) => Some(ValueRange::Date { min: *min, max: *max }),
                _ => None,
            },
            _ => match (rendered.iter().min(), rendered.iter().max()) {
                (Some(min), Some(max)) => Some(ValueRange::Text {
                    min: min.clone(),
                    max: max.clone(),
                }),
                _ => None,
            },
        };

        let quality = self.quality_scores(
            inferred_type,
            count,
            &rendered,
            unique_count,
            numbers.len(),
            dates.len(),
        );

        let patterns = if self.include_patterns && inferred_type.is_textual() {
            Self::extract_patterns(&rendered)
        } else {
            Vec::new()
        };

        let distribution = match inferred_type {
            InferredType::Number if !numbers.is_empty() => Some(Distribution::Histogram {
                bins: stats::histogram(&numbers),
            }),
            InferredType::String | InferredType::Categorical | InferredType::Boolean
                if !rendered.is_empty() =>
            {
                Some(Distribution::Frequency {
                    values: Self::frequency_table(&value_counts, count),
                })
            }
            _ => None,
        };

        let is_unique = !rendered.is_empty() && unique_count == rendered.len();
        let uniqueness = UniquenessInfo {
            unique_ratio: quality.uniqueness,
            is_unique,
            is_primary_key_candidate: is_unique && null_count == 0,
        };

        let nullability = NullabilityInfo {
            null_count,
            null_ratio: ratio(null_count, count),
            null_representations: null_representations.into_iter().map(String::from).collect(),
        };

        ColumnProfile {
            name: name.to_string(),
            position,
            inferred_type,
            statistics: ColumnStatistics {
                count,
                null_count,
                unique_count,
                mode,
                range,
                numeric,
            },
            quality,
            patterns,
            distribution,
            uniqueness,
            nullability,
        }
    }

    /// Reservoir sample of non-null values, reproducible across runs.
    fn sample<'a>(&self, non_null: &[&'a CellValue]) -> Vec<&'a CellValue> {
        let Some(size) = self.sample_size else {
            return non_null.to_vec();
        };
        if non_null.len() <= size {
            return non_null.to_vec();
        }

        let mut rng = fastrand::Rng::with_seed(SAMPLE_SEED);
        let mut reservoir: Vec<&CellValue> = non_null[..size].to_vec();
        for (i, value) in non_null.iter().enumerate().skip(size) {
            let j = rng.usize(0..=i);
            if j < size {
                reservoir[j] = value;
            }
        }
        reservoir
    }

    /// Most frequent values; ties keep first-seen order.
    fn mode(value_counts: &IndexMap<&str, usize>) -> Vec<String> {
        let Some(max) = value_counts.values().copied().max() else {
            return Vec::new();
        };
        value_counts
            .iter()
            .filter(|&(_, count)| *count == max)
            .map(|(value, _)| value.to_string())
            .collect()
    }

    fn quality_scores(
        &self,
        inferred_type: InferredType,
        count: usize,
        rendered: &[String],
        unique_count: usize,
        numeric_count: usize,
        date_count: usize,
    ) -> QualityScores {
        let non_null = rendered.len();
        let mut notes = Vec::new();

        let validity = match inferred_type {
            InferredType::Number if non_null > 0 => numeric_count as f64 / non_null as f64,
            InferredType::Date if non_null > 0 => date_count as f64 / non_null as f64,
            _ => 1.0,
        };

        let consistency = if inferred_type.is_textual() && non_null > 0 {
            let score = Self::shape_consistency(rendered);
            if score < CONSISTENCY_NOTE_THRESHOLD {
                notes.push(format!(
                    "Inconsistent value formats: the dominant shape covers {:.0}% of values",
                    score * 100.0
                ));
            }
            score
        } else {
            1.0
        };

        QualityScores {
            completeness: ratio(non_null, count),
            validity,
            consistency,
            uniqueness: ratio(unique_count, non_null),
            notes,
        }
    }

    /// Share of values in the most common shape bucket.
    fn shape_consistency(rendered: &[String]) -> f64 {
        let mut buckets: IndexMap<&str, usize> = IndexMap::new();
        for value in rendered {
            let bucket = SHAPE_BUCKETS
                .iter()
                .find(|(_, re)| re.is_match(value))
                .map(|(name, _)| *name)
                .unwrap_or(MIXED_SHAPE);
            *buckets.entry(bucket).or_insert(0) += 1;
        }
        let dominant = buckets.values().copied().max().unwrap_or(0);
        ratio(dominant, rendered.len())
    }

    /// Replace digits with `9` and letters with `A`.
    pub(crate) fn signature(value: &str) -> String {
        value
            .chars()
            .map(|c| {
                if c.is_ascii_digit() {
                    '9'
                } else if c.is_alphabetic() {
                    'A'
                } else {
                    c
                }
            })
            .collect()
    }

    fn extract_patterns(rendered: &[String]) -> Vec<PatternInfo> {
        let total = rendered.len();
        if total == 0 {
            return Vec::new();
        }

        let mut signatures: IndexMap<String, (usize, Vec<String>)> = IndexMap::new();
        for value in rendered {
            let entry = signatures.entry(Self::signature(value)).or_default();
            entry.0 += 1;
            if entry.1.len() < MAX_PATTERN_EXAMPLES && !entry.1.contains(value) {
                entry.1.push(value.clone());
            }
        }

        let min_count = (total as f64 * 0.05).max(2.0);
        let mut patterns: Vec<PatternInfo> = signatures
            .into_iter()
            .filter(|(_, (count, _))| *count as f64 >= min_count)
            .map(|(pattern, (count, examples))| PatternInfo {
                pattern,
                count,
                percentage: count as f64 / total as f64 * 100.0,
                examples,
            })
            .collect();

        patterns.sort_by(|a, b| b.count.cmp(&a.count));
        patterns.truncate(MAX_PATTERNS);
        patterns
    }

    /// Top values with their share of all rows, nulls included.
    fn frequency_table(value_counts: &IndexMap<&str, usize>, total: usize) -> Vec<FrequencyEntry> {
        let mut entries: Vec<FrequencyEntry> = value_counts
            .iter()
            .map(|(value, count)| FrequencyEntry {
                value: value.to_string(),
                count: *count,
                percentage: *count as f64 / total as f64 * 100.0,
            })
            .collect();
        entries.sort_by(|a, b| b.count.cmp(&a.count));
        entries.truncate(MAX_FREQUENCY_ENTRIES);
        entries
    }
}

impl Default for ColumnProfiler {
    fn default() -> Self {
        Self::new()
    }
}

/// `part / whole`, or 0 when `whole` is 0.
fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[&str]) -> Vec<CellValue> {
        values.iter().map(|v| CellValue::text(*v)).collect()
    }

    fn profile(values: &[CellValue]) -> ColumnProfile {
        let refs: Vec<Option<&CellValue>> = values.iter().map(Some).collect();
        ColumnProfiler::new().profile("col", 0, &refs)
    }

    #[test]
    fn test_numeric_profile() {
        let p = profile(&cells(&["10", "20", "30", "", "40"]));
        assert_eq!(p.inferred_type, InferredType::Number);
        assert_eq!(p.statistics.count, 5);
        assert_eq!(p.statistics.null_count, 1);
        assert_eq!(p.statistics.unique_count, 4);

        let numeric = p.statistics.numeric.as_ref().unwrap();
        assert_eq!(numeric.mean, 25.0);
        assert_eq!(numeric.median, 25.0);
        assert!((p.quality.completeness - 0.8).abs() < 1e-9);
        assert_eq!(p.quality.validity, 1.0);
        assert!(matches!(p.distribution, Some(Distribution::Histogram { .. })));
        assert_eq!(p.nullability.null_representations, vec![""]);
    }

    #[test]
    fn test_categorical_profile() {
        let values = cells(&["red", "blue", "red", "green", "red", "blue", "red", "blue"]);
        let p = profile(&values);
        assert_eq!(p.inferred_type, InferredType::Categorical);
        assert_eq!(p.statistics.mode, vec!["red"]);

        let Some(Distribution::Frequency { values }) = &p.distribution else {
            panic!("expected frequency distribution");
        };
        assert_eq!(values[0].value, "red");
        assert_eq!(values[0].count, 4);
        assert!((values[0].percentage - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_mode_ties_keep_first_seen() {
        let p = profile(&cells(&["b", "a", "a", "b", "c"]));
        assert_eq!(p.statistics.mode, vec!["b", "a"]);
    }

    #[test]
    fn test_primary_key_candidate() {
        let p = profile(&cells(&["A-001", "A-002", "A-003", "A-004"]));
        assert!(p.uniqueness.is_unique);
        assert!(p.uniqueness.is_primary_key_candidate);

        let with_null = profile(&cells(&["A-001", "A-002", ""]));
        assert!(with_null.uniqueness.is_unique);
        assert!(!with_null.uniqueness.is_primary_key_candidate);
    }

    #[test]
    fn test_pattern_signatures() {
        let values = cells(&["AB-12", "CD-34", "EF-56", "xyz", "GH-78"]);
        let p = profile(&values);
        assert_eq!(p.patterns.len(), 1);
        assert_eq!(p.patterns[0].pattern, "AA-99");
        assert_eq!(p.patterns[0].count, 4);
        assert_eq!(p.patterns[0].examples.len(), 3);
    }

    #[test]
    fn test_patterns_can_be_disabled() {
        let values = cells(&["AB-12", "CD-34", "EF-56"]);
        let refs: Vec<Option<&CellValue>> = values.iter().map(Some).collect();
        let p = ColumnProfiler::new().with_patterns(false).profile("col", 0, &refs);
        assert!(p.patterns.is_empty());
    }

    #[test]
    fn test_consistency_note() {
        let values = cells(&["alice", "BOB", "carol 2", "dave@x.io", "555-1234"]);
        let p = profile(&values);
        assert_eq!(p.inferred_type, InferredType::String);
        assert!(p.quality.consistency < 0.8);
        assert_eq!(p.quality.notes.len(), 1);
    }

    #[test]
    fn test_null_representations() {
        let values = vec![
            Some(CellValue::Null),
            Some(CellValue::text("NULL")),
            Some(CellValue::text("N/A")),
            Some(CellValue::text("x")),
        ];
        let refs: Vec<Option<&CellValue>> = values.iter().map(Option::as_ref).chain([None]).collect();
        let p = ColumnProfiler::new().profile("col", 0, &refs);
        assert_eq!(p.statistics.count, 5);
        assert_eq!(p.statistics.null_count, 4);
        assert_eq!(p.statistics.unique_count, 1);
        assert!((p.nullability.null_ratio - 0.8).abs() < 1e-9);
        assert!((p.quality.completeness - 0.2).abs() < 1e-9);
        assert_eq!(
            p.nullability.null_representations,
            vec!["null", "NULL", "N/A", "undefined"]
        );
    }

    #[test]
    fn test_null_markers_do_not_drive_type() {
        let p = profile(&cells(&["12", "N/A", "7", "null", "30"]));
        assert_eq!(p.inferred_type, InferredType::Number);
        assert_eq!(p.statistics.null_count, 2);
        assert_eq!(p.quality.validity, 1.0);
        assert_eq!(p.statistics.numeric.as_ref().map(|n| n.max), Some(30.0));
    }

    #[test]
    fn test_frequency_percentages_use_all_rows() {
        let p = profile(&cells(&["a", "a", "", "b"]));
        let Some(Distribution::Frequency { values }) = &p.distribution else {
            panic!("expected frequency distribution");
        };
        assert_eq!(values[0].value, "a");
        assert_eq!(values[0].count, 2);
        assert!((values[0].percentage - 50.0).abs() < 1e-9);
        assert!((values[1].percentage - 25.0).abs() < 1e-9);

        let total: f64 = values.iter().map(|v| v.percentage).sum();
        assert!((total - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_date_range() {
        let p = profile(&cells(&["2024-03-01", "2023-12-25", "2024-01-15"]));
        assert_eq!(p.inferred_type, InferredType::Date);
        assert_eq!(
            p.statistics.range,
            Some(ValueRange::Date {
                min: NaiveDate::from_ymd_opt(2023, 12, 25).unwrap(),
                max: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            })
        );
        assert!(p.distribution.is_none());
    }

    #[test]
    fn test_empty_column() {
        let p = ColumnProfiler::new().profile("col", 0, &[]);
        assert_eq!(p.inferred_type, InferredType::String);
        assert_eq!(p.statistics.count, 0);
        assert_eq!(p.quality.completeness, 0.0);
        assert_eq!(p.quality.uniqueness, 0.0);
        assert!(p.statistics.mode.is_empty());
    }

    #[test]
    fn test_sampling_is_reproducible() {
        let values: Vec<CellValue> = (0..500).map(|i| CellValue::text(i.to_string())).collect();
        let refs: Vec<Option<&CellValue>> = values.iter().map(Some).collect();
        let profiler = ColumnProfiler::new().with_sample_size(Some(50));
        assert_eq!(profiler.profile("n", 0, &refs), profiler.profile("n", 0, &refs));
    }
}
