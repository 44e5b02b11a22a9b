//! Column type detection by per-value majority vote.

use std::collections::HashMap;

use indexmap::IndexSet;

use crate::input::CellValue;
use crate::input::value::{parse_date, parse_number};
use crate::profile::InferredType;

/// Share of the sample one micro-type must cover to name the column.
const MAJORITY_THRESHOLD: f64 = 0.8;
/// Maximum distinct/sample ratio for a categorical column.
const CATEGORICAL_RATIO: f64 = 0.5;
/// Maximum distinct values for a categorical column.
const CATEGORICAL_MAX_DISTINCT: usize = 20;
/// Date text must be longer than this, so bare small integers are never dates.
const MIN_DATE_TEXT_LEN: usize = 6;

/// Type of a single value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum MicroType {
    Boolean,
    Number,
    Date,
    String,
    Nested,
}

/// Infers a column type from a sample of values.
#[derive(Debug, Clone, Default)]
pub struct TypeDetector;

impl TypeDetector {
    pub fn new() -> Self {
        Self
    }

    /// Detect the type of a column sample. Never fails; an empty sample is `String`.
    pub fn detect(&self, sample: &[&CellValue]) -> InferredType {
        let mut counts: HashMap<MicroType, usize> = HashMap::new();
        let mut total = 0usize;

        for value in sample {
            if value.is_empty() {
                continue;
            }
            *counts.entry(Self::classify(value)).or_insert(0) += 1;
            total += 1;
        }

        if total == 0 {
            return InferredType::String;
        }

        let majority = counts
            .iter()
            .find(|&(_, count)| *count as f64 / total as f64 >= MAJORITY_THRESHOLD)
            .map(|(micro, _)| *micro);

        match majority {
            Some(MicroType::Boolean) => InferredType::Boolean,
            Some(MicroType::Number) => InferredType::Number,
            Some(MicroType::Date) => InferredType::Date,
            Some(MicroType::String) => InferredType::String,
            Some(MicroType::Nested) | None => InferredType::Mixed,
        }
    }

    /// Whether a text column has few enough distinct values to be categorical.
    pub fn is_categorical(&self, sample: &[&CellValue]) -> bool {
        let rendered: Vec<String> = sample
            .iter()
            .filter(|v| !v.is_empty())
            .map(|v| v.to_string())
            .collect();
        if rendered.is_empty() {
            return false;
        }

        let distinct: IndexSet<&str> = rendered.iter().map(String::as_str).collect();
        let ratio = distinct.len() as f64 / rendered.len() as f64;
        ratio <= CATEGORICAL_RATIO && distinct.len() <= CATEGORICAL_MAX_DISTINCT
    }

    /// Classify a single non-empty value.
    fn classify(value: &CellValue) -> MicroType {
        match value {
            CellValue::Bool(_) => MicroType::Boolean,
            CellValue::Number(n) if n.is_finite() => MicroType::Number,
            CellValue::Number(_) => MicroType::String,
            CellValue::Date(_) => MicroType::Date,
            CellValue::Other(_) => MicroType::Nested,
            CellValue::Null => MicroType::String,
            CellValue::Text(text) => Self::classify_text(text),
        }
    }

    fn classify_text(text: &str) -> MicroType {
        let trimmed = text.trim();

        if matches!(
            trimmed.to_lowercase().as_str(),
            "true" | "false" | "yes" | "no" | "1" | "0"
        ) {
            return MicroType::Boolean;
        }

        if parse_number(trimmed).is_some() {
            return MicroType::Number;
        }

        if trimmed.chars().count() > MIN_DATE_TEXT_LEN && parse_date(trimmed).is_some() {
            return MicroType::Date;
        }

        MicroType::String
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(values: &[&str]) -> Vec<CellValue> {
        values.iter().map(|v| CellValue::text(*v)).collect()
    }

    fn detect(values: &[CellValue]) -> InferredType {
        let refs: Vec<&CellValue> = values.iter().collect();
        TypeDetector::new().detect(&refs)
    }

    #[test]
    fn test_detect_numbers() {
        assert_eq!(detect(&texts(&["1.5", "2", "3.25", "-4", "100"])), InferredType::Number);
    }

    #[test]
    fn test_boolean_tokens_win_over_numbers() {
        assert_eq!(detect(&texts(&["1", "0", "1", "1", "0"])), InferredType::Boolean);
        assert_eq!(detect(&texts(&["Yes", "no", "TRUE"])), InferredType::Boolean);
    }

    #[test]
    fn test_detect_dates() {
        assert_eq!(
            detect(&texts(&["2024-01-01", "2024-02-15", "03/10/2024"])),
            InferredType::Date
        );
    }

    #[test]
    fn test_short_strings_are_not_dates() {
        assert_eq!(detect(&texts(&["1/2/24", "3/4/24"])), InferredType::String);
    }

    #[test]
    fn test_mixed_below_majority() {
        assert_eq!(
            detect(&texts(&["1", "2", "abc", "def", "2024-01-01"])),
            InferredType::Mixed
        );
    }

    #[test]
    fn test_eighty_percent_majority() {
        assert_eq!(detect(&texts(&["5", "6", "7", "8", "x"])), InferredType::Number);
    }

    #[test]
    fn test_empty_sample_is_string() {
        assert_eq!(detect(&[]), InferredType::String);
        assert_eq!(detect(&[CellValue::Null, CellValue::text("")]), InferredType::String);
    }

    #[test]
    fn test_nested_values_are_mixed() {
        let values = vec![CellValue::Other("[1]".into()), CellValue::Other("{}".into())];
        assert_eq!(detect(&values), InferredType::Mixed);
    }

    #[test]
    fn test_categorical_threshold() {
        let detector = TypeDetector::new();
        let low = texts(&["a", "b", "a", "b", "a", "b"]);
        let refs: Vec<&CellValue> = low.iter().collect();
        assert!(detector.is_categorical(&refs));

        let high = texts(&["a", "b", "c", "d"]);
        let refs: Vec<&CellValue> = high.iter().collect();
        assert!(!detector.is_categorical(&refs));
    }
}
