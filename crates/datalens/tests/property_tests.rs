//! Property-based tests for Datalens.
//!
//! These tests use proptest to generate arbitrary tables and verify that
//! profiling and quality analysis hold their invariants on any input.
//!
//! # Running
//!
//! ```bash
//! cargo test -p datalens --test property_tests
//! ```
//!
//! Increase the case count for a deeper run:
//!
//! ```bash
//! PROPTEST_CASES=2000 cargo test -p datalens --test property_tests
//! ```

use datalens::cleaning::SelectedFix;
use datalens::quality::overall_score;
use datalens::{CellValue, Datalens, Dataset, FixMethod, IssueType, Row};
use proptest::prelude::*;

const HEADERS: [&str; 3] = ["a", "b", "c"];

// =============================================================================
// Strategies
// =============================================================================

fn cell_strategy() -> impl Strategy<Value = CellValue> {
    prop_oneof![
        Just(CellValue::Null),
        any::<bool>().prop_map(CellValue::Bool),
        (-1.0e6f64..1.0e6).prop_map(CellValue::Number),
        prop_oneof![Just(f64::NAN), Just(f64::INFINITY), Just(f64::NEG_INFINITY)]
            .prop_map(CellValue::Number),
        "[a-zA-Z0-9 ,$./@-]{0,12}".prop_map(CellValue::Text),
        Just(CellValue::text("N/A")),
        Just(CellValue::text("2024-03-15")),
        Just(CellValue::text("03/15/2024")),
        Just(CellValue::Other("[1,2]".to_string())),
    ]
}

/// A row where each header is present with probability 0.9.
fn row_strategy() -> impl Strategy<Value = Row> {
    prop::collection::vec(prop::option::weighted(0.9, cell_strategy()), HEADERS.len()).prop_map(
        |cells| {
            HEADERS
                .iter()
                .zip(cells)
                .filter_map(|(h, c)| c.map(|v| (h.to_string(), v)))
                .collect()
        },
    )
}

fn dataset_strategy() -> impl Strategy<Value = Dataset> {
    prop::collection::vec(row_strategy(), 0..40).prop_map(|rows| {
        Dataset::new(HEADERS.iter().map(|h| h.to_string()).collect(), rows)
    })
}

/// Numeric-leaning tables that exercise correlations and charts.
fn numeric_dataset_strategy() -> impl Strategy<Value = Dataset> {
    prop::collection::vec((0i64..100, -50.0f64..50.0, prop::bool::ANY), 2..60).prop_map(|rows| {
        let rows = rows
            .into_iter()
            .map(|(x, y, flag)| {
                let mut row = Row::new();
                row.insert("x".to_string(), CellValue::from(x));
                row.insert("y".to_string(), CellValue::from(y));
                row.insert(
                    "group".to_string(),
                    CellValue::text(if flag { "left" } else { "right" }),
                );
                row
            })
            .collect();
        Dataset::from_rows(rows)
    })
}

fn duplicate_count(dataset: &Dataset) -> usize {
    Datalens::new()
        .analyze_quality(dataset)
        .map(|report| {
            report
                .issues
                .iter()
                .find(|i| i.issue_type == IssueType::Duplicates)
                .map_or(0, |i| i.affected_rows)
        })
        .unwrap_or(0)
}

fn missing_in(dataset: &Dataset, column: &str) -> usize {
    dataset
        .column(column)
        .into_iter()
        .filter(|c| c.is_none_or(|v| v.is_missing_marker()))
        .count()
}

// =============================================================================
// Profiling Properties
// =============================================================================

proptest! {
    /// Profiling never panics and covers every header.
    #[test]
    fn profile_never_panics(dataset in dataset_strategy()) {
        let profile = Datalens::new().profile(&dataset).expect("profiling failed");
        prop_assert_eq!(profile.columns.len(), HEADERS.len());
        prop_assert_eq!(profile.summary.row_count, dataset.row_count());
    }

    /// Each column counts every row exactly once.
    #[test]
    fn column_counts_cover_all_cells(dataset in dataset_strategy()) {
        let profile = Datalens::new().profile(&dataset).expect("profiling failed");
        let total: usize = profile.columns.iter().map(|c| c.statistics.count).sum();
        prop_assert_eq!(total, dataset.column_count() * dataset.row_count());

        for column in &profile.columns {
            prop_assert!(column.statistics.null_count <= column.statistics.count);
            prop_assert!(column.statistics.unique_count <= column.non_null_count());
        }
    }

    /// Every score lives in [0, 1].
    #[test]
    fn scores_are_bounded(dataset in dataset_strategy()) {
        let profile = Datalens::new().profile(&dataset).expect("profiling failed");

        for column in &profile.columns {
            let q = &column.quality;
            for score in [q.completeness, q.validity, q.consistency, q.uniqueness] {
                prop_assert!((0.0..=1.0).contains(&score), "{} out of range", score);
            }
            prop_assert!((0.0..=1.0).contains(&column.uniqueness.unique_ratio));
            prop_assert!((0.0..=1.0).contains(&column.nullability.null_ratio));
        }

        prop_assert!((0.0..=1.0).contains(&profile.quality.overall_score));
        prop_assert!((0.0..=1.0).contains(&profile.summary.completeness));
        for chart in &profile.recommendations {
            prop_assert!((0.0..=1.0).contains(&chart.confidence));
        }
    }

    /// Repeated profiling of one snapshot agrees on everything but the timestamp.
    #[test]
    fn profiling_is_idempotent(dataset in dataset_strategy()) {
        let lens = Datalens::new();
        let first = lens.profile(&dataset).expect("profiling failed");
        let second = lens.profile(&dataset).expect("profiling failed");

        prop_assert_eq!(&first.columns, &second.columns);
        prop_assert_eq!(&first.quality, &second.quality);
        prop_assert_eq!(&first.patterns, &second.patterns);
        prop_assert_eq!(first.dataset_hash, second.dataset_hash);
    }

    /// Correlations are bounded and charts are ranked with unique ids.
    #[test]
    fn relationships_and_charts_are_well_formed(dataset in numeric_dataset_strategy()) {
        let profile = Datalens::new().profile(&dataset).expect("profiling failed");

        for rel in &profile.relationships {
            prop_assert!(rel.strength > 0.5 && rel.strength <= 1.0 + 1e-9);
            prop_assert!((rel.coefficient.abs() - rel.strength).abs() < 1e-12);
            prop_assert!(rel.column1 != rel.column2);
        }

        let charts = &profile.recommendations;
        prop_assert!(charts.len() <= 6);
        for window in charts.windows(2) {
            prop_assert!(window[0].confidence >= window[1].confidence);
        }
        for (i, chart) in charts.iter().enumerate() {
            let expected = format!("rec_{}_{}", i, chart.chart_type.as_str());
            prop_assert_eq!(&chart.id, &expected);
        }
    }
}

// =============================================================================
// Quality Properties
// =============================================================================

proptest! {
    /// The overall score is always clamped to [0, 1].
    #[test]
    fn overall_score_bounds(dataset in dataset_strategy()) {
        let report = Datalens::new().analyze_quality(&dataset).expect("analysis failed");
        prop_assert!((0.0..=1.0).contains(&report.overall_score));
        prop_assert_eq!(report.overall_score, overall_score(&report.issues, dataset.row_count()));
        prop_assert_eq!(report.issue_counts.total(), report.issues.len());

        for issue in &report.issues {
            prop_assert!(issue.affected_percentage >= 0.0 && issue.affected_percentage <= 100.0);
            prop_assert!(issue.examples.len() <= 5);
            if issue.auto_fixable {
                prop_assert!(issue.suggested_fix.confidence >= 0.8);
            }
        }
    }

    /// Appending a copy of an existing row never lowers the duplicate count.
    #[test]
    fn duplicates_are_monotone(dataset in dataset_strategy(), pick in any::<prop::sample::Index>()) {
        prop_assume!(!dataset.rows.is_empty());
        let before = duplicate_count(&dataset);

        let mut grown = dataset.clone();
        let copy = grown.rows[pick.index(grown.rows.len())].clone();
        grown.rows.push(copy);
        let after = duplicate_count(&grown);

        prop_assert!(after > before, "{} -> {}", before, after);
    }

    /// Filling a column never increases its missing cells.
    #[test]
    fn cleaning_never_adds_missing(dataset in dataset_strategy(), use_mean in any::<bool>()) {
        let method = if use_mean { FixMethod::FillWithMean } else { FixMethod::FillWithMedian };
        let fix = SelectedFix::new(method).with_column("a");
        let result = Datalens::new().apply_cleaning_fixes(&dataset, &[fix]);

        prop_assert!(missing_in(&result.cleaned_data, "a") <= missing_in(&dataset, "a"));
        prop_assert_eq!(result.cleaned_data.row_count(), dataset.row_count());
        prop_assert!(result.quality_after >= result.quality_before);
    }

    /// Removing duplicates leaves nothing for the duplicate scan to find.
    #[test]
    fn dedup_clears_duplicates(dataset in dataset_strategy()) {
        let result = Datalens::new()
            .apply_cleaning_fixes(&dataset, &[SelectedFix::new(FixMethod::RemoveDuplicates)]);
        prop_assert_eq!(duplicate_count(&result.cleaned_data), 0);
        prop_assert_eq!(
            result.cleaned_data.row_count() + result.total_rows_affected,
            dataset.row_count()
        );
    }
}
