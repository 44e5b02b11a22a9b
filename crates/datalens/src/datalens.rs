//! Main Datalens struct and public API.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::charts::{ChartConfig, ChartRecommendation, ChartRecommendationEngine};
use crate::cleaning::{CleaningEngine, CleaningRecommendationEngine, CleaningResult, SelectedFix};
use crate::error::{DatalensError, Result};
use crate::inference::{
    hypothesis, stats, ColumnProfiler, HypothesisTestResult, RelationshipAnalysis,
    RelationshipAnalyzer,
};
use crate::input::Dataset;
use crate::profile::{ColumnProfile, DatasetProfile, DatasetSummary, InferredType};
use crate::quality::{QualityIssueDetector, QualityReport};

/// Configuration for dataset profiling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Values sampled for type detection (None = all).
    pub sample_size: Option<usize>,
    /// Compute correlations and column patterns.
    pub include_relationships: bool,
    /// Extract value signatures for text columns.
    pub include_patterns: bool,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            sample_size: None,
            include_relationships: true,
            include_patterns: true,
        }
    }
}

impl ProfileConfig {
    pub fn validate(&self) -> Result<()> {
        if self.sample_size == Some(0) {
            return Err(DatalensError::Config("sample_size must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Configuration for Datalens analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatalensConfig {
    pub profile: ProfileConfig,
    pub charts: ChartConfig,
}

impl DatalensConfig {
    pub fn validate(&self) -> Result<()> {
        self.profile.validate()?;
        self.charts.validate()
    }
}

/// A value outside the IQR fences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    /// Row index (0-based).
    pub row: usize,
    pub value: f64,
}

/// IQR-based anomaly report for one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyReport {
    pub column: String,
    pub multiplier: f64,
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub anomalies: Vec<Anomaly>,
    /// Share of numeric values flagged, as a percentage.
    pub anomaly_percentage: f64,
}

/// The main Datalens analysis engine.
pub struct Datalens {
    config: DatalensConfig,
    relationships: RelationshipAnalyzer,
    detector: QualityIssueDetector,
    recommendations: CleaningRecommendationEngine,
    cleaner: CleaningEngine,
}

impl Datalens {
    /// Create a new Datalens instance with default configuration.
    pub fn new() -> Self {
        Self {
            config: DatalensConfig::default(),
            relationships: RelationshipAnalyzer::new(),
            detector: QualityIssueDetector::new(),
            recommendations: CleaningRecommendationEngine::new(),
            cleaner: CleaningEngine::new(),
        }
    }

    /// Create a Datalens instance with a validated configuration.
    pub fn with_config(config: DatalensConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new()
        })
    }

    /// Set profiling options. Validated when an analysis runs.
    pub fn with_profile_config(mut self, profile: ProfileConfig) -> Self {
        self.config.profile = profile;
        self
    }

    /// Set chart options. Validated when an analysis runs.
    pub fn with_chart_config(mut self, charts: ChartConfig) -> Self {
        self.config.charts = charts;
        self
    }

    /// Replace the quality scans.
    pub fn with_detector(mut self, detector: QualityIssueDetector) -> Self {
        self.detector = detector;
        self
    }

    pub fn config(&self) -> &DatalensConfig {
        &self.config
    }

    /// Run one full profiling pass: columns, relationships, quality and charts.
    pub fn profile(&self, dataset: &Dataset) -> Result<DatasetProfile> {
        self.run_profile(dataset, None)
    }

    /// Like [`Datalens::profile`], checking `cancel` before each column and stage.
    ///
    /// A cancelled pass returns [`DatalensError::Cancelled`], never a partial profile.
    pub fn profile_with_cancellation(
        &self,
        dataset: &Dataset,
        cancel: &AtomicBool,
    ) -> Result<DatasetProfile> {
        self.run_profile(dataset, Some(cancel))
    }

    /// Profile a single column by name.
    pub fn profile_column(&self, dataset: &Dataset, column: &str) -> Result<ColumnProfile> {
        self.config.validate()?;
        let position = dataset
            .headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| DatalensError::ColumnNotFound(column.to_string()))?;
        let values = dataset.column(column);
        Ok(self.profiler().profile(column, position, &values))
    }

    /// Detect quality issues and bundle them into cleaning recommendations.
    pub fn analyze_quality(&self, dataset: &Dataset) -> Result<QualityReport> {
        self.config.validate()?;
        let columns = self.profile_columns(dataset, None)?;
        Ok(self.quality_report(dataset, &columns))
    }

    /// Ranked chart recommendations for a dataset.
    pub fn recommend_charts(&self, dataset: &Dataset) -> Result<Vec<ChartRecommendation>> {
        self.config.validate()?;
        let columns = self.profile_columns(dataset, None)?;
        let relationships = self.relationships.correlations(dataset, &columns);
        Ok(self.chart_engine().recommend(&columns, &relationships))
    }

    /// Apply approved fixes to a copy of the dataset.
    ///
    /// Methods other than fill-with-median, fill-with-mean, remove-duplicates
    /// and remove-rows are skipped and reported in the result.
    pub fn apply_cleaning_fixes(&self, dataset: &Dataset, fixes: &[SelectedFix]) -> CleaningResult {
        self.cleaner.apply(dataset, fixes)
    }

    /// Flag values outside `[q1 - k·iqr, q3 + k·iqr]` in a numeric column.
    ///
    /// Quartiles interpolate linearly between ranks, unlike the index-based
    /// quartiles in the column profile.
    pub fn detect_anomalies(
        &self,
        dataset: &Dataset,
        column: &str,
        multiplier: f64,
    ) -> Result<AnomalyReport> {
        if !multiplier.is_finite() || multiplier <= 0.0 {
            return Err(DatalensError::Config(format!(
                "IQR multiplier must be positive, got {}",
                multiplier
            )));
        }

        let profile = self.profile_column(dataset, column)?;
        if profile.inferred_type != InferredType::Number {
            return Err(DatalensError::NotNumeric(column.to_string()));
        }

        let values: Vec<(usize, f64)> = dataset
            .column(column)
            .into_iter()
            .enumerate()
            .filter_map(|(row, cell)| cell.and_then(|c| c.as_f64()).map(|v| (row, v)))
            .collect();

        let mut sorted: Vec<f64> = values.iter().map(|(_, v)| *v).collect();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let (Some(q1), Some(q3)) = (
            stats::quantile_linear(&sorted, 0.25),
            stats::quantile_linear(&sorted, 0.75),
        ) else {
            return Err(DatalensError::NotNumeric(column.to_string()));
        };

        let iqr = q3 - q1;
        let lower_bound = q1 - multiplier * iqr;
        let upper_bound = q3 + multiplier * iqr;
        let anomalies: Vec<Anomaly> = values
            .iter()
            .filter(|(_, v)| *v < lower_bound || *v > upper_bound)
            .map(|&(row, value)| Anomaly { row, value })
            .collect();

        Ok(AnomalyReport {
            column: column.to_string(),
            multiplier,
            q1,
            q3,
            iqr,
            lower_bound,
            upper_bound,
            anomaly_percentage: anomalies.len() as f64 / values.len() as f64 * 100.0,
            anomalies,
        })
    }

    /// One-sample t-test of a numeric column's mean against `test_value`.
    pub fn one_sample_ttest(
        &self,
        dataset: &Dataset,
        column: &str,
        test_value: f64,
        alpha: f64,
    ) -> Result<HypothesisTestResult> {
        let values: Vec<f64> = self.numeric_cells(dataset, column)?.into_iter().flatten().collect();
        hypothesis::one_sample_ttest(&values, test_value, alpha)
    }

    /// Equal-variance t-test between the two groups of `group_column`.
    pub fn independent_ttest(
        &self,
        dataset: &Dataset,
        value_column: &str,
        group_column: &str,
        alpha: f64,
    ) -> Result<HypothesisTestResult> {
        let groups = self.grouped_values(dataset, value_column, group_column)?;
        let [(name1, first), (name2, second)] = groups.as_slice() else {
            return Err(DatalensError::Config(format!(
                "independent t-test needs exactly 2 groups in '{}', found {}",
                group_column,
                groups.len()
            )));
        };
        hypothesis::independent_ttest(
            (name1.as_str(), first.as_slice()),
            (name2.as_str(), second.as_slice()),
            alpha,
        )
    }

    /// Paired t-test over rows where both columns hold a number.
    pub fn paired_ttest(
        &self,
        dataset: &Dataset,
        first: &str,
        second: &str,
        alpha: f64,
    ) -> Result<HypothesisTestResult> {
        let a = self.numeric_cells(dataset, first)?;
        let b = self.numeric_cells(dataset, second)?;
        let pairs: Vec<(f64, f64)> = a
            .into_iter()
            .zip(b)
            .filter_map(|pair| match pair {
                (Some(x), Some(y)) => Some((x, y)),
                _ => None,
            })
            .collect();
        hypothesis::paired_ttest((first, second), &pairs, alpha)
    }

    /// One-way ANOVA of `value_column` across the groups of `group_column`.
    pub fn one_way_anova(
        &self,
        dataset: &Dataset,
        value_column: &str,
        group_column: &str,
        alpha: f64,
    ) -> Result<HypothesisTestResult> {
        let groups = self.grouped_values(dataset, value_column, group_column)?;
        hypothesis::one_way_anova(&groups, alpha)
    }

    /// Per-row numbers of a column that profiles as numeric.
    fn numeric_cells(&self, dataset: &Dataset, column: &str) -> Result<Vec<Option<f64>>> {
        let profile = self.profile_column(dataset, column)?;
        if profile.inferred_type != InferredType::Number {
            return Err(DatalensError::NotNumeric(column.to_string()));
        }
        Ok(dataset
            .column(column)
            .into_iter()
            .map(|cell| cell.and_then(|c| c.as_f64()))
            .collect())
    }

    /// Numbers of `value_column` split by the non-missing labels of
    /// `group_column`, groups in first-seen order.
    fn grouped_values(
        &self,
        dataset: &Dataset,
        value_column: &str,
        group_column: &str,
    ) -> Result<Vec<(String, Vec<f64>)>> {
        if !dataset.has_column(group_column) {
            return Err(DatalensError::ColumnNotFound(group_column.to_string()));
        }
        let values = self.numeric_cells(dataset, value_column)?;

        let mut groups: IndexMap<String, Vec<f64>> = IndexMap::new();
        for (label, value) in dataset.column(group_column).into_iter().zip(values) {
            let Some(label) = label.filter(|c| !c.is_missing_marker()) else {
                continue;
            };
            let group = groups.entry(label.to_string()).or_default();
            if let Some(v) = value {
                group.push(v);
            }
        }
        debug!(
            column = group_column,
            groups = groups.len(),
            "grouped values for hypothesis test"
        );
        Ok(groups.into_iter().collect())
    }

    fn run_profile(&self, dataset: &Dataset, cancel: Option<&AtomicBool>) -> Result<DatasetProfile> {
        self.config.validate()?;
        debug!(
            rows = dataset.row_count(),
            columns = dataset.column_count(),
            "profiling started"
        );

        let columns = self.profile_columns(dataset, cancel)?;

        check_cancelled(cancel, "relationships")?;
        let analysis = if self.config.profile.include_relationships {
            self.relationships.analyze(dataset, &columns)
        } else {
            RelationshipAnalysis::default()
        };

        check_cancelled(cancel, "quality")?;
        let quality = self.quality_report(dataset, &columns);

        check_cancelled(cancel, "charts")?;
        let recommendations = self.chart_engine().recommend(&columns, &analysis.relationships);

        let summary = DatasetSummary::from_columns(&columns, dataset.row_count());
        debug!(
            issues = quality.issues.len(),
            relationships = analysis.relationships.len(),
            recommendations = recommendations.len(),
            "profiling finished"
        );

        Ok(DatasetProfile {
            columns,
            summary,
            quality,
            relationships: analysis.relationships,
            patterns: analysis.patterns,
            recommendations,
            dataset_hash: dataset.fingerprint(),
            generated_at: Utc::now(),
        })
    }

    fn profile_columns(
        &self,
        dataset: &Dataset,
        cancel: Option<&AtomicBool>,
    ) -> Result<Vec<ColumnProfile>> {
        let profiler = self.profiler();
        let mut columns = Vec::with_capacity(dataset.column_count());
        for (position, name) in dataset.headers.iter().enumerate() {
            check_cancelled(cancel, name)?;
            let values = dataset.column(name);
            columns.push(profiler.profile(name, position, &values));
        }
        Ok(columns)
    }

    fn quality_report(&self, dataset: &Dataset, columns: &[ColumnProfile]) -> QualityReport {
        let issues = self.detector.detect(dataset, columns);
        let recommendations = self.recommendations.recommend(&issues);
        QualityReport::new(issues, recommendations, dataset.row_count())
    }

    fn profiler(&self) -> ColumnProfiler {
        ColumnProfiler::new()
            .with_sample_size(self.config.profile.sample_size)
            .with_patterns(self.config.profile.include_patterns)
    }

    fn chart_engine(&self) -> ChartRecommendationEngine {
        // Config was validated by the caller
        ChartRecommendationEngine::with_config(self.config.charts.clone()).unwrap_or_default()
    }
}

impl Default for Datalens {
    fn default() -> Self {
        Self::new()
    }
}

fn check_cancelled(cancel: Option<&AtomicBool>, stage: &str) -> Result<()> {
    match cancel {
        Some(flag) if flag.load(Ordering::Relaxed) => Err(DatalensError::Cancelled {
            stage: stage.to_string(),
        }),
        _ => Ok(()),
    }
}
