//! Ranked chart recommendations from column types, correlations and cardinality.

use serde::{Deserialize, Serialize};

use crate::error::{DatalensError, Result};
use crate::inference::RelationshipAnalyzer;
use crate::profile::{ColumnProfile, ColumnRelationship, InferredType};

use super::recommendation::{ChartComplexity, ChartRecommendation, ChartType};

/// Correlations turned into scatter candidates.
const MAX_SCATTER: usize = 3;
/// Categorical and numeric columns crossed into bar candidates.
const MAX_BAR_AXES: usize = 2;
/// Numeric columns turned into histogram candidates.
const MAX_HISTOGRAMS: usize = 3;
/// Category count above which bar confidence starts to drop.
const BAR_CATEGORY_LIMIT: usize = 10;
/// Distinct value range for pie candidates.
const PIE_MIN_SLICES: usize = 2;
const PIE_MAX_SLICES: usize = 8;

/// Configuration for chart recommendations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Maximum recommendations returned (at least 1).
    pub max_recommendations: usize,
    /// Candidates below this confidence are dropped.
    pub min_confidence: f64,
    /// Whether heatmap and boxplot candidates are generated.
    pub include_advanced: bool,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            max_recommendations: 6,
            min_confidence: 0.3,
            include_advanced: true,
        }
    }
}

impl ChartConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_recommendations == 0 {
            return Err(DatalensError::Config(
                "max_recommendations must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(DatalensError::Config(format!(
                "min_confidence must be within [0, 1], got {}",
                self.min_confidence
            )));
        }
        Ok(())
    }
}

/// Proposes charts for a profiled dataset.
#[derive(Debug, Clone, Default)]
pub struct ChartRecommendationEngine {
    config: ChartConfig,
}

impl ChartRecommendationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with a validated configuration.
    pub fn with_config(config: ChartConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// Generate, filter, rank and truncate candidates, then assign ids.
    pub fn recommend(
        &self,
        columns: &[ColumnProfile],
        relationships: &[ColumnRelationship],
    ) -> Vec<ChartRecommendation> {
        let axes = Axes::from_columns(columns);

        let mut candidates = Vec::new();
        candidates.extend(self.scatter(&axes, relationships));
        candidates.extend(self.bar(&axes));
        candidates.extend(self.line(&axes));
        candidates.extend(self.histogram(&axes));
        candidates.extend(self.pie(&axes));
        if self.config.include_advanced {
            candidates.extend(self.advanced(&axes));
        }

        candidates.retain(|c| c.confidence >= self.config.min_confidence);
        candidates.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        candidates.truncate(self.config.max_recommendations);

        for (index, candidate) in candidates.iter_mut().enumerate() {
            candidate.id = format!("rec_{}_{}", index, candidate.chart_type.as_str());
        }
        candidates
    }

    fn scatter(&self, axes: &Axes, relationships: &[ColumnRelationship]) -> Vec<ChartRecommendation> {
        RelationshipAnalyzer::strongest(relationships, MAX_SCATTER)
            .into_iter()
            .map(|rel| {
                let mut chart = ChartRecommendation::new(
                    ChartType::Scatter,
                    format!("{} vs {}", rel.column2, rel.column1),
                    (0.6 + rel.strength * 0.3).min(0.9),
                )
                .with_description(format!(
                    "Relationship between {} and {}",
                    rel.column1, rel.column2
                ))
                .with_reasoning(format!(
                    "{} and {} have a {} correlation of {:.2}",
                    rel.column1,
                    rel.column2,
                    rel.direction.as_str(),
                    rel.coefficient
                ))
                .with_column("x", &rel.column1)
                .with_column("y", &rel.column2)
                .with_insight(rel.description.clone())
                .with_complexity(ChartComplexity::Intermediate)
                .with_tags(&["correlation", "relationship"]);
                if let Some(color) = axes.categorical.first() {
                    chart = chart.with_column("color", &color.name);
                }
                chart
            })
            .collect()
    }

    fn bar(&self, axes: &Axes) -> Vec<ChartRecommendation> {
        let mut charts = Vec::new();
        for category in axes.categorical.iter().take(MAX_BAR_AXES) {
            let k = category.statistics.unique_count;
            let confidence = if k <= BAR_CATEGORY_LIMIT {
                0.8
            } else {
                (0.8 - 0.05 * (k - BAR_CATEGORY_LIMIT) as f64).max(0.4)
            };

            for measure in axes.numeric.iter().take(MAX_BAR_AXES) {
                charts.push(
                    ChartRecommendation::new(
                        ChartType::Bar,
                        format!("{} by {}", measure.name, category.name),
                        confidence,
                    )
                    .with_description(format!("Compare {} across {} categories", measure.name, k))
                    .with_reasoning(format!(
                        "{} is categorical with {} values and {} is numeric",
                        category.name, k, measure.name
                    ))
                    .with_column("x", &category.name)
                    .with_column("y", &measure.name)
                    .with_tags(&["comparison", "categorical"]),
                );
            }
        }
        charts
    }

    fn line(&self, axes: &Axes) -> Vec<ChartRecommendation> {
        if let Some(date) = axes.date.first() {
            return axes
                .numeric
                .iter()
                .map(|measure| {
                    let mut chart = ChartRecommendation::new(
                        ChartType::Line,
                        format!("{} over time", measure.name),
                        0.85,
                    )
                    .with_description(format!("Trend of {} along {}", measure.name, date.name))
                    .with_reasoning(format!(
                        "{} is a date column, so {} can be tracked over time",
                        date.name, measure.name
                    ))
                    .with_column("x", &date.name)
                    .with_column("y", &measure.name)
                    .with_tags(&["trend", "time_series"]);
                    if let Some(color) = axes.categorical.first() {
                        chart = chart.with_column("color", &color.name);
                    }
                    chart
                })
                .collect();
        }

        match axes.numeric.as_slice() {
            [x, y, ..] => vec![
                ChartRecommendation::new(ChartType::Line, format!("{} vs {}", y.name, x.name), 0.6)
                    .with_description(format!("{} plotted against {}", y.name, x.name))
                    .with_reasoning("No date column; the first numeric column serves as the axis")
                    .with_column("x", &x.name)
                    .with_column("y", &y.name)
                    .with_tags(&["trend"]),
            ],
            _ => Vec::new(),
        }
    }

    fn histogram(&self, axes: &Axes) -> Vec<ChartRecommendation> {
        axes.numeric
            .iter()
            .take(MAX_HISTOGRAMS)
            .map(|column| {
                let distinct = column.statistics.unique_count;
                let mut chart = ChartRecommendation::new(
                    ChartType::Histogram,
                    format!("Distribution of {}", column.name),
                    if distinct > 10 { 0.75 } else { 0.5 },
                )
                .with_description(format!("How {} values are spread", column.name))
                .with_reasoning(format!("{} is numeric with {} distinct values", column.name, distinct))
                .with_column("x", &column.name)
                .with_tags(&["distribution"]);
                if let Some(stats) = column.statistics.numeric.as_ref() {
                    chart = chart.with_insight(format!(
                        "Values range from {} to {} with median {}",
                        stats.min, stats.max, stats.median
                    ));
                }
                if let Some(group) = axes.categorical.first() {
                    chart = chart.with_column("group", &group.name);
                }
                chart
            })
            .collect()
    }

    fn pie(&self, axes: &Axes) -> Vec<ChartRecommendation> {
        axes.categorical
            .iter()
            .filter(|c| (PIE_MIN_SLICES..=PIE_MAX_SLICES).contains(&c.statistics.unique_count))
            .map(|column| {
                let d = column.statistics.unique_count as f64;
                let confidence = (0.8 - 0.1 * (d - 3.0)).max(0.4).clamp(0.0, 1.0);
                let mut chart = ChartRecommendation::new(
                    ChartType::Pie,
                    format!("Share of {}", column.name),
                    confidence,
                )
                .with_description(format!("Proportion of each {} value", column.name))
                .with_reasoning(format!(
                    "{} has {} categories, few enough to compare as slices",
                    column.name, column.statistics.unique_count
                ))
                .with_column("category", &column.name)
                .with_tags(&["composition", "categorical"]);
                if let Some(mode) = column.statistics.mode.first() {
                    chart = chart.with_insight(format!("Most common value is {}", mode));
                }
                chart
            })
            .collect()
    }

    fn advanced(&self, axes: &Axes) -> Vec<ChartRecommendation> {
        let mut charts = Vec::new();

        if axes.numeric.len() >= 3 {
            let mut heatmap = ChartRecommendation::new(ChartType::Heatmap, "Correlation matrix", 0.65)
                .with_description("Pairwise correlations between numeric columns")
                .with_reasoning(format!("{} numeric columns can be compared at once", axes.numeric.len()))
                .with_complexity(ChartComplexity::Advanced)
                .with_tags(&["correlation", "matrix"]);
            for (i, column) in axes.numeric.iter().enumerate() {
                heatmap = heatmap.with_column(&format!("column_{}", i + 1), &column.name);
            }
            charts.push(heatmap);
        }

        if let (Some(measure), Some(category)) = (axes.numeric.first(), axes.categorical.first()) {
            charts.push(
                ChartRecommendation::new(
                    ChartType::Boxplot,
                    format!("{} spread by {}", measure.name, category.name),
                    0.55,
                )
                .with_description(format!("Quartiles of {} for each {}", measure.name, category.name))
                .with_reasoning("Box plots show spread and outliers within each category")
                .with_column("x", &category.name)
                .with_column("y", &measure.name)
                .with_complexity(ChartComplexity::Advanced)
                .with_tags(&["distribution", "outliers"]),
            );
        }

        charts
    }
}

/// Columns grouped by the type roles charts care about, in dataset order.
struct Axes<'a> {
    numeric: Vec<&'a ColumnProfile>,
    categorical: Vec<&'a ColumnProfile>,
    date: Vec<&'a ColumnProfile>,
}

impl<'a> Axes<'a> {
    fn from_columns(columns: &'a [ColumnProfile]) -> Self {
        let of = |t: InferredType| -> Vec<&'a ColumnProfile> {
            columns.iter().filter(|c| c.inferred_type == t).collect()
        };
        Self {
            numeric: of(InferredType::Number),
            categorical: of(InferredType::Categorical),
            date: of(InferredType::Date),
        }
    }
}
