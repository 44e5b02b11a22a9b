//! Chart recommendation types.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Visualization kinds the engine can propose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Scatter,
    Bar,
    Line,
    Histogram,
    Pie,
    Heatmap,
    Boxplot,
}

impl ChartType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartType::Scatter => "scatter",
            ChartType::Bar => "bar",
            ChartType::Line => "line",
            ChartType::Histogram => "histogram",
            ChartType::Pie => "pie",
            ChartType::Heatmap => "heatmap",
            ChartType::Boxplot => "boxplot",
        }
    }
}

/// How hard a chart is to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartComplexity {
    #[default]
    Simple,
    Intermediate,
    Advanced,
}

/// A ranked, justified mapping of columns to a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRecommendation {
    /// `rec_{index}_{chart_type}`, assigned after ranking.
    pub id: String,
    pub chart_type: ChartType,
    pub title: String,
    pub description: String,
    /// Confidence in [0, 1].
    pub confidence: f64,
    pub reasoning: String,
    /// Role (x, y, color, ...) to column name.
    pub columns: IndexMap<String, String>,
    #[serde(default)]
    pub insights: Vec<String>,
    pub complexity: ChartComplexity,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ChartRecommendation {
    /// Create an unranked candidate. The id is filled in by the engine.
    pub fn new(chart_type: ChartType, title: impl Into<String>, confidence: f64) -> Self {
        Self {
            id: String::new(),
            chart_type,
            title: title.into(),
            description: String::new(),
            confidence: confidence.clamp(0.0, 1.0),
            reasoning: String::new(),
            columns: IndexMap::new(),
            insights: Vec::new(),
            complexity: ChartComplexity::Simple,
            tags: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = reasoning.into();
        self
    }

    /// Map a role to a column.
    pub fn with_column(mut self, role: &str, column: &str) -> Self {
        self.columns.insert(role.to_string(), column.to_string());
        self
    }

    pub fn with_insight(mut self, insight: impl Into<String>) -> Self {
        self.insights.push(insight.into());
        self
    }

    pub fn with_complexity(mut self, complexity: ChartComplexity) -> Self {
        self.complexity = complexity;
        self
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    /// Column mapped to a role, if any.
    pub fn column(&self, role: &str) -> Option<&str> {
        self.columns.get(role).map(String::as_str)
    }
}
