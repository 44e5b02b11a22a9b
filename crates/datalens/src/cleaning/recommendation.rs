//! Bundling quality issues into prioritized cleaning recommendations.

use serde::{Deserialize, Serialize};

use crate::quality::{QualityIssue, Severity};

/// Effort needed to carry out a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixComplexity {
    Simple,
    Moderate,
    Complex,
}

/// A group of issues to address together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningRecommendation {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Ids of the bundled issues, in report order.
    pub issue_ids: Vec<String>,
    pub priority: Severity,
    /// Expected quality gain, in percentage points.
    pub estimated_improvement: f64,
    pub complexity: FixComplexity,
}

/// Builds the critical, automated and manual-review bundles.
#[derive(Debug, Clone, Default)]
pub struct CleaningRecommendationEngine;

impl CleaningRecommendationEngine {
    pub fn new() -> Self {
        Self
    }

    /// Bundle issues. Empty bundles are omitted.
    pub fn recommend(&self, issues: &[QualityIssue]) -> Vec<CleaningRecommendation> {
        let mut recommendations = Vec::new();

        let critical = ids_where(issues, |i| i.severity == Severity::Critical);
        if !critical.is_empty() {
            recommendations.push(CleaningRecommendation {
                id: "critical_fixes".to_string(),
                title: "Critical fixes".to_string(),
                description: format!(
                    "{} critical issues make the data unreliable for analysis",
                    critical.len()
                ),
                issue_ids: critical,
                priority: Severity::Critical,
                estimated_improvement: 40.0,
                complexity: FixComplexity::Complex,
            });
        }

        let automated = ids_where(issues, |i| i.auto_fixable);
        if !automated.is_empty() {
            recommendations.push(CleaningRecommendation {
                id: "automated_fixes".to_string(),
                title: "Automated quick fixes".to_string(),
                description: format!("{} issues can be fixed automatically", automated.len()),
                issue_ids: automated,
                priority: Severity::Medium,
                estimated_improvement: 25.0,
                complexity: FixComplexity::Simple,
            });
        }

        let high = ids_where(issues, |i| i.severity == Severity::High);
        if !high.is_empty() {
            recommendations.push(CleaningRecommendation {
                id: "high_priority_review".to_string(),
                title: "High priority manual review".to_string(),
                description: format!("{} high severity issues need a closer look", high.len()),
                issue_ids: high,
                priority: Severity::High,
                estimated_improvement: 30.0,
                complexity: FixComplexity::Moderate,
            });
        }

        recommendations
    }
}

fn ids_where(issues: &[QualityIssue], pred: impl Fn(&QualityIssue) -> bool) -> Vec<String> {
    issues.iter().filter(|i| pred(i)).map(|i| i.id.clone()).collect()
}
