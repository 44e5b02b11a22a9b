//! Chart recommendations.

mod generator;
mod recommendation;

pub use generator::{ChartConfig, ChartRecommendationEngine};
pub use recommendation::{ChartComplexity, ChartRecommendation, ChartType};
