//! Cleaning recommendations and fix application.

mod engine;
mod recommendation;

pub use engine::{AppliedFix, CleaningEngine, CleaningResult, SelectedFix, SkippedFix};
pub use recommendation::{CleaningRecommendation, CleaningRecommendationEngine, FixComplexity};
