//! Core type definitions for column profiles.

use serde::{Deserialize, Serialize};

/// Inferred semantic type for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InferredType {
    /// Free text values.
    #[default]
    String,
    /// Finite numbers.
    Number,
    /// true/false, yes/no, 1/0.
    Boolean,
    /// Calendar dates.
    Date,
    /// Text with a small set of repeated values.
    Categorical,
    /// No single type covers the column.
    Mixed,
}

impl InferredType {
    /// Returns true if this type is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, InferredType::Number)
    }

    /// Returns true for free text and categorical text.
    pub fn is_textual(&self) -> bool {
        matches!(self, InferredType::String | InferredType::Categorical)
    }

    /// Lowercase name as used in ids and descriptions.
    pub fn as_str(&self) -> &'static str {
        match self {
            InferredType::String => "string",
            InferredType::Number => "number",
            InferredType::Boolean => "boolean",
            InferredType::Date => "date",
            InferredType::Categorical => "categorical",
            InferredType::Mixed => "mixed",
        }
    }
}
