//! Input dataset representation.

mod dataset;
pub(crate) mod value;

pub use dataset::{Dataset, DatasetPreview, Row};
pub use value::CellValue;
