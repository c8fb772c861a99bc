pub mod bm25;
pub mod name_match;
pub mod text;

mod types;

pub use types::{CatalogDoc, CatalogItem, QueryConstraints, SeniorityBand};
