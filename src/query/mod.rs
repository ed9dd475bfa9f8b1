//! Effective-query construction for the E-utilities search grammar

mod builder;
mod fields;

pub use builder::SearchQuery;
pub use fields::{SearchField, FREE_FULL_TEXT_FILTER, GUIDELINE_PUBLICATION_FILTER};
