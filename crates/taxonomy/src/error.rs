use crate::types::CategoryId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TaxonomyError>;

#[derive(Error, Debug)]
pub enum TaxonomyError {
    #[error("Invalid category tree JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Category {0} has an empty label")]
    EmptyLabel(CategoryId),
}
