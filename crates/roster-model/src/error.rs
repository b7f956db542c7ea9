use thiserror::Error;

use crate::schema::SchemaViolations;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("deployment document rejected: {0}")]
    InvalidDescriptor(#[from] SchemaViolations),

    #[error("document does not match the record shape: {0}")]
    Shape(#[from] serde_json::Error),
}
