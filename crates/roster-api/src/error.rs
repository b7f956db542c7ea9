use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use roster_store::StoreError;

/// Errors surfaced by control-plane operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Lookup targeted an entity the store does not hold.
    #[error("{entity} '{name}' not found")]
    NotFound { entity: &'static str, name: String },

    /// Request body or parameters failed validation.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The backing store failed while serving the request.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    /// Shorthand for a missing entity.
    pub fn not_found(entity: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            name: name.into(),
        }
    }

    /// HTTP status this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_error_class() {
        assert_eq!(
            ApiError::not_found("node", "n1").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::InvalidRequest("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Store(StoreError::Backend("down".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn not_found_names_the_entity() {
        let err = ApiError::not_found("job", "training-1");
        assert_eq!(err.to_string(), "job 'training-1' not found");
    }

    #[test]
    fn store_errors_pass_their_message_through() {
        let err = ApiError::from(StoreError::Backend("connection refused".into()));
        assert!(err.to_string().contains("connection refused"));
    }
}
