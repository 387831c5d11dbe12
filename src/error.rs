use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::distances::stats::DistanceError;
use crate::users::repo::StoreError;

/// Error returned by every API handler. The variant decides the status code
/// and which envelope (`message` or `error`) the body uses.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unprocessable(String),

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Bad request")]
    MalformedRequest,

    #[error("Not found")]
    RouteNotFound,

    #[error("Internal server error")]
    Internal(#[source] anyhow::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::MalformedRequest => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) | ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Unauthorized => StatusCode::FORBIDDEN,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn user_not_found(id: &str) -> Self {
        ApiError::NotFound(format!("User with ID {id} not found"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            ApiError::Validation(message)
            | ApiError::NotFound(message)
            | ApiError::Unprocessable(message) => json!({ "message": message }),
            ApiError::Internal(cause) => {
                error!(error = %cause, "request failed");
                json!({ "error": self.to_string() })
            }
            ApiError::Unauthorized | ApiError::MalformedRequest | ApiError::RouteNotFound => {
                json!({ "error": self.to_string() })
            }
        };
        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => ApiError::user_not_found(&id),
            StoreError::Backend(cause) => ApiError::Internal(cause),
        }
    }
}

impl From<DistanceError> for ApiError {
    fn from(err: DistanceError) -> Self {
        ApiError::Unprocessable(err.to_string())
    }
}

/// Router fallback for paths outside the API.
pub async fn route_not_found() -> ApiError {
    ApiError::RouteNotFound
}
