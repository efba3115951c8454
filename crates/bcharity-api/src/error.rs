//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  /// Input that failed record validation, or stored metadata that failed
  /// to decode.
  #[error("unprocessable: {0}")]
  Unprocessable(#[from] bcharity_metadata::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(e))
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self {
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Conflict(_) => StatusCode::CONFLICT,
      ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
      ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let message = match &self {
      ApiError::NotFound(m) | ApiError::BadRequest(m) | ApiError::Conflict(m) => m.clone(),
      ApiError::Unprocessable(e) => e.to_string(),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store error");
        e.to_string()
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
