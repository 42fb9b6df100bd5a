//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use toro_core::StoreError;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  /// A foreign key did not resolve.
  #[error("conflict: {0}")]
  Conflict(String),

  /// A field failed validation or the body could not be parsed.
  #[error("unprocessable: {0}")]
  Unprocessable(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Classify a backend error by the record error it carries, if any.
  pub fn from_store<E: StoreError>(err: E) -> Self {
    match err.record_error() {
      Some(e @ toro_core::Error::NotFound { .. }) => Self::NotFound(e.to_string()),
      Some(e @ toro_core::Error::Reference { .. }) => Self::Conflict(e.to_string()),
      Some(e @ toro_core::Error::Validation { .. }) => {
        Self::Unprocessable(e.to_string())
      }
      None => Self::Store(Box::new(err)),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Unprocessable(m) => (StatusCode::UNPROCESSABLE_ENTITY, m.clone()),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "storage failure");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
