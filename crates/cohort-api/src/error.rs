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
  #[error(transparent)]
  Domain(#[from] cohort_core::Error),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<cohort_engine::Error> for ApiError {
  fn from(e: cohort_engine::Error) -> Self {
    match e {
      cohort_engine::Error::Domain(e) => ApiError::Domain(e),
      cohort_engine::Error::Store(e) => ApiError::Store(e),
    }
  }
}

impl ApiError {
  fn status(&self) -> StatusCode {
    use cohort_core::Error as E;
    match self {
      ApiError::Domain(e) => match e {
        E::PersonNotFound(_)
        | E::RequestNotFound(_)
        | E::InvitationNotFound(_)
        | E::EventNotFound(_)
        | E::LectureNotFound(_)
        | E::CompetitionNotFound(_) => StatusCode::NOT_FOUND,
        E::DuplicateRequest { .. }
        | E::InvalidTransition { .. }
        | E::AlreadyAcknowledged
        | E::AlreadyAnswered => StatusCode::CONFLICT,
        E::Unauthorized { .. } => StatusCode::FORBIDDEN,
        E::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        E::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
      },
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    (status, Json(json!({ "error": self.to_string() }))).into_response()
  }
}
