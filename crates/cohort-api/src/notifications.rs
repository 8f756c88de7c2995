//! Handlers for the in-app notification inbox.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/people/:id/notifications` | Newest first |
//! | `GET`  | `/people/:id/notifications/unread` | `{"unread": n}` |
//! | `POST` | `/people/:id/notifications/read-all` | |
//! | `POST` | `/notifications/:id/read` | |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
};
use cohort_core::{
  clock::Clock, notification::Notification, notify::Notifier,
  store::EngagementStore,
};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

/// `GET /people/:id/notifications`
pub async fn inbox<S, N, C>(
  State(state): State<ApiState<S, N, C>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<Notification>>, ApiError>
where
  S: EngagementStore,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier,
  C: Clock,
{
  let notifications = state
    .store
    .notifications_for_user(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(notifications))
}

/// `GET /people/:id/notifications/unread`
pub async fn unread<S, N, C>(
  State(state): State<ApiState<S, N, C>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError>
where
  S: EngagementStore,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier,
  C: Clock,
{
  let unread = state
    .store
    .unread_count(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(json!({ "unread": unread })))
}

/// `POST /notifications/:id/read`
pub async fn mark_read<S, N, C>(
  State(state): State<ApiState<S, N, C>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: EngagementStore,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier,
  C: Clock,
{
  state
    .store
    .mark_read(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(StatusCode::NO_CONTENT)
}

/// `POST /people/:id/notifications/read-all`
pub async fn read_all<S, N, C>(
  State(state): State<ApiState<S, N, C>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: EngagementStore,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier,
  C: Clock,
{
  state
    .store
    .mark_all_read(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(StatusCode::NO_CONTENT)
}
