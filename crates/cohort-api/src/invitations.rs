//! Handlers for invitation endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/competitions/:id/invitations` | Source judges |
//! | `POST` | `/lectures/:id/invitations` | Source speakers (top 5) |
//! | `GET`  | `/invitations/:id` | 404 if not found |
//! | `GET`  | `/people/:id/invitations` | All asks for one candidate |
//! | `POST` | `/invitations/:id/acknowledge` | Candidate only; one-shot |
//! | `POST` | `/invitations/:id/respond` | Candidate only; terminal |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use cohort_core::{
  clock::Clock, connection::Decision, invitation::Invitation, notify::Notifier,
  store::EngagementStore,
};
use cohort_engine::invitations::InvitationBatch;
use serde::Deserialize;
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

// ─── Generation ──────────────────────────────────────────────────────────────

/// `POST /competitions/:id/invitations`
pub async fn generate_for_competition<S, N, C>(
  State(state): State<ApiState<S, N, C>>,
  Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError>
where
  S: EngagementStore,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier,
  C: Clock,
{
  let batch: InvitationBatch =
    state.invitations().generate_for_competition(id).await?;
  Ok((StatusCode::CREATED, Json(batch)))
}

/// `POST /lectures/:id/invitations`
pub async fn generate_for_lecture<S, N, C>(
  State(state): State<ApiState<S, N, C>>,
  Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError>
where
  S: EngagementStore,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier,
  C: Clock,
{
  let batch: InvitationBatch =
    state.invitations().generate_for_lecture(id).await?;
  Ok((StatusCode::CREATED, Json(batch)))
}

// ─── Reads ───────────────────────────────────────────────────────────────────

/// `GET /invitations/:id`
pub async fn get_one<S, N, C>(
  State(state): State<ApiState<S, N, C>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Invitation>, ApiError>
where
  S: EngagementStore,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier,
  C: Clock,
{
  let invitation = state
    .store
    .get_invitation(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or(cohort_core::Error::InvitationNotFound(id))?;
  Ok(Json(invitation))
}

/// `GET /people/:id/invitations`
pub async fn for_candidate<S, N, C>(
  State(state): State<ApiState<S, N, C>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<Invitation>>, ApiError>
where
  S: EngagementStore,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier,
  C: Clock,
{
  let invitations = state
    .store
    .invitations_for_candidate(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(invitations))
}

// ─── Candidate actions ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ActorBody {
  pub acting_user_id: Uuid,
}

/// `POST /invitations/:id/acknowledge`
pub async fn acknowledge<S, N, C>(
  State(state): State<ApiState<S, N, C>>,
  Path(id): Path<Uuid>,
  Json(body): Json<ActorBody>,
) -> Result<Json<Invitation>, ApiError>
where
  S: EngagementStore,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier,
  C: Clock,
{
  let invitation =
    state.invitations().acknowledge(id, body.acting_user_id).await?;
  Ok(Json(invitation))
}

#[derive(Debug, Deserialize)]
pub struct RespondBody {
  pub acting_user_id: Uuid,
  pub decision:       Decision,
}

/// `POST /invitations/:id/respond`
pub async fn respond<S, N, C>(
  State(state): State<ApiState<S, N, C>>,
  Path(id): Path<Uuid>,
  Json(body): Json<RespondBody>,
) -> Result<Json<Invitation>, ApiError>
where
  S: EngagementStore,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier,
  C: Clock,
{
  let invitation = state
    .invitations()
    .respond(id, body.acting_user_id, body.decision)
    .await?;
  Ok(Json(invitation))
}
