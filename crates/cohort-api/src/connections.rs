//! Handlers for connection-request and mentee-note endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/connections` | Send a request; 409 on an open duplicate |
//! | `GET`  | `/connections/:id` | 404 if not found |
//! | `PUT`  | `/connections/:id` | Accept/decline; receiver only |
//! | `POST` | `/connections/:id/session` | Confirm a session; receiver only |
//! | `POST` | `/notes` | Mentor note on a connected student |
//! | `GET`  | `/notes` | `?mentor=<id>&student=<id>`, newest first |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{DateTime, Utc};
use cohort_core::{
  clock::Clock,
  connection::{ConnectionRequest, Decision, MenteeNote, SessionDetails},
  notify::Notifier,
  store::EngagementStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

// ─── Send ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub sender_id:   Uuid,
  pub receiver_id: Uuid,
  pub message:     Option<String>,
}

/// `POST /connections`
pub async fn create<S, N, C>(
  State(state): State<ApiState<S, N, C>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: EngagementStore,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier,
  C: Clock,
{
  let request = state
    .connections()
    .send(body.sender_id, body.receiver_id, body.message)
    .await?;
  Ok((StatusCode::CREATED, Json(request)))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /connections/:id`
pub async fn get_one<S, N, C>(
  State(state): State<ApiState<S, N, C>>,
  Path(id): Path<Uuid>,
) -> Result<Json<ConnectionRequest>, ApiError>
where
  S: EngagementStore,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier,
  C: Clock,
{
  let request = state
    .store
    .get_request(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or(cohort_core::Error::RequestNotFound(id))?;
  Ok(Json(request))
}

// ─── Respond ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RespondBody {
  pub acting_user_id: Uuid,
  pub decision:       Decision,
}

/// `PUT /connections/:id` — the receiver accepts or declines.
pub async fn respond<S, N, C>(
  State(state): State<ApiState<S, N, C>>,
  Path(id): Path<Uuid>,
  Json(body): Json<RespondBody>,
) -> Result<Json<ConnectionRequest>, ApiError>
where
  S: EngagementStore,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier,
  C: Clock,
{
  let request = state
    .connections()
    .respond(id, body.acting_user_id, body.decision)
    .await?;
  Ok(Json(request))
}

// ─── Confirm session ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ConfirmBody {
  pub acting_user_id:   Uuid,
  pub meeting_time:     DateTime<Utc>,
  pub meeting_link:     Option<String>,
  pub duration_minutes: Option<u32>,
}

/// `POST /connections/:id/session` — schedule the accepted session.
pub async fn confirm_session<S, N, C>(
  State(state): State<ApiState<S, N, C>>,
  Path(id): Path<Uuid>,
  Json(body): Json<ConfirmBody>,
) -> Result<Json<ConnectionRequest>, ApiError>
where
  S: EngagementStore,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier,
  C: Clock,
{
  let details = SessionDetails {
    meeting_time:     body.meeting_time,
    meeting_link:     body.meeting_link,
    duration_minutes: body.duration_minutes,
  };
  let request = state
    .connections()
    .confirm_session(id, body.acting_user_id, details)
    .await?;
  Ok(Json(request))
}

// ─── Mentee notes ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct NoteBody {
  pub mentor_id:  Uuid,
  pub student_id: Uuid,
  pub content:    String,
}

/// `POST /notes`
pub async fn create_note<S, N, C>(
  State(state): State<ApiState<S, N, C>>,
  Json(body): Json<NoteBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: EngagementStore,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier,
  C: Clock,
{
  let note = state
    .connections()
    .add_mentee_note(body.mentor_id, body.student_id, &body.content)
    .await?;
  Ok((StatusCode::CREATED, Json(note)))
}

#[derive(Debug, Deserialize)]
pub struct NotesParams {
  pub mentor:  Uuid,
  pub student: Uuid,
}

/// `GET /notes?mentor=<id>&student=<id>`
pub async fn list_notes<S, N, C>(
  State(state): State<ApiState<S, N, C>>,
  Query(params): Query<NotesParams>,
) -> Result<Json<Vec<MenteeNote>>, ApiError>
where
  S: EngagementStore,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier,
  C: Clock,
{
  let notes = state
    .connections()
    .mentee_notes(params.mentor, params.student)
    .await?;
  Ok(Json(notes))
}
