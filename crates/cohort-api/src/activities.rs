//! Handlers for event, lecture, and competition endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/events` | Create an event |
//! | `POST` | `/events/:id/announce` | Fan out to matching students |
//! | `POST` | `/lectures` | Create a guest lecture |
//! | `POST` | `/lectures/:id/attendance` | Record an attendee (idempotent) |
//! | `POST` | `/competitions` | Create a case competition |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{DateTime, Utc};
use cohort_core::{
  activity::{Competition, Event, Lecture},
  clock::Clock,
  notify::Notifier,
  store::EngagementStore,
};
use cohort_engine::dispatch::AnnouncementReport;
use serde::Deserialize;
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

// ─── Events ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateEventBody {
  pub title:          String,
  #[serde(default)]
  pub description:    String,
  pub date:           DateTime<Utc>,
  #[serde(default)]
  pub location:       String,
  #[serde(default)]
  pub related_skills: Vec<String>,
}

/// `POST /events`
pub async fn create_event<S, N, C>(
  State(state): State<ApiState<S, N, C>>,
  Json(body): Json<CreateEventBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: EngagementStore,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier,
  C: Clock,
{
  if body.title.trim().is_empty() {
    return Err(ApiError::BadRequest("title is required".into()));
  }
  let event = Event {
    event_id:          Uuid::new_v4(),
    title:             body.title,
    description:       body.description,
    date:              body.date,
    location:          body.location,
    related_skills:    body.related_skills,
    speakers:          vec![],
    rsvp_list:         vec![],
    attendance_list:   vec![],
    appreciation_sent: false,
    created_at:        state.clock.now(),
  };
  state
    .store
    .insert_event(event.clone())
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(event)))
}

/// `POST /events/:id/announce` — in-app fan-out to students whose skills
/// intersect the event's tags.
pub async fn announce_event<S, N, C>(
  State(state): State<ApiState<S, N, C>>,
  Path(id): Path<Uuid>,
) -> Result<Json<AnnouncementReport>, ApiError>
where
  S: EngagementStore,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier,
  C: Clock,
{
  let report = state.dispatcher().announce_event(id).await?;
  Ok(Json(report))
}

// ─── Lectures ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateLectureBody {
  pub title:        String,
  #[serde(default)]
  pub description:  String,
  #[serde(default)]
  pub topic_tags:   Vec<String>,
  pub date:         DateTime<Utc>,
  pub professor_id: Uuid,
}

/// `POST /lectures`
pub async fn create_lecture<S, N, C>(
  State(state): State<ApiState<S, N, C>>,
  Json(body): Json<CreateLectureBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: EngagementStore,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier,
  C: Clock,
{
  if body.title.trim().is_empty() {
    return Err(ApiError::BadRequest("title is required".into()));
  }
  let lecture = Lecture {
    lecture_id:      Uuid::new_v4(),
    title:           body.title,
    description:     body.description,
    topic_tags:      body.topic_tags,
    date:            body.date,
    professor_id:    body.professor_id,
    rsvp_list:       vec![],
    attendance_list: vec![],
    created_at:      state.clock.now(),
  };
  state
    .store
    .insert_lecture(lecture.clone())
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(lecture)))
}

#[derive(Debug, Deserialize)]
pub struct AttendanceBody {
  pub person_id: Uuid,
}

/// `POST /lectures/:id/attendance` — mark a person as having attended.
/// Attendance feeds the badge rules; checking in twice is a no-op.
pub async fn record_lecture_attendance<S, N, C>(
  State(state): State<ApiState<S, N, C>>,
  Path(id): Path<Uuid>,
  Json(body): Json<AttendanceBody>,
) -> Result<Json<Lecture>, ApiError>
where
  S: EngagementStore,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier,
  C: Clock,
{
  let mut lecture = state
    .store
    .get_lecture(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or(cohort_core::Error::LectureNotFound(id))?;
  state
    .store
    .get_person(body.person_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or(cohort_core::Error::PersonNotFound(body.person_id))?;

  if !lecture.attendance_list.contains(&body.person_id) {
    lecture.attendance_list.push(body.person_id);
    state
      .store
      .update_lecture(lecture.clone())
      .await
      .map_err(|e| ApiError::Store(Box::new(e)))?;
  }
  Ok(Json(lecture))
}

// ─── Competitions ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateCompetitionBody {
  pub name:               String,
  #[serde(default)]
  pub description:        String,
  #[serde(default)]
  pub required_expertise: Vec<String>,
  pub deadline:           DateTime<Utc>,
  pub end_date:           Option<DateTime<Utc>>,
}

/// `POST /competitions`
pub async fn create_competition<S, N, C>(
  State(state): State<ApiState<S, N, C>>,
  Json(body): Json<CreateCompetitionBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: EngagementStore,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier,
  C: Clock,
{
  if body.name.trim().is_empty() {
    return Err(ApiError::BadRequest("name is required".into()));
  }
  let competition = Competition {
    competition_id:     Uuid::new_v4(),
    name:               body.name,
    description:        body.description,
    required_expertise: body.required_expertise,
    deadline:           body.deadline,
    end_date:           body.end_date,
    judges:             vec![],
    appreciation_sent:  false,
    created_at:         state.clock.now(),
  };
  state
    .store
    .insert_competition(competition.clone())
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(competition)))
}
