//! Handlers for `/people` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/people` | Optional `?role=student\|alumni\|...` |
//! | `POST` | `/people` | Body: name, email, role, capabilities, skills |
//! | `GET`  | `/people/search` | `?q=<name or skill fragment>` |
//! | `GET`  | `/people/:id` | 404 if not found |
//! | `POST` | `/people/:id/badges` | Re-run badge rules; returns new awards |

use std::collections::BTreeSet;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use cohort_core::{
  clock::Clock,
  notify::Notifier,
  person::{Badge, Capability, Person, Role},
  store::EngagementStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

// ─── List / search ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub role: Option<Role>,
}

/// `GET /people[?role=<role>]`
pub async fn list<S, N, C>(
  State(state): State<ApiState<S, N, C>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Person>>, ApiError>
where
  S: EngagementStore,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier,
  C: Clock,
{
  let people = state
    .store
    .list_people(params.role)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(people))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
  pub q: String,
}

/// `GET /people/search?q=<fragment>` — matches names and skills.
pub async fn search<S, N, C>(
  State(state): State<ApiState<S, N, C>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Person>>, ApiError>
where
  S: EngagementStore,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier,
  C: Clock,
{
  let people = state
    .store
    .search_people(&params.q)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(people))
}

// ─── Create ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub name:         String,
  pub email:        String,
  pub role:         Role,
  #[serde(default)]
  pub capabilities: BTreeSet<Capability>,
  #[serde(default)]
  pub skills:       Vec<String>,
}

/// `POST /people`
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
  if body.name.trim().is_empty() || body.email.trim().is_empty() {
    return Err(ApiError::BadRequest("name and email are required".into()));
  }
  let person = Person {
    person_id:      Uuid::new_v4(),
    name:           body.name,
    email:          body.email,
    role:           body.role,
    capabilities:   body.capabilities,
    skills:         body.skills,
    badges:         vec![],
    last_active_at: None,
    created_at:     state.clock.now(),
  };
  state
    .store
    .add_person(person.clone())
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(person)))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /people/:id`
pub async fn get_one<S, N, C>(
  State(state): State<ApiState<S, N, C>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Person>, ApiError>
where
  S: EngagementStore,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier,
  C: Clock,
{
  let person = state
    .store
    .get_person(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or(cohort_core::Error::PersonNotFound(id))?;
  Ok(Json(person))
}

// ─── Badges ──────────────────────────────────────────────────────────────────

/// `POST /people/:id/badges` — re-run every badge rule for this person and
/// return the newly earned badges (empty when nothing changed).
pub async fn evaluate_badges<S, N, C>(
  State(state): State<ApiState<S, N, C>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<Badge>>, ApiError>
where
  S: EngagementStore,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier,
  C: Clock,
{
  let awarded = state.badges().evaluate(id).await?;
  Ok(Json(awarded))
}
