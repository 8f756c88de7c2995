//! HTTP server assembly for Cohort.
//!
//! Mounts the JSON API under `/api`, adds request tracing, and drives the
//! periodic scheduler cadence. The notifier backend here logs instead of
//! sending real email; swap in a mail-backed [`Notifier`] without touching
//! the engine.

use std::{sync::Arc, time::Duration};

use axum::Router;
use cohort_api::ApiState;
use cohort_core::{
  clock::Clock,
  notify::{DispatchOutcome, Notifier, OutboundMessage},
  store::EngagementStore,
};
use cohort_engine::scheduler::{CancelHandle, PassRun, Scheduler};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 8080 }
fn default_threshold_days() -> i64 { 3 }
fn default_max_follow_ups() -> u32 { 2 }
fn default_scheduler_interval_secs() -> u64 { 3600 }

/// Runtime server configuration, deserialised from `config.toml` with
/// `COHORT_*` environment overrides.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host: String,
  #[serde(default = "default_port")]
  pub port: u16,
  /// Days an invitation may sit unanswered before a follow-up nudge.
  #[serde(default = "default_threshold_days")]
  pub follow_up_threshold_days: i64,
  /// Lifetime cap on nudges per invitation.
  #[serde(default = "default_max_follow_ups")]
  pub max_follow_ups: u32,
  /// Seconds between scheduler cadence ticks.
  #[serde(default = "default_scheduler_interval_secs")]
  pub scheduler_interval_secs: u64,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host: default_host(),
      port: default_port(),
      follow_up_threshold_days: default_threshold_days(),
      max_follow_ups: default_max_follow_ups(),
      scheduler_interval_secs: default_scheduler_interval_secs(),
    }
  }
}

// ─── Notifier backend ─────────────────────────────────────────────────────────

/// A notifier that writes each outbound message to the log. Stands in for a
/// real mail provider; delivery always succeeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
  async fn send(&self, message: OutboundMessage) -> DispatchOutcome {
    tracing::info!(
      kind = ?message.kind,
      recipient = %message.recipient_email,
      fields = ?message.fields,
      "outbound notification"
    );
    DispatchOutcome::delivered()
  }
}

// ─── Assembly ─────────────────────────────────────────────────────────────────

/// Build the full application router: the JSON API under `/api` with
/// request tracing.
pub fn app<S, N, C>(state: ApiState<S, N, C>) -> Router
where
  S: EngagementStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier + 'static,
  C: Clock + 'static,
{
  Router::new()
    .nest("/api", cohort_api::api_router(state))
    .layer(TraceLayer::new_for_http())
}

/// Drive the two background passes on a fixed cadence until cancelled.
pub async fn scheduler_cadence<S, N, C>(
  scheduler: Arc<Scheduler<S, N, C>>,
  follow_up: cohort_engine::scheduler::FollowUpConfig,
  period: Duration,
  cancel: CancelHandle,
) where
  S: EngagementStore,
  N: Notifier,
  C: Clock,
{
  let mut ticker = tokio::time::interval(period);
  ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
  // The first tick fires immediately; skip it so startup is quiet.
  ticker.tick().await;

  loop {
    ticker.tick().await;
    if cancel.is_cancelled() {
      break;
    }
    match scheduler.run_follow_ups(follow_up, &cancel).await {
      Ok(PassRun::AlreadyRunning) => {
        tracing::warn!("follow-up pass skipped: previous run still active")
      }
      Ok(PassRun::Completed(_)) => {}
      Err(e) => tracing::error!(error = %e, "follow-up pass failed"),
    }
    match scheduler.run_appreciation(&cancel).await {
      Ok(PassRun::AlreadyRunning) => {
        tracing::warn!("appreciation pass skipped: previous run still active")
      }
      Ok(PassRun::Completed(_)) => {}
      Err(e) => tracing::error!(error = %e, "appreciation pass failed"),
    }
  }
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use cohort_core::clock::SystemClock;
  use cohort_engine::scheduler::FollowUpConfig;
  use cohort_store_mem::MemStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  fn make_state() -> ApiState<MemStore, LogNotifier, SystemClock> {
    ApiState::new(
      Arc::new(MemStore::new()),
      Arc::new(LogNotifier),
      Arc::new(SystemClock),
      FollowUpConfig::default(),
    )
  }

  async fn request(
    state: &ApiState<MemStore, LogNotifier, SystemClock>,
    method: &str,
    uri: &str,
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    let response = app(state.clone())
      .oneshot(builder.body(body).unwrap())
      .await
      .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
      .await
      .unwrap();
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
  }

  async fn create_person(
    state: &ApiState<MemStore, LogNotifier, SystemClock>,
    name: &str,
    role: &str,
    capabilities: Value,
    skills: Value,
  ) -> String {
    let (status, body) = request(
      state,
      "POST",
      "/api/people",
      Some(json!({
        "name": name,
        "email": format!("{}@example.edu", name.to_lowercase()),
        "role": role,
        "capabilities": capabilities,
        "skills": skills,
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["person_id"].as_str().unwrap().to_string()
  }

  #[tokio::test]
  async fn create_and_fetch_person() {
    let state = make_state();
    let id = create_person(
      &state,
      "Amara",
      "student",
      json!([]),
      json!(["Python", "SQL"]),
    )
    .await;

    let (status, body) =
      request(&state, "GET", &format!("/api/people/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Amara");
    assert_eq!(body["skills"], json!(["Python", "SQL"]));
  }

  #[tokio::test]
  async fn missing_person_maps_to_404() {
    let state = make_state();
    let (status, body) = request(
      &state,
      "GET",
      &format!("/api/people/{}", uuid::Uuid::new_v4()),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("not found"));
  }

  #[tokio::test]
  async fn duplicate_connection_request_maps_to_409() {
    let state = make_state();
    let student =
      create_person(&state, "Bea", "student", json!([]), json!(["Rust"]))
        .await;
    let mentor = create_person(
      &state,
      "Cole",
      "alumni",
      json!(["mentor"]),
      json!(["Rust"]),
    )
    .await;

    let body = json!({ "sender_id": student, "receiver_id": mentor });
    let (status, _) =
      request(&state, "POST", "/api/connections", Some(body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, error) =
      request(&state, "POST", "/api/connections", Some(body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(error["error"].as_str().unwrap().contains("already exists"));
  }

  #[tokio::test]
  async fn only_the_receiver_may_respond() {
    let state = make_state();
    let student =
      create_person(&state, "Dev", "student", json!([]), json!([])).await;
    let mentor =
      create_person(&state, "Eve", "alumni", json!(["mentor"]), json!([]))
        .await;

    let (_, created) = request(
      &state,
      "POST",
      "/api/connections",
      Some(json!({ "sender_id": student, "receiver_id": mentor })),
    )
    .await;
    let request_id = created["request_id"].as_str().unwrap().to_string();

    // The sender cannot accept their own request.
    let (status, _) = request(
      &state,
      "PUT",
      &format!("/api/connections/{request_id}"),
      Some(json!({ "acting_user_id": student, "decision": "accept" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, accepted) = request(
      &state,
      "PUT",
      &format!("/api/connections/{request_id}"),
      Some(json!({ "acting_user_id": mentor, "decision": "accept" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(accepted["status"], "accepted");
  }

  #[tokio::test]
  async fn empty_mentee_note_maps_to_422() {
    let state = make_state();
    let student =
      create_person(&state, "Finn", "student", json!([]), json!([])).await;
    let mentor =
      create_person(&state, "Gwen", "alumni", json!(["mentor"]), json!([]))
        .await;

    let (_, created) = request(
      &state,
      "POST",
      "/api/connections",
      Some(json!({ "sender_id": student, "receiver_id": mentor })),
    )
    .await;
    let request_id = created["request_id"].as_str().unwrap();
    request(
      &state,
      "PUT",
      &format!("/api/connections/{request_id}"),
      Some(json!({ "acting_user_id": mentor, "decision": "accept" })),
    )
    .await;

    let (status, _) = request(
      &state,
      "POST",
      "/api/notes",
      Some(json!({
        "mentor_id": mentor,
        "student_id": student,
        "content": "   ",
      })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
  }

  #[tokio::test]
  async fn lecture_attendance_is_recorded_once() {
    let state = make_state();
    let student =
      create_person(&state, "Hana", "student", json!([]), json!([])).await;

    let (status, lecture) = request(
      &state,
      "POST",
      "/api/lectures",
      Some(json!({
        "title": "Databases in Practice",
        "date": "2026-03-05T17:00:00Z",
        "professor_id": uuid::Uuid::new_v4(),
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let lecture_id = lecture["lecture_id"].as_str().unwrap().to_string();

    let body = json!({ "person_id": student });
    let uri = format!("/api/lectures/{lecture_id}/attendance");
    let (status, updated) =
      request(&state, "POST", &uri, Some(body.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["attendance_list"].as_array().unwrap().len(), 1);

    // Checking in a second time does not duplicate the entry.
    let (status, updated) = request(&state, "POST", &uri, Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["attendance_list"].as_array().unwrap().len(), 1);

    let (status, _) = request(
      &state,
      "POST",
      &format!("/api/lectures/{}/attendance", uuid::Uuid::new_v4()),
      Some(json!({ "person_id": student })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn follow_up_job_reports_a_completed_pass() {
    let state = make_state();
    let (status, body) =
      request(&state, "POST", "/api/jobs/follow-ups", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "completed");
  }
}
