//! Manual triggers for the background passes.
//!
//! The same [`cohort_engine::scheduler::Scheduler`] instance backs both the
//! periodic cadence in the server binary and these endpoints, so a manual
//! trigger while a timed run is in flight reports `already_running` instead
//! of double-sending.

use axum::{Json, extract::State};
use cohort_core::{clock::Clock, notify::Notifier, store::EngagementStore};
use cohort_engine::scheduler::{CancelHandle, FollowUpConfig, PassRun};
use serde::Deserialize;

use crate::{ApiState, error::ApiError};

#[derive(Debug, Default, Deserialize)]
pub struct FollowUpBody {
  /// Override the configured threshold; 0 nudges everything still open.
  pub threshold_days: Option<i64>,
  pub max_follow_ups: Option<u32>,
}

/// `POST /jobs/follow-ups`
pub async fn run_follow_ups<S, N, C>(
  State(state): State<ApiState<S, N, C>>,
  body: Option<Json<FollowUpBody>>,
) -> Result<Json<PassRun>, ApiError>
where
  S: EngagementStore,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier,
  C: Clock,
{
  let body = body.map(|Json(b)| b).unwrap_or_default();
  let defaults = state.follow_up_config();
  let config = FollowUpConfig {
    threshold_days: body.threshold_days.unwrap_or(defaults.threshold_days),
    max_follow_ups: body.max_follow_ups.unwrap_or(defaults.max_follow_ups),
  };
  let run = state
    .scheduler
    .run_follow_ups(config, &CancelHandle::new())
    .await?;
  Ok(Json(run))
}

/// `POST /jobs/appreciation`
pub async fn run_appreciation<S, N, C>(
  State(state): State<ApiState<S, N, C>>,
) -> Result<Json<PassRun>, ApiError>
where
  S: EngagementStore,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier,
  C: Clock,
{
  let run = state.scheduler.run_appreciation(&CancelHandle::new()).await?;
  Ok(Json(run))
}
