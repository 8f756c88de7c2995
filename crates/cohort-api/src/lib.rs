//! JSON REST API for Cohort.
//!
//! Exposes an axum [`Router`] over any [`cohort_core::store::EngagementStore`]
//! plus a [`cohort_core::notify::Notifier`] backend and a clock. Auth, TLS,
//! and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", cohort_api::api_router(state.clone()))
//! ```

pub mod activities;
pub mod connections;
pub mod error;
pub mod invitations;
pub mod jobs;
pub mod notifications;
pub mod people;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use cohort_core::{clock::Clock, notify::Notifier, store::EngagementStore};
use cohort_engine::{
  badges::BadgeEngine,
  connections::ConnectionService,
  dispatch::NotificationDispatcher,
  invitations::InvitationEngine,
  scheduler::{FollowUpConfig, Scheduler},
};

pub use error::ApiError;

/// Shared handler state: the three ports plus the singleton scheduler
/// (whose pass gates must be shared across requests).
pub struct ApiState<S, N, C> {
  store:     Arc<S>,
  notifier:  Arc<N>,
  clock:     Arc<C>,
  scheduler: Arc<Scheduler<S, N, C>>,
  follow_up: FollowUpConfig,
}

impl<S, N, C> Clone for ApiState<S, N, C> {
  fn clone(&self) -> Self {
    Self {
      store:     self.store.clone(),
      notifier:  self.notifier.clone(),
      clock:     self.clock.clone(),
      scheduler: self.scheduler.clone(),
      follow_up: self.follow_up,
    }
  }
}

impl<S, N, C> ApiState<S, N, C>
where
  S: EngagementStore,
  N: Notifier,
  C: Clock,
{
  pub fn new(
    store: Arc<S>,
    notifier: Arc<N>,
    clock: Arc<C>,
    follow_up: FollowUpConfig,
  ) -> Self {
    let scheduler =
      Arc::new(Scheduler::new(store.clone(), notifier.clone(), clock.clone()));
    Self { store, notifier, clock, scheduler, follow_up }
  }

  /// The shared scheduler, for driving a periodic cadence outside the
  /// router. Manual `/jobs/*` triggers and the cadence share pass gates.
  pub fn scheduler(&self) -> Arc<Scheduler<S, N, C>> { self.scheduler.clone() }

  pub fn follow_up_config(&self) -> FollowUpConfig { self.follow_up }

  fn connections(&self) -> ConnectionService<S, N, C> {
    ConnectionService::new(
      self.store.clone(),
      self.notifier.clone(),
      self.clock.clone(),
    )
  }

  fn invitations(&self) -> InvitationEngine<S, N, C> {
    InvitationEngine::new(
      self.store.clone(),
      self.notifier.clone(),
      self.clock.clone(),
    )
  }

  fn badges(&self) -> BadgeEngine<S, C> {
    BadgeEngine::new(self.store.clone(), self.clock.clone())
  }

  fn dispatcher(&self) -> NotificationDispatcher<S, C> {
    NotificationDispatcher::new(self.store.clone(), self.clock.clone())
  }
}

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, N, C>(state: ApiState<S, N, C>) -> Router<()>
where
  S: EngagementStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier + 'static,
  C: Clock + 'static,
{
  Router::new()
    // People
    .route(
      "/people",
      get(people::list::<S, N, C>).post(people::create::<S, N, C>),
    )
    .route("/people/search", get(people::search::<S, N, C>))
    .route("/people/{id}", get(people::get_one::<S, N, C>))
    .route("/people/{id}/badges", post(people::evaluate_badges::<S, N, C>))
    .route(
      "/people/{id}/invitations",
      get(invitations::for_candidate::<S, N, C>),
    )
    .route(
      "/people/{id}/notifications",
      get(notifications::inbox::<S, N, C>),
    )
    .route(
      "/people/{id}/notifications/unread",
      get(notifications::unread::<S, N, C>),
    )
    .route(
      "/people/{id}/notifications/read-all",
      post(notifications::read_all::<S, N, C>),
    )
    // Connection requests
    .route("/connections", post(connections::create::<S, N, C>))
    .route(
      "/connections/{id}",
      get(connections::get_one::<S, N, C>).put(connections::respond::<S, N, C>),
    )
    .route(
      "/connections/{id}/session",
      post(connections::confirm_session::<S, N, C>),
    )
    // Mentee notes
    .route(
      "/notes",
      get(connections::list_notes::<S, N, C>)
        .post(connections::create_note::<S, N, C>),
    )
    // Events, lectures, competitions
    .route("/events", post(activities::create_event::<S, N, C>))
    .route(
      "/events/{id}/announce",
      post(activities::announce_event::<S, N, C>),
    )
    .route("/lectures", post(activities::create_lecture::<S, N, C>))
    .route(
      "/lectures/{id}/attendance",
      post(activities::record_lecture_attendance::<S, N, C>),
    )
    .route(
      "/lectures/{id}/invitations",
      post(invitations::generate_for_lecture::<S, N, C>),
    )
    .route("/competitions", post(activities::create_competition::<S, N, C>))
    .route(
      "/competitions/{id}/invitations",
      post(invitations::generate_for_competition::<S, N, C>),
    )
    // Invitations
    .route("/invitations/{id}", get(invitations::get_one::<S, N, C>))
    .route(
      "/invitations/{id}/acknowledge",
      post(invitations::acknowledge::<S, N, C>),
    )
    .route(
      "/invitations/{id}/respond",
      post(invitations::respond::<S, N, C>),
    )
    // Notifications
    .route(
      "/notifications/{id}/read",
      post(notifications::mark_read::<S, N, C>),
    )
    // Background passes
    .route("/jobs/follow-ups", post(jobs::run_follow_ups::<S, N, C>))
    .route("/jobs/appreciation", post(jobs::run_appreciation::<S, N, C>))
    .with_state(state)
}
