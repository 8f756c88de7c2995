//! The `EngagementStore` trait — the abstract persistence surface.
//!
//! The trait is implemented by storage backends (e.g. `cohort-store-mem`).
//! The workflow services in `cohort-engine` depend on this abstraction, not
//! on any concrete backend. Mutations are check-then-apply: the services
//! read an aggregate, run the state-machine guard, and write the new state
//! back; the backend guarantees each call is applied atomically and callers
//! serialise operations on the same aggregate id (per-aggregate sequencing).
//!
//! All methods return `Send` futures so the trait can be used in
//! multi-threaded async runtimes (e.g. tokio with `axum`).

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  activity::{Competition, Event, Lecture, Team},
  connection::{ConnectionRequest, MenteeNote},
  invitation::Invitation,
  notification::Notification,
  person::{Badge, Capability, Person, Role},
};

/// Abstraction over a Cohort engagement store backend.
pub trait EngagementStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── People ────────────────────────────────────────────────────────────

  /// Persist a new directory entry. Returns an error if the id is taken.
  fn add_person(
    &self,
    person: Person,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Retrieve a person by id. Returns `None` if not found.
  fn get_person(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// List all people, optionally filtered by primary role.
  fn list_people(
    &self,
    role: Option<Role>,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  /// All people who can act in the given capacity (candidate pools).
  fn find_by_capability(
    &self,
    capability: Capability,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  /// Case-insensitive search over names and skill tags.
  fn search_people<'a>(
    &'a self,
    text: &'a str,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + 'a;

  /// Append badges to a person. Badges are append-only; the caller is
  /// responsible for deduplication against the current badge list.
  fn append_badges<'a>(
    &'a self,
    person_id: Uuid,
    badges: &'a [Badge],
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Stamp a person's `last_active_at`. Unknown ids are ignored; activity
  /// stamping is best-effort bookkeeping, not a guard.
  fn touch_last_active(
    &self,
    person_id: Uuid,
    at: DateTime<Utc>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Connection requests ───────────────────────────────────────────────

  fn insert_request(
    &self,
    request: ConnectionRequest,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn get_request(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<ConnectionRequest>, Self::Error>> + Send + '_;

  /// Replace a stored request with an updated copy (same id).
  fn update_request(
    &self,
    request: ConnectionRequest,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// The non-terminal request between an ordered (sender, receiver) pair,
  /// if one exists. There is at most one by invariant.
  fn find_open_request(
    &self,
    sender_id: Uuid,
    receiver_id: Uuid,
  ) -> impl Future<Output = Result<Option<ConnectionRequest>, Self::Error>> + Send + '_;

  fn requests_by_sender(
    &self,
    sender_id: Uuid,
  ) -> impl Future<Output = Result<Vec<ConnectionRequest>, Self::Error>> + Send + '_;

  fn requests_by_receiver(
    &self,
    receiver_id: Uuid,
  ) -> impl Future<Output = Result<Vec<ConnectionRequest>, Self::Error>> + Send + '_;

  // ── Mentee notes ──────────────────────────────────────────────────────

  fn insert_note(
    &self,
    note: MenteeNote,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Notes a mentor keeps on one student, most recent first.
  fn notes_for_pair(
    &self,
    mentor_id: Uuid,
    student_id: Uuid,
  ) -> impl Future<Output = Result<Vec<MenteeNote>, Self::Error>> + Send + '_;

  // ── Invitations ───────────────────────────────────────────────────────

  /// Persist a generated batch. Batches are small (bounded by the
  /// candidate pool) and inserted atomically.
  fn insert_invitations(
    &self,
    invitations: Vec<Invitation>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn get_invitation(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Invitation>, Self::Error>> + Send + '_;

  fn update_invitation(
    &self,
    invitation: Invitation,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// All invitations, for scheduler scans.
  fn list_invitations(
    &self,
  ) -> impl Future<Output = Result<Vec<Invitation>, Self::Error>> + Send + '_;

  fn invitations_for_subject(
    &self,
    subject_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Invitation>, Self::Error>> + Send + '_;

  fn invitations_for_candidate(
    &self,
    candidate_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Invitation>, Self::Error>> + Send + '_;

  // ── Events, lectures, competitions ────────────────────────────────────

  fn insert_event(
    &self,
    event: Event,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn get_event(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Event>, Self::Error>> + Send + '_;

  fn list_events(
    &self,
  ) -> impl Future<Output = Result<Vec<Event>, Self::Error>> + Send + '_;

  fn update_event(
    &self,
    event: Event,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn insert_lecture(
    &self,
    lecture: Lecture,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn get_lecture(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Lecture>, Self::Error>> + Send + '_;

  fn list_lectures(
    &self,
  ) -> impl Future<Output = Result<Vec<Lecture>, Self::Error>> + Send + '_;

  fn update_lecture(
    &self,
    lecture: Lecture,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn insert_competition(
    &self,
    competition: Competition,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn get_competition(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Competition>, Self::Error>> + Send + '_;

  fn list_competitions(
    &self,
  ) -> impl Future<Output = Result<Vec<Competition>, Self::Error>> + Send + '_;

  fn update_competition(
    &self,
    competition: Competition,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Teams ─────────────────────────────────────────────────────────────

  fn insert_team(
    &self,
    team: Team,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn teams_for_competition(
    &self,
    competition_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Team>, Self::Error>> + Send + '_;

  fn list_teams(
    &self,
  ) -> impl Future<Output = Result<Vec<Team>, Self::Error>> + Send + '_;

  // ── In-app notifications ──────────────────────────────────────────────

  fn push_notifications(
    &self,
    notifications: Vec<Notification>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// A user's inbox, newest first.
  fn notifications_for_user(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Notification>, Self::Error>> + Send + '_;

  fn unread_count(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  fn mark_read(
    &self,
    notification_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn mark_all_read(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
