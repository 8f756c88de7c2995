//! Error type for `cohort-store-mem`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("person already exists: {0}")]
  PersonExists(Uuid),

  #[error("person not found: {0}")]
  PersonNotFound(Uuid),

  #[error("connection request not found: {0}")]
  RequestNotFound(Uuid),

  #[error("invitation not found: {0}")]
  InvitationNotFound(Uuid),

  #[error("event not found: {0}")]
  EventNotFound(Uuid),

  #[error("lecture not found: {0}")]
  LectureNotFound(Uuid),

  #[error("competition not found: {0}")]
  CompetitionNotFound(Uuid),

  #[error("notification not found: {0}")]
  NotificationNotFound(Uuid),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
