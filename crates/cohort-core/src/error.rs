//! Error types for `cohort-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::connection::RequestStatus;

#[derive(Debug, Error)]
pub enum Error {
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

  #[error("a non-terminal request already exists between {sender} and {receiver}")]
  DuplicateRequest { sender: Uuid, receiver: Uuid },

  #[error("user {actor} is not entitled to act on this aggregate")]
  Unauthorized { actor: Uuid },

  #[error("invalid transition from {from:?}")]
  InvalidTransition { from: RequestStatus },

  #[error("invitation already acknowledged")]
  AlreadyAcknowledged,

  #[error("invitation already answered")]
  AlreadyAnswered,

  #[error("validation failed: {0}")]
  Validation(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
