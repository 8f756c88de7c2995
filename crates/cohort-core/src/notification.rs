//! In-app notifications — the per-user inbox records produced by the
//! notification dispatcher.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The feature area a notification originates from; drives inbox grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationTopic {
  EventMatch,
  Connection,
  Invitation,
  Badge,
}

/// One inbox entry. Append-only; the only mutation is the read flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
  pub notification_id: Uuid,
  pub user_id:         Uuid,
  pub topic:           NotificationTopic,
  pub message:         String,
  /// Relative link into the UI, e.g. an event RSVP page.
  pub link:            Option<String>,
  pub is_read:         bool,
  pub created_at:      DateTime<Utc>,
}
