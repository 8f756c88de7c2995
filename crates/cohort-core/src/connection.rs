//! Connection requests — the mentor/student lifecycle.
//!
//! A request moves through a small monotone state machine:
//! `pending → {accepted, declined}`, `accepted → confirmed`. `declined` and
//! `confirmed` are terminal; nothing ever returns to `pending`. The guards
//! here are pure; the service layer applies them check-then-apply under the
//! store's per-aggregate serialisation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Status machine ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
  Pending,
  Accepted,
  Declined,
  Confirmed,
}

/// A receiver's answer to a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
  Accept,
  Decline,
}

impl RequestStatus {
  /// Terminal states admit no further transitions and free the
  /// (sender, receiver) uniqueness slot.
  pub fn is_terminal(&self) -> bool {
    matches!(self, Self::Declined | Self::Confirmed)
  }

  /// Apply an accept/decline decision. Only valid from `Pending`.
  pub fn decide(self, decision: Decision) -> Result<Self> {
    match self {
      Self::Pending => Ok(match decision {
        Decision::Accept => Self::Accepted,
        Decision::Decline => Self::Declined,
      }),
      from => Err(Error::InvalidTransition { from }),
    }
  }

  /// Move an accepted request to `Confirmed` (session scheduled).
  pub fn confirm(self) -> Result<Self> {
    match self {
      Self::Accepted => Ok(Self::Confirmed),
      from => Err(Error::InvalidTransition { from }),
    }
  }
}

// ─── Request ─────────────────────────────────────────────────────────────────

/// A student-initiated ask to a mentor, tracked through its full lifecycle.
/// Never deleted; terminal requests remain as history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionRequest {
  pub request_id:    Uuid,
  pub sender_id:     Uuid,
  pub receiver_id:   Uuid,
  pub message:       String,
  pub status:        RequestStatus,
  /// Intersection of the two parties' skill sets, in the sender's order.
  pub shared_skills: Vec<String>,
  pub meeting_time:  Option<DateTime<Utc>>,
  pub meeting_link:  Option<String>,
  /// Derived calendar artifact, set when the session is confirmed.
  pub calendar_link: Option<String>,
  pub created_at:    DateTime<Utc>,
  pub updated_at:    Option<DateTime<Utc>>,
}

/// Meeting details supplied when a mentor confirms a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDetails {
  pub meeting_time:     DateTime<Utc>,
  pub meeting_link:     Option<String>,
  /// Defaults to 60 when unset.
  pub duration_minutes: Option<u32>,
}

/// Render a Google Calendar event-template URL for a confirmed session.
pub fn calendar_link(
  title: &str,
  details: &str,
  start: DateTime<Utc>,
  duration_minutes: u32,
  location: &str,
) -> String {
  let end = start + chrono::Duration::minutes(i64::from(duration_minutes));
  let fmt = "%Y%m%dT%H%M%SZ";
  format!(
    "https://calendar.google.com/calendar/render?action=TEMPLATE&text={}&details={}&dates={}/{}&location={}",
    urlencode(title),
    urlencode(details),
    start.format(fmt),
    end.format(fmt),
    urlencode(location),
  )
}

fn urlencode(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  for b in s.bytes() {
    match b {
      b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
        out.push(b as char)
      }
      b' ' => out.push('+'),
      _ => out.push_str(&format!("%{b:02X}")),
    }
  }
  out
}

// ─── Mentee notes ────────────────────────────────────────────────────────────

/// A private note a mentor keeps about one of their accepted mentees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenteeNote {
  pub note_id:    Uuid,
  pub mentor_id:  Uuid,
  pub student_id: Uuid,
  pub content:    String,
  pub created_at: DateTime<Utc>,
}
