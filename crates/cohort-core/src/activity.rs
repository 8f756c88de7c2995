//! Events, guest lectures, case competitions, and competition teams.
//!
//! These aggregates own their idempotency markers: the scheduler flips
//! `appreciation_sent` exactly once per subject, so re-running a pass can
//! never double-send regardless of external caches.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Events ──────────────────────────────────────────────────────────────────

/// A one-off engagement event (workshop, networking night, career fair).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
  pub event_id:          Uuid,
  pub title:             String,
  pub description:       String,
  pub date:              DateTime<Utc>,
  pub location:          String,
  /// Skill tags used to match student interests for in-app notifications.
  pub related_skills:    Vec<String>,
  /// Accepted guest speakers assigned to this event.
  pub speakers:          Vec<Uuid>,
  pub rsvp_list:         Vec<Uuid>,
  pub attendance_list:   Vec<Uuid>,
  /// Set once the post-event thank-you pass has processed this event.
  pub appreciation_sent: bool,
  pub created_at:        DateTime<Utc>,
}

impl Event {
  /// Whether the event concluded before `now`.
  pub fn concluded_by(&self, now: DateTime<Utc>) -> bool { self.date < now }
}

// ─── Lectures ────────────────────────────────────────────────────────────────

/// A faculty-hosted guest lecture. Speaker slots are filled through the
/// invitation engine; attendance feeds the badge rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lecture {
  pub lecture_id:      Uuid,
  pub title:           String,
  pub description:     String,
  /// Topics the lecture covers; matched against speaker expertise.
  pub topic_tags:      Vec<String>,
  pub date:            DateTime<Utc>,
  pub professor_id:    Uuid,
  pub rsvp_list:       Vec<Uuid>,
  pub attendance_list: Vec<Uuid>,
  pub created_at:      DateTime<Utc>,
}

// ─── Competitions ────────────────────────────────────────────────────────────

/// A case competition. Judge slots are filled through the invitation engine;
/// team scores feed the Champion badge rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Competition {
  pub competition_id:    Uuid,
  pub name:              String,
  pub description:       String,
  /// Expertise tags a judge should cover.
  pub required_expertise: Vec<String>,
  /// Registration/submission deadline.
  pub deadline:          DateTime<Utc>,
  /// When judging wraps up. Falls back to `deadline` when unset.
  pub end_date:          Option<DateTime<Utc>>,
  /// Accepted judges assigned to this competition.
  pub judges:            Vec<Uuid>,
  /// Set once the judge thank-you pass has processed this competition.
  pub appreciation_sent: bool,
  pub created_at:        DateTime<Utc>,
}

impl Competition {
  /// The moment after which judges are owed a thank-you.
  pub fn effective_end(&self) -> DateTime<Utc> {
    self.end_date.unwrap_or(self.deadline)
  }

  pub fn concluded_by(&self, now: DateTime<Utc>) -> bool {
    self.effective_end() < now
  }
}

/// A registered competition team. `score` is set once judging completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
  pub team_id:        Uuid,
  pub competition_id: Uuid,
  pub name:           String,
  pub member_ids:     Vec<Uuid>,
  pub score:          Option<f64>,
}
