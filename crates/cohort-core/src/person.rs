//! People — students, alumni, faculty — and the badges they earn.
//!
//! A person's primary role is exclusive, but alumni commonly hold extra
//! capabilities (mentoring, judging, speaking) on top of it. Matching and
//! invitation logic consult the capability set, never the role directly,
//! so a dedicated `Judge` account and an alumnus who judges are treated
//! uniformly.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Roles and capabilities ──────────────────────────────────────────────────

/// The primary account role of a person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
  Student,
  Alumni,
  Mentor,
  Judge,
  GuestSpeaker,
  Faculty,
  Admin,
}

/// An engagement capability a person may hold in addition to their role.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
  Mentor,
  Judge,
  Speaker,
}

// ─── Badges ──────────────────────────────────────────────────────────────────

/// The fixed catalogue of achievement badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeKind {
  /// First accepted or confirmed connection, on either side.
  FirstConnection,
  /// More than 3 accepted/confirmed requests received as a mentor.
  TopMentor,
  /// Member of the highest-scoring competition team (score > 0).
  Champion,
  /// Attended 3 or more lectures.
  ActiveParticipant,
  /// Attended more than 5 lectures or events.
  EventSuperfan,
}

impl BadgeKind {
  pub fn name(&self) -> &'static str {
    match self {
      Self::FirstConnection => "First Connection",
      Self::TopMentor => "Top Mentor",
      Self::Champion => "Champion",
      Self::ActiveParticipant => "Active Participant",
      Self::EventSuperfan => "Event Superfan",
    }
  }

  pub fn icon(&self) -> &'static str {
    match self {
      Self::FirstConnection => "🤝",
      Self::TopMentor => "⭐",
      Self::Champion => "🏆",
      Self::ActiveParticipant => "📚",
      Self::EventSuperfan => "🎉",
    }
  }
}

/// An awarded badge. Append-only — badges are never revoked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Badge {
  pub kind:      BadgeKind,
  pub earned_at: DateTime<Utc>,
}

// ─── Person ──────────────────────────────────────────────────────────────────

/// A directory entry. Created at signup, mutated by profile edits and badge
/// awards, never hard-deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
  pub person_id:      Uuid,
  pub name:           String,
  pub email:          String,
  pub role:           Role,
  pub capabilities:   BTreeSet<Capability>,
  /// Skills for students, expertise tags for alumni and faculty.
  pub skills:         Vec<String>,
  pub badges:         Vec<Badge>,
  pub last_active_at: Option<DateTime<Utc>>,
  pub created_at:     DateTime<Utc>,
}

impl Person {
  /// Whether this person can act in the given capacity.
  ///
  /// Dedicated roles imply their own capability, so a `Judge` account does
  /// not need an explicit entry in `capabilities`.
  pub fn has_capability(&self, capability: Capability) -> bool {
    if self.capabilities.contains(&capability) {
      return true;
    }
    matches!(
      (self.role, capability),
      (Role::Mentor, Capability::Mentor)
        | (Role::Judge, Capability::Judge)
        | (Role::GuestSpeaker, Capability::Speaker)
    )
  }

  pub fn has_badge(&self, kind: BadgeKind) -> bool {
    self.badges.iter().any(|b| b.kind == kind)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn alumnus(capabilities: &[Capability]) -> Person {
    Person {
      person_id:      Uuid::new_v4(),
      name:           "Jordan Vale".into(),
      email:          "jordan@example.com".into(),
      role:           Role::Alumni,
      capabilities:   capabilities.iter().copied().collect(),
      skills:         vec!["Finance".into()],
      badges:         vec![],
      last_active_at: None,
      created_at:     Utc::now(),
    }
  }

  #[test]
  fn alumni_capabilities_are_additive() {
    let p = alumnus(&[Capability::Mentor, Capability::Judge]);
    assert!(p.has_capability(Capability::Mentor));
    assert!(p.has_capability(Capability::Judge));
    assert!(!p.has_capability(Capability::Speaker));
  }

  #[test]
  fn dedicated_roles_imply_their_capability() {
    let mut p = alumnus(&[]);
    p.role = Role::GuestSpeaker;
    assert!(p.has_capability(Capability::Speaker));
    assert!(!p.has_capability(Capability::Judge));
  }
}
