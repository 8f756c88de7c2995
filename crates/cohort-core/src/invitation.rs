//! Invitations — outbound asks to judges and speakers.
//!
//! Invitations are created in bulk by the invitation engine, nudged by the
//! follow-up pass, and answered by the candidate. `accepted` and `declined`
//! are terminal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::person::Capability;

/// What the candidate is being asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvitationKind {
  /// Judge a case competition.
  Judge,
  /// Speak at a guest lecture.
  Speaker,
}

impl InvitationKind {
  /// The capability a candidate must hold to receive this invitation.
  pub fn required_capability(&self) -> Capability {
    match self {
      Self::Judge => Capability::Judge,
      Self::Speaker => Capability::Speaker,
    }
  }

  /// How many invitations to create per subject. Speaker searches cap at
  /// the top five matches; judge pools are already small.
  pub fn selection_limit(&self) -> Option<usize> {
    match self {
      Self::Judge => None,
      Self::Speaker => Some(5),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvitationStatus {
  Pending,
  /// The candidate acknowledged receipt and is considering.
  UnderReview,
  Accepted,
  Declined,
}

impl InvitationStatus {
  pub fn is_terminal(&self) -> bool {
    matches!(self, Self::Accepted | Self::Declined)
  }

  /// Still awaiting an answer — eligible for follow-up nudges.
  pub fn awaiting_response(&self) -> bool { !self.is_terminal() }
}

/// An outbound ask to a candidate, tied to a competition or lecture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invitation {
  pub invitation_id:   Uuid,
  pub kind:            InvitationKind,
  /// The competition (judge) or lecture (speaker) this invitation is for.
  pub subject_id:      Uuid,
  pub candidate_id:    Uuid,
  /// The skill/expertise tags that caused the match, in subject order.
  pub matched_skills:  Vec<String>,
  /// Human-readable explanation shown to the candidate.
  pub match_reason:    String,
  pub status:          InvitationStatus,
  pub sent_at:         DateTime<Utc>,
  /// When the candidate acknowledged receipt, if they have.
  pub acknowledged_at: Option<DateTime<Utc>>,
  /// Number of follow-up nudges sent so far.
  pub follow_up_count: u32,
  /// When the last outbound contact (initial send or follow-up) happened.
  pub last_contacted_at: DateTime<Utc>,
  pub responded_at:    Option<DateTime<Utc>>,
}
