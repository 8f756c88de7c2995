//! The outbound notifier port.
//!
//! Engagement commands treat delivery as best-effort: a failed send is
//! logged and surfaced in a report, never rolled back into the state change
//! that preceded it. Production backends wrap a mail provider; tests use a
//! recording double.

use std::{collections::BTreeMap, future::Future};

use serde::{Deserialize, Serialize};

/// The template an outbound notification renders with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
  ConnectionRequest,
  SessionConfirmed,
  JudgeInvitation,
  SpeakerInvitation,
  InvitationFollowUp,
  InvitationAcknowledged,
  SpeakerThankYou,
  JudgeThankYou,
}

/// A rendered-template request handed to the notifier backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboundMessage {
  pub kind:            MessageKind,
  pub recipient_email: String,
  pub recipient_name:  String,
  /// Free-form template fields (subject title, matched skills, ...).
  pub fields:          BTreeMap<String, String>,
}

impl OutboundMessage {
  pub fn new(
    kind: MessageKind,
    recipient_email: impl Into<String>,
    recipient_name: impl Into<String>,
  ) -> Self {
    Self {
      kind,
      recipient_email: recipient_email.into(),
      recipient_name: recipient_name.into(),
      fields: BTreeMap::new(),
    }
  }

  pub fn field(
    mut self,
    key: impl Into<String>,
    value: impl Into<String>,
  ) -> Self {
    self.fields.insert(key.into(), value.into());
    self
  }
}

/// The backend's verdict on one send attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchOutcome {
  pub success: bool,
  pub message: Option<String>,
}

impl DispatchOutcome {
  pub fn delivered() -> Self { Self { success: true, message: None } }

  pub fn failed(message: impl Into<String>) -> Self {
    Self { success: false, message: Some(message.into()) }
  }
}

/// Abstraction over an outbound notification channel (email, push, ...).
///
/// Implementations must be infallible at the type level: delivery problems
/// are reported through [`DispatchOutcome`], not errors, because callers
/// never roll back state on a failed send.
pub trait Notifier: Send + Sync {
  fn send(
    &self,
    message: OutboundMessage,
  ) -> impl Future<Output = DispatchOutcome> + Send + '_;
}
