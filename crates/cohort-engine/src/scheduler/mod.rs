//! Background engagement passes: follow-up nudges for unanswered
//! invitations and post-event thank-yous.
//!
//! Both passes are re-entrant-safe. A `tokio::sync::Mutex` per pass makes a
//! second concurrent run report [`PassRun::AlreadyRunning`] instead of
//! double-sending, and each pass is idempotent against its own markers
//! (`follow_up_count` / `last_contacted_at` for follow-ups,
//! `appreciation_sent` for thank-yous), so a restarted run picks up where
//! the previous one stopped.

mod appreciation;
mod followup;

use std::sync::{
  Arc,
  atomic::{AtomicBool, Ordering},
};

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use cohort_core::{
  clock::Clock, notify::MessageKind, notify::Notifier, store::EngagementStore,
};

pub use followup::FollowUpConfig;

/// Cooperative cancellation for a running pass. Cancellation is observed at
/// subject boundaries; a partially-notified subject is always finished so
/// its idempotency marker can be written.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
  pub fn new() -> Self { Self::default() }

  pub fn cancel(&self) { self.0.store(true, Ordering::SeqCst); }

  pub fn is_cancelled(&self) -> bool { self.0.load(Ordering::SeqCst) }
}

/// One successful outbound send.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentRecord {
  pub subject_id:   Uuid,
  pub recipient_id: Uuid,
  pub kind:         MessageKind,
}

/// One send the pass decided against, and why.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkipRecord {
  pub subject_id:   Uuid,
  /// Unset when the whole subject was skipped rather than one recipient.
  pub recipient_id: Option<Uuid>,
  pub reason:       String,
}

/// What one completed pass did.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PassOutcome {
  pub sent:    Vec<SentRecord>,
  pub skipped: Vec<SkipRecord>,
}

/// The result of asking for a pass to run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "outcome")]
pub enum PassRun {
  Completed(PassOutcome),
  /// Another run of the same pass holds the gate.
  AlreadyRunning,
}

impl PassRun {
  /// The outcome of a completed run; panics on `AlreadyRunning`. Test-side
  /// convenience.
  #[cfg(test)]
  pub fn unwrap_completed(self) -> PassOutcome {
    match self {
      Self::Completed(outcome) => outcome,
      Self::AlreadyRunning => panic!("pass did not run"),
    }
  }
}

pub struct Scheduler<S, N, C> {
  store:             Arc<S>,
  notifier:          Arc<N>,
  clock:             Arc<C>,
  follow_up_gate:    Mutex<()>,
  appreciation_gate: Mutex<()>,
}

impl<S, N, C> Scheduler<S, N, C>
where
  S: EngagementStore,
  N: Notifier,
  C: Clock,
{
  pub fn new(store: Arc<S>, notifier: Arc<N>, clock: Arc<C>) -> Self {
    Self {
      store,
      notifier,
      clock,
      follow_up_gate: Mutex::new(()),
      appreciation_gate: Mutex::new(()),
    }
  }
}
