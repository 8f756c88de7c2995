//! Shared fixtures for the service tests: a seeded in-memory store, a
//! pinned clock, and a notifier double that records every send.

use std::{
  collections::HashSet,
  sync::{Arc, Mutex},
};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use cohort_core::{
  clock::FixedClock,
  notify::{DispatchOutcome, Notifier, OutboundMessage},
  person::{Capability, Person, Role},
  store::EngagementStore,
};
use cohort_store_mem::MemStore;

/// All fixture timestamps hang off this instant.
pub fn epoch() -> DateTime<Utc> {
  "2026-03-01T12:00:00Z".parse().expect("valid timestamp")
}

pub fn fixed_clock() -> Arc<FixedClock> { Arc::new(FixedClock::at(epoch())) }

fn person(role: Role, capabilities: &[Capability], skills: &[&str]) -> Person {
  let id = Uuid::new_v4();
  Person {
    person_id:      id,
    name:           format!("person-{}", &id.to_string()[..8]),
    email:          format!("{}@example.edu", &id.to_string()[..8]),
    role,
    capabilities:   capabilities.iter().copied().collect(),
    skills:         skills.iter().map(|s| s.to_string()).collect(),
    badges:         vec![],
    last_active_at: None,
    created_at:     epoch(),
  }
}

pub fn student(skills: &[&str]) -> Person {
  person(Role::Student, &[], skills)
}

pub fn mentor(skills: &[&str]) -> Person {
  person(Role::Alumni, &[Capability::Mentor], skills)
}

pub fn judge(skills: &[&str]) -> Person {
  person(Role::Alumni, &[Capability::Judge], skills)
}

pub fn speaker(skills: &[&str]) -> Person {
  person(Role::Alumni, &[Capability::Speaker], skills)
}

pub async fn seeded_store(people: &[Person]) -> Arc<MemStore> {
  let store = Arc::new(MemStore::new());
  for p in people {
    store.add_person(p.clone()).await.expect("seed person");
  }
  store
}

/// A notifier that records sends and can be told to fail for specific
/// recipient addresses.
#[derive(Default)]
pub struct RecordingNotifier {
  sent:     Mutex<Vec<OutboundMessage>>,
  fail_for: Mutex<HashSet<String>>,
}

impl RecordingNotifier {
  pub fn sent(&self) -> Vec<OutboundMessage> {
    self.sent.lock().expect("notifier lock").clone()
  }

  pub fn fail_for(&self, email: &str) {
    self
      .fail_for
      .lock()
      .expect("notifier lock")
      .insert(email.to_owned());
  }
}

impl Notifier for RecordingNotifier {
  async fn send(&self, message: OutboundMessage) -> DispatchOutcome {
    let failing = self
      .fail_for
      .lock()
      .expect("notifier lock")
      .contains(&message.recipient_email);
    if failing {
      return DispatchOutcome::failed("simulated delivery failure");
    }
    self.sent.lock().expect("notifier lock").push(message);
    DispatchOutcome::delivered()
  }
}
