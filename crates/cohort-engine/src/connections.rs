//! The connection-request service — mentor/student lifecycle commands.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use cohort_core::{
  clock::Clock,
  connection::{
    ConnectionRequest, Decision, MenteeNote, SessionDetails, calendar_link,
  },
  matching::{self, MatchMode},
  notify::{MessageKind, Notifier, OutboundMessage},
  person::Person,
  store::EngagementStore,
};

use crate::{Error, Result, badges::BadgeEngine};

/// Commands over the connection-request state machine.
///
/// Every mutation is check-then-apply: the guard runs against a fresh read
/// of the aggregate and the caller serialises operations per request id.
pub struct ConnectionService<S, N, C> {
  store:    Arc<S>,
  notifier: Arc<N>,
  clock:    Arc<C>,
}

impl<S, N, C> ConnectionService<S, N, C>
where
  S: EngagementStore,
  N: Notifier,
  C: Clock,
{
  pub fn new(store: Arc<S>, notifier: Arc<N>, clock: Arc<C>) -> Self {
    Self { store, notifier, clock }
  }

  fn badge_engine(&self) -> BadgeEngine<S, C> {
    BadgeEngine::new(self.store.clone(), self.clock.clone())
  }

  async fn person(&self, id: Uuid) -> Result<Person> {
    self
      .store
      .get_person(id)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| cohort_core::Error::PersonNotFound(id).into())
  }

  // ── Commands ──────────────────────────────────────────────────────────

  /// A student sends a connection request to a mentor.
  ///
  /// Fails with `DuplicateRequest` if a non-terminal request already exists
  /// for the pair. The "new request" notification to the mentor is
  /// best-effort; a delivery failure never rolls back the request.
  pub async fn send(
    &self,
    sender_id: Uuid,
    receiver_id: Uuid,
    message: Option<String>,
  ) -> Result<ConnectionRequest> {
    let sender = self.person(sender_id).await?;
    let receiver = self.person(receiver_id).await?;

    if self
      .store
      .find_open_request(sender_id, receiver_id)
      .await
      .map_err(Error::store)?
      .is_some()
    {
      return Err(
        cohort_core::Error::DuplicateRequest {
          sender:   sender_id,
          receiver: receiver_id,
        }
        .into(),
      );
    }

    let shared_skills =
      matching::shared_skills(&sender.skills, &receiver.skills, MatchMode::Fuzzy);

    let now = self.clock.now();
    let request = ConnectionRequest {
      request_id: Uuid::new_v4(),
      sender_id,
      receiver_id,
      message: message.unwrap_or_else(|| {
        format!(
          "Hi {}, I would love to connect and learn from your experience.",
          receiver.name
        )
      }),
      status: cohort_core::connection::RequestStatus::Pending,
      shared_skills: shared_skills.clone(),
      meeting_time: None,
      meeting_link: None,
      calendar_link: None,
      created_at: now,
      updated_at: None,
    };
    self
      .store
      .insert_request(request.clone())
      .await
      .map_err(Error::store)?;
    self
      .store
      .touch_last_active(sender_id, now)
      .await
      .map_err(Error::store)?;
    info!(
      request_id = %request.request_id,
      sender = %sender_id,
      receiver = %receiver_id,
      "connection request created"
    );

    // Top three shared skills make the email personal without flooding it.
    let top_shared: Vec<&str> =
      shared_skills.iter().take(3).map(String::as_str).collect();
    let outcome = self
      .notifier
      .send(
        OutboundMessage::new(
          MessageKind::ConnectionRequest,
          &receiver.email,
          &receiver.name,
        )
        .field("student_name", &sender.name)
        .field("student_email", &sender.email)
        .field("shared_skills", top_shared.join(", ")),
      )
      .await;
    if !outcome.success {
      warn!(
        request_id = %request.request_id,
        reason = outcome.message.as_deref().unwrap_or("unknown"),
        "connection request notification failed"
      );
    }

    Ok(request)
  }

  /// The receiving mentor accepts or declines a pending request.
  ///
  /// Accepting re-evaluates badge rules for both parties.
  pub async fn respond(
    &self,
    request_id: Uuid,
    acting_user_id: Uuid,
    decision: Decision,
  ) -> Result<ConnectionRequest> {
    let mut request = self
      .store
      .get_request(request_id)
      .await
      .map_err(Error::store)?
      .ok_or(cohort_core::Error::RequestNotFound(request_id))?;

    if request.receiver_id != acting_user_id {
      return Err(
        cohort_core::Error::Unauthorized { actor: acting_user_id }.into(),
      );
    }

    request.status = request.status.decide(decision)?;
    let now = self.clock.now();
    request.updated_at = Some(now);
    self
      .store
      .update_request(request.clone())
      .await
      .map_err(Error::store)?;
    self
      .store
      .touch_last_active(acting_user_id, now)
      .await
      .map_err(Error::store)?;
    info!(
      request_id = %request_id,
      status = ?request.status,
      "connection request answered"
    );

    if decision == Decision::Accept {
      let badges = self.badge_engine();
      badges.evaluate(request.sender_id).await?;
      badges.evaluate(request.receiver_id).await?;
    }

    Ok(request)
  }

  /// The mentor schedules the session, moving an accepted request to its
  /// terminal `confirmed` state and deriving the calendar artifact.
  pub async fn confirm_session(
    &self,
    request_id: Uuid,
    acting_user_id: Uuid,
    details: SessionDetails,
  ) -> Result<ConnectionRequest> {
    let mut request = self
      .store
      .get_request(request_id)
      .await
      .map_err(Error::store)?
      .ok_or(cohort_core::Error::RequestNotFound(request_id))?;

    if request.receiver_id != acting_user_id {
      return Err(
        cohort_core::Error::Unauthorized { actor: acting_user_id }.into(),
      );
    }

    request.status = request.status.confirm()?;

    let student = self.person(request.sender_id).await?;
    let mentor = self.person(request.receiver_id).await?;

    let duration = details.duration_minutes.unwrap_or(60);
    request.calendar_link = Some(calendar_link(
      &format!("Mentorship Session: {}", student.name),
      &request.message,
      details.meeting_time,
      duration,
      details.meeting_link.as_deref().unwrap_or(""),
    ));
    request.meeting_time = Some(details.meeting_time);
    request.meeting_link = details.meeting_link;
    let now = self.clock.now();
    request.updated_at = Some(now);

    self
      .store
      .update_request(request.clone())
      .await
      .map_err(Error::store)?;
    self
      .store
      .touch_last_active(acting_user_id, now)
      .await
      .map_err(Error::store)?;
    info!(request_id = %request_id, "session confirmed");

    // Confirmation emails to both parties, best-effort.
    for (recipient, counterpart) in [(&student, &mentor), (&mentor, &student)] {
      let outcome = self
        .notifier
        .send(
          OutboundMessage::new(
            MessageKind::SessionConfirmed,
            &recipient.email,
            &recipient.name,
          )
          .field("counterpart_name", &counterpart.name)
          .field("meeting_time", details.meeting_time.to_rfc3339())
          .field(
            "meeting_link",
            request.meeting_link.as_deref().unwrap_or(""),
          ),
        )
        .await;
      if !outcome.success {
        warn!(
          request_id = %request_id,
          recipient = %recipient.email,
          "session confirmation notification failed"
        );
      }
    }

    let badges = self.badge_engine();
    badges.evaluate(request.sender_id).await?;
    badges.evaluate(request.receiver_id).await?;

    Ok(request)
  }

  // ── Mentee notes ──────────────────────────────────────────────────────

  /// Record a private note about a mentee. Only valid once an accepted or
  /// confirmed connection links the pair.
  pub async fn add_mentee_note(
    &self,
    mentor_id: Uuid,
    student_id: Uuid,
    content: &str,
  ) -> Result<MenteeNote> {
    let content = content.trim();
    if content.is_empty() {
      return Err(
        cohort_core::Error::Validation("note content cannot be empty".into())
          .into(),
      );
    }

    let connected = self
      .store
      .requests_by_receiver(mentor_id)
      .await
      .map_err(Error::store)?
      .iter()
      .any(|r| {
        r.sender_id == student_id
          && matches!(
            r.status,
            cohort_core::connection::RequestStatus::Accepted
              | cohort_core::connection::RequestStatus::Confirmed
          )
      });
    if !connected {
      return Err(cohort_core::Error::Unauthorized { actor: mentor_id }.into());
    }

    let note = MenteeNote {
      note_id:    Uuid::new_v4(),
      mentor_id,
      student_id,
      content:    content.to_owned(),
      created_at: self.clock.now(),
    };
    self
      .store
      .insert_note(note.clone())
      .await
      .map_err(Error::store)?;
    Ok(note)
  }

  /// A mentor's notes about one mentee, most recent first.
  pub async fn mentee_notes(
    &self,
    mentor_id: Uuid,
    student_id: Uuid,
  ) -> Result<Vec<MenteeNote>> {
    self
      .store
      .notes_for_pair(mentor_id, student_id)
      .await
      .map_err(Error::store)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testutil::{RecordingNotifier, fixed_clock, seeded_store, student, mentor};
  use cohort_core::connection::RequestStatus;
  use cohort_store_mem::MemStore;

  fn service(
    store: &Arc<MemStore>,
    notifier: &Arc<RecordingNotifier>,
  ) -> ConnectionService<MemStore, RecordingNotifier, cohort_core::clock::FixedClock>
  {
    ConnectionService::new(store.clone(), notifier.clone(), fixed_clock())
  }

  #[tokio::test]
  async fn send_creates_pending_request_with_shared_skills() {
    let s = student(&["Python", "SQL", "ML"]);
    let m = mentor(&["Python", "SQL"]);
    let store = seeded_store(&[s.clone(), m.clone()]).await;
    let notifier = Arc::new(RecordingNotifier::default());
    let svc = service(&store, &notifier);

    let request =
      svc.send(s.person_id, m.person_id, None).await.unwrap();
    assert_eq!(request.status, RequestStatus::Pending);
    assert_eq!(request.shared_skills, vec!["Python", "SQL"]);

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].kind, MessageKind::ConnectionRequest);
    assert_eq!(sent[0].recipient_email, m.email);
  }

  #[tokio::test]
  async fn send_rejects_duplicate_open_request() {
    let s = student(&["Python"]);
    let m = mentor(&["Python"]);
    let store = seeded_store(&[s.clone(), m.clone()]).await;
    let notifier = Arc::new(RecordingNotifier::default());
    let svc = service(&store, &notifier);

    svc.send(s.person_id, m.person_id, None).await.unwrap();
    let err = svc.send(s.person_id, m.person_id, None).await.unwrap_err();
    assert!(matches!(
      err,
      Error::Domain(cohort_core::Error::DuplicateRequest { .. })
    ));
  }

  #[tokio::test]
  async fn send_after_decline_is_allowed() {
    let s = student(&["Python"]);
    let m = mentor(&["Python"]);
    let store = seeded_store(&[s.clone(), m.clone()]).await;
    let notifier = Arc::new(RecordingNotifier::default());
    let svc = service(&store, &notifier);

    let first = svc.send(s.person_id, m.person_id, None).await.unwrap();
    svc
      .respond(first.request_id, m.person_id, Decision::Decline)
      .await
      .unwrap();
    assert!(svc.send(s.person_id, m.person_id, None).await.is_ok());
  }

  #[tokio::test]
  async fn send_to_unknown_receiver_fails() {
    let s = student(&["Python"]);
    let store = seeded_store(&[s.clone()]).await;
    let notifier = Arc::new(RecordingNotifier::default());
    let svc = service(&store, &notifier);

    let err = svc.send(s.person_id, Uuid::new_v4(), None).await.unwrap_err();
    assert!(matches!(
      err,
      Error::Domain(cohort_core::Error::PersonNotFound(_))
    ));
  }

  #[tokio::test]
  async fn notify_failure_does_not_roll_back_send() {
    let s = student(&["Python"]);
    let m = mentor(&["Python"]);
    let store = seeded_store(&[s.clone(), m.clone()]).await;
    let notifier = Arc::new(RecordingNotifier::default());
    notifier.fail_for(&m.email);
    let svc = service(&store, &notifier);

    let request = svc.send(s.person_id, m.person_id, None).await.unwrap();
    assert!(
      store
        .get_request(request.request_id)
        .await
        .unwrap()
        .is_some()
    );
  }

  #[tokio::test]
  async fn only_receiver_may_respond() {
    let s = student(&["Python"]);
    let m = mentor(&["Python"]);
    let store = seeded_store(&[s.clone(), m.clone()]).await;
    let notifier = Arc::new(RecordingNotifier::default());
    let svc = service(&store, &notifier);

    let request = svc.send(s.person_id, m.person_id, None).await.unwrap();
    let err = svc
      .respond(request.request_id, s.person_id, Decision::Accept)
      .await
      .unwrap_err();
    assert!(matches!(
      err,
      Error::Domain(cohort_core::Error::Unauthorized { .. })
    ));
  }

  #[tokio::test]
  async fn respond_on_terminal_request_fails_without_mutation() {
    let s = student(&["Python"]);
    let m = mentor(&["Python"]);
    let store = seeded_store(&[s.clone(), m.clone()]).await;
    let notifier = Arc::new(RecordingNotifier::default());
    let svc = service(&store, &notifier);

    let request = svc.send(s.person_id, m.person_id, None).await.unwrap();
    svc
      .respond(request.request_id, m.person_id, Decision::Decline)
      .await
      .unwrap();

    let err = svc
      .respond(request.request_id, m.person_id, Decision::Accept)
      .await
      .unwrap_err();
    assert!(matches!(
      err,
      Error::Domain(cohort_core::Error::InvalidTransition { .. })
    ));
    let stored = store.get_request(request.request_id).await.unwrap().unwrap();
    assert_eq!(stored.status, RequestStatus::Declined);
  }

  #[tokio::test]
  async fn confirm_requires_accepted_state() {
    let s = student(&["Python"]);
    let m = mentor(&["Python"]);
    let store = seeded_store(&[s.clone(), m.clone()]).await;
    let notifier = Arc::new(RecordingNotifier::default());
    let svc = service(&store, &notifier);

    let request = svc.send(s.person_id, m.person_id, None).await.unwrap();
    svc
      .respond(request.request_id, m.person_id, Decision::Decline)
      .await
      .unwrap();

    let details = SessionDetails {
      meeting_time:     "2026-03-02T15:00:00Z".parse().unwrap(),
      meeting_link:     Some("https://meet.example.com/abc".into()),
      duration_minutes: None,
    };
    let err = svc
      .confirm_session(request.request_id, m.person_id, details)
      .await
      .unwrap_err();
    assert!(matches!(
      err,
      Error::Domain(cohort_core::Error::InvalidTransition { .. })
    ));
  }

  #[tokio::test]
  async fn confirm_sets_meeting_and_calendar_artifact() {
    let s = student(&["Python"]);
    let m = mentor(&["Python"]);
    let store = seeded_store(&[s.clone(), m.clone()]).await;
    let notifier = Arc::new(RecordingNotifier::default());
    let svc = service(&store, &notifier);

    let request = svc.send(s.person_id, m.person_id, None).await.unwrap();
    svc
      .respond(request.request_id, m.person_id, Decision::Accept)
      .await
      .unwrap();

    let details = SessionDetails {
      meeting_time:     "2026-03-02T15:00:00Z".parse().unwrap(),
      meeting_link:     Some("https://meet.example.com/abc".into()),
      duration_minutes: Some(45),
    };
    let confirmed = svc
      .confirm_session(request.request_id, m.person_id, details)
      .await
      .unwrap();
    assert_eq!(confirmed.status, RequestStatus::Confirmed);
    assert!(confirmed.calendar_link.unwrap().contains("calendar.google.com"));

    // One request email plus two confirmation emails.
    let confirmations: Vec<_> = notifier
      .sent()
      .into_iter()
      .filter(|msg| msg.kind == MessageKind::SessionConfirmed)
      .collect();
    assert_eq!(confirmations.len(), 2);
  }

  #[tokio::test]
  async fn mentee_notes_require_connection_and_content() {
    let s = student(&["Python"]);
    let m = mentor(&["Python"]);
    let store = seeded_store(&[s.clone(), m.clone()]).await;
    let notifier = Arc::new(RecordingNotifier::default());
    let svc = service(&store, &notifier);

    // No accepted connection yet.
    let err = svc
      .add_mentee_note(m.person_id, s.person_id, "promising")
      .await
      .unwrap_err();
    assert!(matches!(
      err,
      Error::Domain(cohort_core::Error::Unauthorized { .. })
    ));

    let request = svc.send(s.person_id, m.person_id, None).await.unwrap();
    svc
      .respond(request.request_id, m.person_id, Decision::Accept)
      .await
      .unwrap();

    let err = svc
      .add_mentee_note(m.person_id, s.person_id, "   ")
      .await
      .unwrap_err();
    assert!(matches!(
      err,
      Error::Domain(cohort_core::Error::Validation(_))
    ));

    svc
      .add_mentee_note(m.person_id, s.person_id, "strong on fundamentals")
      .await
      .unwrap();
    let notes = svc.mentee_notes(m.person_id, s.person_id).await.unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].content, "strong on fundamentals");
  }
}
