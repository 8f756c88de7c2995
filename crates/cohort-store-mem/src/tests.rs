//! Integration tests for `MemStore` against the full store trait.

use chrono::{Duration, Utc};
use uuid::Uuid;

use cohort_core::{
  activity::Team,
  connection::{ConnectionRequest, MenteeNote, RequestStatus},
  invitation::{Invitation, InvitationKind, InvitationStatus},
  notification::{Notification, NotificationTopic},
  person::{Badge, BadgeKind, Capability, Person, Role},
  store::EngagementStore,
};

use crate::MemStore;

fn person(role: Role, capabilities: &[Capability]) -> Person {
  Person {
    person_id:      Uuid::new_v4(),
    name:           "Avery Chen".into(),
    email:          "avery@example.edu".into(),
    role,
    capabilities:   capabilities.iter().copied().collect(),
    skills:         vec!["Python".into(), "SQL".into()],
    badges:         vec![],
    last_active_at: None,
    created_at:     Utc::now(),
  }
}

fn request(sender: Uuid, receiver: Uuid) -> ConnectionRequest {
  ConnectionRequest {
    request_id:    Uuid::new_v4(),
    sender_id:     sender,
    receiver_id:   receiver,
    message:       "Would love to connect.".into(),
    status:        RequestStatus::Pending,
    shared_skills: vec!["Python".into()],
    meeting_time:  None,
    meeting_link:  None,
    calendar_link: None,
    created_at:    Utc::now(),
    updated_at:    None,
  }
}

fn invitation(subject: Uuid, candidate: Uuid) -> Invitation {
  let now = Utc::now();
  Invitation {
    invitation_id:     Uuid::new_v4(),
    kind:              InvitationKind::Judge,
    subject_id:        subject,
    candidate_id:      candidate,
    matched_skills:    vec!["Finance".into()],
    match_reason:      "Matched based on your expertise in Finance".into(),
    status:            InvitationStatus::Pending,
    sent_at:           now,
    acknowledged_at:   None,
    follow_up_count:   0,
    last_contacted_at: now,
    responded_at:      None,
  }
}

// ─── People ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_person() {
  let store = MemStore::new();
  let p = person(Role::Student, &[]);
  store.add_person(p.clone()).await.unwrap();

  let fetched = store.get_person(p.person_id).await.unwrap().unwrap();
  assert_eq!(fetched.person_id, p.person_id);
  assert_eq!(fetched.role, Role::Student);
}

#[tokio::test]
async fn duplicate_person_id_rejected() {
  let store = MemStore::new();
  let p = person(Role::Student, &[]);
  store.add_person(p.clone()).await.unwrap();
  assert!(store.add_person(p).await.is_err());
}

#[tokio::test]
async fn capability_pool_includes_dedicated_roles_and_flagged_alumni() {
  let store = MemStore::new();
  store
    .add_person(person(Role::Alumni, &[Capability::Judge]))
    .await
    .unwrap();
  store.add_person(person(Role::Judge, &[])).await.unwrap();
  store.add_person(person(Role::Student, &[])).await.unwrap();

  let judges = store.find_by_capability(Capability::Judge).await.unwrap();
  assert_eq!(judges.len(), 2);
}

#[tokio::test]
async fn search_matches_name_and_skills() {
  let store = MemStore::new();
  let mut p = person(Role::Student, &[]);
  p.name = "Morgan Diaz".into();
  p.skills = vec!["Cybersecurity".into()];
  store.add_person(p).await.unwrap();

  assert_eq!(store.search_people("morgan").await.unwrap().len(), 1);
  assert_eq!(store.search_people("cyber").await.unwrap().len(), 1);
  assert_eq!(store.search_people("finance").await.unwrap().len(), 0);
  assert!(store.search_people("  ").await.unwrap().is_empty());
}

#[tokio::test]
async fn badges_append_to_person() {
  let store = MemStore::new();
  let p = person(Role::Student, &[]);
  store.add_person(p.clone()).await.unwrap();

  let badge = Badge { kind: BadgeKind::FirstConnection, earned_at: Utc::now() };
  store.append_badges(p.person_id, &[badge]).await.unwrap();

  let fetched = store.get_person(p.person_id).await.unwrap().unwrap();
  assert_eq!(fetched.badges.len(), 1);
  assert!(fetched.has_badge(BadgeKind::FirstConnection));
}

#[tokio::test]
async fn touch_last_active_stamps_and_ignores_unknown_ids() {
  let store = MemStore::new();
  let p = person(Role::Student, &[]);
  store.add_person(p.clone()).await.unwrap();

  let at = Utc::now();
  store.touch_last_active(p.person_id, at).await.unwrap();
  let fetched = store.get_person(p.person_id).await.unwrap().unwrap();
  assert_eq!(fetched.last_active_at, Some(at));

  // A ghost id is a no-op, not an error.
  assert!(store.touch_last_active(Uuid::new_v4(), at).await.is_ok());
}

// ─── Connection requests ─────────────────────────────────────────────────────

#[tokio::test]
async fn open_request_lookup_ignores_terminal_states() {
  let store = MemStore::new();
  let (sender, receiver) = (Uuid::new_v4(), Uuid::new_v4());

  let mut r = request(sender, receiver);
  store.insert_request(r.clone()).await.unwrap();
  assert!(
    store
      .find_open_request(sender, receiver)
      .await
      .unwrap()
      .is_some()
  );

  r.status = RequestStatus::Declined;
  store.update_request(r).await.unwrap();
  assert!(
    store
      .find_open_request(sender, receiver)
      .await
      .unwrap()
      .is_none()
  );
}

#[tokio::test]
async fn open_request_lookup_is_directional() {
  let store = MemStore::new();
  let (sender, receiver) = (Uuid::new_v4(), Uuid::new_v4());
  store.insert_request(request(sender, receiver)).await.unwrap();

  assert!(
    store
      .find_open_request(receiver, sender)
      .await
      .unwrap()
      .is_none()
  );
}

#[tokio::test]
async fn requests_listed_per_party_newest_first() {
  let store = MemStore::new();
  let (sender, receiver) = (Uuid::new_v4(), Uuid::new_v4());

  let mut older = request(sender, receiver);
  older.created_at = Utc::now() - Duration::hours(2);
  older.status = RequestStatus::Declined;
  let newer = request(sender, receiver);

  store.insert_request(older.clone()).await.unwrap();
  store.insert_request(newer.clone()).await.unwrap();

  let sent = store.requests_by_sender(sender).await.unwrap();
  assert_eq!(sent.len(), 2);
  assert_eq!(sent[0].request_id, newer.request_id);

  let received = store.requests_by_receiver(receiver).await.unwrap();
  assert_eq!(received.len(), 2);
}

#[tokio::test]
async fn update_missing_request_errors() {
  let store = MemStore::new();
  let r = request(Uuid::new_v4(), Uuid::new_v4());
  assert!(store.update_request(r).await.is_err());
}

// ─── Mentee notes ────────────────────────────────────────────────────────────

#[tokio::test]
async fn notes_filtered_by_pair_newest_first() {
  let store = MemStore::new();
  let (mentor, student, other) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

  for (offset, content) in [(2, "first session"), (1, "second session")] {
    store
      .insert_note(MenteeNote {
        note_id:    Uuid::new_v4(),
        mentor_id:  mentor,
        student_id: student,
        content:    content.into(),
        created_at: Utc::now() - Duration::hours(offset),
      })
      .await
      .unwrap();
  }
  store
    .insert_note(MenteeNote {
      note_id:    Uuid::new_v4(),
      mentor_id:  mentor,
      student_id: other,
      content:    "different mentee".into(),
      created_at: Utc::now(),
    })
    .await
    .unwrap();

  let notes = store.notes_for_pair(mentor, student).await.unwrap();
  assert_eq!(notes.len(), 2);
  assert_eq!(notes[0].content, "second session");
}

// ─── Invitations ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn invitation_batch_round_trip() {
  let store = MemStore::new();
  let subject = Uuid::new_v4();
  let batch = vec![
    invitation(subject, Uuid::new_v4()),
    invitation(subject, Uuid::new_v4()),
    invitation(Uuid::new_v4(), Uuid::new_v4()),
  ];
  store.insert_invitations(batch.clone()).await.unwrap();

  assert_eq!(store.list_invitations().await.unwrap().len(), 3);
  assert_eq!(
    store.invitations_for_subject(subject).await.unwrap().len(),
    2
  );

  let candidate = batch[0].candidate_id;
  let mine = store.invitations_for_candidate(candidate).await.unwrap();
  assert_eq!(mine.len(), 1);
  assert_eq!(mine[0].invitation_id, batch[0].invitation_id);
}

#[tokio::test]
async fn invitation_updates_persist() {
  let store = MemStore::new();
  let mut inv = invitation(Uuid::new_v4(), Uuid::new_v4());
  store.insert_invitations(vec![inv.clone()]).await.unwrap();

  inv.status = InvitationStatus::UnderReview;
  inv.follow_up_count = 1;
  store.update_invitation(inv.clone()).await.unwrap();

  let fetched = store
    .get_invitation(inv.invitation_id)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(fetched.status, InvitationStatus::UnderReview);
  assert_eq!(fetched.follow_up_count, 1);
}

// ─── Teams ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn teams_scoped_to_their_competition() {
  let store = MemStore::new();
  let competition = Uuid::new_v4();

  for name in ["Alpha", "Beta"] {
    store
      .insert_team(Team {
        team_id:        Uuid::new_v4(),
        competition_id: competition,
        name:           name.into(),
        member_ids:     vec![Uuid::new_v4()],
        score:          None,
      })
      .await
      .unwrap();
  }
  store
    .insert_team(Team {
      team_id:        Uuid::new_v4(),
      competition_id: Uuid::new_v4(),
      name:           "Elsewhere".into(),
      member_ids:     vec![],
      score:          Some(80.0),
    })
    .await
    .unwrap();

  assert_eq!(
    store.teams_for_competition(competition).await.unwrap().len(),
    2
  );
  assert_eq!(store.list_teams().await.unwrap().len(), 3);
}

// ─── In-app notifications ────────────────────────────────────────────────────

#[tokio::test]
async fn inbox_and_read_marking() {
  let store = MemStore::new();
  let user = Uuid::new_v4();

  let entries: Vec<Notification> = (0..3)
    .map(|i| Notification {
      notification_id: Uuid::new_v4(),
      user_id:         user,
      topic:           NotificationTopic::EventMatch,
      message:         format!("match {i}"),
      link:            None,
      is_read:         false,
      created_at:      Utc::now() - Duration::minutes(i),
    })
    .collect();
  store.push_notifications(entries.clone()).await.unwrap();

  assert_eq!(store.unread_count(user).await.unwrap(), 3);

  let inbox = store.notifications_for_user(user).await.unwrap();
  assert_eq!(inbox[0].message, "match 0");

  store.mark_read(entries[0].notification_id).await.unwrap();
  assert_eq!(store.unread_count(user).await.unwrap(), 2);

  store.mark_all_read(user).await.unwrap();
  assert_eq!(store.unread_count(user).await.unwrap(), 0);
}
