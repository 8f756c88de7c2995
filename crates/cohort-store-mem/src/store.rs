//! [`MemStore`] — the in-memory implementation of [`EngagementStore`].

use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;
use uuid::Uuid;

use cohort_core::{
  activity::{Competition, Event, Lecture, Team},
  connection::{ConnectionRequest, MenteeNote},
  invitation::Invitation,
  notification::Notification,
  person::{Badge, Capability, Person, Role},
  store::EngagementStore,
};

use crate::{Error, Result};

// ─── Store ───────────────────────────────────────────────────────────────────

#[derive(Default)]
struct Collections {
  people:        HashMap<Uuid, Person>,
  requests:      HashMap<Uuid, ConnectionRequest>,
  notes:         Vec<MenteeNote>,
  invitations:   HashMap<Uuid, Invitation>,
  events:        HashMap<Uuid, Event>,
  lectures:      HashMap<Uuid, Lecture>,
  competitions:  HashMap<Uuid, Competition>,
  teams:         HashMap<Uuid, Team>,
  notifications: Vec<Notification>,
}

/// An engagement store held entirely in process memory.
///
/// Cloning is cheap — the collections are reference-counted behind one lock.
#[derive(Clone, Default)]
pub struct MemStore {
  inner: Arc<RwLock<Collections>>,
}

impl MemStore {
  pub fn new() -> Self { Self::default() }
}

fn sorted_desc_by_created<T, F>(mut items: Vec<T>, created_at: F) -> Vec<T>
where
  F: Fn(&T) -> chrono::DateTime<chrono::Utc>,
{
  items.sort_by_key(|i| std::cmp::Reverse(created_at(i)));
  items
}

impl EngagementStore for MemStore {
  type Error = Error;

  // ── People ────────────────────────────────────────────────────────────

  async fn add_person(&self, person: Person) -> Result<()> {
    let mut inner = self.inner.write().await;
    if inner.people.contains_key(&person.person_id) {
      return Err(Error::PersonExists(person.person_id));
    }
    inner.people.insert(person.person_id, person);
    Ok(())
  }

  async fn get_person(&self, id: Uuid) -> Result<Option<Person>> {
    Ok(self.inner.read().await.people.get(&id).cloned())
  }

  async fn list_people(&self, role: Option<Role>) -> Result<Vec<Person>> {
    let inner = self.inner.read().await;
    let mut people: Vec<Person> = inner
      .people
      .values()
      .filter(|p| role.is_none_or(|r| p.role == r))
      .cloned()
      .collect();
    people.sort_by_key(|p| p.person_id);
    Ok(people)
  }

  async fn find_by_capability(
    &self,
    capability: Capability,
  ) -> Result<Vec<Person>> {
    let inner = self.inner.read().await;
    let mut people: Vec<Person> = inner
      .people
      .values()
      .filter(|p| p.has_capability(capability))
      .cloned()
      .collect();
    people.sort_by_key(|p| p.person_id);
    Ok(people)
  }

  async fn search_people(&self, text: &str) -> Result<Vec<Person>> {
    let needle = text.trim().to_lowercase();
    if needle.is_empty() {
      return Ok(vec![]);
    }
    let inner = self.inner.read().await;
    let mut people: Vec<Person> = inner
      .people
      .values()
      .filter(|p| {
        p.name.to_lowercase().contains(&needle)
          || p.skills.iter().any(|s| s.to_lowercase().contains(&needle))
      })
      .cloned()
      .collect();
    people.sort_by_key(|p| p.person_id);
    Ok(people)
  }

  async fn append_badges(
    &self,
    person_id: Uuid,
    badges: &[Badge],
  ) -> Result<()> {
    let mut inner = self.inner.write().await;
    let person = inner
      .people
      .get_mut(&person_id)
      .ok_or(Error::PersonNotFound(person_id))?;
    person.badges.extend_from_slice(badges);
    Ok(())
  }

  async fn touch_last_active(
    &self,
    person_id: Uuid,
    at: chrono::DateTime<chrono::Utc>,
  ) -> Result<()> {
    let mut inner = self.inner.write().await;
    if let Some(person) = inner.people.get_mut(&person_id) {
      person.last_active_at = Some(at);
    }
    Ok(())
  }

  // ── Connection requests ───────────────────────────────────────────────

  async fn insert_request(&self, request: ConnectionRequest) -> Result<()> {
    self
      .inner
      .write()
      .await
      .requests
      .insert(request.request_id, request);
    Ok(())
  }

  async fn get_request(&self, id: Uuid) -> Result<Option<ConnectionRequest>> {
    Ok(self.inner.read().await.requests.get(&id).cloned())
  }

  async fn update_request(&self, request: ConnectionRequest) -> Result<()> {
    let mut inner = self.inner.write().await;
    if !inner.requests.contains_key(&request.request_id) {
      return Err(Error::RequestNotFound(request.request_id));
    }
    inner.requests.insert(request.request_id, request);
    Ok(())
  }

  async fn find_open_request(
    &self,
    sender_id: Uuid,
    receiver_id: Uuid,
  ) -> Result<Option<ConnectionRequest>> {
    let inner = self.inner.read().await;
    Ok(
      inner
        .requests
        .values()
        .find(|r| {
          r.sender_id == sender_id
            && r.receiver_id == receiver_id
            && !r.status.is_terminal()
        })
        .cloned(),
    )
  }

  async fn requests_by_sender(
    &self,
    sender_id: Uuid,
  ) -> Result<Vec<ConnectionRequest>> {
    let inner = self.inner.read().await;
    let requests = inner
      .requests
      .values()
      .filter(|r| r.sender_id == sender_id)
      .cloned()
      .collect();
    Ok(sorted_desc_by_created(requests, |r| r.created_at))
  }

  async fn requests_by_receiver(
    &self,
    receiver_id: Uuid,
  ) -> Result<Vec<ConnectionRequest>> {
    let inner = self.inner.read().await;
    let requests = inner
      .requests
      .values()
      .filter(|r| r.receiver_id == receiver_id)
      .cloned()
      .collect();
    Ok(sorted_desc_by_created(requests, |r| r.created_at))
  }

  // ── Mentee notes ──────────────────────────────────────────────────────

  async fn insert_note(&self, note: MenteeNote) -> Result<()> {
    self.inner.write().await.notes.push(note);
    Ok(())
  }

  async fn notes_for_pair(
    &self,
    mentor_id: Uuid,
    student_id: Uuid,
  ) -> Result<Vec<MenteeNote>> {
    let inner = self.inner.read().await;
    let notes = inner
      .notes
      .iter()
      .filter(|n| n.mentor_id == mentor_id && n.student_id == student_id)
      .cloned()
      .collect();
    Ok(sorted_desc_by_created(notes, |n| n.created_at))
  }

  // ── Invitations ───────────────────────────────────────────────────────

  async fn insert_invitations(
    &self,
    invitations: Vec<Invitation>,
  ) -> Result<()> {
    let mut inner = self.inner.write().await;
    for invitation in invitations {
      inner.invitations.insert(invitation.invitation_id, invitation);
    }
    Ok(())
  }

  async fn get_invitation(&self, id: Uuid) -> Result<Option<Invitation>> {
    Ok(self.inner.read().await.invitations.get(&id).cloned())
  }

  async fn update_invitation(&self, invitation: Invitation) -> Result<()> {
    let mut inner = self.inner.write().await;
    if !inner.invitations.contains_key(&invitation.invitation_id) {
      return Err(Error::InvitationNotFound(invitation.invitation_id));
    }
    inner.invitations.insert(invitation.invitation_id, invitation);
    Ok(())
  }

  async fn list_invitations(&self) -> Result<Vec<Invitation>> {
    let inner = self.inner.read().await;
    let invitations: Vec<Invitation> =
      inner.invitations.values().cloned().collect();
    Ok(sorted_desc_by_created(invitations, |i| i.sent_at))
  }

  async fn invitations_for_subject(
    &self,
    subject_id: Uuid,
  ) -> Result<Vec<Invitation>> {
    let inner = self.inner.read().await;
    let invitations = inner
      .invitations
      .values()
      .filter(|i| i.subject_id == subject_id)
      .cloned()
      .collect();
    Ok(sorted_desc_by_created(invitations, |i| i.sent_at))
  }

  async fn invitations_for_candidate(
    &self,
    candidate_id: Uuid,
  ) -> Result<Vec<Invitation>> {
    let inner = self.inner.read().await;
    let invitations = inner
      .invitations
      .values()
      .filter(|i| i.candidate_id == candidate_id)
      .cloned()
      .collect();
    Ok(sorted_desc_by_created(invitations, |i| i.sent_at))
  }

  // ── Events, lectures, competitions ────────────────────────────────────

  async fn insert_event(&self, event: Event) -> Result<()> {
    self.inner.write().await.events.insert(event.event_id, event);
    Ok(())
  }

  async fn get_event(&self, id: Uuid) -> Result<Option<Event>> {
    Ok(self.inner.read().await.events.get(&id).cloned())
  }

  async fn list_events(&self) -> Result<Vec<Event>> {
    let inner = self.inner.read().await;
    let events: Vec<Event> = inner.events.values().cloned().collect();
    Ok(sorted_desc_by_created(events, |e| e.created_at))
  }

  async fn update_event(&self, event: Event) -> Result<()> {
    let mut inner = self.inner.write().await;
    if !inner.events.contains_key(&event.event_id) {
      return Err(Error::EventNotFound(event.event_id));
    }
    inner.events.insert(event.event_id, event);
    Ok(())
  }

  async fn insert_lecture(&self, lecture: Lecture) -> Result<()> {
    self
      .inner
      .write()
      .await
      .lectures
      .insert(lecture.lecture_id, lecture);
    Ok(())
  }

  async fn get_lecture(&self, id: Uuid) -> Result<Option<Lecture>> {
    Ok(self.inner.read().await.lectures.get(&id).cloned())
  }

  async fn list_lectures(&self) -> Result<Vec<Lecture>> {
    let inner = self.inner.read().await;
    let lectures: Vec<Lecture> = inner.lectures.values().cloned().collect();
    Ok(sorted_desc_by_created(lectures, |l| l.created_at))
  }

  async fn update_lecture(&self, lecture: Lecture) -> Result<()> {
    let mut inner = self.inner.write().await;
    if !inner.lectures.contains_key(&lecture.lecture_id) {
      return Err(Error::LectureNotFound(lecture.lecture_id));
    }
    inner.lectures.insert(lecture.lecture_id, lecture);
    Ok(())
  }

  async fn insert_competition(&self, competition: Competition) -> Result<()> {
    self
      .inner
      .write()
      .await
      .competitions
      .insert(competition.competition_id, competition);
    Ok(())
  }

  async fn get_competition(&self, id: Uuid) -> Result<Option<Competition>> {
    Ok(self.inner.read().await.competitions.get(&id).cloned())
  }

  async fn list_competitions(&self) -> Result<Vec<Competition>> {
    let inner = self.inner.read().await;
    let competitions: Vec<Competition> =
      inner.competitions.values().cloned().collect();
    Ok(sorted_desc_by_created(competitions, |c| c.created_at))
  }

  async fn update_competition(&self, competition: Competition) -> Result<()> {
    let mut inner = self.inner.write().await;
    if !inner.competitions.contains_key(&competition.competition_id) {
      return Err(Error::CompetitionNotFound(competition.competition_id));
    }
    inner
      .competitions
      .insert(competition.competition_id, competition);
    Ok(())
  }

  // ── Teams ─────────────────────────────────────────────────────────────

  async fn insert_team(&self, team: Team) -> Result<()> {
    self.inner.write().await.teams.insert(team.team_id, team);
    Ok(())
  }

  async fn teams_for_competition(
    &self,
    competition_id: Uuid,
  ) -> Result<Vec<Team>> {
    let inner = self.inner.read().await;
    let mut teams: Vec<Team> = inner
      .teams
      .values()
      .filter(|t| t.competition_id == competition_id)
      .cloned()
      .collect();
    teams.sort_by_key(|t| t.team_id);
    Ok(teams)
  }

  async fn list_teams(&self) -> Result<Vec<Team>> {
    let inner = self.inner.read().await;
    let mut teams: Vec<Team> = inner.teams.values().cloned().collect();
    teams.sort_by_key(|t| t.team_id);
    Ok(teams)
  }

  // ── In-app notifications ──────────────────────────────────────────────

  async fn push_notifications(
    &self,
    notifications: Vec<Notification>,
  ) -> Result<()> {
    self.inner.write().await.notifications.extend(notifications);
    Ok(())
  }

  async fn notifications_for_user(
    &self,
    user_id: Uuid,
  ) -> Result<Vec<Notification>> {
    let inner = self.inner.read().await;
    let notifications = inner
      .notifications
      .iter()
      .filter(|n| n.user_id == user_id)
      .cloned()
      .collect();
    Ok(sorted_desc_by_created(notifications, |n| n.created_at))
  }

  async fn unread_count(&self, user_id: Uuid) -> Result<usize> {
    let inner = self.inner.read().await;
    Ok(
      inner
        .notifications
        .iter()
        .filter(|n| n.user_id == user_id && !n.is_read)
        .count(),
    )
  }

  async fn mark_read(&self, notification_id: Uuid) -> Result<()> {
    let mut inner = self.inner.write().await;
    let notification = inner
      .notifications
      .iter_mut()
      .find(|n| n.notification_id == notification_id)
      .ok_or(Error::NotificationNotFound(notification_id))?;
    notification.is_read = true;
    Ok(())
  }

  async fn mark_all_read(&self, user_id: Uuid) -> Result<()> {
    let mut inner = self.inner.write().await;
    for notification in
      inner.notifications.iter_mut().filter(|n| n.user_id == user_id)
    {
      notification.is_read = true;
    }
    Ok(())
  }
}
