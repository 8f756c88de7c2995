//! In-app notification fan-out: when a new event is announced, every
//! student whose skills overlap the event's tags gets an inbox entry.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use cohort_core::{
  clock::Clock,
  matching::{self, MatchMode},
  notification::{Notification, NotificationTopic},
  person::Role,
  store::EngagementStore,
};

use crate::{Error, Result};

/// One matched student from an announcement run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMatch {
  pub student_id:     Uuid,
  pub matched_skills: Vec<String>,
}

/// The result of one announcement fan-out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnouncementReport {
  pub event_id: Uuid,
  pub matches:  Vec<EventMatch>,
  pub notified: usize,
}

pub struct NotificationDispatcher<S, C> {
  store: Arc<S>,
  clock: Arc<C>,
}

impl<S, C> NotificationDispatcher<S, C>
where
  S: EngagementStore,
  C: Clock,
{
  pub fn new(store: Arc<S>, clock: Arc<C>) -> Self { Self { store, clock } }

  /// Fan an event announcement out to every student whose skills intersect
  /// the event's related tags. Matching is exact (case-insensitive): tag
  /// fan-out should not guess at substring relationships.
  pub async fn announce_event(
    &self,
    event_id: Uuid,
  ) -> Result<AnnouncementReport> {
    let event = self
      .store
      .get_event(event_id)
      .await
      .map_err(Error::store)?
      .ok_or(cohort_core::Error::EventNotFound(event_id))?;

    let students = self
      .store
      .list_people(Some(Role::Student))
      .await
      .map_err(Error::store)?;

    let now = self.clock.now();
    let mut matches = Vec::new();
    let mut notifications = Vec::new();
    for student in &students {
      let matched = matching::shared_skills(
        &student.skills,
        &event.related_skills,
        MatchMode::Exact,
      );
      let Some(first) = matched.first() else { continue };
      notifications.push(Notification {
        notification_id: Uuid::new_v4(),
        user_id:         student.person_id,
        topic:           NotificationTopic::EventMatch,
        message:         format!(
          "New Event: {} matches your interest in {}!",
          event.title, first
        ),
        link:            Some(format!("/events/{event_id}/rsvp")),
        is_read:         false,
        created_at:      now,
      });
      matches.push(EventMatch {
        student_id:     student.person_id,
        matched_skills: matched,
      });
    }

    let notified = notifications.len();
    self
      .store
      .push_notifications(notifications)
      .await
      .map_err(Error::store)?;
    info!(event = %event_id, notified, "event announcement fanned out");

    Ok(AnnouncementReport { event_id, matches, notified })
  }
}
