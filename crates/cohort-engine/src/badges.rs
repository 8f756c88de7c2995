//! The badge engine — deterministic gamification rules over activity
//! history.
//!
//! Rules are additive: a badge, once granted, is never revoked, and
//! re-evaluation skips rules already satisfied. `evaluate` returns only the
//! net-new awards.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use cohort_core::{
  clock::Clock,
  connection::RequestStatus,
  person::{Badge, BadgeKind, Person},
  store::EngagementStore,
};

use crate::{Error, Result};

/// Accepted or confirmed — the states that count as a live connection.
fn is_connected(status: RequestStatus) -> bool {
  matches!(status, RequestStatus::Accepted | RequestStatus::Confirmed)
}

pub struct BadgeEngine<S, C> {
  store: Arc<S>,
  clock: Arc<C>,
}

impl<S, C> BadgeEngine<S, C>
where
  S: EngagementStore,
  C: Clock,
{
  pub fn new(store: Arc<S>, clock: Arc<C>) -> Self { Self { store, clock } }

  /// Run every rule for one person and append whatever is newly earned.
  pub async fn evaluate(&self, person_id: Uuid) -> Result<Vec<Badge>> {
    let person = self
      .store
      .get_person(person_id)
      .await
      .map_err(Error::store)?
      .ok_or(cohort_core::Error::PersonNotFound(person_id))?;

    let mut earned: Vec<BadgeKind> = Vec::new();

    let sent = self
      .store
      .requests_by_sender(person_id)
      .await
      .map_err(Error::store)?;
    let received = self
      .store
      .requests_by_receiver(person_id)
      .await
      .map_err(Error::store)?;

    if !person.has_badge(BadgeKind::FirstConnection) {
      let connected = sent
        .iter()
        .chain(received.iter())
        .any(|r| is_connected(r.status));
      if connected {
        earned.push(BadgeKind::FirstConnection);
      }
    }

    if !person.has_badge(BadgeKind::TopMentor) {
      let mentee_count =
        received.iter().filter(|r| is_connected(r.status)).count();
      if mentee_count > 3 {
        earned.push(BadgeKind::TopMentor);
      }
    }

    if !person.has_badge(BadgeKind::Champion)
      && self.won_a_competition(&person).await?
    {
      earned.push(BadgeKind::Champion);
    }

    let lectures_attended = self.lectures_attended(person_id).await?;
    if !person.has_badge(BadgeKind::ActiveParticipant) && lectures_attended >= 3
    {
      earned.push(BadgeKind::ActiveParticipant);
    }

    if !person.has_badge(BadgeKind::EventSuperfan) {
      let events_attended = self.events_attended(person_id).await?;
      if lectures_attended + events_attended > 5 {
        earned.push(BadgeKind::EventSuperfan);
      }
    }

    if earned.is_empty() {
      return Ok(vec![]);
    }

    let now = self.clock.now();
    let badges: Vec<Badge> = earned
      .into_iter()
      .map(|kind| Badge { kind, earned_at: now })
      .collect();
    self
      .store
      .append_badges(person_id, &badges)
      .await
      .map_err(Error::store)?;
    for badge in &badges {
      info!(person = %person_id, badge = badge.kind.name(), "badge awarded");
    }
    Ok(badges)
  }

  /// Member of the top-scoring team of some competition, with score > 0.
  async fn won_a_competition(&self, person: &Person) -> Result<bool> {
    let teams = self.store.list_teams().await.map_err(Error::store)?;
    for team in teams.iter().filter(|t| t.member_ids.contains(&person.person_id))
    {
      let Some(score) = team.score else { continue };
      if score <= 0.0 {
        continue;
      }
      let rivals = self
        .store
        .teams_for_competition(team.competition_id)
        .await
        .map_err(Error::store)?;
      let best = rivals
        .iter()
        .filter_map(|t| t.score)
        .fold(f64::NEG_INFINITY, f64::max);
      if score >= best {
        return Ok(true);
      }
    }
    Ok(false)
  }

  async fn lectures_attended(&self, person_id: Uuid) -> Result<usize> {
    Ok(
      self
        .store
        .list_lectures()
        .await
        .map_err(Error::store)?
        .iter()
        .filter(|l| l.attendance_list.contains(&person_id))
        .count(),
    )
  }

  async fn events_attended(&self, person_id: Uuid) -> Result<usize> {
    Ok(
      self
        .store
        .list_events()
        .await
        .map_err(Error::store)?
        .iter()
        .filter(|e| e.attendance_list.contains(&person_id))
        .count(),
    )
  }
}
