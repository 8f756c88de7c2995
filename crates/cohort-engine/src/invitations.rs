//! The invitation engine — automatic judge/speaker sourcing.
//!
//! Given a competition or lecture and the capability-filtered candidate
//! pool, the engine scores every candidate against the subject's skill tags,
//! keeps the matches, and creates a `pending` invitation per selected
//! candidate. Invitation records always persist; notification dispatch is
//! best-effort and failures are reported, not fatal.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use cohort_core::{
  clock::Clock,
  connection::Decision,
  invitation::{Invitation, InvitationKind, InvitationStatus},
  matching::{self, Candidate, MatchMode},
  notify::{MessageKind, Notifier, OutboundMessage},
  person::Person,
  store::EngagementStore,
};

use crate::{Error, Result};

/// The result of one generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvitationBatch {
  pub invitations:     Vec<Invitation>,
  /// Recipient emails whose invitation notification could not be sent.
  /// The invitation records exist regardless.
  pub notify_failures: Vec<String>,
}

pub struct InvitationEngine<S, N, C> {
  store:    Arc<S>,
  notifier: Arc<N>,
  clock:    Arc<C>,
}

impl<S, N, C> InvitationEngine<S, N, C>
where
  S: EngagementStore,
  N: Notifier,
  C: Clock,
{
  pub fn new(store: Arc<S>, notifier: Arc<N>, clock: Arc<C>) -> Self {
    Self { store, notifier, clock }
  }

  // ── Generation ────────────────────────────────────────────────────────

  /// Source judges for a competition from everyone with the judge
  /// capability whose expertise overlaps the required tags.
  pub async fn generate_for_competition(
    &self,
    competition_id: Uuid,
  ) -> Result<InvitationBatch> {
    let competition = self
      .store
      .get_competition(competition_id)
      .await
      .map_err(Error::store)?
      .ok_or(cohort_core::Error::CompetitionNotFound(competition_id))?;

    let pool = self
      .store
      .find_by_capability(InvitationKind::Judge.required_capability())
      .await
      .map_err(Error::store)?;

    // Prior activity for judges is the number of competitions judged.
    let competitions =
      self.store.list_competitions().await.map_err(Error::store)?;
    let prior = |p: &Person| {
      competitions
        .iter()
        .filter(|c| c.judges.contains(&p.person_id))
        .count() as u32
    };

    self
      .generate(
        InvitationKind::Judge,
        competition_id,
        &competition.name,
        &competition.required_expertise,
        &pool,
        &prior,
      )
      .await
  }

  /// Source speakers for a lecture; capped at the top five matches.
  pub async fn generate_for_lecture(
    &self,
    lecture_id: Uuid,
  ) -> Result<InvitationBatch> {
    let lecture = self
      .store
      .get_lecture(lecture_id)
      .await
      .map_err(Error::store)?
      .ok_or(cohort_core::Error::LectureNotFound(lecture_id))?;

    let pool = self
      .store
      .find_by_capability(InvitationKind::Speaker.required_capability())
      .await
      .map_err(Error::store)?;

    // Prior activity for speakers is the number of events spoken at.
    let events = self.store.list_events().await.map_err(Error::store)?;
    let prior = |p: &Person| {
      events
        .iter()
        .filter(|e| e.speakers.contains(&p.person_id))
        .count() as u32
    };

    self
      .generate(
        InvitationKind::Speaker,
        lecture_id,
        &lecture.title,
        &lecture.topic_tags,
        &pool,
        &prior,
      )
      .await
  }

  async fn generate(
    &self,
    kind: InvitationKind,
    subject_id: Uuid,
    subject_title: &str,
    target_tags: &[String],
    pool: &[Person],
    prior_engagements: &(dyn Fn(&Person) -> u32 + Sync),
  ) -> Result<InvitationBatch> {
    let candidates: Vec<Candidate<'_>> = pool
      .iter()
      .map(|p| Candidate {
        id:                p.person_id,
        skills:            &p.skills,
        prior_engagements: prior_engagements(p),
      })
      .collect();

    let ranked = matching::rank(
      &candidates,
      target_tags,
      MatchMode::Fuzzy,
      kind.selection_limit(),
    );

    let now = self.clock.now();
    let invitations: Vec<Invitation> = ranked
      .iter()
      .map(|m| Invitation {
        invitation_id: Uuid::new_v4(),
        kind,
        subject_id,
        candidate_id: m.id,
        matched_skills: m.matched_skills.clone(),
        match_reason: format!(
          "Matched based on your expertise in {}",
          m.matched_skills.join(", ")
        ),
        status: InvitationStatus::Pending,
        sent_at: now,
        acknowledged_at: None,
        follow_up_count: 0,
        last_contacted_at: now,
        responded_at: None,
      })
      .collect();

    self
      .store
      .insert_invitations(invitations.clone())
      .await
      .map_err(Error::store)?;
    info!(
      subject = %subject_id,
      kind = ?kind,
      created = invitations.len(),
      "invitations generated"
    );

    let message_kind = match kind {
      InvitationKind::Judge => MessageKind::JudgeInvitation,
      InvitationKind::Speaker => MessageKind::SpeakerInvitation,
    };
    let mut notify_failures = Vec::new();
    for invitation in &invitations {
      // The pool produced this candidate, so the lookup cannot miss.
      let Some(candidate) =
        pool.iter().find(|p| p.person_id == invitation.candidate_id)
      else {
        continue;
      };
      let outcome = self
        .notifier
        .send(
          OutboundMessage::new(message_kind, &candidate.email, &candidate.name)
            .field("subject_title", subject_title)
            .field("matched_skills", invitation.matched_skills.join(", "))
            .field("match_reason", &invitation.match_reason),
        )
        .await;
      if !outcome.success {
        warn!(
          invitation = %invitation.invitation_id,
          recipient = %candidate.email,
          "invitation notification failed"
        );
        notify_failures.push(candidate.email.clone());
      }
    }

    Ok(InvitationBatch { invitations, notify_failures })
  }

  // ── Candidate actions ─────────────────────────────────────────────────

  /// The candidate acknowledges receipt: stamps `acknowledged_at` and moves
  /// a pending invitation under review. One-shot.
  pub async fn acknowledge(
    &self,
    invitation_id: Uuid,
    acting_user_id: Uuid,
  ) -> Result<Invitation> {
    let mut invitation = self.owned(invitation_id, acting_user_id).await?;

    if invitation.status.is_terminal() {
      return Err(cohort_core::Error::AlreadyAnswered.into());
    }
    if invitation.acknowledged_at.is_some() {
      return Err(cohort_core::Error::AlreadyAcknowledged.into());
    }

    let now = self.clock.now();
    invitation.acknowledged_at = Some(now);
    if invitation.status == InvitationStatus::Pending {
      invitation.status = InvitationStatus::UnderReview;
    }
    self
      .store
      .update_invitation(invitation.clone())
      .await
      .map_err(Error::store)?;
    self
      .store
      .touch_last_active(acting_user_id, now)
      .await
      .map_err(Error::store)?;

    if let Some(candidate) = self
      .store
      .get_person(acting_user_id)
      .await
      .map_err(Error::store)?
    {
      let outcome = self
        .notifier
        .send(OutboundMessage::new(
          MessageKind::InvitationAcknowledged,
          &candidate.email,
          &candidate.name,
        ))
        .await;
      if !outcome.success {
        warn!(invitation = %invitation_id, "acknowledgement notification failed");
      }
    }

    Ok(invitation)
  }

  /// The candidate accepts or declines. Terminal either way; accepting a
  /// judge invitation registers the candidate on the competition.
  pub async fn respond(
    &self,
    invitation_id: Uuid,
    acting_user_id: Uuid,
    decision: Decision,
  ) -> Result<Invitation> {
    let mut invitation = self.owned(invitation_id, acting_user_id).await?;

    if invitation.status.is_terminal() {
      return Err(cohort_core::Error::AlreadyAnswered.into());
    }

    invitation.status = match decision {
      Decision::Accept => InvitationStatus::Accepted,
      Decision::Decline => InvitationStatus::Declined,
    };
    let now = self.clock.now();
    invitation.responded_at = Some(now);
    self
      .store
      .update_invitation(invitation.clone())
      .await
      .map_err(Error::store)?;
    self
      .store
      .touch_last_active(acting_user_id, now)
      .await
      .map_err(Error::store)?;
    info!(
      invitation = %invitation_id,
      status = ?invitation.status,
      "invitation answered"
    );

    if decision == Decision::Accept && invitation.kind == InvitationKind::Judge
    {
      if let Some(mut competition) = self
        .store
        .get_competition(invitation.subject_id)
        .await
        .map_err(Error::store)?
      {
        if !competition.judges.contains(&acting_user_id) {
          competition.judges.push(acting_user_id);
          self
            .store
            .update_competition(competition)
            .await
            .map_err(Error::store)?;
        }
      }
    }

    Ok(invitation)
  }

  async fn owned(
    &self,
    invitation_id: Uuid,
    acting_user_id: Uuid,
  ) -> Result<Invitation> {
    let invitation = self
      .store
      .get_invitation(invitation_id)
      .await
      .map_err(Error::store)?
      .ok_or(cohort_core::Error::InvitationNotFound(invitation_id))?;
    if invitation.candidate_id != acting_user_id {
      return Err(
        cohort_core::Error::Unauthorized { actor: acting_user_id }.into(),
      );
    }
    Ok(invitation)
  }
}
