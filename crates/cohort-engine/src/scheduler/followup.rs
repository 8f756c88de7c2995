//! The follow-up pass: nudge invitation candidates who have not answered.

use tracing::{debug, info, warn};

use cohort_core::{
  clock::Clock,
  invitation::{Invitation, InvitationKind},
  notify::{MessageKind, Notifier, OutboundMessage},
  store::EngagementStore,
};

use super::{CancelHandle, PassOutcome, PassRun, Scheduler, SentRecord, SkipRecord};
use crate::{Error, Result};

/// Tuning knobs for the follow-up pass. A zero-day threshold makes every
/// unanswered invitation due immediately, which is useful for diagnostics.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct FollowUpConfig {
  /// Days since the last contact before a nudge is due.
  pub threshold_days: i64,
  /// Lifetime cap on nudges per invitation.
  pub max_follow_ups: u32,
}

impl Default for FollowUpConfig {
  fn default() -> Self { Self { threshold_days: 3, max_follow_ups: 2 } }
}

impl<S, N, C> Scheduler<S, N, C>
where
  S: EngagementStore,
  N: Notifier,
  C: Clock,
{
  /// Scan every invitation still awaiting a response and nudge the ones
  /// that are due. Counters only advance on a successful send, so a failed
  /// delivery retries on the next run.
  pub async fn run_follow_ups(
    &self,
    config: FollowUpConfig,
    cancel: &CancelHandle,
  ) -> Result<PassRun> {
    let Ok(_gate) = self.follow_up_gate.try_lock() else {
      debug!("follow-up pass already running");
      return Ok(PassRun::AlreadyRunning);
    };

    let now = self.clock.now();
    let mut outcome = PassOutcome::default();

    let invitations = self
      .store
      .list_invitations()
      .await
      .map_err(Error::store)?
      .into_iter()
      .filter(|i| i.status.awaiting_response())
      .collect::<Vec<_>>();

    for mut invitation in invitations {
      if cancel.is_cancelled() {
        info!("follow-up pass cancelled");
        break;
      }

      if invitation.follow_up_count >= config.max_follow_ups {
        outcome.skipped.push(SkipRecord {
          subject_id:   invitation.subject_id,
          recipient_id: Some(invitation.candidate_id),
          reason:       "follow-up limit reached".into(),
        });
        continue;
      }

      let days_since = (now - invitation.last_contacted_at).num_days();
      if days_since < config.threshold_days {
        outcome.skipped.push(SkipRecord {
          subject_id:   invitation.subject_id,
          recipient_id: Some(invitation.candidate_id),
          reason:       "contacted too recently".into(),
        });
        continue;
      }

      let Some(candidate) = self
        .store
        .get_person(invitation.candidate_id)
        .await
        .map_err(Error::store)?
      else {
        outcome.skipped.push(SkipRecord {
          subject_id:   invitation.subject_id,
          recipient_id: Some(invitation.candidate_id),
          reason:       "candidate not found".into(),
        });
        continue;
      };

      let Some(subject_title) = self.subject_title(&invitation).await? else {
        outcome.skipped.push(SkipRecord {
          subject_id:   invitation.subject_id,
          recipient_id: Some(invitation.candidate_id),
          reason:       "subject not found".into(),
        });
        continue;
      };

      let sent = self
        .notifier
        .send(
          OutboundMessage::new(
            MessageKind::InvitationFollowUp,
            &candidate.email,
            &candidate.name,
          )
          .field("subject_title", &subject_title)
          .field(
            "follow_up_number",
            (invitation.follow_up_count + 1).to_string(),
          )
          .field("matched_skills", invitation.matched_skills.join(", ")),
        )
        .await;

      if !sent.success {
        warn!(
          invitation = %invitation.invitation_id,
          recipient = %candidate.email,
          "follow-up delivery failed"
        );
        outcome.skipped.push(SkipRecord {
          subject_id:   invitation.subject_id,
          recipient_id: Some(invitation.candidate_id),
          reason:       "delivery failed".into(),
        });
        continue;
      }

      invitation.follow_up_count += 1;
      invitation.last_contacted_at = now;
      self
        .store
        .update_invitation(invitation.clone())
        .await
        .map_err(Error::store)?;
      outcome.sent.push(SentRecord {
        subject_id:   invitation.subject_id,
        recipient_id: invitation.candidate_id,
        kind:         MessageKind::InvitationFollowUp,
      });
    }

    info!(
      sent = outcome.sent.len(),
      skipped = outcome.skipped.len(),
      "follow-up pass complete"
    );
    Ok(PassRun::Completed(outcome))
  }

  async fn subject_title(
    &self,
    invitation: &Invitation,
  ) -> Result<Option<String>> {
    let title = match invitation.kind {
      InvitationKind::Judge => self
        .store
        .get_competition(invitation.subject_id)
        .await
        .map_err(Error::store)?
        .map(|c| c.name),
      InvitationKind::Speaker => self
        .store
        .get_lecture(invitation.subject_id)
        .await
        .map_err(Error::store)?
        .map(|l| l.title),
    };
    Ok(title)
  }
}
