//! The appreciation pass: thank speakers after events conclude and judges
//! after competitions wrap up.

use tracing::{debug, info, warn};
use uuid::Uuid;

use cohort_core::{
  clock::Clock,
  notify::{MessageKind, Notifier, OutboundMessage},
  store::EngagementStore,
};

use super::{CancelHandle, PassOutcome, PassRun, Scheduler, SentRecord, SkipRecord};
use crate::{Error, Result};

impl<S, N, C> Scheduler<S, N, C>
where
  S: EngagementStore,
  N: Notifier,
  C: Clock,
{
  /// Thank every speaker of a concluded event and every judge of a
  /// concluded competition, once. The subject's `appreciation_sent` flag is
  /// set after its recipients are attempted, even if some individual sends
  /// failed, so a subject is never re-processed.
  pub async fn run_appreciation(
    &self,
    cancel: &CancelHandle,
  ) -> Result<PassRun> {
    let Ok(_gate) = self.appreciation_gate.try_lock() else {
      debug!("appreciation pass already running");
      return Ok(PassRun::AlreadyRunning);
    };

    let now = self.clock.now();
    let mut outcome = PassOutcome::default();

    let events = self.store.list_events().await.map_err(Error::store)?;
    for mut event in events
      .into_iter()
      .filter(|e| !e.appreciation_sent && e.concluded_by(now))
    {
      if cancel.is_cancelled() {
        info!("appreciation pass cancelled");
        return Ok(PassRun::Completed(outcome));
      }
      // An event with no assigned speakers stays unflagged: speakers may
      // still be assigned late, and the next run will pick it up.
      if event.speakers.is_empty() {
        continue;
      }
      self
        .thank(
          event.event_id,
          &event.speakers,
          MessageKind::SpeakerThankYou,
          &event.title,
          &mut outcome,
        )
        .await?;
      event.appreciation_sent = true;
      self.store.update_event(event).await.map_err(Error::store)?;
    }

    let competitions =
      self.store.list_competitions().await.map_err(Error::store)?;
    for mut competition in competitions
      .into_iter()
      .filter(|c| !c.appreciation_sent && c.concluded_by(now))
    {
      if cancel.is_cancelled() {
        info!("appreciation pass cancelled");
        return Ok(PassRun::Completed(outcome));
      }
      if competition.judges.is_empty() {
        continue;
      }
      self
        .thank(
          competition.competition_id,
          &competition.judges,
          MessageKind::JudgeThankYou,
          &competition.name,
          &mut outcome,
        )
        .await?;
      competition.appreciation_sent = true;
      self
        .store
        .update_competition(competition)
        .await
        .map_err(Error::store)?;
    }

    info!(
      sent = outcome.sent.len(),
      skipped = outcome.skipped.len(),
      "appreciation pass complete"
    );
    Ok(PassRun::Completed(outcome))
  }

  /// Send one thank-you per recipient. Individual failures skip that
  /// recipient only; the caller still flags the subject afterwards.
  async fn thank(
    &self,
    subject_id: Uuid,
    recipients: &[Uuid],
    kind: MessageKind,
    subject_title: &str,
    outcome: &mut PassOutcome,
  ) -> Result<()> {
    for &recipient_id in recipients {
      let Some(person) = self
        .store
        .get_person(recipient_id)
        .await
        .map_err(Error::store)?
      else {
        outcome.skipped.push(SkipRecord {
          subject_id,
          recipient_id: Some(recipient_id),
          reason: "recipient not found".into(),
        });
        continue;
      };

      let sent = self
        .notifier
        .send(
          OutboundMessage::new(kind, &person.email, &person.name)
            .field("subject_title", subject_title),
        )
        .await;
      if sent.success {
        outcome.sent.push(SentRecord { subject_id, recipient_id, kind });
      } else {
        warn!(
          subject = %subject_id,
          recipient = %person.email,
          "thank-you delivery failed"
        );
        outcome.skipped.push(SkipRecord {
          subject_id,
          recipient_id: Some(recipient_id),
          reason: "delivery failed".into(),
        });
      }
    }
    Ok(())
  }
}
