use crate::reconcile::ReconcileGate;
use crate::resolve::{Resolution, ResolveReminderUseCase};
use crate::shared::usecase::{execute, UseCase};
use crate::snooze::ApplySnoozeUseCase;
use nudge_domain::{
    NotificationResponse, ACTION_COMPLETE, ACTION_DISMISS, ACTION_SNOOZE, DEFAULT_TAP_ACTION, ID,
};
use nudge_infra::NudgeContext;
use tracing::{debug, warn};

/// Routes a tapped or actioned notification to the matching use case.
/// Responses are best-effort by design: a malformed payload or a failed
/// action never errors, it degrades to opening the reminder (or to
/// ignoring the response entirely when it cannot be attributed).
#[derive(Debug)]
pub struct HandleNotificationResponseUseCase {
    pub user_id: ID,
    pub response: NotificationResponse,
    pub gate: ReconcileGate,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ResponseOutcome {
    /// Diagnostic or unattributable response, nothing to do
    Ignored,
    /// The app should navigate to this reminder
    OpenReminder(ID),
    Resolved {
        reminder_id: ID,
        resolution: Resolution,
    },
    Snoozed {
        reminder_id: ID,
        snoozed_until: i64,
    },
}

#[derive(Debug)]
pub enum UseCaseError {}

#[async_trait::async_trait]
impl UseCase for HandleNotificationResponseUseCase {
    type Response = ResponseOutcome;

    type Errors = UseCaseError;

    async fn execute(&mut self, ctx: &NudgeContext) -> Result<Self::Response, Self::Errors> {
        let data = &self.response.data;

        if data["testNotification"].as_bool().unwrap_or(false) {
            debug!("Ignoring response to a test notification");
            return Ok(ResponseOutcome::Ignored);
        }

        let reminder_id = match data["reminderId"]
            .as_str()
            .and_then(|raw| raw.parse::<ID>().ok())
        {
            Some(id) => id,
            None => {
                warn!(
                    "Notification response without an attributable reminder id: {:?}",
                    self.response.action_identifier
                );
                return Ok(ResponseOutcome::Ignored);
            }
        };

        let outcome = match self.response.action_identifier.as_str() {
            DEFAULT_TAP_ACTION => ResponseOutcome::OpenReminder(reminder_id),
            action @ (ACTION_COMPLETE | ACTION_DISMISS) => {
                let resolution = if action == ACTION_COMPLETE {
                    Resolution::Complete
                } else {
                    Resolution::Dismiss
                };
                let resolve = ResolveReminderUseCase {
                    user_id: self.user_id,
                    reminder_id,
                    resolution,
                    gate: self.gate.clone(),
                };
                match execute(resolve, ctx).await {
                    Ok(_) => ResponseOutcome::Resolved {
                        reminder_id,
                        resolution,
                    },
                    Err(e) => {
                        warn!("Unable to resolve reminder from notification: {:?}", e);
                        ResponseOutcome::OpenReminder(reminder_id)
                    }
                }
            }
            ACTION_SNOOZE => {
                let minutes = data["defaultSnoozeMinutes"].as_f64().unwrap_or(f64::NAN);
                let snooze = ApplySnoozeUseCase {
                    user_id: self.user_id,
                    reminder_id,
                    minutes,
                    gate: self.gate.clone(),
                };
                match execute(snooze, ctx).await {
                    Ok(outcome) => ResponseOutcome::Snoozed {
                        reminder_id,
                        snoozed_until: outcome.snoozed_until,
                    },
                    Err(e) => {
                        warn!("Unable to snooze reminder from notification: {:?}", e);
                        ResponseOutcome::OpenReminder(reminder_id)
                    }
                }
            }
            // Quick-action buttons (call, email, ...) are handled by the
            // app itself once the reminder is open
            _ => ResponseOutcome::OpenReminder(reminder_id),
        };

        Ok(outcome)
    }
}
