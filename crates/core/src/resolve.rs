use crate::reconcile::{ReconcileGate, ReconcileSchedulesUseCase, ReconcileTrigger};
use crate::shared::usecase::{execute, UseCase};
use nudge_domain::{Reminder, ReminderStatus, ID};
use nudge_infra::NudgeContext;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Complete,
    Dismiss,
}

/// Marks a reminder completed or dismissed and runs a reconcile pass so
/// the device notification disappears with it.
#[derive(Debug)]
pub struct ResolveReminderUseCase {
    pub user_id: ID,
    pub reminder_id: ID,
    pub resolution: Resolution,
    pub gate: ReconcileGate,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
    StorageError,
}

#[async_trait::async_trait]
impl UseCase for ResolveReminderUseCase {
    type Response = Reminder;

    type Errors = UseCaseError;

    async fn execute(&mut self, ctx: &NudgeContext) -> Result<Self::Response, Self::Errors> {
        let now = ctx.sys.get_timestamp_millis();
        let mut reminder = match ctx.repos.reminders.find(&self.reminder_id).await {
            Some(reminder) if reminder.user_id == self.user_id => reminder,
            _ => return Err(UseCaseError::NotFound(self.reminder_id)),
        };

        reminder.status = match self.resolution {
            Resolution::Complete => ReminderStatus::Completed,
            Resolution::Dismiss => ReminderStatus::Dismissed,
        };
        reminder.updated = now;

        ctx.repos
            .reminders
            .save(&reminder)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        let reconcile = ReconcileSchedulesUseCase {
            user_id: self.user_id,
            trigger: ReconcileTrigger::StoreChange,
            gate: self.gate.clone(),
        };
        if let Err(e) = execute(reconcile, ctx).await {
            warn!("Reconcile pass after resolving reminder failed: {:?}", e);
        }

        Ok(reminder)
    }
}
