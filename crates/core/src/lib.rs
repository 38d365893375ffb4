//! The notification core: keeps a device's local notification schedule
//! in sync with the hosted reminder store and routes notification
//! responses back into reminder mutations.

pub mod category;
pub mod job_schedulers;
pub mod reconcile;
pub mod resolve;
pub mod respond;
pub mod shared;
pub mod snooze;
pub mod token;

pub use category::{derive_category_id, ensure_category_registered, MAX_BUTTONS};
pub use reconcile::{
    ReconcileGate, ReconcileOutcome, ReconcileSchedulesUseCase, ReconcileSummary, ReconcileTrigger,
};
pub use resolve::{Resolution, ResolveReminderUseCase};
pub use respond::{HandleNotificationResponseUseCase, ResponseOutcome};
pub use shared::usecase::{execute, UseCase};
pub use snooze::{normalize_snooze_minutes, ApplySnoozeUseCase, SnoozeOutcome};
pub use token::RegisterTokenUseCase;

use nudge_domain::{DeviceToken, NotificationResponse, Reminder, ID};
use nudge_infra::NudgeContext;

/// Facade over the use cases for a single authenticated user on a single
/// device. Owns the reconcile gate so that background jobs and response
/// handling share one single-flight domain.
#[derive(Clone)]
pub struct NotificationEngine {
    ctx: NudgeContext,
    user_id: ID,
    gate: ReconcileGate,
}

impl NotificationEngine {
    pub fn new(ctx: NudgeContext, user_id: ID) -> Self {
        Self {
            ctx,
            user_id,
            gate: ReconcileGate::new(),
        }
    }

    /// Spawns the periodic reconcile job and the store change listener
    pub fn start(&self) {
        job_schedulers::start_reconcile_job(self.ctx.clone(), self.user_id, self.gate.clone());
        job_schedulers::start_store_listener_job(self.ctx.clone(), self.user_id, self.gate.clone());
    }

    pub async fn reconcile(
        &self,
        trigger: ReconcileTrigger,
    ) -> Result<ReconcileOutcome, reconcile::UseCaseError> {
        execute(
            ReconcileSchedulesUseCase {
                user_id: self.user_id,
                trigger,
                gate: self.gate.clone(),
            },
            &self.ctx,
        )
        .await
    }

    pub async fn handle_response(
        &self,
        response: NotificationResponse,
    ) -> Result<ResponseOutcome, respond::UseCaseError> {
        execute(
            HandleNotificationResponseUseCase {
                user_id: self.user_id,
                response,
                gate: self.gate.clone(),
            },
            &self.ctx,
        )
        .await
    }

    pub async fn snooze(
        &self,
        reminder_id: ID,
        minutes: f64,
    ) -> Result<SnoozeOutcome, snooze::UseCaseError> {
        execute(
            ApplySnoozeUseCase {
                user_id: self.user_id,
                reminder_id,
                minutes,
                gate: self.gate.clone(),
            },
            &self.ctx,
        )
        .await
    }

    pub async fn resolve(
        &self,
        reminder_id: ID,
        resolution: Resolution,
    ) -> Result<Reminder, resolve::UseCaseError> {
        execute(
            ResolveReminderUseCase {
                user_id: self.user_id,
                reminder_id,
                resolution,
                gate: self.gate.clone(),
            },
            &self.ctx,
        )
        .await
    }

    pub async fn register_token(&self) -> Result<Option<DeviceToken>, token::UseCaseError> {
        execute(RegisterTokenUseCase { user_id: self.user_id }, &self.ctx).await
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use nudge_domain::{ReminderStatus, ACTION_COMPLETE, MILLIS_PER_MINUTE};
    use nudge_infra::ISys;
    use std::sync::Arc;

    const NOW: i64 = 1_700_000_000_000;

    struct StaticTimeSys(i64);
    impl ISys for StaticTimeSys {
        fn get_timestamp_millis(&self) -> i64 {
            self.0
        }
    }

    #[tokio::test]
    async fn engine_round_trip_from_schedule_to_response() {
        let mut ctx = NudgeContext::create_inmemory();
        ctx.sys = Arc::new(StaticTimeSys(NOW));
        let user_id = ID::new();
        let reminder = Reminder::new(user_id, "Pay rent", NOW + 60 * MILLIS_PER_MINUTE, NOW);
        ctx.repos.reminders.insert(&reminder).await.unwrap();
        let engine = NotificationEngine::new(ctx.clone(), user_id);

        engine.reconcile(ReconcileTrigger::AppResume).await.unwrap();
        let requests = ctx.platform.scheduler.list_scheduled().await.unwrap();
        assert_eq!(requests.len(), 1);

        // The user taps Complete on the delivered notification
        let outcome = engine
            .handle_response(NotificationResponse {
                action_identifier: ACTION_COMPLETE.into(),
                data: requests[0].content.to_payload(),
            })
            .await
            .unwrap();

        assert_eq!(
            outcome,
            ResponseOutcome::Resolved {
                reminder_id: reminder.id,
                resolution: Resolution::Complete,
            }
        );
        let stored = ctx.repos.reminders.find(&reminder.id).await.unwrap();
        assert_eq!(stored.status, ReminderStatus::Completed);
        let remaining = ctx.platform.scheduler.list_scheduled().await.unwrap();
        assert!(remaining.is_empty());
    }
}
