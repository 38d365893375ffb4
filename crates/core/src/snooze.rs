use crate::category::ensure_category_registered;
use crate::reconcile::{
    notification_title, ReconcileGate, ReconcileSchedulesUseCase, ReconcileTrigger, DEFAULT_BODY,
};
use crate::shared::usecase::{execute, UseCase};
use nudge_domain::{
    NotificationContent, NotificationScheduleRecord, DEFAULT_SNOOZE_MINUTES, ID,
};
use nudge_infra::NudgeContext;
use tracing::warn;

/// Snooze durations arrive from notification payloads as JSON numbers and
/// cannot be trusted. Non-finite or non-positive values fall back to the
/// default, fractional minutes are floored but never below one minute.
pub fn normalize_snooze_minutes(minutes: f64) -> i64 {
    if !minutes.is_finite() || minutes <= 0.0 {
        return DEFAULT_SNOOZE_MINUTES;
    }
    (minutes.floor() as i64).max(1)
}

#[derive(Debug)]
pub struct ApplySnoozeUseCase {
    pub user_id: ID,
    pub reminder_id: ID,
    pub minutes: f64,
    pub gate: ReconcileGate,
}

#[derive(Debug, PartialEq, Eq)]
pub struct SnoozeOutcome {
    pub snoozed_until: i64,
    /// False when the store rejected the snooze and only the local
    /// notification was moved
    pub persisted_remotely: bool,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
}

#[async_trait::async_trait]
impl UseCase for ApplySnoozeUseCase {
    type Response = SnoozeOutcome;

    type Errors = UseCaseError;

    async fn execute(&mut self, ctx: &NudgeContext) -> Result<Self::Response, Self::Errors> {
        let now = ctx.sys.get_timestamp_millis();
        let mut reminder = match ctx.repos.reminders.find(&self.reminder_id).await {
            Some(reminder) if reminder.user_id == self.user_id => reminder,
            _ => return Err(UseCaseError::NotFound(self.reminder_id)),
        };

        let minutes = normalize_snooze_minutes(self.minutes);
        reminder.apply_snooze(minutes, now);
        let snoozed_until = reminder.scheduled_at;

        let persisted_remotely = match ctx.repos.reminders.save(&reminder).await {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    "Unable to persist snooze for reminder {}: {:?}. Rescheduling locally.",
                    reminder.id, e
                );
                self.reschedule_locally(ctx, &reminder, snoozed_until, now)
                    .await;
                false
            }
        };

        // A full pass picks up the moved due time (or, on the local
        // fallback, holds the snoozed record)
        let reconcile = ReconcileSchedulesUseCase {
            user_id: self.user_id,
            trigger: ReconcileTrigger::PostSnooze,
            gate: self.gate.clone(),
        };
        if let Err(e) = execute(reconcile, ctx).await {
            warn!("Reconcile pass after snooze failed: {:?}", e);
        }

        Ok(SnoozeOutcome {
            snoozed_until,
            persisted_remotely,
        })
    }
}

impl ApplySnoozeUseCase {
    /// The store rejected the snooze: move the local notification anyway
    /// and mark the record snoozed so the reconciler leaves it alone until
    /// it fires.
    async fn reschedule_locally(
        &self,
        ctx: &NudgeContext,
        reminder: &nudge_domain::Reminder,
        snoozed_until: i64,
        now: i64,
    ) {
        let device_id = ctx.config.device_id.clone();
        if let Some(record) = ctx
            .repos
            .schedule_records
            .find(&self.user_id, &reminder.id, &device_id)
            .await
        {
            if let Err(e) = ctx.platform.scheduler.cancel(&record.notification_id).await {
                warn!(
                    "Unable to cancel notification {} before local snooze: {:?}",
                    record.notification_id, e
                );
            }
        }

        let actions = match ctx
            .repos
            .reminder_actions
            .find_by_reminders(&[reminder.id])
            .await
        {
            Ok(actions) => actions,
            Err(e) => {
                warn!("Unable to fetch actions for snoozed reminder: {:?}", e);
                Vec::new()
            }
        };
        let snooze = ctx
            .repos
            .preferences
            .find(&self.user_id)
            .await
            .map(|preferences| preferences.snooze_config())
            .unwrap_or_else(|| ctx.config.fallback_snooze_config());

        let category_id = ensure_category_registered(ctx, &reminder.id, &actions, &snooze).await;
        let content = NotificationContent {
            reminder_id: reminder.id,
            title: notification_title(reminder),
            body: reminder
                .description
                .clone()
                .unwrap_or_else(|| DEFAULT_BODY.into()),
            original_time: reminder.scheduled_at,
            reminder_updated_at: Some(reminder.updated),
            default_snooze_minutes: snooze.default_minutes,
            category_id,
            test_notification: false,
        };

        let notification_id = match ctx.platform.scheduler.schedule(snoozed_until, content).await {
            Ok(id) => id,
            Err(e) => {
                warn!(
                    "Unable to schedule snoozed notification for reminder {}: {:?}",
                    reminder.id, e
                );
                return;
            }
        };

        let record = NotificationScheduleRecord {
            user_id: self.user_id,
            reminder_id: reminder.id,
            device_id,
            notification_id,
            scheduled_for: snoozed_until,
            reminder_updated_at: reminder.updated,
            snoozed_until: Some(snoozed_until),
            updated: now,
        };
        if let Err(e) = ctx.repos.schedule_records.upsert(&record).await {
            warn!(
                "Unable to persist snoozed schedule record for reminder {}: {:?}",
                reminder.id, e
            );
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use nudge_domain::{Reminder, MILLIS_PER_MINUTE};
    use nudge_infra::{IReminderRepo, ISys, StoreChange};
    use std::sync::Arc;
    use tokio::sync::broadcast;

    const NOW: i64 = 1_700_000_000_000;

    struct StaticTimeSys(i64);
    impl ISys for StaticTimeSys {
        fn get_timestamp_millis(&self) -> i64 {
            self.0
        }
    }

    fn setup(now: i64) -> NudgeContext {
        let mut ctx = NudgeContext::create_inmemory();
        ctx.sys = Arc::new(StaticTimeSys(now));
        ctx
    }

    #[test]
    fn snooze_minutes_are_sanitized() {
        assert_eq!(normalize_snooze_minutes(10.0), 10);
        assert_eq!(normalize_snooze_minutes(2.7), 2);
        assert_eq!(normalize_snooze_minutes(0.5), 1);
        assert_eq!(normalize_snooze_minutes(0.0), DEFAULT_SNOOZE_MINUTES);
        assert_eq!(normalize_snooze_minutes(-5.0), DEFAULT_SNOOZE_MINUTES);
        assert_eq!(normalize_snooze_minutes(f64::NAN), DEFAULT_SNOOZE_MINUTES);
        assert_eq!(
            normalize_snooze_minutes(f64::INFINITY),
            DEFAULT_SNOOZE_MINUTES
        );
    }

    #[tokio::test]
    async fn snooze_moves_the_due_time_and_reschedules() {
        let ctx = setup(NOW);
        let user_id = ID::new();
        let reminder = Reminder::new(user_id, "Pay rent", NOW + 5 * MILLIS_PER_MINUTE, NOW);
        ctx.repos.reminders.insert(&reminder).await.unwrap();

        let outcome = execute(
            ApplySnoozeUseCase {
                user_id,
                reminder_id: reminder.id,
                minutes: 10.0,
                gate: ReconcileGate::new(),
            },
            &ctx,
        )
        .await
        .unwrap();

        assert_eq!(outcome.snoozed_until, NOW + 10 * MILLIS_PER_MINUTE);
        assert!(outcome.persisted_remotely);
        let stored = ctx.repos.reminders.find(&reminder.id).await.unwrap();
        assert_eq!(stored.scheduled_at, outcome.snoozed_until);
        assert!(stored.notified_at.is_none());
        // The follow-up pass scheduled the notification at the new time
        let requests = ctx.platform.scheduler.list_scheduled().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].remind_at, outcome.snoozed_until);
    }

    #[tokio::test]
    async fn unknown_reminder_is_rejected() {
        let ctx = setup(NOW);
        let res = execute(
            ApplySnoozeUseCase {
                user_id: ID::new(),
                reminder_id: ID::new(),
                minutes: 10.0,
                gate: ReconcileGate::new(),
            },
            &ctx,
        )
        .await;
        assert!(matches!(res, Err(UseCaseError::NotFound(_))));
    }

    #[tokio::test]
    async fn foreign_reminder_is_rejected() {
        let ctx = setup(NOW);
        let owner = ID::new();
        let reminder = Reminder::new(owner, "Pay rent", NOW + 5 * MILLIS_PER_MINUTE, NOW);
        ctx.repos.reminders.insert(&reminder).await.unwrap();

        let res = execute(
            ApplySnoozeUseCase {
                user_id: ID::new(),
                reminder_id: reminder.id,
                minutes: 10.0,
                gate: ReconcileGate::new(),
            },
            &ctx,
        )
        .await;
        assert!(matches!(res, Err(UseCaseError::NotFound(_))));
    }

    /// Reads work, writes fail. Models the store being reachable but
    /// rejecting mutations.
    struct ReadOnlyReminderRepo {
        inner: nudge_infra::InMemoryReminderRepo,
    }

    #[async_trait::async_trait]
    impl IReminderRepo for ReadOnlyReminderRepo {
        async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()> {
            self.inner.insert(reminder).await
        }
        async fn save(&self, _reminder: &Reminder) -> anyhow::Result<()> {
            Err(anyhow::anyhow!("store rejected the write"))
        }
        async fn find(&self, reminder_id: &ID) -> Option<Reminder> {
            self.inner.find(reminder_id).await
        }
        async fn find_upcoming(&self, user_id: &ID, from: i64) -> anyhow::Result<Vec<Reminder>> {
            self.inner.find_upcoming(user_id, from).await
        }
        fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
            self.inner.subscribe()
        }
    }

    #[tokio::test]
    async fn store_rejection_falls_back_to_a_local_snooze() {
        let mut ctx = setup(NOW);
        ctx.repos.reminders = Arc::new(ReadOnlyReminderRepo {
            inner: nudge_infra::InMemoryReminderRepo::new(),
        });
        let user_id = ID::new();
        let reminder = Reminder::new(user_id, "Pay rent", NOW + 5 * MILLIS_PER_MINUTE, NOW);
        ctx.repos.reminders.insert(&reminder).await.unwrap();

        let outcome = execute(
            ApplySnoozeUseCase {
                user_id,
                reminder_id: reminder.id,
                minutes: 10.0,
                gate: ReconcileGate::new(),
            },
            &ctx,
        )
        .await
        .unwrap();

        assert!(!outcome.persisted_remotely);
        // The store still has the old due time
        let stored = ctx.repos.reminders.find(&reminder.id).await.unwrap();
        assert_eq!(stored.scheduled_at, NOW + 5 * MILLIS_PER_MINUTE);
        // But the local notification moved and the record is marked snoozed
        let requests = ctx.platform.scheduler.list_scheduled().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].remind_at, outcome.snoozed_until);
        let record = ctx
            .repos
            .schedule_records
            .find(&user_id, &reminder.id, &ctx.config.device_id)
            .await
            .unwrap();
        assert_eq!(record.snoozed_until, Some(outcome.snoozed_until));
    }
}
