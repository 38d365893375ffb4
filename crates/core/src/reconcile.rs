use crate::category::{derive_category_id, ensure_category_registered};
use crate::shared::usecase::UseCase;
use nudge_domain::{
    NotificationContent, NotificationRequest, NotificationScheduleRecord, Reminder,
    ReminderAction, SnoozeConfig, ID,
};
use nudge_infra::NudgeContext;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, error, warn};

pub(crate) const DEFAULT_BODY: &str = "It's time!";

/// Serializes reconciliation passes within the process. Concurrent
/// triggers (poll tick, store change, app resume) race for the gate and
/// losers drop their pass instead of queueing: the winning pass already
/// reads the freshest state.
#[derive(Clone, Default)]
pub struct ReconcileGate {
    inner: Arc<Mutex<()>>,
}

impl ReconcileGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(&self) -> Option<OwnedMutexGuard<()>> {
        self.inner.clone().try_lock_owned().ok()
    }
}

impl Debug for ReconcileGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ReconcileGate")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileTrigger {
    Poll,
    StoreChange,
    AppResume,
    PostSnooze,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub scheduled: usize,
    pub refreshed: usize,
    pub held: usize,
    pub removed: usize,
    pub deduped: usize,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ReconcileOutcome {
    Completed(ReconcileSummary),
    /// Another pass held the gate; this trigger was dropped
    Skipped,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
    SchedulerUnavailable,
}

/// Drives the device notification schedule to match the reminder store:
/// schedules what is missing, refreshes what is stale, holds what is
/// current or snoozed, removes what no longer has an upcoming reminder
/// and de-duplicates leftovers afterwards.
#[derive(Debug)]
pub struct ReconcileSchedulesUseCase {
    pub user_id: ID,
    pub trigger: ReconcileTrigger,
    pub gate: ReconcileGate,
}

#[async_trait::async_trait]
impl UseCase for ReconcileSchedulesUseCase {
    type Response = ReconcileOutcome;

    type Errors = UseCaseError;

    async fn execute(&mut self, ctx: &NudgeContext) -> Result<Self::Response, Self::Errors> {
        let _guard = match self.gate.try_acquire() {
            Some(guard) => guard,
            None => {
                debug!(
                    "Reconcile pass already running, dropping trigger {:?}",
                    self.trigger
                );
                return Ok(ReconcileOutcome::Skipped);
            }
        };

        let now = ctx.sys.get_timestamp_millis();
        let device_id = ctx.config.device_id.clone();

        let reminders = ctx
            .repos
            .reminders
            .find_upcoming(&self.user_id, now)
            .await
            .map_err(|e| {
                error!("Unable to fetch upcoming reminders: {:?}", e);
                UseCaseError::StorageError
            })?;
        let requests = ctx.platform.scheduler.list_scheduled().await.map_err(|e| {
            error!("Unable to list scheduled notifications: {:?}", e);
            UseCaseError::SchedulerUnavailable
        })?;
        let records = ctx
            .repos
            .schedule_records
            .find_by_device(&self.user_id, &device_id)
            .await
            .map_err(|e| {
                error!("Unable to fetch schedule records: {:?}", e);
                UseCaseError::StorageError
            })?;
        let reminder_ids = reminders.iter().map(|r| r.id).collect::<Vec<_>>();
        let actions = ctx
            .repos
            .reminder_actions
            .find_by_reminders(&reminder_ids)
            .await
            .map_err(|e| {
                error!("Unable to fetch reminder actions: {:?}", e);
                UseCaseError::StorageError
            })?;
        let snooze = ctx
            .repos
            .preferences
            .find(&self.user_id)
            .await
            .map(|preferences| preferences.snooze_config())
            .unwrap_or_else(|| ctx.config.fallback_snooze_config());

        let mut actions_by_reminder: HashMap<ID, Vec<ReminderAction>> = HashMap::new();
        for action in actions {
            actions_by_reminder
                .entry(action.reminder_id)
                .or_default()
                .push(action);
        }
        let mut records_by_reminder: HashMap<ID, NotificationScheduleRecord> = records
            .into_iter()
            .map(|record| (record.reminder_id, record))
            .collect();
        let requests_by_id: HashMap<String, NotificationRequest> = requests
            .into_iter()
            .map(|request| (request.id.clone(), request))
            .collect();

        let mut summary = ReconcileSummary::default();

        for reminder in &reminders {
            let reminder_actions = actions_by_reminder
                .get(&reminder.id)
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            let record = records_by_reminder.remove(&reminder.id);
            self.sync_reminder(
                ctx,
                reminder,
                reminder_actions,
                record,
                &requests_by_id,
                &snooze,
                &device_id,
                now,
                &mut summary,
            )
            .await;
        }

        // Whatever is left maps to reminders that are no longer upcoming
        // (resolved, overdue or deleted upstream)
        for record in records_by_reminder.into_values() {
            if let Err(e) = ctx.platform.scheduler.cancel(&record.notification_id).await {
                warn!(
                    "Unable to cancel notification {} for resolved reminder {}: {:?}",
                    record.notification_id, record.reminder_id, e
                );
                continue;
            }
            ctx.repos
                .schedule_records
                .delete(&self.user_id, &record.reminder_id, &device_id)
                .await;
            summary.removed += 1;
        }

        summary.deduped = self.dedup_scheduled(ctx).await;

        debug!("Reconcile pass ({:?}): {:?}", self.trigger, summary);

        Ok(ReconcileOutcome::Completed(summary))
    }
}

impl ReconcileSchedulesUseCase {
    #[allow(clippy::too_many_arguments)]
    async fn sync_reminder(
        &self,
        ctx: &NudgeContext,
        reminder: &Reminder,
        actions: &[ReminderAction],
        record: Option<NotificationScheduleRecord>,
        requests_by_id: &HashMap<String, NotificationRequest>,
        snooze: &SnoozeConfig,
        device_id: &str,
        now: i64,
        summary: &mut ReconcileSummary,
    ) {
        let target = reminder.notify_target(now);
        let expected_category = derive_category_id(&reminder.id, actions, snooze);

        let mut refreshing = false;
        if let Some(record) = record {
            let live = requests_by_id.get(&record.notification_id);
            let category_matches = live
                .map(|request| {
                    request.content.category_id.as_deref() == Some(expected_category.as_str())
                })
                .unwrap_or(false);

            // A user-initiated snooze owns the schedule until it elapses
            if record.is_snoozed(now) && category_matches {
                summary.held += 1;
                return;
            }

            let current = record.reminder_updated_at == reminder.updated
                && (target - record.scheduled_for).abs() <= ctx.config.hold_tolerance_millis;
            if current && category_matches {
                summary.held += 1;
                return;
            }

            if let Err(e) = ctx.platform.scheduler.cancel(&record.notification_id).await {
                warn!(
                    "Unable to cancel stale notification {} for reminder {}: {:?}",
                    record.notification_id, reminder.id, e
                );
                return;
            }
            ctx.repos
                .schedule_records
                .delete(&self.user_id, &reminder.id, device_id)
                .await;
            refreshing = true;
        }

        let category_id = ensure_category_registered(ctx, &reminder.id, actions, snooze).await;
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

        let notification_id = match ctx.platform.scheduler.schedule(target, content).await {
            Ok(id) => id,
            Err(e) => {
                // No record is written so the next pass retries
                warn!(
                    "Unable to schedule notification for reminder {}: {:?}",
                    reminder.id, e
                );
                return;
            }
        };

        let record = NotificationScheduleRecord {
            user_id: self.user_id,
            reminder_id: reminder.id,
            device_id: device_id.to_string(),
            notification_id,
            scheduled_for: target,
            reminder_updated_at: reminder.updated,
            snoozed_until: None,
            updated: now,
        };
        if let Err(e) = ctx.repos.schedule_records.upsert(&record).await {
            error!(
                "Unable to persist schedule record for reminder {}: {:?}",
                reminder.id, e
            );
            return;
        }

        if refreshing {
            summary.refreshed += 1;
        } else {
            summary.scheduled += 1;
        }
    }

    /// Strictly after the sync: collapse duplicate notifications per
    /// reminder, keeping the most recently created one. Duplicates appear
    /// when an earlier pass died between scheduling and persisting its
    /// record.
    async fn dedup_scheduled(&self, ctx: &NudgeContext) -> usize {
        let requests = match ctx.platform.scheduler.list_scheduled().await {
            Ok(requests) => requests,
            Err(e) => {
                warn!("Unable to list notifications for de-duplication: {:?}", e);
                return 0;
            }
        };

        let mut by_reminder: HashMap<ID, Vec<NotificationRequest>> = HashMap::new();
        for request in requests {
            by_reminder
                .entry(request.content.reminder_id)
                .or_default()
                .push(request);
        }

        let mut deduped = 0;
        for (_, mut requests) in by_reminder {
            if requests.len() < 2 {
                continue;
            }
            requests.sort_by_key(|request| request.created_at);
            for request in &requests[..requests.len() - 1] {
                match ctx.platform.scheduler.cancel(&request.id).await {
                    Ok(()) => deduped += 1,
                    Err(e) => warn!(
                        "Unable to cancel duplicate notification {}: {:?}",
                        request.id, e
                    ),
                }
            }
        }

        deduped
    }
}

pub(crate) fn notification_title(reminder: &Reminder) -> String {
    if reminder.is_priority {
        format!("❗ {}", reminder.title)
    } else {
        reminder.title.clone()
    }
}
