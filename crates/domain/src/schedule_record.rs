use crate::shared::entity::ID;

/// Persisted mapping between a `Reminder` and the local notification that
/// has been scheduled for it on this device. There is at most one live
/// record per (user_id, reminder_id, device_id) and the schedule
/// reconciler is the sole writer, with the snooze local-fallback path as
/// the one exception.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationScheduleRecord {
    pub user_id: ID,
    pub reminder_id: ID,
    pub device_id: String,
    /// Handle returned by the device notification scheduler
    pub notification_id: String,
    pub scheduled_for: i64,
    /// Snapshot of the reminder's `updated` at schedule time, compared
    /// against the live reminder to detect a stale schedule
    pub reminder_updated_at: i64,
    /// Set when a user-initiated snooze owns this schedule. While in the
    /// future the reconciler must not touch the notification.
    pub snoozed_until: Option<i64>,
    pub updated: i64,
}

impl NotificationScheduleRecord {
    pub fn is_snoozed(&self, now: i64) -> bool {
        self.snoozed_until.map(|until| until > now).unwrap_or(false)
    }
}
