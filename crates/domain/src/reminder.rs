use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};

pub const MILLIS_PER_MINUTE: i64 = 60 * 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReminderStatus {
    Pending,
    Completed,
    Dismissed,
}

/// A `Reminder` is owned by the remote store and treated as read-mostly
/// by the notification core. Snoozing is the one mutation the core
/// performs: it rewrites `scheduled_at` and clears the notified markers.
#[derive(Debug, Clone)]
pub struct Reminder {
    pub id: ID,
    pub user_id: ID,
    pub title: String,
    pub description: Option<String>,
    /// The timestamp in millis at which the reminder is due
    pub scheduled_at: i64,
    /// How many minutes before `scheduled_at` the user wants to be notified
    pub notify_before_minutes: i64,
    pub is_priority: bool,
    pub recurring_rule_id: Option<ID>,
    pub status: ReminderStatus,
    /// Last-notification markers, set by the delivery side and cleared on snooze
    pub notified_at: Option<i64>,
    pub priority_notified_at: Option<i64>,
    pub created: i64,
    pub updated: i64,
}

impl Reminder {
    pub fn new(user_id: ID, title: &str, scheduled_at: i64, now: i64) -> Self {
        Self {
            id: Default::default(),
            user_id,
            title: title.into(),
            description: None,
            scheduled_at,
            notify_before_minutes: 0,
            is_priority: false,
            recurring_rule_id: None,
            status: ReminderStatus::Pending,
            notified_at: None,
            priority_notified_at: None,
            created: now,
            updated: now,
        }
    }

    /// The instant at which the local notification for this reminder should
    /// fire: `notify_before_minutes` before the due time. When that instant
    /// has already passed the due time itself is used, so a late-registered
    /// notify-before is never silently dropped.
    pub fn notify_target(&self, now: i64) -> i64 {
        let target = self.scheduled_at - self.notify_before_minutes * MILLIS_PER_MINUTE;
        if target < now {
            self.scheduled_at
        } else {
            target
        }
    }

    pub fn apply_snooze(&mut self, minutes: i64, now: i64) {
        self.scheduled_at = now + minutes * MILLIS_PER_MINUTE;
        self.notified_at = None;
        self.priority_notified_at = None;
        self.updated = now;
    }

    pub fn is_upcoming(&self, now: i64) -> bool {
        self.status == ReminderStatus::Pending && self.scheduled_at > now
    }
}

impl Entity for Reminder {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn notify_target_is_before_due_time() {
        let now = 1_000_000;
        let mut reminder =
            Reminder::new(Default::default(), "Pay rent", now + 60 * MILLIS_PER_MINUTE, now);
        reminder.notify_before_minutes = 30;
        assert_eq!(reminder.notify_target(now), now + 30 * MILLIS_PER_MINUTE);
    }

    #[test]
    fn late_notify_before_falls_back_to_due_time() {
        let now = 1_000_000;
        let mut reminder =
            Reminder::new(Default::default(), "Pay rent", now + 5 * MILLIS_PER_MINUTE, now);
        reminder.notify_before_minutes = 30;
        assert_eq!(reminder.notify_target(now), reminder.scheduled_at);
    }

    #[test]
    fn snooze_moves_due_time_and_clears_markers() {
        let now = 1_000_000;
        let mut reminder = Reminder::new(Default::default(), "Pay rent", now + 1000, 0);
        reminder.notified_at = Some(now - 500);
        reminder.priority_notified_at = Some(now - 500);

        reminder.apply_snooze(10, now);

        assert_eq!(reminder.scheduled_at, now + 10 * MILLIS_PER_MINUTE);
        assert!(reminder.notified_at.is_none());
        assert!(reminder.priority_notified_at.is_none());
        assert_eq!(reminder.updated, now);
    }

    #[test]
    fn completed_reminder_is_not_upcoming() {
        let now = 1_000_000;
        let mut reminder = Reminder::new(Default::default(), "Pay rent", now + 1000, now);
        assert!(reminder.is_upcoming(now));
        reminder.status = ReminderStatus::Completed;
        assert!(!reminder.is_upcoming(now));
    }
}
