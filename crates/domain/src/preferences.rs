use crate::shared::entity::ID;

pub const DEFAULT_SNOOZE_MINUTES: i64 = 15;

/// Notification preferences for a user, read by the reconciler on every
/// pass. Lives in the remote store next to the reminders.
#[derive(Debug, Clone)]
pub struct UserPreferences {
    pub user_id: ID,
    pub default_snooze_minutes: i64,
    pub show_snooze_action: bool,
}

impl UserPreferences {
    pub fn new(user_id: ID) -> Self {
        Self {
            user_id,
            default_snooze_minutes: DEFAULT_SNOOZE_MINUTES,
            show_snooze_action: true,
        }
    }

    pub fn snooze_config(&self) -> SnoozeConfig {
        SnoozeConfig {
            show_snooze_action: self.show_snooze_action,
            default_minutes: self.default_snooze_minutes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnoozeConfig {
    pub show_snooze_action: bool,
    pub default_minutes: i64,
}

impl Default for SnoozeConfig {
    fn default() -> Self {
        Self {
            show_snooze_action: true,
            default_minutes: DEFAULT_SNOOZE_MINUTES,
        }
    }
}
