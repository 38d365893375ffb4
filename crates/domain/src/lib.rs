mod action;
mod device;
mod notification;
mod preferences;
mod reminder;
mod schedule_record;
mod shared;

pub use action::{ActionKind, ReminderAction, UnknownActionKind};
pub use device::{DevicePlatform, DeviceToken, PushToken, TokenType};
pub use notification::{
    CategoryButton, NotificationCategory, NotificationContent, NotificationRequest,
    NotificationResponse, ACTION_COMPLETE, ACTION_DISMISS, ACTION_SNOOZE, DEFAULT_TAP_ACTION,
};
pub use preferences::{SnoozeConfig, UserPreferences, DEFAULT_SNOOZE_MINUTES};
pub use reminder::{Reminder, ReminderStatus, MILLIS_PER_MINUTE};
pub use schedule_record::NotificationScheduleRecord;
pub use shared::entity::{Entity, InvalidIDError, ID};
