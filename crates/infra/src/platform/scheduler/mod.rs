mod inmemory;

pub use inmemory::InMemoryNotificationScheduler;
use nudge_domain::{NotificationCategory, NotificationContent, NotificationRequest};

/// The device-local notification scheduler (e.g. UNUserNotificationCenter).
/// The core treats it as a capability and never reimplements it.
#[async_trait::async_trait]
pub trait INotificationScheduler: Send + Sync {
    /// Returns the scheduler's handle for the new notification
    async fn schedule(
        &self,
        remind_at: i64,
        content: NotificationContent,
    ) -> anyhow::Result<String>;
    /// Canceling an unknown handle is not an error
    async fn cancel(&self, notification_id: &str) -> anyhow::Result<()>;
    async fn list_scheduled(&self) -> anyhow::Result<Vec<NotificationRequest>>;
    /// Registering the same category id twice must neither error nor duplicate
    async fn register_category(&self, category: &NotificationCategory) -> anyhow::Result<()>;
}
