mod inmemory;

pub use inmemory::InMemoryReminderRepo;
use nudge_domain::{Reminder, ID};
use tokio::sync::broadcast;

/// A mutation event from the reminder store's change feed
#[derive(Debug, Clone)]
pub struct StoreChange {
    pub reminder_id: ID,
}

/// Client boundary for the hosted reminder store. Reads are scoped to the
/// authenticated user; the core only ever writes through `save` (snooze
/// and status transitions).
#[async_trait::async_trait]
pub trait IReminderRepo: Send + Sync {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()>;
    async fn save(&self, reminder: &Reminder) -> anyhow::Result<()>;
    async fn find(&self, reminder_id: &ID) -> Option<Reminder>;
    /// All pending reminders due after `from`, unbounded upper end
    async fn find_upcoming(&self, user_id: &ID, from: i64) -> anyhow::Result<Vec<Reminder>>;
    /// Subscribe to store mutations. Every insert and save is published.
    fn subscribe(&self) -> broadcast::Receiver<StoreChange>;
}
