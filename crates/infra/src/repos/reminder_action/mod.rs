mod inmemory;

pub use inmemory::InMemoryReminderActionRepo;
use nudge_domain::{ReminderAction, ID};

/// Read-only capability of the hosted store: the quick actions attached
/// to a user's reminders. The reconciler fetches them batched, one call
/// per pass.
#[async_trait::async_trait]
pub trait IReminderActionRepo: Send + Sync {
    async fn insert(&self, action: &ReminderAction) -> anyhow::Result<()>;
    async fn find_by_reminders(&self, reminder_ids: &[ID]) -> anyhow::Result<Vec<ReminderAction>>;
}
