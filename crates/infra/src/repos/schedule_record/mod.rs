mod inmemory;
mod postgres;

pub use inmemory::InMemoryScheduleRecordRepo;
pub use postgres::PostgresScheduleRecordRepo;

use nudge_domain::{NotificationScheduleRecord, ID};

/// Persisted reminder-to-notification mapping for a device. The store
/// must stay idempotent under retries, hence upsert with the composite
/// (user_id, reminder_id, device_id) key as the conflict target.
#[async_trait::async_trait]
pub trait IScheduleRecordRepo: Send + Sync {
    async fn upsert(&self, record: &NotificationScheduleRecord) -> anyhow::Result<()>;
    async fn find(
        &self,
        user_id: &ID,
        reminder_id: &ID,
        device_id: &str,
    ) -> Option<NotificationScheduleRecord>;
    async fn find_by_device(
        &self,
        user_id: &ID,
        device_id: &str,
    ) -> anyhow::Result<Vec<NotificationScheduleRecord>>;
    async fn delete(
        &self,
        user_id: &ID,
        reminder_id: &ID,
        device_id: &str,
    ) -> Option<NotificationScheduleRecord>;
}
