use super::IScheduleRecordRepo;
use crate::repos::shared::inmemory_repo::*;
use nudge_domain::{NotificationScheduleRecord, ID};

pub struct InMemoryScheduleRecordRepo {
    records: std::sync::Mutex<Vec<NotificationScheduleRecord>>,
}

impl InMemoryScheduleRecordRepo {
    pub fn new() -> Self {
        Self {
            records: std::sync::Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemoryScheduleRecordRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IScheduleRecordRepo for InMemoryScheduleRecordRepo {
    async fn upsert(&self, record: &NotificationScheduleRecord) -> anyhow::Result<()> {
        upsert_by(record, &self.records, |r| {
            r.user_id == record.user_id
                && r.reminder_id == record.reminder_id
                && r.device_id == record.device_id
        });
        Ok(())
    }

    async fn find(
        &self,
        user_id: &ID,
        reminder_id: &ID,
        device_id: &str,
    ) -> Option<NotificationScheduleRecord> {
        find_one_by(&self.records, |r| {
            r.user_id == *user_id && r.reminder_id == *reminder_id && r.device_id == device_id
        })
    }

    async fn find_by_device(
        &self,
        user_id: &ID,
        device_id: &str,
    ) -> anyhow::Result<Vec<NotificationScheduleRecord>> {
        Ok(find_by(&self.records, |r| {
            r.user_id == *user_id && r.device_id == device_id
        }))
    }

    async fn delete(
        &self,
        user_id: &ID,
        reminder_id: &ID,
        device_id: &str,
    ) -> Option<NotificationScheduleRecord> {
        find_and_delete_by(&self.records, |r| {
            r.user_id == *user_id && r.reminder_id == *reminder_id && r.device_id == device_id
        })
        .into_iter()
        .next()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn record(user_id: ID, reminder_id: ID, notification_id: &str) -> NotificationScheduleRecord {
        NotificationScheduleRecord {
            user_id,
            reminder_id,
            device_id: "device-1".into(),
            notification_id: notification_id.into(),
            scheduled_for: 1000,
            reminder_updated_at: 500,
            snoozed_until: None,
            updated: 500,
        }
    }

    #[tokio::test]
    async fn upsert_overwrites_on_the_composite_key() {
        let repo = InMemoryScheduleRecordRepo::new();
        let user_id = ID::new();
        let reminder_id = ID::new();

        repo.upsert(&record(user_id, reminder_id, "notif-1"))
            .await
            .unwrap();
        repo.upsert(&record(user_id, reminder_id, "notif-2"))
            .await
            .unwrap();

        let records = repo.find_by_device(&user_id, "device-1").await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].notification_id, "notif-2");
    }

    #[tokio::test]
    async fn delete_removes_only_the_matching_record() {
        let repo = InMemoryScheduleRecordRepo::new();
        let user_id = ID::new();
        let first = ID::new();
        let second = ID::new();

        repo.upsert(&record(user_id, first, "notif-1")).await.unwrap();
        repo.upsert(&record(user_id, second, "notif-2")).await.unwrap();

        let deleted = repo.delete(&user_id, &first, "device-1").await;
        assert_eq!(deleted.unwrap().notification_id, "notif-1");
        assert!(repo.find(&user_id, &first, "device-1").await.is_none());
        assert!(repo.find(&user_id, &second, "device-1").await.is_some());
    }
}
