use super::IScheduleRecordRepo;

use nudge_domain::{NotificationScheduleRecord, ID};
use sqlx::{types::Uuid, FromRow, PgPool};

pub struct PostgresScheduleRecordRepo {
    pool: PgPool,
}

impl PostgresScheduleRecordRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ScheduleRecordRaw {
    user_uid: Uuid,
    reminder_uid: Uuid,
    device_id: String,
    notification_id: String,
    scheduled_for: i64,
    reminder_updated_at: i64,
    snoozed_until: Option<i64>,
    updated: i64,
}

impl From<ScheduleRecordRaw> for NotificationScheduleRecord {
    fn from(raw: ScheduleRecordRaw) -> Self {
        Self {
            user_id: raw.user_uid.into(),
            reminder_id: raw.reminder_uid.into(),
            device_id: raw.device_id,
            notification_id: raw.notification_id,
            scheduled_for: raw.scheduled_for,
            reminder_updated_at: raw.reminder_updated_at,
            snoozed_until: raw.snoozed_until,
            updated: raw.updated,
        }
    }
}

#[async_trait::async_trait]
impl IScheduleRecordRepo for PostgresScheduleRecordRepo {
    async fn upsert(&self, record: &NotificationScheduleRecord) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO schedule_records
            (user_uid, reminder_uid, device_id, notification_id, scheduled_for, reminder_updated_at, snoozed_until, updated)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (user_uid, reminder_uid, device_id)
            DO UPDATE SET
                notification_id = excluded.notification_id,
                scheduled_for = excluded.scheduled_for,
                reminder_updated_at = excluded.reminder_updated_at,
                snoozed_until = excluded.snoozed_until,
                updated = excluded.updated
            "#,
        )
        .bind(record.user_id.inner())
        .bind(record.reminder_id.inner())
        .bind(&record.device_id)
        .bind(&record.notification_id)
        .bind(record.scheduled_for)
        .bind(record.reminder_updated_at)
        .bind(record.snoozed_until)
        .bind(record.updated)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(
        &self,
        user_id: &ID,
        reminder_id: &ID,
        device_id: &str,
    ) -> Option<NotificationScheduleRecord> {
        sqlx::query_as::<_, ScheduleRecordRaw>(
            r#"
            SELECT * FROM schedule_records
            WHERE user_uid = $1 AND reminder_uid = $2 AND device_id = $3
            "#,
        )
        .bind(user_id.inner())
        .bind(reminder_id.inner())
        .bind(device_id)
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .map(|raw| raw.into())
    }

    async fn find_by_device(
        &self,
        user_id: &ID,
        device_id: &str,
    ) -> anyhow::Result<Vec<NotificationScheduleRecord>> {
        let records = sqlx::query_as::<_, ScheduleRecordRaw>(
            r#"
            SELECT * FROM schedule_records
            WHERE user_uid = $1 AND device_id = $2
            "#,
        )
        .bind(user_id.inner())
        .bind(device_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(|raw| raw.into()).collect())
    }

    async fn delete(
        &self,
        user_id: &ID,
        reminder_id: &ID,
        device_id: &str,
    ) -> Option<NotificationScheduleRecord> {
        sqlx::query_as::<_, ScheduleRecordRaw>(
            r#"
            DELETE FROM schedule_records
            WHERE user_uid = $1 AND reminder_uid = $2 AND device_id = $3
            RETURNING *
            "#,
        )
        .bind(user_id.inner())
        .bind(reminder_id.inner())
        .bind(device_id)
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .map(|raw| raw.into())
    }
}
