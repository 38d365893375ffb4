mod device_token;
mod preferences;
mod reminder;
mod reminder_action;
mod schedule_record;
mod shared;

pub use device_token::{IDeviceTokenRepo, InMemoryDeviceTokenRepo};
use device_token::PostgresDeviceTokenRepo;
pub use preferences::{IUserPreferencesRepo, InMemoryUserPreferencesRepo};
pub use reminder::{IReminderRepo, InMemoryReminderRepo, StoreChange};
pub use reminder_action::{IReminderActionRepo, InMemoryReminderActionRepo};
pub use schedule_record::{IScheduleRecordRepo, InMemoryScheduleRecordRepo};
use schedule_record::PostgresScheduleRecordRepo;

use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct Repos {
    /// Client boundary for the hosted reminder store
    pub reminders: Arc<dyn IReminderRepo>,
    pub reminder_actions: Arc<dyn IReminderActionRepo>,
    pub preferences: Arc<dyn IUserPreferencesRepo>,
    /// Core-owned: reminder to scheduled-notification mapping per device
    pub schedule_records: Arc<dyn IScheduleRecordRepo>,
    /// Core-owned: delivery tokens per (user, device)
    pub device_tokens: Arc<dyn IDeviceTokenRepo>,
}

impl Repos {
    /// The two core-owned tables live in postgres. The hosted-store
    /// collaborators keep their in-memory stand-ins here; the real client
    /// for them is bound by the surrounding application shell.
    pub async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        info!("DB CHECKING CONNECTION ...");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await?;
        info!("DB CHECKING CONNECTION ... [done]");

        Ok(Self {
            reminders: Arc::new(InMemoryReminderRepo::new()),
            reminder_actions: Arc::new(InMemoryReminderActionRepo::new()),
            preferences: Arc::new(InMemoryUserPreferencesRepo::new()),
            schedule_records: Arc::new(PostgresScheduleRecordRepo::new(pool.clone())),
            device_tokens: Arc::new(PostgresDeviceTokenRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            reminders: Arc::new(InMemoryReminderRepo::new()),
            reminder_actions: Arc::new(InMemoryReminderActionRepo::new()),
            preferences: Arc::new(InMemoryUserPreferencesRepo::new()),
            schedule_records: Arc::new(InMemoryScheduleRecordRepo::new()),
            device_tokens: Arc::new(InMemoryDeviceTokenRepo::new()),
        }
    }
}
