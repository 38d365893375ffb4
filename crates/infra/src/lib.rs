mod config;
mod platform;
mod repos;
mod system;

pub use config::Config;
pub use platform::{
    INotificationScheduler, IPushTokenProvider, InMemoryNotificationScheduler,
    InMemoryPushTokenProvider, Platform,
};
pub use repos::{
    IDeviceTokenRepo, IReminderActionRepo, IReminderRepo, IScheduleRecordRepo,
    IUserPreferencesRepo, InMemoryDeviceTokenRepo, InMemoryReminderActionRepo,
    InMemoryReminderRepo, InMemoryScheduleRecordRepo, InMemoryUserPreferencesRepo, Repos,
    StoreChange,
};
use sqlx::migrate::MigrateError;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
pub use system::ISys;
use system::RealSys;

#[derive(Clone)]
pub struct NudgeContext {
    pub repos: Repos,
    pub platform: Platform,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
}

struct ContextParams {
    pub postgres_connection_string: String,
}

impl NudgeContext {
    async fn create(params: ContextParams) -> Self {
        let repos = Repos::create_postgres(&params.postgres_connection_string)
            .await
            .expect("Postgres credentials must be set and valid");
        Self {
            repos,
            platform: Platform::create_inmemory(),
            config: Config::new(),
            sys: Arc::new(RealSys {}),
        }
    }

    /// Everything in-process. Used by tests and by the headless agent when
    /// no database is configured.
    pub fn create_inmemory() -> Self {
        Self {
            repos: Repos::create_inmemory(),
            platform: Platform::create_inmemory(),
            config: Config::new(),
            sys: Arc::new(RealSys {}),
        }
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> NudgeContext {
    NudgeContext::create(ContextParams {
        postgres_connection_string: get_psql_connection_string(),
    })
    .await
}

fn get_psql_connection_string() -> String {
    const PSQL_CONNECTION_STRING: &str = "DATABASE_URL";

    std::env::var(PSQL_CONNECTION_STRING)
        .unwrap_or_else(|_| panic!("{} env var to be present.", PSQL_CONNECTION_STRING))
}

pub async fn run_migration() -> Result<(), MigrateError> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&get_psql_connection_string())
        .await
        .expect("TO CONNECT TO POSTGRES");

    sqlx::migrate!().run(&pool).await
}
