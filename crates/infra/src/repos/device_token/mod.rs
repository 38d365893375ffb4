mod inmemory;
mod postgres;

pub use inmemory::InMemoryDeviceTokenRepo;
pub use postgres::PostgresDeviceTokenRepo;

use nudge_domain::{DeviceToken, ID};

/// Delivery tokens, at most one row per (user_id, token)
#[async_trait::async_trait]
pub trait IDeviceTokenRepo: Send + Sync {
    async fn upsert(&self, token: &DeviceToken) -> anyhow::Result<()>;
    async fn find_by_user(&self, user_id: &ID) -> anyhow::Result<Vec<DeviceToken>>;
}
