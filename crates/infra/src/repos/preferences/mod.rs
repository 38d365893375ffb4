mod inmemory;

pub use inmemory::InMemoryUserPreferencesRepo;
use nudge_domain::{UserPreferences, ID};

#[async_trait::async_trait]
pub trait IUserPreferencesRepo: Send + Sync {
    async fn upsert(&self, preferences: &UserPreferences) -> anyhow::Result<()>;
    async fn find(&self, user_id: &ID) -> Option<UserPreferences>;
}
