use super::IUserPreferencesRepo;
use crate::repos::shared::inmemory_repo::*;
use nudge_domain::{UserPreferences, ID};

pub struct InMemoryUserPreferencesRepo {
    preferences: std::sync::Mutex<Vec<UserPreferences>>,
}

impl InMemoryUserPreferencesRepo {
    pub fn new() -> Self {
        Self {
            preferences: std::sync::Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemoryUserPreferencesRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IUserPreferencesRepo for InMemoryUserPreferencesRepo {
    async fn upsert(&self, preferences: &UserPreferences) -> anyhow::Result<()> {
        let user_id = preferences.user_id;
        upsert_by(preferences, &self.preferences, |p| p.user_id == user_id);
        Ok(())
    }

    async fn find(&self, user_id: &ID) -> Option<UserPreferences> {
        find_one_by(&self.preferences, |p| p.user_id == *user_id)
    }
}
