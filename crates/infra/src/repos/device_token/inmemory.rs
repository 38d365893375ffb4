use super::IDeviceTokenRepo;
use crate::repos::shared::inmemory_repo::*;
use nudge_domain::{DeviceToken, ID};

pub struct InMemoryDeviceTokenRepo {
    tokens: std::sync::Mutex<Vec<DeviceToken>>,
}

impl InMemoryDeviceTokenRepo {
    pub fn new() -> Self {
        Self {
            tokens: std::sync::Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemoryDeviceTokenRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IDeviceTokenRepo for InMemoryDeviceTokenRepo {
    async fn upsert(&self, token: &DeviceToken) -> anyhow::Result<()> {
        upsert_by(token, &self.tokens, |t| {
            t.user_id == token.user_id && t.token == token.token
        });
        Ok(())
    }

    async fn find_by_user(&self, user_id: &ID) -> anyhow::Result<Vec<DeviceToken>> {
        Ok(find_by(&self.tokens, |t| t.user_id == *user_id))
    }
}
