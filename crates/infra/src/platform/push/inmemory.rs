use super::IPushTokenProvider;
use nudge_domain::{PushToken, TokenType};
use std::sync::Mutex;

pub struct InMemoryPushTokenProvider {
    granted: Mutex<bool>,
    token: Mutex<Option<PushToken>>,
}

impl InMemoryPushTokenProvider {
    pub fn new() -> Self {
        Self {
            granted: Mutex::new(true),
            token: Mutex::new(Some(PushToken {
                token: "inmemory-push-token".into(),
                token_type: TokenType::Apns,
            })),
        }
    }

    pub fn deny_permission(&self) {
        *self.granted.lock().unwrap() = false;
    }

    pub fn set_token(&self, token: Option<PushToken>) {
        *self.token.lock().unwrap() = token;
    }
}

impl Default for InMemoryPushTokenProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IPushTokenProvider for InMemoryPushTokenProvider {
    async fn request_permission(&self) -> anyhow::Result<bool> {
        Ok(*self.granted.lock().unwrap())
    }

    async fn get_token(&self) -> anyhow::Result<Option<PushToken>> {
        Ok(self.token.lock().unwrap().clone())
    }
}
