mod inmemory;

pub use inmemory::InMemoryPushTokenProvider;
use nudge_domain::PushToken;

/// Platform permission and token API
#[async_trait::async_trait]
pub trait IPushTokenProvider: Send + Sync {
    /// Ask the user for notification permission, true when granted
    async fn request_permission(&self) -> anyhow::Result<bool>;
    /// None when the device cannot deliver notifications at all
    /// (e.g. a simulator without push entitlements)
    async fn get_token(&self) -> anyhow::Result<Option<PushToken>>;
}
