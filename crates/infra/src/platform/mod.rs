mod push;
mod scheduler;

pub use push::{IPushTokenProvider, InMemoryPushTokenProvider};
pub use scheduler::{INotificationScheduler, InMemoryNotificationScheduler};

use std::sync::Arc;

/// Capabilities provided by the host OS. Swappable like the repos: real
/// platform bindings are injected by the surrounding application shell,
/// in-memory fakes back tests and the headless agent.
#[derive(Clone)]
pub struct Platform {
    pub scheduler: Arc<dyn INotificationScheduler>,
    pub push: Arc<dyn IPushTokenProvider>,
}

impl Platform {
    pub fn create_inmemory() -> Self {
        Self {
            scheduler: Arc::new(InMemoryNotificationScheduler::new()),
            push: Arc::new(InMemoryPushTokenProvider::new()),
        }
    }
}
