use super::INotificationScheduler;
use nudge_domain::{NotificationCategory, NotificationContent, NotificationRequest};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

pub struct InMemoryNotificationScheduler {
    requests: Mutex<Vec<NotificationRequest>>,
    categories: Mutex<HashMap<String, NotificationCategory>>,
    // Monotonic sequence doubling as creation order, so tests that depend
    // on "most recently created" are deterministic
    seq: AtomicI64,
}

impl InMemoryNotificationScheduler {
    pub fn new() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            categories: Mutex::new(HashMap::new()),
            seq: AtomicI64::new(0),
        }
    }

    pub fn registered_category_ids(&self) -> Vec<String> {
        let categories = self.categories.lock().unwrap();
        categories.keys().cloned().collect()
    }
}

impl Default for InMemoryNotificationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl INotificationScheduler for InMemoryNotificationScheduler {
    async fn schedule(
        &self,
        remind_at: i64,
        content: NotificationContent,
    ) -> anyhow::Result<String> {
        let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        let id = format!("notif_{}", seq);
        let mut requests = self.requests.lock().unwrap();
        requests.push(NotificationRequest {
            id: id.clone(),
            remind_at,
            content,
            created_at: seq,
        });
        Ok(id)
    }

    async fn cancel(&self, notification_id: &str) -> anyhow::Result<()> {
        let mut requests = self.requests.lock().unwrap();
        requests.retain(|request| request.id != notification_id);
        Ok(())
    }

    async fn list_scheduled(&self) -> anyhow::Result<Vec<NotificationRequest>> {
        let requests = self.requests.lock().unwrap();
        Ok(requests.clone())
    }

    async fn register_category(&self, category: &NotificationCategory) -> anyhow::Result<()> {
        let mut categories = self.categories.lock().unwrap();
        categories.insert(category.id.clone(), category.clone());
        Ok(())
    }
}
