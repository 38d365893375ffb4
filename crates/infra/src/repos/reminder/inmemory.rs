use super::{IReminderRepo, StoreChange};
use crate::repos::shared::inmemory_repo::*;
use nudge_domain::{Reminder, ID};
use tokio::sync::broadcast;

pub struct InMemoryReminderRepo {
    reminders: std::sync::Mutex<Vec<Reminder>>,
    changes: broadcast::Sender<StoreChange>,
}

impl InMemoryReminderRepo {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(16);
        Self {
            reminders: std::sync::Mutex::new(Vec::new()),
            changes,
        }
    }

    fn publish(&self, reminder_id: ID) {
        // No listeners is fine
        let _ = self.changes.send(StoreChange { reminder_id });
    }
}

impl Default for InMemoryReminderRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IReminderRepo for InMemoryReminderRepo {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()> {
        insert(reminder, &self.reminders);
        self.publish(reminder.id);
        Ok(())
    }

    async fn save(&self, reminder: &Reminder) -> anyhow::Result<()> {
        save(reminder, &self.reminders);
        self.publish(reminder.id);
        Ok(())
    }

    async fn find(&self, reminder_id: &ID) -> Option<Reminder> {
        find(reminder_id, &self.reminders)
    }

    async fn find_upcoming(&self, user_id: &ID, from: i64) -> anyhow::Result<Vec<Reminder>> {
        Ok(find_by(&self.reminders, |reminder| {
            reminder.user_id == *user_id && reminder.is_upcoming(from)
        }))
    }

    fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.changes.subscribe()
    }
}
