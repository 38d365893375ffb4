use super::IReminderActionRepo;
use crate::repos::shared::inmemory_repo::*;
use nudge_domain::{ReminderAction, ID};

pub struct InMemoryReminderActionRepo {
    actions: std::sync::Mutex<Vec<ReminderAction>>,
}

impl InMemoryReminderActionRepo {
    pub fn new() -> Self {
        Self {
            actions: std::sync::Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemoryReminderActionRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IReminderActionRepo for InMemoryReminderActionRepo {
    async fn insert(&self, action: &ReminderAction) -> anyhow::Result<()> {
        insert(action, &self.actions);
        Ok(())
    }

    async fn find_by_reminders(&self, reminder_ids: &[ID]) -> anyhow::Result<Vec<ReminderAction>> {
        Ok(find_by(&self.actions, |action| {
            reminder_ids.contains(&action.reminder_id)
        }))
    }
}
