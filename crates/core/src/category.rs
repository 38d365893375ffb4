use nudge_domain::{
    CategoryButton, NotificationCategory, ReminderAction, SnoozeConfig, ACTION_COMPLETE,
    ACTION_DISMISS, ACTION_SNOOZE, ID,
};
use nudge_infra::NudgeContext;
use tracing::warn;

/// Platform ceiling on selectable notification buttons
pub const MAX_BUTTONS: usize = 4;

/// Derives a deterministic category id from everything that shapes the
/// button set. Two reminders with the same actions and snooze settings
/// would collide here, which is fine: the buttons are identical anyway.
/// The id must stay free of ':' and '-' to be a valid identifier on
/// every platform.
pub fn derive_category_id(
    reminder_id: &ID,
    actions: &[ReminderAction],
    snooze: &SnoozeConfig,
) -> String {
    let mut kinds: Vec<&'static str> = actions.iter().map(|a| a.kind.as_str()).collect();
    kinds.sort_unstable();
    kinds.dedup();

    let mut parts = vec![format!("rem{}", reminder_id.as_simple_string())];
    parts.extend(kinds.into_iter().map(String::from));
    if snooze.show_snooze_action {
        parts.push(format!("snooze{}", snooze.default_minutes));
    } else {
        parts.push("nosnooze".into());
    }

    parts.join("_")
}

fn build_buttons(actions: &[ReminderAction], snooze: &SnoozeConfig) -> Vec<CategoryButton> {
    let mut buttons = vec![
        CategoryButton::new(ACTION_COMPLETE, "Complete"),
        CategoryButton::new(ACTION_DISMISS, "Dismiss"),
    ];
    if snooze.show_snooze_action {
        buttons.push(CategoryButton::new(
            ACTION_SNOOZE,
            &format!("Snooze {} min", snooze.default_minutes),
        ));
    }

    let mut seen: Vec<&'static str> = Vec::new();
    for action in actions {
        if buttons.len() >= MAX_BUTTONS {
            break;
        }
        let kind = action.kind.as_str();
        if seen.contains(&kind) {
            continue;
        }
        seen.push(kind);
        buttons.push(CategoryButton::new(kind, action.kind.button_title()));
    }

    buttons
}

/// Registers the notification category for a reminder and returns its id.
/// Registration failure is not fatal: the notification is still scheduled,
/// just without buttons, so this logs and returns `None` instead of
/// propagating the error.
pub async fn ensure_category_registered(
    ctx: &NudgeContext,
    reminder_id: &ID,
    actions: &[ReminderAction],
    snooze: &SnoozeConfig,
) -> Option<String> {
    let category = NotificationCategory {
        id: derive_category_id(reminder_id, actions, snooze),
        buttons: build_buttons(actions, snooze),
    };

    match ctx.platform.scheduler.register_category(&category).await {
        Ok(()) => Some(category.id),
        Err(e) => {
            warn!(
                "Unable to register notification category {}: {:?}. Scheduling without buttons.",
                category.id, e
            );
            None
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use nudge_domain::ActionKind;
    use nudge_infra::{INotificationScheduler, Platform};
    use serde_json::json;
    use std::sync::Arc;

    fn call_action(reminder_id: ID) -> ReminderAction {
        ReminderAction::new(reminder_id, ActionKind::Call, json!({"number": "+4712345678"}))
    }

    #[test]
    fn category_id_ignores_action_order() {
        let reminder_id = ID::new();
        let snooze = SnoozeConfig::default();
        let a = ReminderAction::new(reminder_id, ActionKind::Call, json!({}));
        let b = ReminderAction::new(reminder_id, ActionKind::Email, json!({}));

        let id1 = derive_category_id(&reminder_id, &[a.clone(), b.clone()], &snooze);
        let id2 = derive_category_id(&reminder_id, &[b, a], &snooze);

        assert_eq!(id1, id2);
    }

    #[test]
    fn category_id_uses_a_safe_charset() {
        let reminder_id = ID::new();
        let id = derive_category_id(
            &reminder_id,
            &[call_action(reminder_id)],
            &SnoozeConfig::default(),
        );
        assert!(!id.contains(':'));
        assert!(!id.contains('-'));
    }

    #[test]
    fn snooze_settings_change_the_category_id() {
        let reminder_id = ID::new();
        let with_snooze = derive_category_id(&reminder_id, &[], &SnoozeConfig::default());
        let without_snooze = derive_category_id(
            &reminder_id,
            &[],
            &SnoozeConfig {
                show_snooze_action: false,
                default_minutes: 15,
            },
        );
        let longer_snooze = derive_category_id(
            &reminder_id,
            &[],
            &SnoozeConfig {
                show_snooze_action: true,
                default_minutes: 30,
            },
        );

        assert_ne!(with_snooze, without_snooze);
        assert_ne!(with_snooze, longer_snooze);
    }

    #[test]
    fn buttons_are_capped_and_deduplicated() {
        let reminder_id = ID::new();
        let actions = vec![
            ReminderAction::new(reminder_id, ActionKind::Call, json!({})),
            ReminderAction::new(reminder_id, ActionKind::Call, json!({})),
            ReminderAction::new(reminder_id, ActionKind::Email, json!({})),
            ReminderAction::new(reminder_id, ActionKind::Link, json!({})),
        ];
        let buttons = build_buttons(&actions, &SnoozeConfig::default());

        assert_eq!(buttons.len(), MAX_BUTTONS);
        assert_eq!(buttons[0].identifier, ACTION_COMPLETE);
        assert_eq!(buttons[1].identifier, ACTION_DISMISS);
        assert_eq!(buttons[2].identifier, ACTION_SNOOZE);
        assert_eq!(buttons[3].identifier, "call");
    }

    #[test]
    fn snooze_hidden_leaves_room_for_more_actions() {
        let reminder_id = ID::new();
        let actions = vec![
            ReminderAction::new(reminder_id, ActionKind::Call, json!({})),
            ReminderAction::new(reminder_id, ActionKind::Email, json!({})),
        ];
        let snooze = SnoozeConfig {
            show_snooze_action: false,
            default_minutes: 15,
        };
        let buttons = build_buttons(&actions, &snooze);

        assert!(buttons.iter().all(|b| b.identifier != ACTION_SNOOZE));
        assert_eq!(buttons.len(), 4);
    }

    #[tokio::test]
    async fn registration_is_idempotent() {
        let scheduler = Arc::new(nudge_infra::InMemoryNotificationScheduler::new());
        let mut ctx = nudge_infra::NudgeContext::create_inmemory();
        ctx.platform = Platform {
            scheduler: scheduler.clone(),
            push: ctx.platform.push.clone(),
        };
        let reminder_id = ID::new();
        let snooze = SnoozeConfig::default();

        let first = ensure_category_registered(&ctx, &reminder_id, &[], &snooze).await;
        let second = ensure_category_registered(&ctx, &reminder_id, &[], &snooze).await;

        assert!(first.is_some());
        assert_eq!(first, second);
        assert_eq!(scheduler.registered_category_ids().len(), 1);
    }

    struct FailingScheduler;

    #[async_trait::async_trait]
    impl INotificationScheduler for FailingScheduler {
        async fn schedule(
            &self,
            _remind_at: i64,
            _content: nudge_domain::NotificationContent,
        ) -> anyhow::Result<String> {
            Err(anyhow::anyhow!("scheduler down"))
        }
        async fn cancel(&self, _notification_id: &str) -> anyhow::Result<()> {
            Err(anyhow::anyhow!("scheduler down"))
        }
        async fn list_scheduled(&self) -> anyhow::Result<Vec<nudge_domain::NotificationRequest>> {
            Err(anyhow::anyhow!("scheduler down"))
        }
        async fn register_category(
            &self,
            _category: &nudge_domain::NotificationCategory,
        ) -> anyhow::Result<()> {
            Err(anyhow::anyhow!("scheduler down"))
        }
    }

    #[tokio::test]
    async fn registration_failure_yields_no_category() {
        let mut ctx = nudge_infra::NudgeContext::create_inmemory();
        ctx.platform = Platform {
            scheduler: Arc::new(FailingScheduler),
            push: ctx.platform.push.clone(),
        };

        let id = ensure_category_registered(&ctx, &ID::new(), &[], &SnoozeConfig::default()).await;
        assert!(id.is_none());
    }
}
