use crate::shared::entity::ID;
use serde::{Deserialize, Serialize};

/// Action identifier the platform reports when the user taps the
/// notification body instead of a button
pub const DEFAULT_TAP_ACTION: &str = "default";
pub const ACTION_COMPLETE: &str = "complete";
pub const ACTION_DISMISS: &str = "dismiss";
pub const ACTION_SNOOZE: &str = "snooze";

/// The content attached to every scheduled local notification. Serialized
/// into the platform payload and echoed back on notification responses,
/// so it carries everything the response dispatcher needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationContent {
    pub reminder_id: ID,
    pub title: String,
    pub body: String,
    /// The reminder's due time at schedule time
    #[serde(with = "ts_millis_rfc3339")]
    pub original_time: i64,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "ts_millis_rfc3339_opt"
    )]
    pub reminder_updated_at: Option<i64>,
    pub default_snooze_minutes: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    /// Diagnostic notifications set this flag and are ignored by the
    /// response dispatcher unconditionally
    #[serde(default, skip_serializing_if = "is_false")]
    pub test_notification: bool,
}

impl NotificationContent {
    pub fn to_payload(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// A notification currently scheduled with the device scheduler
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationRequest {
    pub id: String,
    pub remind_at: i64,
    pub content: NotificationContent,
    /// When the request was handed to the scheduler. The de-duplication
    /// pass keeps the most recently created request per reminder.
    pub created_at: i64,
}

/// A bounded set of selectable buttons attached to a notification
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationCategory {
    pub id: String,
    pub buttons: Vec<CategoryButton>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryButton {
    pub identifier: String,
    pub title: String,
}

impl CategoryButton {
    pub fn new(identifier: &str, title: &str) -> Self {
        Self {
            identifier: identifier.into(),
            title: title.into(),
        }
    }
}

/// A tapped or actioned notification as delivered by the platform. The
/// payload arrives as raw JSON and is validated by the dispatcher.
#[derive(Debug, Clone)]
pub struct NotificationResponse {
    pub action_identifier: String,
    pub data: serde_json::Value,
}

mod ts_millis_rfc3339 {
    use chrono::{DateTime, TimeZone, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(millis: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        match Utc.timestamp_millis_opt(*millis).single() {
            Some(dt) => serializer.serialize_str(&dt.to_rfc3339()),
            None => Err(serde::ser::Error::custom(format!(
                "Timestamp out of range: {}",
                millis
            ))),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        let value = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&value)
            .map(|dt| dt.timestamp_millis())
            .map_err(serde::de::Error::custom)
    }
}

mod ts_millis_rfc3339_opt {
    use chrono::DateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        millis: &Option<i64>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match millis {
            Some(ms) => super::ts_millis_rfc3339::serialize(ms, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<i64>, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        match value {
            Some(value) => DateTime::parse_from_rfc3339(&value)
                .map(|dt| Some(dt.timestamp_millis()))
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn content() -> NotificationContent {
        NotificationContent {
            reminder_id: Default::default(),
            title: "Water the plants".into(),
            body: "Living room and balcony".into(),
            original_time: 1_700_000_000_000,
            reminder_updated_at: Some(1_699_999_000_000),
            default_snooze_minutes: 15,
            category_id: Some("remabc_call_snooze15".into()),
            test_notification: false,
        }
    }

    #[test]
    fn payload_carries_the_documented_contract_fields() {
        let payload = content().to_payload();
        assert!(payload.get("reminderId").is_some());
        assert_eq!(payload["title"], "Water the plants");
        assert_eq!(payload["body"], "Living room and balcony");
        assert_eq!(payload["defaultSnoozeMinutes"], 15);
        // Instants are serialized as RFC 3339 strings
        assert!(payload["originalTime"].as_str().unwrap().starts_with("2023-11-14T"));
        assert!(payload["reminderUpdatedAt"].as_str().is_some());
        // Reserved flag is absent unless set
        assert!(payload.get("testNotification").is_none());
    }

    #[test]
    fn payload_roundtrips_through_the_wire_format() {
        let original = content();
        let parsed: NotificationContent =
            serde_json::from_value(original.to_payload()).expect("payload parses");
        assert_eq!(parsed, original);
    }
}
