use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

/// The closed set of quick actions that can be attached to a `Reminder`.
/// Adding a variant is a compile-time checked change everywhere the set
/// is matched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Call,
    Link,
    Location,
    Email,
    Note,
    Assign,
    Photo,
    Voice,
    Subtasks,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Call => "call",
            Self::Link => "link",
            Self::Location => "location",
            Self::Email => "email",
            Self::Note => "note",
            Self::Assign => "assign",
            Self::Photo => "photo",
            Self::Voice => "voice",
            Self::Subtasks => "subtasks",
        }
    }

    /// Title for the notification action button of this kind
    pub fn button_title(&self) -> &'static str {
        match self {
            Self::Call => "Call",
            Self::Link => "Open Link",
            Self::Location => "Directions",
            Self::Email => "Send Email",
            Self::Note => "View Note",
            Self::Assign => "Assignee",
            Self::Photo => "View Photo",
            Self::Voice => "Play Voice Note",
            Self::Subtasks => "Subtasks",
        }
    }
}

impl Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum UnknownActionKind {
    #[error("Unknown reminder action kind: {0}")]
    Unknown(String),
}

impl FromStr for ActionKind {
    type Err = UnknownActionKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "call" => Ok(Self::Call),
            "link" => Ok(Self::Link),
            "location" => Ok(Self::Location),
            "email" => Ok(Self::Email),
            "note" => Ok(Self::Note),
            "assign" => Ok(Self::Assign),
            "photo" => Ok(Self::Photo),
            "voice" => Ok(Self::Voice),
            "subtasks" => Ok(Self::Subtasks),
            _ => Err(UnknownActionKind::Unknown(s.to_string())),
        }
    }
}

/// A quick action attached to a `Reminder`, owned by the remote store and
/// only ever read by the notification core to build category buttons.
#[derive(Debug, Clone)]
pub struct ReminderAction {
    pub id: ID,
    pub reminder_id: ID,
    pub kind: ActionKind,
    /// Free-form structured payload specific to `kind`, e.g. a phone
    /// number for `Call` or coordinates for `Location`
    pub value: serde_json::Value,
}

impl ReminderAction {
    pub fn new(reminder_id: ID, kind: ActionKind, value: serde_json::Value) -> Self {
        Self {
            id: Default::default(),
            reminder_id,
            kind,
            value,
        }
    }
}

impl Entity for ReminderAction {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn action_kind_str_roundtrip() {
        let kinds = [
            ActionKind::Call,
            ActionKind::Link,
            ActionKind::Location,
            ActionKind::Email,
            ActionKind::Note,
            ActionKind::Assign,
            ActionKind::Photo,
            ActionKind::Voice,
            ActionKind::Subtasks,
        ];
        for kind in kinds {
            assert_eq!(kind.as_str().parse::<ActionKind>().unwrap(), kind);
        }
        assert!("reboot".parse::<ActionKind>().is_err());
    }
}
