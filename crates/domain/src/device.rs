use crate::shared::entity::ID;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DevicePlatform {
    Ios,
    Android,
}

impl DevicePlatform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ios => "ios",
            Self::Android => "android",
        }
    }
}

impl FromStr for DevicePlatform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ios" => Ok(Self::Ios),
            "android" => Ok(Self::Android),
            _ => Err(format!("Unknown device platform: {}", s)),
        }
    }
}

/// Delivery mechanism the token belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Apns,
    Fcm,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Apns => "apns",
            Self::Fcm => "fcm",
        }
    }
}

impl FromStr for TokenType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "apns" => Ok(Self::Apns),
            "fcm" => Ok(Self::Fcm),
            _ => Err(format!("Unknown token type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PushToken {
    pub token: String,
    pub token_type: TokenType,
}

/// A delivery token persisted for a (user, device) pair. At most one row
/// per (user_id, token).
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceToken {
    pub user_id: ID,
    pub device_id: String,
    pub platform: DevicePlatform,
    pub token: String,
    pub token_type: TokenType,
    pub updated: i64,
}
