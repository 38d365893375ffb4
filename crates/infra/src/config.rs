use nudge_domain::{DevicePlatform, SnoozeConfig, DEFAULT_SNOOZE_MINUTES};
use std::fmt::Display;
use std::str::FromStr;
use tracing::warn;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Config {
    /// Stable identifier for this device. Schedule records are scoped to
    /// (user, device) so two devices of the same user never fight over
    /// each other's notifications.
    pub device_id: String,
    pub platform: DevicePlatform,
    /// Seconds between periodic reconciliation passes
    pub reconcile_interval_secs: u64,
    /// How far the freshly computed notify target may drift from a
    /// persisted schedule before the schedule counts as stale. The exact
    /// value is a compatibility heuristic, not load-bearing.
    pub hold_tolerance_millis: i64,
    pub default_snooze_minutes: i64,
}

impl Config {
    pub fn new() -> Self {
        let device_id = match std::env::var("NUDGE_DEVICE_ID") {
            Ok(id) => id,
            Err(_) => {
                let id = Uuid::new_v4().simple().to_string();
                warn!(
                    "Did not find NUDGE_DEVICE_ID environment variable. Generated device id: {}",
                    id
                );
                id
            }
        };
        let platform = match std::env::var("NUDGE_PLATFORM") {
            Ok(platform) => match platform.parse::<DevicePlatform>() {
                Ok(platform) => platform,
                Err(e) => {
                    warn!("{}. Falling back to ios.", e);
                    DevicePlatform::Ios
                }
            },
            Err(_) => DevicePlatform::Ios,
        };

        Self {
            device_id,
            platform,
            reconcile_interval_secs: parse_env_var("NUDGE_RECONCILE_INTERVAL_SECS", 60),
            hold_tolerance_millis: parse_env_var("NUDGE_HOLD_TOLERANCE_MILLIS", 62 * 1000),
            default_snooze_minutes: parse_env_var(
                "NUDGE_DEFAULT_SNOOZE_MINUTES",
                DEFAULT_SNOOZE_MINUTES,
            ),
        }
    }

    /// Snooze settings to use for a user without a preferences row
    pub fn fallback_snooze_config(&self) -> SnoozeConfig {
        SnoozeConfig {
            show_snooze_action: true,
            default_minutes: self.default_snooze_minutes,
        }
    }
}

fn parse_env_var<T: FromStr + Display + Copy>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(value) => match value.parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                warn!(
                    "The given {}: {} is not valid, falling back to the default: {}.",
                    name, value, default
                );
                default
            }
        },
        Err(_) => default,
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
