//! Roster configuration.
//!
//! # Responsibility
//! - Carry caller-tunable roster behavior (currently the leap-day policy).
//! - Read overrides from the process environment for CLI/FFI hosts.

use crate::countdown::LeapDayPolicy;
use log::warn;
use serde::{Deserialize, Serialize};

/// Environment variable overriding `RosterConfig::leap_day_policy`.
pub const LEAP_DAY_ENV: &str = "BIRTHDAYBOOK_LEAP_DAY";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    pub leap_day_policy: LeapDayPolicy,
}

impl RosterConfig {
    /// Builds a config from defaults plus environment overrides.
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var(LEAP_DAY_ENV) {
            config.apply_leap_day_override(&raw);
        }
        config
    }

    fn apply_leap_day_override(&mut self, raw: &str) {
        if raw.trim().is_empty() {
            return;
        }
        match raw.parse::<LeapDayPolicy>() {
            Ok(policy) => self.leap_day_policy = policy,
            Err(err) => warn!(
                "event=config_load module=config status=error error_code=invalid_leap_day_policy error={err}"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RosterConfig;
    use crate::countdown::LeapDayPolicy;

    #[test]
    fn defaults_to_feb28() {
        assert_eq!(RosterConfig::default().leap_day_policy, LeapDayPolicy::Feb28);
    }

    #[test]
    fn override_accepts_known_policy_and_ignores_garbage() {
        let mut config = RosterConfig::default();
        config.apply_leap_day_override("MAR1");
        assert_eq!(config.leap_day_policy, LeapDayPolicy::Mar1);

        config.apply_leap_day_override("someday");
        assert_eq!(config.leap_day_policy, LeapDayPolicy::Mar1);

        config.apply_leap_day_override("  ");
        assert_eq!(config.leap_day_policy, LeapDayPolicy::Mar1);
    }

    #[test]
    fn deserializes_with_missing_fields() {
        let config: RosterConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, RosterConfig::default());

        let config: RosterConfig =
            serde_json::from_str(r#"{"leap_day_policy":"mar1"}"#).unwrap();
        assert_eq!(config.leap_day_policy, LeapDayPolicy::Mar1);
    }
}
