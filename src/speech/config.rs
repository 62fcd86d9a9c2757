use std::{fs, path::Path, time::Duration};

use bevy::prelude::*;
use serde::Deserialize;

use crate::core::config_seconds;

const CONFIG_PATH: &str = "config/speech.toml";

#[derive(Debug, Clone, Deserialize, Default)]
struct RawSpeechConfig {
    #[serde(default)]
    schedule: RawSchedule,
    #[serde(default)]
    bubble: RawBubble,
    #[serde(default)]
    fetch: RawFetch,
    #[serde(default)]
    history: RawHistory,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawSchedule {
    startup_greeting_secs: f32,
    check_interval_secs: f32,
    active_threshold_secs: f32,
}

impl Default for RawSchedule {
    fn default() -> Self {
        Self {
            startup_greeting_secs: 5.0,
            check_interval_secs: 120.0,
            active_threshold_secs: 300.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawBubble {
    lifetime_secs: f32,
}

impl Default for RawBubble {
    fn default() -> Self {
        Self {
            lifetime_secs: 15.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawFetch {
    ceiling_secs: f32,
}

impl Default for RawFetch {
    fn default() -> Self {
        Self { ceiling_secs: 5.0 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawHistory {
    capacity: usize,
    log_path: String,
}

impl Default for RawHistory {
    fn default() -> Self {
        Self {
            capacity: 10,
            log_path: "logs/speech_history.jsonl".to_string(),
        }
    }
}

/// Speech timings loaded from `config/speech.toml`.
#[derive(Resource, Debug, Clone)]
pub struct SpeechRules {
    pub startup_greeting: Duration,
    pub check_interval: Duration,
    /// Users idle for at least this long are not spoken to.
    pub active_threshold: Duration,
    pub bubble_lifetime: Duration,
    pub fetch_ceiling: Duration,
    pub history_capacity: usize,
    pub history_path: String,
}

impl SpeechRules {
    pub fn load_or_default() -> Self {
        let path = Path::new(CONFIG_PATH);
        match fs::read_to_string(path) {
            Ok(raw) => Self::from_toml(&raw).unwrap_or_else(|err| {
                warn!(
                    target: "speech",
                    "Failed to parse {} ({}). Falling back to defaults.",
                    CONFIG_PATH, err
                );
                Self::default()
            }),
            Err(err) => {
                warn!(
                    target: "speech",
                    "Failed to read {} ({}). Falling back to defaults.",
                    CONFIG_PATH, err
                );
                Self::default()
            }
        }
    }

    pub fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<RawSpeechConfig>(raw).map(Into::into)
    }
}

impl Default for SpeechRules {
    fn default() -> Self {
        RawSpeechConfig::default().into()
    }
}

impl From<RawSpeechConfig> for SpeechRules {
    fn from(value: RawSpeechConfig) -> Self {
        let defaults = RawSpeechConfig::default();
        Self {
            startup_greeting: config_seconds(
                "schedule.startup_greeting_secs",
                value.schedule.startup_greeting_secs,
                0.0,
                defaults.schedule.startup_greeting_secs,
            ),
            check_interval: config_seconds(
                "schedule.check_interval_secs",
                value.schedule.check_interval_secs,
                1.0,
                defaults.schedule.check_interval_secs,
            ),
            active_threshold: config_seconds(
                "schedule.active_threshold_secs",
                value.schedule.active_threshold_secs,
                1.0,
                defaults.schedule.active_threshold_secs,
            ),
            bubble_lifetime: config_seconds(
                "bubble.lifetime_secs",
                value.bubble.lifetime_secs,
                1.0,
                defaults.bubble.lifetime_secs,
            ),
            fetch_ceiling: config_seconds(
                "fetch.ceiling_secs",
                value.fetch.ceiling_secs,
                0.5,
                defaults.fetch.ceiling_secs,
            ),
            history_capacity: value.history.capacity.max(1),
            history_path: value.history.log_path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let rules = SpeechRules::default();
        assert_eq!(rules.startup_greeting, Duration::from_secs(5));
        assert_eq!(rules.check_interval, Duration::from_secs(120));
        assert_eq!(rules.active_threshold, Duration::from_secs(300));
        assert_eq!(rules.bubble_lifetime, Duration::from_secs(15));
        assert_eq!(rules.fetch_ceiling, Duration::from_secs(5));
        assert_eq!(rules.history_capacity, 10);
    }

    #[test]
    fn overrides_are_clamped() {
        let rules = SpeechRules::from_toml(
            r#"
            [fetch]
            ceiling_secs = 0.0

            [history]
            capacity = 0
            "#,
        )
        .expect("valid toml");
        assert_eq!(rules.fetch_ceiling, Duration::from_millis(500));
        assert_eq!(rules.history_capacity, 1);
        assert_eq!(rules.bubble_lifetime, Duration::from_secs(15));
    }

    #[test]
    fn unusable_seconds_fall_back_to_defaults() {
        let rules = SpeechRules::from_toml(
            r#"
            [schedule]
            check_interval_secs = inf

            [fetch]
            ceiling_secs = -inf
            "#,
        )
        .expect("valid toml");
        assert_eq!(rules.check_interval, Duration::from_secs(120));
        // Negative infinity is raised to the minimum instead of rejected.
        assert_eq!(rules.fetch_ceiling, Duration::from_millis(500));
    }
}
