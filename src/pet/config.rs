use std::{fs, path::Path, time::Duration};

use bevy::prelude::*;
use serde::Deserialize;

use crate::core::{config_seconds, sanitize_time_scale};

const CONFIG_PATH: &str = "config/behavior.toml";

#[derive(Debug, Clone, Deserialize, Default)]
struct RawBehaviorConfig {
    #[serde(default)]
    clock: RawClock,
    #[serde(default)]
    timing: RawTiming,
    #[serde(default)]
    lockout: RawLockout,
    #[serde(default)]
    clicks: RawClicks,
    #[serde(default)]
    inactivity: RawInactivity,
    #[serde(default)]
    movement: RawMovement,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawClock {
    time_scale: f32,
}

impl Default for RawClock {
    fn default() -> Self {
        Self { time_scale: 1.0 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawTiming {
    run_interval_secs: f32,
    idle_action_interval_secs: f32,
    inactivity_poll_secs: f32,
    startup_greeting_secs: f32,
    reaction_hold_secs: f32,
}

impl Default for RawTiming {
    fn default() -> Self {
        Self {
            run_interval_secs: 30.0,
            idle_action_interval_secs: 45.0,
            inactivity_poll_secs: 5.0,
            startup_greeting_secs: 1.0,
            reaction_hold_secs: 5.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawLockout {
    drinking_secs: f32,
    angry_secs: f32,
}

impl Default for RawLockout {
    fn default() -> Self {
        Self {
            drinking_secs: 10.0,
            angry_secs: 60.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawClicks {
    annoyance_threshold: u32,
    double_click_window_secs: f32,
}

impl Default for RawClicks {
    fn default() -> Self {
        Self {
            annoyance_threshold: 10,
            double_click_window_secs: 0.3,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawInactivity {
    sleep_after_secs: f32,
    cry_after_secs: f32,
}

impl Default for RawInactivity {
    fn default() -> Self {
        Self {
            sleep_after_secs: 60.0,
            cry_after_secs: 300.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawMovement {
    run_duration_secs: f32,
    window_size: [u32; 2],
}

impl Default for RawMovement {
    fn default() -> Self {
        Self {
            run_duration_secs: 2.0,
            window_size: [320, 320],
        }
    }
}

/// Tunable rule set for the pet coordinator, loaded from `config/behavior.toml`.
#[derive(Resource, Debug, Clone)]
pub struct BehaviorRules {
    pub time_scale: f32,
    pub run_interval: Duration,
    pub idle_action_interval: Duration,
    pub inactivity_poll: Duration,
    pub startup_greeting_delay: Duration,
    pub reaction_hold: Duration,
    pub drinking: Duration,
    pub angry: Duration,
    pub annoyance_threshold: u32,
    pub double_click_window: Duration,
    pub sleep_after: Duration,
    pub cry_after: Duration,
    pub run_duration: Duration,
    pub window_size: UVec2,
}

impl BehaviorRules {
    pub fn load_or_default() -> Self {
        let path = Path::new(CONFIG_PATH);
        match fs::read_to_string(path) {
            Ok(raw) => Self::from_toml(&raw).unwrap_or_else(|err| {
                warn!(
                    "Failed to parse {} ({}). Falling back to defaults.",
                    CONFIG_PATH, err
                );
                RawBehaviorConfig::default().into()
            }),
            Err(err) => {
                warn!(
                    "Failed to read {} ({}). Falling back to defaults.",
                    CONFIG_PATH, err
                );
                RawBehaviorConfig::default().into()
            }
        }
    }

    pub fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<RawBehaviorConfig>(raw).map(Into::into)
    }
}

impl Default for BehaviorRules {
    fn default() -> Self {
        RawBehaviorConfig::default().into()
    }
}

impl From<RawBehaviorConfig> for BehaviorRules {
    fn from(value: RawBehaviorConfig) -> Self {
        let defaults = RawBehaviorConfig::default();
        let sleep_after = config_seconds(
            "inactivity.sleep_after_secs",
            value.inactivity.sleep_after_secs,
            1.0,
            defaults.inactivity.sleep_after_secs,
        );
        // Crying is the deeper escalation and must never fire before sleeping.
        let cry_after = config_seconds(
            "inactivity.cry_after_secs",
            value.inactivity.cry_after_secs,
            1.0,
            defaults.inactivity.cry_after_secs,
        )
        .max(sleep_after);

        Self {
            time_scale: sanitize_time_scale(value.clock.time_scale),
            run_interval: config_seconds(
                "timing.run_interval_secs",
                value.timing.run_interval_secs,
                1.0,
                defaults.timing.run_interval_secs,
            ),
            idle_action_interval: config_seconds(
                "timing.idle_action_interval_secs",
                value.timing.idle_action_interval_secs,
                1.0,
                defaults.timing.idle_action_interval_secs,
            ),
            inactivity_poll: config_seconds(
                "timing.inactivity_poll_secs",
                value.timing.inactivity_poll_secs,
                0.1,
                defaults.timing.inactivity_poll_secs,
            ),
            startup_greeting_delay: config_seconds(
                "timing.startup_greeting_secs",
                value.timing.startup_greeting_secs,
                0.0,
                defaults.timing.startup_greeting_secs,
            ),
            reaction_hold: config_seconds(
                "timing.reaction_hold_secs",
                value.timing.reaction_hold_secs,
                0.1,
                defaults.timing.reaction_hold_secs,
            ),
            drinking: config_seconds(
                "lockout.drinking_secs",
                value.lockout.drinking_secs,
                0.1,
                defaults.lockout.drinking_secs,
            ),
            angry: config_seconds(
                "lockout.angry_secs",
                value.lockout.angry_secs,
                0.1,
                defaults.lockout.angry_secs,
            ),
            annoyance_threshold: value.clicks.annoyance_threshold.max(1),
            double_click_window: config_seconds(
                "clicks.double_click_window_secs",
                value.clicks.double_click_window_secs,
                0.05,
                defaults.clicks.double_click_window_secs,
            ),
            sleep_after,
            cry_after,
            run_duration: config_seconds(
                "movement.run_duration_secs",
                value.movement.run_duration_secs,
                0.1,
                defaults.movement.run_duration_secs,
            ),
            window_size: UVec2::new(
                value.movement.window_size[0].max(1),
                value.movement.window_size[1].max(1),
            ),
        }
    }
}
