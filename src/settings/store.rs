//! Flat JSON settings record and its on-disk store.
use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SETTINGS_PATH: &str = "config/settings.json";

pub const MIN_TRANSPARENCY: u8 = 100;
const MIN_SPAWN_INTERVAL_MS: u64 = 5_000;
const MAX_SPAWN_INTERVAL_MS: u64 = 300_000;
const MIN_SPEAKING_INTERVAL_MIN: u32 = 1;
const MAX_SPEAKING_INTERVAL_MIN: u32 = 60;

/// User-facing settings. Field names on disk stay compatible with existing
/// `settings.json` files.
#[derive(Resource, Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PetSettings {
    /// Bottle spawn cadence in milliseconds.
    pub spawn_interval: u64,
    /// Window opacity, 100 (faint) to 255 (opaque).
    pub transparency: u8,
    pub last_position: [i32; 2],
    pub auto_spawn: bool,
    #[serde(rename = "milk_mocha_speaking")]
    pub speaking_enabled: bool,
    /// Minimum minutes between unprompted messages.
    pub speaking_interval: u32,
    pub use_fallback_only: bool,
}

impl PetSettings {
    pub fn spawn_interval(&self) -> Duration {
        Duration::from_millis(self.spawn_interval)
    }

    pub fn speaking_interval(&self) -> Duration {
        Duration::from_secs(u64::from(self.speaking_interval) * 60)
    }

    pub fn position(&self) -> IVec2 {
        IVec2::new(self.last_position[0], self.last_position[1])
    }

    pub fn opacity(&self) -> f32 {
        f32::from(self.transparency) / 255.0
    }

    /// Shifts transparency by `delta`, staying in the valid range.
    pub fn adjust_transparency(&mut self, delta: i16) {
        let next = i16::from(self.transparency) + delta;
        self.transparency = clamp_transparency(i64::from(next));
    }
}

impl Default for PetSettings {
    fn default() -> Self {
        RawPetSettings::default().into()
    }
}

#[derive(Debug, Deserialize)]
struct RawPetSettings {
    #[serde(default = "default_spawn_interval")]
    spawn_interval: i64,
    #[serde(default = "default_transparency")]
    transparency: i64,
    #[serde(default = "default_last_position")]
    last_position: [i64; 2],
    #[serde(default = "default_true")]
    auto_spawn: bool,
    #[serde(default = "default_true")]
    milk_mocha_speaking: bool,
    #[serde(default = "default_speaking_interval")]
    speaking_interval: i64,
    #[serde(default)]
    use_fallback_only: bool,
}

impl Default for RawPetSettings {
    fn default() -> Self {
        Self {
            spawn_interval: default_spawn_interval(),
            transparency: default_transparency(),
            last_position: default_last_position(),
            auto_spawn: true,
            milk_mocha_speaking: true,
            speaking_interval: default_speaking_interval(),
            use_fallback_only: false,
        }
    }
}

fn default_spawn_interval() -> i64 {
    10_000
}

fn default_transparency() -> i64 {
    255
}

fn default_last_position() -> [i64; 2] {
    [300, 300]
}

fn default_true() -> bool {
    true
}

fn default_speaking_interval() -> i64 {
    15
}

fn clamp_transparency(value: i64) -> u8 {
    value.clamp(i64::from(MIN_TRANSPARENCY), 255) as u8
}

impl From<RawPetSettings> for PetSettings {
    fn from(value: RawPetSettings) -> Self {
        let to_i32 = |v: i64| v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
        Self {
            spawn_interval: value
                .spawn_interval
                .clamp(MIN_SPAWN_INTERVAL_MS as i64, MAX_SPAWN_INTERVAL_MS as i64)
                as u64,
            transparency: clamp_transparency(value.transparency),
            last_position: [to_i32(value.last_position[0]), to_i32(value.last_position[1])],
            auto_spawn: value.auto_spawn,
            speaking_enabled: value.milk_mocha_speaking,
            speaking_interval: value.speaking_interval.clamp(
                i64::from(MIN_SPEAKING_INTERVAL_MIN),
                i64::from(MAX_SPEAKING_INTERVAL_MIN),
            ) as u32,
            use_fallback_only: value.use_fallback_only,
        }
    }
}

/// Failures reading or writing the settings file.
#[derive(Debug)]
pub enum SettingsError {
    Io(io::Error),
    Parse(serde_json::Error),
    Serialize(serde_json::Error),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "settings i/o failure: {}", err),
            Self::Parse(err) => write!(f, "settings file is not valid: {}", err),
            Self::Serialize(err) => write!(f, "could not encode settings: {}", err),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) | Self::Serialize(err) => Some(err),
        }
    }
}

impl From<io::Error> for SettingsError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// Location of the settings file.
#[derive(Resource, Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<PetSettings, SettingsError> {
        let raw = fs::read_to_string(&self.path)?;
        let parsed: RawPetSettings = serde_json::from_str(&raw).map_err(SettingsError::Parse)?;
        Ok(parsed.into())
    }

    /// Missing or corrupt files yield defaults.
    pub fn load_or_default(&self) -> PetSettings {
        match self.load() {
            Ok(settings) => settings,
            Err(SettingsError::Io(err)) if err.kind() == io::ErrorKind::NotFound => {
                info!(target: "settings", "No settings at {:?}; using defaults", self.path);
                PetSettings::default()
            }
            Err(err) => {
                warn!(
                    target: "settings",
                    "Failed to load {:?} ({}). Falling back to defaults.",
                    self.path, err
                );
                PetSettings::default()
            }
        }
    }

    pub fn save(&self, settings: &PetSettings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let encoded = serde_json::to_string_pretty(settings).map_err(SettingsError::Serialize)?;
        fs::write(&self.path, encoded)?;
        Ok(())
    }

    /// Records `position` as the last known pet position and saves.
    pub fn update_position(
        &self,
        settings: &mut PetSettings,
        position: IVec2,
    ) -> Result<(), SettingsError> {
        settings.last_position = [position.x, position.y];
        self.save(settings)
    }

    /// Writes and logs on failure. Persistence problems never interrupt the pet.
    pub fn save_or_warn(&self, settings: &PetSettings) {
        if let Err(err) = self.save(settings) {
            warn!(target: "settings", "Failed to persist settings to {:?}: {}", self.path, err);
        }
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new(DEFAULT_SETTINGS_PATH)
    }
}
