//! Settings plugin: loads the record at startup and writes it back on change.
use bevy::prelude::*;

use crate::pet::{PetCoordinator, PetSignal};

use super::store::{PetSettings, SettingsStore};

const TRANSPARENCY_STEP: i16 = 25;

/// Requested changes to the settings record.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsUpdate {
    ToggleSpeaking,
    ToggleAutoSpawn,
    ToggleFallbackOnly,
    RaiseOpacity,
    LowerOpacity,
}

pub struct SettingsPlugin {
    store: SettingsStore,
}

impl SettingsPlugin {
    pub fn with_store(store: SettingsStore) -> Self {
        Self { store }
    }
}

impl Default for SettingsPlugin {
    fn default() -> Self {
        Self::with_store(SettingsStore::default())
    }
}

impl Plugin for SettingsPlugin {
    fn build(&self, app: &mut App) {
        let settings = self.store.load_or_default();
        info!(
            target: "settings",
            "Loaded settings from {:?} (speaking: {}, auto-spawn: {})",
            self.store.path(),
            settings.speaking_enabled,
            settings.auto_spawn
        );

        app.insert_resource(self.store.clone())
            .insert_resource(settings)
            .add_message::<SettingsUpdate>()
            .add_systems(Update, (apply_settings_updates, persist_pet_position))
            .add_systems(Last, persist_settings_on_exit);
    }
}

pub fn apply_settings_updates(
    mut updates: MessageReader<SettingsUpdate>,
    mut settings: ResMut<PetSettings>,
    store: Res<SettingsStore>,
) {
    let mut dirty = false;
    for update in updates.read() {
        match update {
            SettingsUpdate::ToggleSpeaking => {
                settings.speaking_enabled = !settings.speaking_enabled;
            }
            SettingsUpdate::ToggleAutoSpawn => settings.auto_spawn = !settings.auto_spawn,
            SettingsUpdate::ToggleFallbackOnly => {
                settings.use_fallback_only = !settings.use_fallback_only;
            }
            SettingsUpdate::RaiseOpacity => settings.adjust_transparency(TRANSPARENCY_STEP),
            SettingsUpdate::LowerOpacity => settings.adjust_transparency(-TRANSPARENCY_STEP),
        }
        info!(target: "settings", "Applied {:?}", update);
        dirty = true;
    }

    if dirty {
        store.save_or_warn(&settings);
    }
}

pub fn persist_pet_position(
    mut signals: MessageReader<PetSignal>,
    mut settings: ResMut<PetSettings>,
    store: Res<SettingsStore>,
) {
    let latest = signals
        .read()
        .filter_map(|signal| match signal {
            PetSignal::PersistPosition(position) => Some(*position),
            _ => None,
        })
        .last();

    if let Some(position) = latest {
        if let Err(err) = store.update_position(&mut settings, position) {
            warn!(target: "settings", "Failed to persist position {:?}: {}", position, err);
        }
    }
}

fn persist_settings_on_exit(
    mut exits: MessageReader<AppExit>,
    coordinator: Option<Res<PetCoordinator>>,
    mut settings: ResMut<PetSettings>,
    store: Res<SettingsStore>,
) {
    if exits.read().next().is_none() {
        return;
    }
    if let Some(coordinator) = coordinator {
        let position = coordinator.position();
        settings.last_position = [position.x, position.y];
    }
    info!(target: "settings", "Saving settings before exit");
    store.save_or_warn(&settings);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{env, fs, time::SystemTime};

    fn test_app(label: &str) -> (App, std::path::PathBuf) {
        let unique_suffix = SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = env::temp_dir().join(format!("mochapet_plugin_{}_{}.json", label, unique_suffix));

        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_message::<PetSignal>()
            .add_plugins(SettingsPlugin::with_store(SettingsStore::new(&path)));
        (app, path)
    }

    #[test]
    fn position_signals_are_written_to_disk() {
        let (mut app, path) = test_app("position");
        app.world_mut()
            .write_message(PetSignal::PersistPosition(IVec2::new(10, 20)));
        app.world_mut()
            .write_message(PetSignal::PersistPosition(IVec2::new(640, 480)));
        app.update();

        assert_eq!(app.world().resource::<PetSettings>().last_position, [640, 480]);
        let reloaded = SettingsStore::new(&path).load().expect("file written");
        assert_eq!(reloaded.last_position, [640, 480]);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn updates_toggle_and_persist() {
        let (mut app, path) = test_app("updates");
        app.world_mut().write_message(SettingsUpdate::ToggleSpeaking);
        app.world_mut().write_message(SettingsUpdate::LowerOpacity);
        app.update();

        let settings = app.world().resource::<PetSettings>();
        assert!(!settings.speaking_enabled);
        assert_eq!(settings.transparency, 230);
        assert_eq!(SettingsStore::new(&path).load().expect("saved"), *settings);
        let _ = fs::remove_file(&path);
    }
}
