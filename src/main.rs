use std::path::Path;

use bevy::{
    prelude::*,
    window::{WindowLevel, WindowPosition, WindowResolution},
};

mod animation;
mod core;
mod pet;
mod settings;
mod speech;
mod ui;

use crate::{
    animation::AnimationPlugin,
    core::CorePlugin,
    pet::{BehaviorRules, PetPlugin},
    settings::{SettingsPlugin, SettingsStore},
    speech::{SpeechPlugin, SpeechRules},
    ui::UiPlugin,
};

fn main() {
    load_secrets_env();

    let rules = BehaviorRules::load_or_default();
    let speech_rules = SpeechRules::load_or_default();
    let store = SettingsStore::default();
    let start = store.load_or_default().position();

    let mut resolution = WindowResolution::default();
    resolution.set(rules.window_size.x as f32, rules.window_size.y as f32);

    App::new()
        .add_plugins((
            DefaultPlugins.set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Milk Mocha".into(),
                    resolution,
                    position: WindowPosition::At(start),
                    transparent: true,
                    decorations: false,
                    resizable: false,
                    window_level: WindowLevel::AlwaysOnTop,
                    ..default()
                }),
                ..default()
            }),
            CorePlugin::with_time_scale(rules.time_scale),
            SettingsPlugin::with_store(store),
            PetPlugin::new(rules),
            SpeechPlugin::new(speech_rules),
            AnimationPlugin,
            UiPlugin, // After SpeechPlugin so the bubble picks up its lifetime
        ))
        .run();
}

fn load_secrets_env() {
    const SECRETS_FILE: &str = "secrets.env";

    let path = Path::new(SECRETS_FILE);
    if !path.exists() {
        return;
    }

    if let Err(err) = dotenvy::from_filename(path) {
        eprintln!("Failed to load {}: {}", SECRETS_FILE, err);
    }
}
