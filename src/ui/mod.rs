// src/ui/mod.rs
//
// Everything drawn inside the pet window and the input that reaches it.
//
// - Pet and bottle sprites, window placement and opacity
// - Speech bubble along the top edge
// - Mouse and keyboard translation into pet, speech and settings messages

pub mod input;
pub mod layout;
pub mod pet_view;
pub mod speech_bubble;

use bevy::prelude::*;

use crate::pet::PetUpdateSet;

use input::{translate_keys, translate_pointer, PointerState};
use pet_view::{apply_transparency, spawn_pet_view, sync_bottle_view, sync_window_position};
use speech_bubble::SpeechBubblePlugin;

/// Plugin for the pet window's visuals and input.
///
/// # Dependencies
///
/// - `PetPlugin`, `SettingsPlugin` and `SpeechPlugin` must be registered first
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(Color::NONE))
            .init_resource::<PointerState>()
            .add_plugins(SpeechBubblePlugin)
            .add_systems(Startup, spawn_pet_view)
            .add_systems(
                Update,
                (translate_pointer, translate_keys).before(PetUpdateSet),
            )
            .add_systems(
                Update,
                (sync_window_position, sync_bottle_view, apply_transparency).after(PetUpdateSet),
            );

        info!("UiPlugin registered");
    }
}
