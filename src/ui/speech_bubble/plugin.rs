// src/ui/speech_bubble/plugin.rs
//
// Plugin registration for speech bubble systems.

use bevy::prelude::*;

use crate::speech::{SpeechRules, SpeechUpdateSet};

use super::components::SpeechBubbleSettings;
use super::systems::{apply_bubble_commands, spawn_speech_bubble, update_speech_bubble};

/// Plugin providing the pet's speech bubble.
///
/// # System Ordering
///
/// 1. `apply_bubble_commands` - Listens to BubbleCommand after the speech pipeline ran
/// 2. `update_speech_bubble` - Handles lifetime, fade and visibility
///
/// # Dependencies
///
/// - `SpeechPlugin` must be registered before this plugin (provides BubbleCommand and SpeechRules)
pub struct SpeechBubblePlugin;

impl Plugin for SpeechBubblePlugin {
    fn build(&self, app: &mut App) {
        let mut settings = SpeechBubbleSettings::default();
        if let Some(rules) = app.world().get_resource::<SpeechRules>() {
            settings.lifetime = rules.bubble_lifetime;
        }

        app.insert_resource(settings)
            .add_systems(Startup, spawn_speech_bubble)
            .add_systems(
                Update,
                (apply_bubble_commands, update_speech_bubble)
                    .chain()
                    .after(SpeechUpdateSet),
            );

        info!("SpeechBubblePlugin registered");
    }
}
