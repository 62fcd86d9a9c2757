// src/ui/speech_bubble/components.rs
//
// Speech bubble state for the single bubble above the pet.

use std::time::Duration;

use bevy::prelude::*;

/// Marker and lifetime for the bubble node.
///
/// There is exactly one bubble entity; showing new text replaces the old text
/// and restarts the lifetime.
#[derive(Component, Debug)]
pub struct SpeechBubble {
    lifetime: Timer,
    visible: bool,
}

impl SpeechBubble {
    pub fn hidden() -> Self {
        Self {
            lifetime: Timer::new(Duration::ZERO, TimerMode::Once),
            visible: false,
        }
    }

    /// Restart the lifetime and mark the bubble visible.
    pub fn show(&mut self, lifetime: Duration) {
        self.lifetime = Timer::new(lifetime, TimerMode::Once);
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Tick the lifetime; hides the bubble once it runs out.
    pub fn tick(&mut self, delta: Duration) {
        if self.visible && self.lifetime.tick(delta).is_finished() {
            self.visible = false;
        }
    }

    /// 1.0 while fresh, fading to 0.0 over the final `fade_duration` seconds.
    pub fn fade_alpha(&self, fade_duration: f32) -> f32 {
        let remaining = self.lifetime.remaining_secs();
        if remaining < fade_duration {
            remaining / fade_duration
        } else {
            1.0
        }
    }
}

/// Resource containing settings for speech bubble behavior.
#[derive(Resource, Debug)]
pub struct SpeechBubbleSettings {
    pub lifetime: Duration,

    /// Duration of fade-out animation (seconds).
    pub fade_seconds: f32,

    pub font_size: f32,
}

impl Default for SpeechBubbleSettings {
    fn default() -> Self {
        Self {
            lifetime: Duration::from_secs(15),
            fade_seconds: 1.5,
            font_size: 14.0,
        }
    }
}
