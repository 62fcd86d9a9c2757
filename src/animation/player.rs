use std::time::Duration;

use bevy::prelude::*;

use crate::pet::{AnimationKey, PetSignal};

use super::catalog::AnimationCatalog;

pub const DEFAULT_FRAME_TIME: Duration = Duration::from_millis(100);

/// Loops a frame list at a fixed frame time.
#[derive(Debug, Clone)]
pub struct FramePlayer<F> {
    frames: Vec<F>,
    index: usize,
    timer: Timer,
}

impl<F> FramePlayer<F> {
    pub fn new(frames: Vec<F>, frame_time: Duration) -> Self {
        Self {
            frames,
            index: 0,
            timer: Timer::new(frame_time, TimerMode::Repeating),
        }
    }

    /// Replaces the frames and rewinds to the first one.
    pub fn restart(&mut self, frames: Vec<F>) {
        self.frames = frames;
        self.index = 0;
        self.timer.reset();
    }

    /// Advances by `delta`; returns true when the visible frame changed.
    pub fn tick(&mut self, delta: Duration) -> bool {
        if self.frames.len() < 2 {
            return false;
        }
        self.timer.tick(delta);
        let steps = self.timer.times_finished_this_tick() as usize;
        if steps == 0 {
            return false;
        }
        self.index = (self.index + steps) % self.frames.len();
        true
    }

    pub fn current(&self) -> Option<&F> {
        self.frames.get(self.index)
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// The pet's sprite playback state.
#[derive(Component, Debug)]
pub struct PetSprite {
    pub key: AnimationKey,
    pub player: FramePlayer<Handle<Image>>,
    rng: fastrand::Rng,
}

impl PetSprite {
    pub fn new(frame_time: Duration) -> Self {
        Self {
            key: AnimationKey::Idle,
            player: FramePlayer::new(Vec::new(), frame_time),
            rng: fastrand::Rng::new(),
        }
    }

    /// Switches to `key`, loading its frames through the asset server.
    pub fn play(&mut self, key: AnimationKey, catalog: &AnimationCatalog, assets: &AssetServer) {
        let frames = catalog
            .frames_for(key, &mut self.rng)
            .iter()
            .map(|path| assets.load(path.clone()))
            .collect();
        self.key = key;
        self.player.restart(frames);
        if self.player.is_empty() {
            debug!(target: "animation", "No frames for '{}'; sprite stays blank", key);
        }
    }
}

pub fn start_pet_animation(
    catalog: Res<AnimationCatalog>,
    assets: Res<AssetServer>,
    mut sprites: Query<(&mut PetSprite, &mut Sprite), Added<PetSprite>>,
) {
    for (mut pet_sprite, mut sprite) in &mut sprites {
        pet_sprite.play(AnimationKey::Idle, &catalog, &assets);
        if let Some(frame) = pet_sprite.player.current() {
            sprite.image = frame.clone();
        }
    }
}

/// Restarts playback whenever the coordinator announces an animation, even
/// when the key is unchanged.
pub fn switch_pet_animation(
    mut signals: MessageReader<PetSignal>,
    catalog: Res<AnimationCatalog>,
    assets: Res<AssetServer>,
    mut sprites: Query<(&mut PetSprite, &mut Sprite)>,
) {
    let Some(key) = signals
        .read()
        .filter_map(|signal| match signal {
            PetSignal::AnimationChanged(key) => Some(*key),
            _ => None,
        })
        .last()
    else {
        return;
    };

    for (mut pet_sprite, mut sprite) in &mut sprites {
        pet_sprite.play(key, &catalog, &assets);
        sprite.image = pet_sprite.player.current().cloned().unwrap_or_default();
    }
}

pub fn advance_pet_frames(time: Res<Time>, mut sprites: Query<(&mut PetSprite, &mut Sprite)>) {
    for (mut pet_sprite, mut sprite) in &mut sprites {
        if pet_sprite.player.tick(time.delta()) {
            if let Some(frame) = pet_sprite.player.current() {
                sprite.image = frame.clone();
            }
        }
    }
}
