//! The milk bottle: spawned on a cadence, dragged by the user, consumed by the pet.
use bevy::prelude::*;

use crate::core::PetClock;
use crate::settings::PetSettings;
use crate::ui::layout::{pet_rect, BOTTLE_SIZE, PET_SIZE};

use super::{config::BehaviorRules, coordinator::PetCoordinator, events::FeedingInput};
use super::animation::AnimationKey;

/// A bottle in window-local coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedingItem {
    rect: Rect,
}

impl FeedingItem {
    pub fn new(center: Vec2) -> Self {
        Self {
            rect: Rect::from_center_size(center, BOTTLE_SIZE),
        }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn center(&self) -> Vec2 {
        self.rect.center()
    }

    pub fn contains(&self, point: Vec2) -> bool {
        self.rect.contains(point)
    }

    /// Moves the bottle, keeping it fully inside `area`.
    pub fn drag_to(&mut self, center: Vec2, area: Vec2) {
        let half = BOTTLE_SIZE * 0.5;
        let max = (area - half).max(half);
        self.rect = Rect::from_center_size(center.clamp(half, max), BOTTLE_SIZE);
    }

    pub fn overlaps(&self, other: Rect) -> bool {
        !self.rect.intersect(other).is_empty()
    }
}

#[derive(Resource, Debug)]
pub struct FeedingState {
    bottle: Option<FeedingItem>,
    grab_offset: Option<Vec2>,
    spawn_timer: Timer,
    rng: fastrand::Rng,
}

impl FeedingState {
    pub fn new(settings: &PetSettings) -> Self {
        Self {
            bottle: None,
            grab_offset: None,
            spawn_timer: Timer::new(settings.spawn_interval(), TimerMode::Repeating),
            rng: fastrand::Rng::new(),
        }
    }

    pub fn bottle(&self) -> Option<&FeedingItem> {
        self.bottle.as_ref()
    }

    pub fn set_spawn_interval(&mut self, interval: std::time::Duration) {
        if self.spawn_timer.duration() != interval {
            self.spawn_timer.set_duration(interval);
            self.spawn_timer.reset();
        }
    }

    /// Places a bottle somewhere above the pet. No-op while one already exists.
    pub fn spawn(&mut self, area: Vec2) -> bool {
        if self.bottle.is_some() {
            return false;
        }
        let half = BOTTLE_SIZE * 0.5;
        let max_x = (area.x - half.x).max(half.x);
        let max_y = (area.y - PET_SIZE.y - half.y).max(half.y);
        let center = Vec2::new(
            half.x + self.rng.f32() * (max_x - half.x),
            half.y + self.rng.f32() * (max_y - half.y),
        );
        self.bottle = Some(FeedingItem::new(center));
        true
    }

    pub fn grab(&mut self, point: Vec2) -> bool {
        match &self.bottle {
            Some(bottle) if bottle.contains(point) => {
                self.grab_offset = Some(bottle.center() - point);
                true
            }
            _ => false,
        }
    }

    pub fn drag(&mut self, point: Vec2, area: Vec2) {
        if let (Some(bottle), Some(offset)) = (self.bottle.as_mut(), self.grab_offset) {
            bottle.drag_to(point + offset, area);
        }
    }

    pub fn release(&mut self) {
        self.grab_offset = None;
    }

    /// Removes the bottle if it touches `target`.
    pub fn consume_if_touching(&mut self, target: Rect) -> bool {
        if self.bottle.as_ref().is_some_and(|bottle| bottle.overlaps(target)) {
            self.bottle = None;
            self.grab_offset = None;
            true
        } else {
            false
        }
    }

    fn touches(&self, target: Rect) -> bool {
        self.bottle.as_ref().is_some_and(|bottle| bottle.overlaps(target))
    }
}

pub fn spawn_feeding_item(
    clock: Res<PetClock>,
    settings: Res<PetSettings>,
    rules: Res<BehaviorRules>,
    mut state: ResMut<FeedingState>,
) {
    if settings.is_changed() {
        state.set_spawn_interval(settings.spawn_interval());
    }

    if !state.spawn_timer.tick(clock.delta()).just_finished() || !settings.auto_spawn {
        return;
    }

    if state.spawn(rules.window_size.as_vec2()) {
        debug!(target: "pet", "Milk bottle spawned");
    }
}

pub fn apply_feeding_input(
    mut inputs: MessageReader<FeedingInput>,
    rules: Res<BehaviorRules>,
    mut state: ResMut<FeedingState>,
    mut coordinator: ResMut<PetCoordinator>,
) {
    let area = rules.window_size.as_vec2();
    let target = pet_rect(area);

    for input in inputs.read() {
        match *input {
            FeedingInput::Grab(point) => {
                if state.grab(point) && coordinator.lockout().is_none() {
                    coordinator.on_command(AnimationKey::Excited);
                }
            }
            FeedingInput::Drag(point) => {
                state.drag(point, area);
                if state.touches(target) && coordinator.feed() {
                    state.consume_if_touching(target);
                    info!(target: "pet", "Pet is drinking its milk");
                }
            }
            FeedingInput::Release => state.release(),
        }
    }
}
