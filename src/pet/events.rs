//! Requests other plugins send to the pet coordinator.
use std::time::Duration;

use bevy::prelude::*;

use super::animation::AnimationKey;

/// User input or autonomous requests, already translated out of raw mouse/keyboard state.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub enum PetInput {
    LeftClick,
    RightClick,
    DoubleClick,
    /// Requested window origin in screen pixels.
    DragMove(IVec2),
    DragRelease,
    /// Keyboard reaction, subject to the same lockout rules as clicks.
    Command(AnimationKey),
    /// Animation the pet plays on its own (for example while telling a story).
    Perform {
        key: AnimationKey,
        hold: Option<Duration>,
    },
    RunToRandom,
}

/// Requests targeting the feeding item, in window-local logical pixels (y down).
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub enum FeedingInput {
    Grab(Vec2),
    Drag(Vec2),
    Release,
}
