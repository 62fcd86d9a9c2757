//! Placement of the pet, bubble and bottle inside the pet window.
//!
//! Rects are window-local logical pixels with the origin at the top-left and
//! y growing downwards, matching `Window::cursor_position`.
use bevy::prelude::*;

pub const PET_SIZE: Vec2 = Vec2::splat(150.0);
pub const BOTTLE_SIZE: Vec2 = Vec2::splat(50.0);
pub const BUBBLE_MARGIN: f32 = 8.0;
pub const BUBBLE_HEIGHT: f32 = 110.0;

/// Pet sprite area, centred along the bottom edge.
pub fn pet_rect(window: Vec2) -> Rect {
    let min = Vec2::new((window.x - PET_SIZE.x) * 0.5, window.y - PET_SIZE.y);
    Rect::from_corners(min, min + PET_SIZE)
}

/// Speech bubble area along the top edge.
pub fn bubble_rect(window: Vec2) -> Rect {
    Rect::new(
        BUBBLE_MARGIN,
        BUBBLE_MARGIN,
        window.x - BUBBLE_MARGIN,
        (BUBBLE_MARGIN + BUBBLE_HEIGHT).min(window.y),
    )
}

/// Converts a window-local point into 2d world space for a camera centred on the window.
pub fn to_world(window: Vec2, local: Vec2) -> Vec2 {
    Vec2::new(local.x - window.x * 0.5, window.y * 0.5 - local.y)
}
