//! Screen clamping and the eased run between two window positions.
use std::time::Duration;

use bevy::math::curve::{Curve, EaseFunction};
use bevy::prelude::*;

/// Screen area the pet window must stay inside. `origin` is the monitor's
/// top-left corner in desktop coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenBounds {
    pub origin: IVec2,
    pub screen: UVec2,
    pub window: UVec2,
}

impl ScreenBounds {
    pub fn new(screen: UVec2, window: UVec2) -> Self {
        Self::at(IVec2::ZERO, screen, window)
    }

    pub fn at(origin: IVec2, screen: UVec2, window: UVec2) -> Self {
        Self {
            origin,
            screen,
            window,
        }
    }

    /// Largest valid top-left coordinate. Saturates at the monitor origin when
    /// the window is bigger than the screen.
    pub fn max_origin(&self) -> IVec2 {
        let max = self.screen.saturating_sub(self.window);
        self.origin + IVec2::new(max.x as i32, max.y as i32)
    }

    pub fn clamp(&self, position: IVec2) -> IVec2 {
        position.clamp(self.origin, self.max_origin())
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn contains(&self, position: IVec2) -> bool {
        self.clamp(position) == position
    }

    pub fn random_point(&self, rng: &mut fastrand::Rng) -> IVec2 {
        let max = self.max_origin();
        IVec2::new(
            rng.i32(self.origin.x..=max.x),
            rng.i32(self.origin.y..=max.y),
        )
    }
}

impl Default for ScreenBounds {
    fn default() -> Self {
        Self::new(UVec2::new(1920, 1080), UVec2::new(320, 320))
    }
}

/// Position tween with out-quad easing.
#[derive(Debug, Clone)]
pub struct RunTween {
    from: IVec2,
    to: IVec2,
    timer: Timer,
}

impl RunTween {
    pub fn new(from: IVec2, to: IVec2, duration: Duration) -> Self {
        Self {
            from,
            to,
            timer: Timer::new(duration, TimerMode::Once),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.timer.is_finished()
    }

    /// Advances the tween and returns the interpolated position.
    pub fn advance(&mut self, delta: Duration) -> IVec2 {
        self.timer.tick(delta);
        let eased = EaseFunction::QuadraticOut.sample_clamped(self.timer.fraction());
        let from = self.from.as_vec2();
        let to = self.to.as_vec2();
        from.lerp(to, eased).round().as_ivec2()
    }
}
