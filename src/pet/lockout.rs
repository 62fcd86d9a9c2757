//! Temporary states that suppress user interactions.
use std::{fmt, time::Duration};

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockoutKind {
    Drinking,
    Angry,
}

impl fmt::Display for LockoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Drinking => "drinking",
            Self::Angry => "angry",
        };
        write!(f, "{}", label)
    }
}

/// At most one lockout is active; it ends when its timer runs out.
#[derive(Debug, Clone, Default)]
pub enum Lockout {
    #[default]
    None,
    Drinking(Timer),
    Angry(Timer),
}

impl Lockout {
    pub fn drinking(duration: Duration) -> Self {
        Self::Drinking(Timer::new(duration, TimerMode::Once))
    }

    pub fn angry(duration: Duration) -> Self {
        Self::Angry(Timer::new(duration, TimerMode::Once))
    }

    pub fn kind(&self) -> Option<LockoutKind> {
        match self {
            Self::None => None,
            Self::Drinking(_) => Some(LockoutKind::Drinking),
            Self::Angry(_) => Some(LockoutKind::Angry),
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, Self::None)
    }

    pub fn remaining(&self) -> Duration {
        match self {
            Self::None => Duration::ZERO,
            Self::Drinking(timer) | Self::Angry(timer) => timer.remaining(),
        }
    }

    /// Advances the lockout timer. Returns the kind that just expired, leaving
    /// the lockout cleared.
    pub fn tick(&mut self, delta: Duration) -> Option<LockoutKind> {
        let finished = match self {
            Self::None => return None,
            Self::Drinking(timer) | Self::Angry(timer) => timer.tick(delta).is_finished(),
        };

        if finished {
            let expired = self.kind();
            *self = Self::None;
            expired
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expires_once_and_clears() {
        let mut lockout = Lockout::drinking(Duration::from_secs(10));
        assert_eq!(lockout.tick(Duration::from_secs(9)), None);
        assert_eq!(lockout.kind(), Some(LockoutKind::Drinking));
        assert_eq!(lockout.remaining(), Duration::from_secs(1));

        assert_eq!(lockout.tick(Duration::from_secs(1)), Some(LockoutKind::Drinking));
        assert!(!lockout.is_active());
        assert_eq!(lockout.tick(Duration::from_secs(1)), None);
    }

    #[test]
    fn angry_reports_its_kind() {
        let mut lockout = Lockout::angry(Duration::from_secs(60));
        assert_eq!(lockout.kind(), Some(LockoutKind::Angry));
        assert_eq!(lockout.tick(Duration::from_secs(61)), Some(LockoutKind::Angry));
    }
}
