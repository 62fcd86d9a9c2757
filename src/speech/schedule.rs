use std::time::Duration;

use bevy::prelude::*;

use super::{activity::is_user_active, config::SpeechRules};

/// Which scheduled speech beats fell due on a tick.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleDue {
    pub greeting: bool,
    pub check: bool,
}

/// Startup greeting plus periodic speaking opportunities.
#[derive(Resource, Debug)]
pub struct SpeakingSchedule {
    greeting: Timer,
    check: Timer,
    active_threshold: Duration,
    last_spoken: Option<Duration>,
}

impl SpeakingSchedule {
    pub fn new(rules: &SpeechRules) -> Self {
        Self {
            greeting: Timer::new(rules.startup_greeting, TimerMode::Once),
            check: Timer::new(rules.check_interval, TimerMode::Repeating),
            active_threshold: rules.active_threshold,
            last_spoken: None,
        }
    }

    pub fn tick(&mut self, delta: Duration) -> ScheduleDue {
        ScheduleDue {
            greeting: self.greeting.tick(delta).just_finished(),
            check: self.check.tick(delta).just_finished(),
        }
    }

    /// True when speaking is on, the interval since the last message has
    /// passed and the user is still around.
    pub fn is_opportunity(
        &self,
        now: Duration,
        speaking_enabled: bool,
        interval: Duration,
        user_idle: Duration,
    ) -> bool {
        if !speaking_enabled {
            return false;
        }
        if let Some(last) = self.last_spoken {
            if now.saturating_sub(last) < interval {
                return false;
            }
        }
        is_user_active(user_idle, self.active_threshold)
    }

    pub fn mark_spoken(&mut self, now: Duration) {
        self.last_spoken = Some(now);
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn last_spoken(&self) -> Option<Duration> {
        self.last_spoken
    }
}

impl Default for SpeakingSchedule {
    fn default() -> Self {
        Self::new(&SpeechRules::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINUTE: Duration = Duration::from_secs(60);

    #[test]
    fn greeting_fires_once_and_checks_repeat() {
        let mut schedule = SpeakingSchedule::default();
        assert_eq!(schedule.tick(Duration::from_secs(4)), ScheduleDue::default());
        assert!(schedule.tick(Duration::from_secs(1)).greeting);
        assert!(!schedule.tick(Duration::from_secs(100)).greeting);

        let due = schedule.tick(Duration::from_secs(15));
        assert!(due.check);
        assert!(!schedule.tick(Duration::from_secs(119)).check);
        assert!(schedule.tick(Duration::from_secs(1)).check);
    }

    #[test]
    fn opportunity_requires_enabled_interval_and_presence() {
        let mut schedule = SpeakingSchedule::default();
        let interval = 15 * MINUTE;
        let present = Duration::from_secs(10);

        assert!(schedule.is_opportunity(MINUTE, true, interval, present));
        assert!(!schedule.is_opportunity(MINUTE, false, interval, present));
        assert!(!schedule.is_opportunity(MINUTE, true, interval, Duration::from_secs(300)));

        schedule.mark_spoken(MINUTE);
        assert!(!schedule.is_opportunity(10 * MINUTE, true, interval, present));
        assert!(schedule.is_opportunity(16 * MINUTE, true, interval, present));
    }
}
