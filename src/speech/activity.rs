//! User activity and time-of-day classification for picking message categories.
use std::time::Duration;

use chrono::{Local, Timelike};

use super::types::ActivityContext;

const ACTIVE_SECS: u64 = 30;
const RECENTLY_ACTIVE_SECS: u64 = 300;
const IDLE_SECS: u64 = 1800;
const WORKING_SECS: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityStatus {
    Active,
    RecentlyActive,
    Idle,
    Away,
}

impl ActivityStatus {
    pub fn from_idle(idle: Duration) -> Self {
        match idle.as_secs() {
            secs if secs < ACTIVE_SECS => Self::Active,
            secs if secs < RECENTLY_ACTIVE_SECS => Self::RecentlyActive,
            secs if secs < IDLE_SECS => Self::Idle,
            _ => Self::Away,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=11 => Self::Morning,
            12..=16 => Self::Afternoon,
            17..=20 => Self::Evening,
            _ => Self::Night,
        }
    }

    pub fn now() -> Self {
        Self::from_hour(Local::now().hour())
    }
}

/// Combines activity and time of day the way the pet reads the room.
pub fn contextual_activity(idle: Duration, time_of_day: TimeOfDay) -> ActivityContext {
    match ActivityStatus::from_idle(idle) {
        ActivityStatus::Active if time_of_day == TimeOfDay::Morning => ActivityContext::Morning,
        ActivityStatus::Active if idle < Duration::from_secs(WORKING_SECS) => {
            ActivityContext::Working
        }
        ActivityStatus::Active | ActivityStatus::RecentlyActive => ActivityContext::Break,
        ActivityStatus::Idle | ActivityStatus::Away => ActivityContext::Idle,
    }
}

/// A user counts as present while idle for less than `threshold`.
pub fn is_user_active(idle: Duration, threshold: Duration) -> bool {
    idle < threshold
}

/// Seconds since the last keyboard or mouse input anywhere on the desktop, when
/// the platform exposes it.
#[cfg(windows)]
pub fn system_idle_time() -> Option<Duration> {
    use windows::Win32::System::SystemInformation::GetTickCount;
    use windows::Win32::UI::Input::KeyboardAndMouse::{GetLastInputInfo, LASTINPUTINFO};

    let mut info = LASTINPUTINFO {
        cbSize: std::mem::size_of::<LASTINPUTINFO>() as u32,
        dwTime: 0,
    };
    // SAFETY: `info` is a valid, correctly sized LASTINPUTINFO for the duration of the call.
    let ok = unsafe { GetLastInputInfo(&mut info) }.as_bool();
    if !ok {
        return None;
    }
    let now = unsafe { GetTickCount() };
    Some(Duration::from_millis(u64::from(now.wrapping_sub(info.dwTime))))
}

#[cfg(not(windows))]
pub fn system_idle_time() -> Option<Duration> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_thresholds() {
        assert_eq!(ActivityStatus::from_idle(Duration::from_secs(29)), ActivityStatus::Active);
        assert_eq!(
            ActivityStatus::from_idle(Duration::from_secs(30)),
            ActivityStatus::RecentlyActive
        );
        assert_eq!(ActivityStatus::from_idle(Duration::from_secs(299)), ActivityStatus::RecentlyActive);
        assert_eq!(ActivityStatus::from_idle(Duration::from_secs(300)), ActivityStatus::Idle);
        assert_eq!(ActivityStatus::from_idle(Duration::from_secs(1800)), ActivityStatus::Away);
    }

    #[test]
    fn hours_map_to_time_of_day() {
        assert_eq!(TimeOfDay::from_hour(4), TimeOfDay::Night);
        assert_eq!(TimeOfDay::from_hour(5), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(12), TimeOfDay::Afternoon);
        assert_eq!(TimeOfDay::from_hour(17), TimeOfDay::Evening);
        assert_eq!(TimeOfDay::from_hour(21), TimeOfDay::Night);
    }

    #[test]
    fn context_follows_activity_then_time() {
        let secs = Duration::from_secs;
        assert_eq!(contextual_activity(secs(2), TimeOfDay::Morning), ActivityContext::Morning);
        assert_eq!(contextual_activity(secs(2), TimeOfDay::Afternoon), ActivityContext::Working);
        assert_eq!(contextual_activity(secs(10), TimeOfDay::Evening), ActivityContext::Break);
        assert_eq!(contextual_activity(secs(100), TimeOfDay::Morning), ActivityContext::Break);
        assert_eq!(contextual_activity(secs(600), TimeOfDay::Night), ActivityContext::Idle);
        assert_eq!(contextual_activity(secs(4000), TimeOfDay::Afternoon), ActivityContext::Idle);
    }

    #[test]
    fn activity_threshold_is_exclusive() {
        let threshold = Duration::from_secs(300);
        assert!(is_user_active(Duration::from_secs(299), threshold));
        assert!(!is_user_active(threshold, threshold));
    }
}
