//! CorePlugin owns the pet clock every cadence and timer is driven from.
use bevy::prelude::*;
#[cfg(feature = "core_debug")]
use bevy::time::TimerMode;
use std::time::Duration;

const DEFAULT_TIME_SCALE: f32 = 1.0;
const MIN_TIME_SCALE: f32 = 0.001;
const MAX_TIME_SCALE: f32 = 1000.0;

#[cfg(feature = "core_debug")]
#[derive(Resource)]
struct ClockTraceTimer {
    timer: Timer,
}

#[cfg(feature = "core_debug")]
impl Default for ClockTraceTimer {
    fn default() -> Self {
        Self {
            timer: Timer::from_seconds(1.0, TimerMode::Repeating),
        }
    }
}

/// Scaled clock fed from real frame deltas.
///
/// A scale above 1.0 fast-forwards the pet (handy for watching the sleep and
/// crying escalations without waiting minutes).
#[derive(Resource, Debug)]
pub struct PetClock {
    time_scale: f32,
    last_delta: Duration,
    elapsed: Duration,
}

/// Clamps a configured time scale into a range `Duration::mul_f32` can use.
/// Non-finite values fall back to real time.
pub fn sanitize_time_scale(time_scale: f32) -> f32 {
    if !time_scale.is_finite() {
        warn!("time_scale = {} is not usable; running at real time", time_scale);
        return DEFAULT_TIME_SCALE;
    }
    time_scale.clamp(MIN_TIME_SCALE, MAX_TIME_SCALE)
}

/// Converts a configured number of seconds, raised to `min`. Values that do not
/// fit a `Duration` (NaN, infinite, absurdly large) are replaced by `default`.
pub fn config_seconds(key: &str, value: f32, min: f32, default: f32) -> Duration {
    match Duration::try_from_secs_f32(value.max(min)) {
        Ok(duration) if !value.is_nan() => duration,
        _ => {
            warn!("{} = {} is not a usable duration; using {}s", key, value, default);
            Duration::from_secs_f32(default.max(min))
        }
    }
}

impl PetClock {
    pub fn new(time_scale: f32) -> Self {
        Self {
            time_scale: sanitize_time_scale(time_scale),
            last_delta: Duration::ZERO,
            elapsed: Duration::ZERO,
        }
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Scaled delta applied on the most recent tick.
    pub fn delta(&self) -> Duration {
        self.last_delta
    }

    /// Total scaled time since launch.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn tick(&mut self, real_delta: Duration) {
        self.last_delta = real_delta.mul_f32(self.time_scale);
        self.elapsed += self.last_delta;
    }
}

impl Default for PetClock {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_SCALE)
    }
}

/// Registers the pet clock.
#[derive(Debug, Clone, Copy)]
pub struct CorePlugin {
    time_scale: f32,
}

impl CorePlugin {
    pub const fn with_time_scale(time_scale: f32) -> Self {
        Self { time_scale }
    }
}

impl Default for CorePlugin {
    fn default() -> Self {
        Self::with_time_scale(DEFAULT_TIME_SCALE)
    }
}

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(PetClock::new(self.time_scale))
            .add_systems(Startup, log_clock_scale)
            .add_systems(First, advance_pet_clock);

        #[cfg(feature = "core_debug")]
        {
            app.insert_resource(ClockTraceTimer::default())
                .add_systems(Update, trace_clock);
        }
    }
}

fn advance_pet_clock(mut clock: ResMut<PetClock>, time: Res<Time>) {
    clock.tick(time.delta());
}

fn log_clock_scale(clock: Res<PetClock>) {
    if (clock.time_scale() - DEFAULT_TIME_SCALE).abs() > f32::EPSILON {
        info!("Pet clock running at {:.3}x", clock.time_scale());
    }
}

#[cfg(feature = "core_debug")]
fn trace_clock(mut timer: ResMut<ClockTraceTimer>, clock: Res<PetClock>) {
    if timer.timer.tick(clock.delta()).just_finished() {
        info!(
            target: "core_debug",
            "Pet clock: {:.2}s elapsed | scale {:.3} | dt {:.4}s",
            clock.elapsed().as_secs_f32(),
            clock.time_scale(),
            clock.delta().as_secs_f32(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_ticks_accumulate() {
        let mut clock = PetClock::new(4.0);
        clock.tick(Duration::from_millis(250));
        clock.tick(Duration::from_millis(250));

        assert_eq!(clock.delta(), Duration::from_secs(1));
        assert_eq!(clock.elapsed(), Duration::from_secs(2));
    }

    #[test]
    fn non_positive_scale_is_clamped() {
        let clock = PetClock::new(-3.0);
        assert!((clock.time_scale() - MIN_TIME_SCALE).abs() < f32::EPSILON);
    }

    #[test]
    fn infinite_scale_runs_at_real_time() {
        let mut clock = PetClock::new(f32::INFINITY);
        assert_eq!(clock.time_scale(), DEFAULT_TIME_SCALE);
        clock.tick(Duration::from_millis(16));
        assert_eq!(clock.delta(), Duration::from_millis(16));
        assert_eq!(PetClock::new(1e20).time_scale(), MAX_TIME_SCALE);
    }

    #[test]
    fn config_seconds_rejects_unusable_values() {
        assert_eq!(config_seconds("k", 2.5, 1.0, 9.0), Duration::from_millis(2500));
        assert_eq!(config_seconds("k", 0.2, 1.0, 9.0), Duration::from_secs(1));
        assert_eq!(config_seconds("k", f32::INFINITY, 1.0, 9.0), Duration::from_secs(9));
        assert_eq!(config_seconds("k", f32::NAN, 1.0, 9.0), Duration::from_secs(9));
        assert_eq!(config_seconds("k", 1e30, 1.0, 9.0), Duration::from_secs(9));
        assert_eq!(config_seconds("k", f32::NEG_INFINITY, 1.0, 9.0), Duration::from_secs(1));
    }
}
