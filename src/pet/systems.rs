//! Systems that drive the coordinator from the clock, input messages and the screen.
use bevy::prelude::*;
use bevy::window::{Monitor, PrimaryMonitor, PrimaryWindow};

use crate::core::PetClock;
use crate::settings::PetSettings;

use super::{
    config::BehaviorRules,
    coordinator::{PetCoordinator, PetSignal, Reaction},
    events::PetInput,
    movement::ScreenBounds,
};

/// Fixed cadences for the pet's autonomous behaviour.
#[derive(Resource, Debug)]
pub struct PetCadence {
    run: Timer,
    idle_action: Timer,
    inactivity: Timer,
    greeting: Timer,
}

impl PetCadence {
    pub fn new(rules: &BehaviorRules) -> Self {
        Self {
            run: Timer::new(rules.run_interval, TimerMode::Repeating),
            idle_action: Timer::new(rules.idle_action_interval, TimerMode::Repeating),
            inactivity: Timer::new(rules.inactivity_poll, TimerMode::Repeating),
            greeting: Timer::new(rules.startup_greeting_delay, TimerMode::Once),
        }
    }
}

pub fn spawn_coordinator(
    mut commands: Commands,
    rules: Res<BehaviorRules>,
    settings: Res<PetSettings>,
) {
    // The monitor is not known yet; `sync_screen_bounds` clamps once it is.
    let coordinator =
        PetCoordinator::awaiting_screen(rules.clone(), rules.window_size, settings.position());
    info!(target: "pet", "Pet starting at {:?}", coordinator.position());
    commands.insert_resource(coordinator);
}

/// Tracks the primary monitor so runs and drags stay on screen.
pub fn sync_screen_bounds(
    monitors: Query<&Monitor, With<PrimaryMonitor>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut coordinator: ResMut<PetCoordinator>,
) {
    let Ok(monitor) = monitors.single() else {
        return;
    };
    let window = windows
        .single()
        .map(|window| UVec2::new(window.physical_width(), window.physical_height()))
        .unwrap_or(coordinator.rules().window_size);

    let bounds = ScreenBounds::at(
        monitor.physical_position,
        UVec2::new(monitor.physical_width, monitor.physical_height),
        window,
    );
    if !coordinator.is_screen_known() || bounds != coordinator.bounds() {
        info!(
            target: "pet",
            "Screen bounds now {:?} at {:?}",
            bounds.screen,
            bounds.origin
        );
        coordinator.set_bounds(bounds);
    }
}

pub fn apply_pet_input(mut inputs: MessageReader<PetInput>, mut coordinator: ResMut<PetCoordinator>) {
    for input in inputs.read() {
        let reaction = match *input {
            PetInput::LeftClick => coordinator.on_left_click(),
            PetInput::RightClick => coordinator.on_right_click(),
            PetInput::DoubleClick => coordinator.on_double_click(),
            PetInput::DragMove(target) => coordinator.on_drag_move(target),
            PetInput::DragRelease => {
                coordinator.on_drag_release();
                continue;
            }
            PetInput::Command(key) => coordinator.on_command(key),
            PetInput::Perform { key, hold } => {
                coordinator.perform(key, hold);
                continue;
            }
            PetInput::RunToRandom => {
                coordinator.run_to_random_location();
                continue;
            }
        };

        if !reaction.was_accepted() && reaction != Reaction::Provoked {
            debug!(target: "pet", "{:?} ignored while angry", input);
        }
    }
}

pub fn tick_coordinator(clock: Res<PetClock>, mut coordinator: ResMut<PetCoordinator>) {
    coordinator.tick(clock.delta());
}

pub fn run_cadences(
    clock: Res<PetClock>,
    mut cadence: ResMut<PetCadence>,
    mut coordinator: ResMut<PetCoordinator>,
) {
    let delta = clock.delta();

    if cadence.greeting.tick(delta).just_finished() {
        coordinator.greet();
    }

    if cadence.inactivity.tick(delta).just_finished() {
        if let Some(key) = coordinator.poll_inactivity() {
            info!(target: "pet", "User idle for {:?}; pet is {}", coordinator.idle_for(), key);
        }
    }

    if cadence.run.tick(delta).just_finished() {
        if let Some(target) = coordinator.run_to_random_location() {
            debug!(target: "pet", "Running to {:?}", target);
        }
    }

    if cadence.idle_action.tick(delta).just_finished() {
        if let Some(key) = coordinator.perform_random_idle_action() {
            debug!(target: "pet", "Idle action: {}", key);
        }
    }
}

pub fn publish_pet_signals(
    mut coordinator: ResMut<PetCoordinator>,
    mut writer: MessageWriter<PetSignal>,
) {
    for signal in coordinator.drain_signals() {
        writer.write(signal);
    }
}
