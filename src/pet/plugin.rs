//! Pet plugin wiring the coordinator, its cadences and the feeding item.
use bevy::prelude::*;

use crate::settings::PetSettings;

use super::{
    config::BehaviorRules,
    coordinator::PetSignal,
    events::{FeedingInput, PetInput},
    feeding::{apply_feeding_input, spawn_feeding_item, FeedingState},
    systems::{
        apply_pet_input, publish_pet_signals, run_cadences, spawn_coordinator, sync_screen_bounds,
        tick_coordinator, PetCadence,
    },
};

/// System set for everything that mutates the coordinator; UI systems run after it.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct PetUpdateSet;

pub struct PetPlugin {
    rules: BehaviorRules,
}

impl PetPlugin {
    pub fn new(rules: BehaviorRules) -> Self {
        Self { rules }
    }
}

impl Plugin for PetPlugin {
    fn build(&self, app: &mut App) {
        let feeding = app
            .world()
            .get_resource::<PetSettings>()
            .map(FeedingState::new)
            .unwrap_or_else(|| FeedingState::new(&PetSettings::default()));

        app.insert_resource(self.rules.clone())
            .insert_resource(PetCadence::new(&self.rules))
            .insert_resource(feeding)
            .add_message::<PetInput>()
            .add_message::<FeedingInput>()
            .add_message::<PetSignal>()
            .add_systems(Startup, spawn_coordinator)
            .add_systems(
                Update,
                (
                    sync_screen_bounds,
                    apply_pet_input,
                    apply_feeding_input,
                    tick_coordinator,
                    run_cadences,
                    spawn_feeding_item,
                    publish_pet_signals,
                )
                    .chain()
                    .in_set(PetUpdateSet),
            );

        info!(
            target: "pet",
            "PetPlugin registered (annoyed after {} clicks, sleeps after {:?})",
            self.rules.annoyance_threshold,
            self.rules.sleep_after
        );
    }
}
