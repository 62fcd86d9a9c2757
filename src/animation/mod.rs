//! Pet sprite playback from frame directories on disk.
pub mod catalog;
pub mod player;

use std::path::Path;

use bevy::prelude::*;

pub use catalog::{AnimationCatalog, AssetError};
pub use player::{FramePlayer, PetSprite};

use crate::pet::PetUpdateSet;

use player::{advance_pet_frames, start_pet_animation, switch_pet_animation};

pub struct AnimationPlugin;

impl Plugin for AnimationPlugin {
    fn build(&self, app: &mut App) {
        let catalog = AnimationCatalog::scan(Path::new(catalog::DEFAULT_ASSET_ROOT));
        app.insert_resource(catalog).add_systems(
            Update,
            (start_pet_animation, switch_pet_animation, advance_pet_frames)
                .chain()
                .after(PetUpdateSet),
        );
    }
}
