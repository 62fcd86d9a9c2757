//! The pet and bottle sprites, and the window that carries them around the screen.
use bevy::{
    prelude::*,
    window::{PrimaryWindow, WindowPosition},
};

use crate::animation::{player::DEFAULT_FRAME_TIME, PetSprite};
use crate::pet::{feeding::FeedingState, PetCoordinator};
use crate::settings::PetSettings;

use super::layout::{pet_rect, to_world, BOTTLE_SIZE, PET_SIZE};

pub const BOTTLE_IMAGE: &str = "food/milk_bottle.png";

#[derive(Component, Debug)]
pub struct PetView;

#[derive(Component, Debug)]
pub struct BottleView;

pub fn spawn_pet_view(
    mut commands: Commands,
    assets: Res<AssetServer>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    let size = windows
        .single()
        .map(Window::size)
        .unwrap_or(Vec2::new(320.0, 320.0));
    let pet_centre = to_world(size, pet_rect(size).center());

    commands.spawn(Camera2d);
    commands.spawn((
        Sprite {
            custom_size: Some(PET_SIZE),
            ..default()
        },
        Transform::from_translation(pet_centre.extend(0.0)),
        PetSprite::new(DEFAULT_FRAME_TIME),
        PetView,
    ));
    commands.spawn((
        Sprite {
            image: assets.load(BOTTLE_IMAGE),
            custom_size: Some(BOTTLE_SIZE),
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, 1.0),
        Visibility::Hidden,
        BottleView,
    ));
}

/// Moves the OS window to wherever the coordinator has put the pet.
pub fn sync_window_position(
    coordinator: Res<PetCoordinator>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
) {
    if !coordinator.is_changed() {
        return;
    }
    let Ok(mut window) = windows.single_mut() else {
        return;
    };
    let target = WindowPosition::At(coordinator.position());
    if window.position != target {
        window.position = target;
    }
}

pub fn apply_transparency(
    settings: Res<PetSettings>,
    mut sprites: Query<&mut Sprite, Or<(With<PetView>, With<BottleView>)>>,
) {
    if !settings.is_changed() {
        return;
    }
    let alpha = settings.opacity();
    for mut sprite in &mut sprites {
        sprite.color.set_alpha(alpha);
    }
}

pub fn sync_bottle_view(
    feeding: Res<FeedingState>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut bottles: Query<(&mut Transform, &mut Visibility), With<BottleView>>,
) {
    if !feeding.is_changed() {
        return;
    }
    let size = windows
        .single()
        .map(Window::size)
        .unwrap_or(Vec2::new(320.0, 320.0));
    for (mut transform, mut visibility) in &mut bottles {
        match feeding.bottle() {
            Some(bottle) => {
                let centre = to_world(size, bottle.center());
                transform.translation.x = centre.x;
                transform.translation.y = centre.y;
                *visibility = Visibility::Visible;
            }
            None => *visibility = Visibility::Hidden,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bottle_app(settings: PetSettings) -> App {
        let mut app = App::new();
        app.insert_resource(FeedingState::new(&settings))
            .insert_resource(settings)
            .add_systems(Update, (sync_bottle_view, apply_transparency));
        app.world_mut().spawn((
            Sprite::default(),
            Transform::default(),
            Visibility::Hidden,
            BottleView,
        ));
        app
    }

    fn bottle_entity(app: &mut App) -> (Transform, Visibility, Sprite) {
        let mut query = app
            .world_mut()
            .query_filtered::<(&Transform, &Visibility, &Sprite), With<BottleView>>();
        let (transform, visibility, sprite) = query.single(app.world()).expect("one bottle");
        (*transform, *visibility, sprite.clone())
    }

    #[test]
    fn bottle_view_follows_the_feeding_item() {
        let mut app = bottle_app(PetSettings::default());
        app.update();
        assert_eq!(bottle_entity(&mut app).1, Visibility::Hidden);

        let window = Vec2::new(320.0, 320.0);
        assert!(app.world_mut().resource_mut::<FeedingState>().spawn(window));
        app.update();

        let centre = app
            .world()
            .resource::<FeedingState>()
            .bottle()
            .map(|bottle| to_world(window, bottle.center()))
            .expect("bottle");
        let (transform, visibility, _) = bottle_entity(&mut app);
        assert_eq!(visibility, Visibility::Visible);
        assert_eq!(transform.translation.truncate(), centre);
    }

    #[test]
    fn transparency_applies_to_sprites() {
        let settings = PetSettings {
            transparency: 128,
            ..PetSettings::default()
        };
        let expected = settings.opacity();
        let mut app = bottle_app(settings);
        app.update();
        let (_, _, sprite) = bottle_entity(&mut app);
        assert!((sprite.color.alpha() - expected).abs() < 1e-4);
    }
}
