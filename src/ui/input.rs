//! Translates raw mouse and keyboard state into pet, feeding, speech and
//! settings messages.
use std::time::Duration;

use bevy::{prelude::*, window::PrimaryWindow};

use crate::pet::{
    feeding::FeedingState, AnimationKey, BehaviorRules, FeedingInput, PetCoordinator, PetInput,
};
use crate::settings::SettingsUpdate;
use crate::speech::{custom_greeting, BubbleCommand, SpeechCommand};
use crate::ui::{
    layout::{bubble_rect, pet_rect},
    speech_bubble::SpeechBubble,
};

/// Distinguishes single from double presses on the pet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickKind {
    Single,
    Double,
}

#[derive(Debug, Default)]
pub struct ClickTracker {
    last_press: Option<Duration>,
}

impl ClickTracker {
    /// A second press within `window` of the first is a double click; a third
    /// press starts over.
    pub fn register(&mut self, now: Duration, window: Duration) -> ClickKind {
        match self.last_press {
            Some(previous) if now.saturating_sub(previous) <= window => {
                self.last_press = None;
                ClickKind::Double
            }
            _ => {
                self.last_press = Some(now);
                ClickKind::Single
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Bottle,
    Bubble,
    Pet,
    Nothing,
}

/// What sits under a window-local point. The bottle is drawn on top, then the
/// bubble, then the pet.
pub fn hit_test(local: Vec2, window: Vec2, bottle: Option<Rect>, bubble_visible: bool) -> HitTarget {
    if bottle.is_some_and(|rect| rect.contains(local)) {
        HitTarget::Bottle
    } else if bubble_visible && bubble_rect(window).contains(local) {
        HitTarget::Bubble
    } else if pet_rect(window).contains(local) {
        HitTarget::Pet
    } else {
        HitTarget::Nothing
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Press {
    Pet { grab: Vec2, dragged: bool },
    Bottle,
}

#[derive(Resource, Debug, Default)]
pub struct PointerState {
    press: Option<Press>,
    clicks: ClickTracker,
}

#[allow(clippy::too_many_arguments)]
pub fn translate_pointer(
    time: Res<Time<Real>>,
    rules: Res<BehaviorRules>,
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    bubbles: Query<&SpeechBubble>,
    feeding: Res<FeedingState>,
    coordinator: Res<PetCoordinator>,
    mut state: ResMut<PointerState>,
    mut pet: MessageWriter<PetInput>,
    mut feeding_inputs: MessageWriter<FeedingInput>,
    mut bubble_commands: MessageWriter<BubbleCommand>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let size = window.size();
    let cursor = window.cursor_position();
    let bubble_visible = bubbles.iter().any(SpeechBubble::is_visible);
    let bottle = feeding.bottle().map(|item| item.rect());

    if let (true, Some(local)) = (buttons.just_pressed(MouseButton::Left), cursor) {
        match hit_test(local, size, bottle, bubble_visible) {
            HitTarget::Bottle => {
                feeding_inputs.write(FeedingInput::Grab(local));
                state.press = Some(Press::Bottle);
            }
            HitTarget::Bubble => {
                bubble_commands.write(BubbleCommand::Dismiss);
            }
            HitTarget::Pet => {
                let input = match state.clicks.register(time.elapsed(), rules.double_click_window) {
                    ClickKind::Single => PetInput::LeftClick,
                    ClickKind::Double => PetInput::DoubleClick,
                };
                pet.write(input);
                state.press = Some(Press::Pet {
                    grab: local,
                    dragged: false,
                });
            }
            HitTarget::Nothing => {}
        }
    }

    if let (true, Some(local)) = (buttons.just_pressed(MouseButton::Right), cursor) {
        if hit_test(local, size, bottle, bubble_visible) == HitTarget::Pet {
            pet.write(PetInput::RightClick);
        }
    }

    if let (true, Some(local)) = (buttons.pressed(MouseButton::Left), cursor) {
        match state.press {
            Some(Press::Bottle) => {
                feeding_inputs.write(FeedingInput::Drag(local));
            }
            Some(Press::Pet { grab, .. }) => {
                // The window follows the cursor, so the offset from the grab
                // point is how far the window still has to move.
                let offset = ((local - grab) * window.scale_factor()).round().as_ivec2();
                if offset != IVec2::ZERO {
                    pet.write(PetInput::DragMove(coordinator.position() + offset));
                    state.press = Some(Press::Pet {
                        grab,
                        dragged: true,
                    });
                }
            }
            None => {}
        }
    }

    if buttons.just_released(MouseButton::Left) {
        match state.press.take() {
            Some(Press::Bottle) => {
                feeding_inputs.write(FeedingInput::Release);
            }
            Some(Press::Pet { dragged: true, .. }) => {
                pet.write(PetInput::DragRelease);
            }
            _ => {}
        }
    }
}

/// Everything a key press can ask for.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyAction {
    Pet(PetInput),
    Speech(SpeechCommand),
    Settings(SettingsUpdate),
    Exit,
}

pub fn binding_for(key: KeyCode) -> Option<KeyAction> {
    let action = match key {
        KeyCode::Space => KeyAction::Pet(PetInput::Command(AnimationKey::Dancing)),
        KeyCode::KeyP => KeyAction::Pet(PetInput::Command(AnimationKey::Playing)),
        KeyCode::KeyY => KeyAction::Pet(PetInput::Command(AnimationKey::SaysYes)),
        KeyCode::KeyR => KeyAction::Pet(PetInput::RunToRandom),
        KeyCode::KeyG => KeyAction::Speech(SpeechCommand::Contextual),
        KeyCode::KeyB => KeyAction::Speech(custom_greeting()),
        KeyCode::KeyF => KeyAction::Speech(SpeechCommand::Fallback),
        KeyCode::KeyJ => KeyAction::Speech(SpeechCommand::Story),
        KeyCode::KeyT => KeyAction::Speech(SpeechCommand::TestBubble),
        KeyCode::KeyM => KeyAction::Settings(SettingsUpdate::ToggleSpeaking),
        KeyCode::KeyA => KeyAction::Settings(SettingsUpdate::ToggleAutoSpawn),
        KeyCode::KeyO => KeyAction::Settings(SettingsUpdate::ToggleFallbackOnly),
        KeyCode::BracketLeft => KeyAction::Settings(SettingsUpdate::LowerOpacity),
        KeyCode::BracketRight => KeyAction::Settings(SettingsUpdate::RaiseOpacity),
        KeyCode::Escape => KeyAction::Exit,
        _ => return None,
    };
    Some(action)
}

pub fn translate_keys(
    keys: Res<ButtonInput<KeyCode>>,
    mut pet: MessageWriter<PetInput>,
    mut speech: MessageWriter<SpeechCommand>,
    mut settings: MessageWriter<SettingsUpdate>,
    mut exit: MessageWriter<AppExit>,
) {
    for key in keys.get_just_pressed() {
        match binding_for(*key) {
            Some(KeyAction::Pet(input)) => {
                pet.write(input);
            }
            Some(KeyAction::Speech(command)) => {
                speech.write(command);
            }
            Some(KeyAction::Settings(update)) => {
                settings.write(update);
            }
            Some(KeyAction::Exit) => {
                info!("Escape pressed; exiting");
                exit.write(AppExit::Success);
            }
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::PetSettings;

    const WINDOW: Vec2 = Vec2::new(320.0, 320.0);

    #[test]
    fn second_press_inside_window_is_a_double_click() {
        let window = Duration::from_millis(300);
        let mut tracker = ClickTracker::default();
        assert_eq!(tracker.register(Duration::from_millis(1000), window), ClickKind::Single);
        assert_eq!(tracker.register(Duration::from_millis(1200), window), ClickKind::Double);
        assert_eq!(tracker.register(Duration::from_millis(1300), window), ClickKind::Single);
        assert_eq!(tracker.register(Duration::from_millis(2000), window), ClickKind::Single);
    }

    #[test]
    fn hit_test_prefers_bottle_then_bubble_then_pet() {
        let pet_centre = pet_rect(WINDOW).center();
        let bottle = Some(Rect::from_center_size(pet_centre, Vec2::splat(50.0)));
        assert_eq!(hit_test(pet_centre, WINDOW, bottle, false), HitTarget::Bottle);
        assert_eq!(hit_test(pet_centre, WINDOW, None, false), HitTarget::Pet);

        let top = Vec2::new(160.0, 40.0);
        assert_eq!(hit_test(top, WINDOW, None, true), HitTarget::Bubble);
        assert_eq!(hit_test(top, WINDOW, None, false), HitTarget::Nothing);
    }

    #[test]
    fn key_bindings() {
        assert_eq!(
            binding_for(KeyCode::Space),
            Some(KeyAction::Pet(PetInput::Command(AnimationKey::Dancing)))
        );
        assert_eq!(
            binding_for(KeyCode::KeyG),
            Some(KeyAction::Speech(SpeechCommand::Contextual))
        );
        assert_eq!(
            binding_for(KeyCode::KeyB),
            Some(KeyAction::Speech(SpeechCommand::Custom(
                "Say hello in a cute way".to_string()
            )))
        );
        assert_eq!(
            binding_for(KeyCode::BracketRight),
            Some(KeyAction::Settings(SettingsUpdate::RaiseOpacity))
        );
        assert_eq!(binding_for(KeyCode::Escape), Some(KeyAction::Exit));
        assert_eq!(binding_for(KeyCode::KeyZ), None);
    }

    #[test]
    fn key_presses_become_messages() {
        let mut app = App::new();
        app.add_message::<PetInput>()
            .add_message::<SpeechCommand>()
            .add_message::<SettingsUpdate>()
            .add_message::<AppExit>()
            .init_resource::<ButtonInput<KeyCode>>()
            .add_systems(Update, translate_keys);

        {
            let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
            keys.press(KeyCode::KeyR);
            keys.press(KeyCode::KeyM);
        }
        app.update();

        let inputs: Vec<PetInput> = app
            .world_mut()
            .resource_mut::<Messages<PetInput>>()
            .drain()
            .collect();
        assert_eq!(inputs, vec![PetInput::RunToRandom]);
        let updates: Vec<SettingsUpdate> = app
            .world_mut()
            .resource_mut::<Messages<SettingsUpdate>>()
            .drain()
            .collect();
        assert_eq!(updates, vec![SettingsUpdate::ToggleSpeaking]);
    }

    #[test]
    fn feeding_state_bottle_is_hit_first() {
        let mut state = FeedingState::new(&PetSettings::default());
        assert!(state.spawn(WINDOW));
        let bottle = state.bottle().map(|item| item.rect());
        let centre = bottle.map(|rect| rect.center()).unwrap_or_default();
        assert_eq!(hit_test(centre, WINDOW, bottle, true), HitTarget::Bottle);
    }
}
