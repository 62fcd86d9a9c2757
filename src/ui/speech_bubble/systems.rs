// src/ui/speech_bubble/systems.rs
//
// Systems for showing, fading and hiding the speech bubble node.

use bevy::prelude::*;

use crate::speech::BubbleCommand;
use crate::ui::layout::{BUBBLE_HEIGHT, BUBBLE_MARGIN};

use super::components::{SpeechBubble, SpeechBubbleSettings};

// Visual constants
const BACKGROUND_COLOR: Color = Color::srgba(1.0, 0.98, 0.94, 0.95);
const TEXT_COLOR: Color = Color::srgb(0.25, 0.18, 0.12);
const PADDING_PX: f32 = 8.0;

/// Spawn the (hidden) bubble node along the top of the window.
pub fn spawn_speech_bubble(mut commands: Commands, settings: Res<SpeechBubbleSettings>) {
    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(BUBBLE_MARGIN),
            right: Val::Px(BUBBLE_MARGIN),
            top: Val::Px(BUBBLE_MARGIN),
            max_height: Val::Px(BUBBLE_HEIGHT),
            padding: UiRect::all(Val::Px(PADDING_PX)),
            display: Display::None,
            ..default()
        },
        BackgroundColor(BACKGROUND_COLOR),
        ZIndex(100),
        SpeechBubble::hidden(),
        Text::new(""),
        TextFont {
            font_size: settings.font_size,
            ..default()
        },
        TextColor(TEXT_COLOR),
    ));
}

/// Replace the bubble text or dismiss it.
pub fn apply_bubble_commands(
    settings: Res<SpeechBubbleSettings>,
    mut commands: MessageReader<BubbleCommand>,
    mut bubbles: Query<(&mut SpeechBubble, &mut Text)>,
) {
    for command in commands.read() {
        for (mut bubble, mut text) in &mut bubbles {
            match command {
                BubbleCommand::Show(content) => {
                    text.0 = content.clone();
                    bubble.show(settings.lifetime);
                }
                BubbleCommand::Dismiss => bubble.hide(),
            }
        }
    }
}

/// Tick lifetimes, apply the fade and toggle node display.
pub fn update_speech_bubble(
    time: Res<Time>,
    settings: Res<SpeechBubbleSettings>,
    mut bubbles: Query<(
        &mut SpeechBubble,
        &mut Node,
        &mut BackgroundColor,
        &mut TextColor,
    )>,
) {
    for (mut bubble, mut node, mut background, mut text_color) in &mut bubbles {
        bubble.tick(time.delta());

        if !bubble.is_visible() {
            node.display = Display::None;
            continue;
        }

        node.display = Display::Flex;
        let alpha = bubble.fade_alpha(settings.fade_seconds);
        text_color.0 = TEXT_COLOR.with_alpha(alpha);
        background.0 = BACKGROUND_COLOR.with_alpha(alpha * 0.95);
    }
}
