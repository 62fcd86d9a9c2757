//! Messages flowing into and out of the speech pipeline.
use bevy::prelude::Message;

use super::types::SpeechDelivery;

pub const ASKING_TEXT: &str = "🔄 Asking Gemini for a message... This might take a moment! 🤖";
pub const CUSTOM_TEXT: &str = "🎨 Creating a custom message... Hold on! ✨";
pub const STORY_TEXT: &str = "📚 Let me think of a funny story for you... 🤔✨";
pub const TEST_BUBBLE_TEXT: &str =
    "🥛 Hello! Milk Mocha is ready to chat! Press G, B, or F for messages! ✨";

/// Requests for something to say.
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub enum SpeechCommand {
    /// Startup greeting, keyed on time of day.
    Greeting,
    /// Unprompted message from the speaking schedule.
    Scheduled,
    /// Message matched to what the user is doing (G).
    Contextual,
    /// Free-form prompt (B sends a cute hello).
    Custom(String),
    /// Offline message without touching the network (F).
    Fallback,
    /// Short funny story; the pet watches while it loads and laughs after (J).
    Story,
    /// Fixed bubble for checking the UI (T).
    TestBubble,
}

impl SpeechCommand {
    /// Bubble text shown while a fetch for this command is running.
    pub fn interim_text(&self) -> Option<&'static str> {
        match self {
            Self::Contextual => Some(ASKING_TEXT),
            Self::Custom(_) => Some(CUSTOM_TEXT),
            Self::Story => Some(STORY_TEXT),
            _ => None,
        }
    }
}

/// A resolved message, live or fallback.
#[derive(Message, Debug, Clone)]
pub struct SpeechDelivered {
    pub delivery: SpeechDelivery,
}

/// Drives the speech bubble.
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub enum BubbleCommand {
    Show(String),
    Dismiss,
}
