// src/ui/speech_bubble/mod.rs
//
// Speech bubble shown above the pet.
//
// - Shows text from BubbleCommand::Show, replacing whatever was there
// - Auto-hides after its lifetime with a short fade
// - Dismissed by clicking it (BubbleCommand::Dismiss)

pub mod components;
pub mod plugin;
pub mod systems;

pub use components::SpeechBubble;
pub use plugin::SpeechBubblePlugin;
