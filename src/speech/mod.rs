//! What Milk Mocha says: prompts, the Gemini broker, offline fallbacks, the
//! off-thread dispatcher, the speaking schedule and the message history.
pub mod activity;
pub mod broker;
pub mod config;
pub mod dispatcher;
pub mod errors;
pub mod events;
pub mod fallback;
pub mod history;
pub mod plugin;
pub mod prompts;
pub mod schedule;
pub mod source;
pub mod systems;
pub mod types;

pub use config::SpeechRules;
pub use events::{BubbleCommand, SpeechCommand, SpeechDelivered};
pub use plugin::{SpeechPlugin, SpeechUpdateSet};
pub use systems::custom_greeting;
