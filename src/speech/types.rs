//! Shared request/delivery types for the speech module.
use std::fmt;

use super::errors::SpeechErrorKind;

/// Message flavours the pet can speak in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MessageCategory {
    Motivational,
    Humorous,
    Wellness,
    Greetings,
    #[default]
    Random,
}

impl MessageCategory {
    pub const ALL: [MessageCategory; 5] = [
        Self::Motivational,
        Self::Humorous,
        Self::Wellness,
        Self::Greetings,
        Self::Random,
    ];

    /// Unknown tags map to [`MessageCategory::Random`].
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "motivational" | "working" => Self::Motivational,
            "humorous" | "funny" => Self::Humorous,
            "wellness" | "break" => Self::Wellness,
            "greetings" | "greeting" => Self::Greetings,
            _ => Self::Random,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Motivational => "motivational",
            Self::Humorous => "humorous",
            Self::Wellness => "wellness",
            Self::Greetings => "greetings",
            Self::Random => "random",
        }
    }
}

impl fmt::Display for MessageCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What the user (or the schedule) is doing, used to pick a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityContext {
    Working,
    Break,
    Morning,
    Afternoon,
    Evening,
    Idle,
}

impl ActivityContext {
    pub fn category(self) -> MessageCategory {
        match self {
            Self::Working => MessageCategory::Motivational,
            Self::Break | Self::Evening => MessageCategory::Wellness,
            Self::Morning => MessageCategory::Greetings,
            Self::Afternoon => MessageCategory::Random,
            Self::Idle => MessageCategory::Humorous,
        }
    }
}

/// Identifier assigned to each dispatched fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpeechRequestId(u64);

impl SpeechRequestId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

/// Why a message was requested. Stories get their own fallback list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpeechPurpose {
    Scheduled,
    Contextual,
    Custom,
    Story,
}

/// Fully composed request handed to a broker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechRequest {
    pub category: MessageCategory,
    pub purpose: SpeechPurpose,
    /// Prompt text including the persona preamble.
    pub prompt: String,
}

impl SpeechRequest {
    pub fn new(category: MessageCategory, purpose: SpeechPurpose, prompt: impl Into<String>) -> Self {
        Self {
            category,
            purpose,
            prompt: prompt.into(),
        }
    }
}

/// Where a delivered message came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechOrigin {
    Live,
    Fallback,
}

impl SpeechOrigin {
    pub fn label(self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Fallback => "fallback",
        }
    }
}

/// A message ready to be shown in the bubble.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechDelivery {
    pub request_id: SpeechRequestId,
    pub category: MessageCategory,
    pub purpose: SpeechPurpose,
    pub origin: SpeechOrigin,
    pub text: String,
    /// Why a fallback was used instead of a live reply, when one failed.
    pub failure: Option<SpeechErrorKind>,
}
