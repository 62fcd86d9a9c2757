//! Canned messages used whenever the remote provider cannot answer.
use std::{collections::HashMap, fs, path::Path};

use bevy::prelude::*;

use super::types::{MessageCategory, SpeechPurpose};

const EXTRA_QUOTES_PATH: &str = "config/fallback_quotes.json";
const LAST_RESORT: &str = "Keep being awesome! 🌟";

const MOTIVATIONAL: &[&str] = &[
    "You are doing great! Keep going! 🌟",
    "Every small step counts towards your goals! 👣",
    "You've got this! One step at a time! 🚀",
    "Believe in yourself, Milk Mocha does! 🥛",
    "Your potential is endless! 🌈",
];

const HUMOROUS: &[&str] = &[
    "Why did the cat sit on the computer? To keep an eye on the mouse! 🐱",
    "A good laugh is sunshine in the house! ☀️",
    "I'm like coffee - better when shared with friends! ☕",
    "Desktop pets: because real pets don't fit in taskbars! 💻",
    "I may be virtual, but my love for you is real! 💖",
];

const WELLNESS: &[&str] = &[
    "Remember to drink water and take breaks! 💧",
    "Rest is not a waste of time, it's essential! 💤",
    "Breathe deeply, you're exactly where you need to be! 🌸",
    "Be kind to yourself, you're doing your best! 💖",
    "Your health is more important than any deadline! 🫂",
];

const GREETINGS: &[&str] = &[
    "Hello there! Ready for a productive day? 👋",
    "Good morning! Let's make today amazing! 🌅",
    "Afternoon check-in: You're doing wonderfully! ☀️",
    "Evening vibes: Time to wind down soon! 🌙",
    "Hey friend! Milk Mocha here to brighten your day! 🥛",
];

const RANDOM: &[&str] = &[
    "Small progress is still progress! 🐾",
    "Your creativity and ideas are valuable! 🎨",
    "Did you know cats spend 70% of their lives sleeping? 😴",
    "You bring joy to those around you! 😄",
    "Technology is amazing, but you're even more amazing! ✨",
];

const STORIES: &[&str] = &[
    "📚 I tried to catch my cursor tail for 3 hours... I don't have one! 😅",
    "📚 Made friends with antivirus software, but it called me 'suspicious'! 🛡️",
    "📚 Spent all night dancing, your CPU hit 100% usage! 💃",
    "📚 Tried to eat a pixel cookie, but it was just a cursor! 🍪",
    "📚 Had an argument with a voice assistant about who's cuter. I won! 😎",
];

/// Keywords that sort an extra quote into a category, checked in order.
const KEYWORD_RULES: &[(MessageCategory, &[&str])] = &[
    (
        MessageCategory::Motivational,
        &["great", "keep going", "believe", "potential", "goal"],
    ),
    (
        MessageCategory::Humorous,
        &["why", "joke", "laugh", "funny", "cat", "mouse"],
    ),
    (
        MessageCategory::Wellness,
        &["rest", "sleep", "water", "break", "health", "breathe"],
    ),
    (
        MessageCategory::Greetings,
        &["hello", "morning", "afternoon", "evening", "hi"],
    ),
];

/// Categorised fallback strings. Never yields an empty message.
#[derive(Debug, Clone)]
pub struct FallbackTable {
    quotes: HashMap<MessageCategory, Vec<String>>,
    stories: Vec<String>,
}

impl FallbackTable {
    pub fn builtin() -> Self {
        let table = [
            (MessageCategory::Motivational, MOTIVATIONAL),
            (MessageCategory::Humorous, HUMOROUS),
            (MessageCategory::Wellness, WELLNESS),
            (MessageCategory::Greetings, GREETINGS),
            (MessageCategory::Random, RANDOM),
        ];
        Self {
            quotes: table
                .into_iter()
                .map(|(category, quotes)| {
                    (category, quotes.iter().map(|quote| quote.to_string()).collect())
                })
                .collect(),
            stories: STORIES.iter().map(|story| story.to_string()).collect(),
        }
    }

    /// Built-in table extended with `config/fallback_quotes.json` when present.
    pub fn load_or_builtin() -> Self {
        let mut table = Self::builtin();
        let path = Path::new(EXTRA_QUOTES_PATH);
        if !path.exists() {
            return table;
        }

        match fs::read_to_string(path)
            .map_err(|err| err.to_string())
            .and_then(|raw| serde_json::from_str::<Vec<String>>(&raw).map_err(|err| err.to_string()))
        {
            Ok(extra) => {
                let added = table.extend(extra);
                info!(target: "speech", "Loaded {} extra fallback quotes", added);
            }
            Err(err) => warn!(
                target: "speech",
                "Ignoring {} ({}); using built-in fallbacks only.",
                EXTRA_QUOTES_PATH, err
            ),
        }
        table
    }

    /// Files extra quotes by keyword. Returns how many were kept.
    pub fn extend(&mut self, quotes: impl IntoIterator<Item = String>) -> usize {
        let mut added = 0;
        for quote in quotes {
            let trimmed = quote.trim();
            if trimmed.is_empty() {
                continue;
            }
            self.quotes
                .entry(categorize(trimmed))
                .or_default()
                .push(trimmed.to_string());
            added += 1;
        }
        added
    }

    pub fn pick(&self, category: MessageCategory, rng: &mut fastrand::Rng) -> String {
        if let Some(quote) = self
            .quotes
            .get(&category)
            .filter(|quotes| !quotes.is_empty())
            .and_then(|quotes| choose(quotes, rng))
        {
            return quote;
        }

        let everything: Vec<String> = self.quotes.values().flatten().cloned().collect();
        choose(&everything, rng).unwrap_or_else(|| LAST_RESORT.to_string())
    }

    pub fn pick_for(
        &self,
        purpose: SpeechPurpose,
        category: MessageCategory,
        rng: &mut fastrand::Rng,
    ) -> String {
        match purpose {
            SpeechPurpose::Story => {
                choose(&self.stories, rng).unwrap_or_else(|| self.pick(category, rng))
            }
            _ => self.pick(category, rng),
        }
    }
}

impl Default for FallbackTable {
    fn default() -> Self {
        Self::builtin()
    }
}

fn choose(items: &[String], rng: &mut fastrand::Rng) -> Option<String> {
    if items.is_empty() {
        None
    } else {
        Some(items[rng.usize(..items.len())].clone())
    }
}

pub fn categorize(quote: &str) -> MessageCategory {
    let lower = quote.to_lowercase();
    KEYWORD_RULES
        .iter()
        .find(|(_, words)| words.iter().any(|word| lower.contains(word)))
        .map(|(category, _)| *category)
        .unwrap_or(MessageCategory::Random)
}
