//! Prompt templates for the remote provider.
use super::types::MessageCategory;

pub const PERSONA: &str = "You are Milk Mocha, a cute desktop pet companion. \
Respond in a warm, friendly, encouraging tone. \
Keep responses very short (under 15 words) and include an emoji. ";

const CUSTOM_SUFFIX: &str = " Keep it under 15 words and friendly.";

pub const CUSTOM_GREETING_PROMPT: &str = "Say hello in a cute way";

pub const STORY_PROMPT: &str = "Tell a very short, funny story in just 1-2 sentences (under 30 words) \
from the perspective of Milk Mocha, a cute desktop pet. Make it humorous about computer life. \
Start with '📚' emoji and include one other emoji.";

const MOTIVATIONAL: &[&str] = &[
    "Say a short motivational quote under 15 words that Milk Mocha would say.",
    "Give me an encouraging message under 15 words for someone working hard.",
    "Say something inspiring about taking breaks, under 15 words.",
    "Share a positive thought about productivity in under 15 words.",
    "Give a wholesome reminder about self-worth in under 15 words.",
];

const HUMOROUS: &[&str] = &[
    "Tell me a short, funny joke like Milk Mocha would say, under 15 words.",
    "Say something cute and funny about coffee or milk, under 15 words.",
    "Make a playful comment about desktop pets, under 15 words.",
    "Say a light-hearted joke about working from home, under 15 words.",
    "Give a funny observation about computers or screens, under 15 words.",
];

const WELLNESS: &[&str] = &[
    "Say a wholesome one-line reminder for self-care, under 15 words.",
    "Give a gentle reminder about staying hydrated, under 15 words.",
    "Say something caring about taking breaks, under 15 words.",
    "Share a mindful thought about rest, under 15 words.",
    "Give a loving reminder about work-life balance, under 15 words.",
];

const GREETINGS: &[&str] = &[
    "Say a cheerful morning greeting like Milk Mocha would, under 15 words.",
    "Give a friendly afternoon check-in message, under 15 words.",
    "Say an encouraging evening message, under 15 words.",
    "Share a warm hello for someone at their computer, under 15 words.",
    "Give a cute greeting that includes milk or mocha, under 15 words.",
];

const RANDOM: &[&str] = &[
    "Say something cute and random that Milk Mocha would say, under 15 words.",
    "Share a fun fact about animals in under 15 words.",
    "Give a random compliment to brighten someone's day, under 15 words.",
    "Say something playful about technology, under 15 words.",
    "Share a whimsical thought about desktop companions, under 15 words.",
];

fn prompts_for(category: MessageCategory) -> &'static [&'static str] {
    match category {
        MessageCategory::Motivational => MOTIVATIONAL,
        MessageCategory::Humorous => HUMOROUS,
        MessageCategory::Wellness => WELLNESS,
        MessageCategory::Greetings => GREETINGS,
        MessageCategory::Random => RANDOM,
    }
}

/// Chooses prompts, steering unspecified requests away from the previous category.
#[derive(Debug, Default)]
pub struct PromptBook {
    last_category: Option<MessageCategory>,
}

impl PromptBook {
    pub fn last_category(&self) -> Option<MessageCategory> {
        self.last_category
    }

    /// Picks the category for a request. `None` draws any category except the last one used.
    pub fn choose_category(
        &mut self,
        requested: Option<MessageCategory>,
        rng: &mut fastrand::Rng,
    ) -> MessageCategory {
        let category = requested.unwrap_or_else(|| {
            let available: Vec<MessageCategory> = MessageCategory::ALL
                .into_iter()
                .filter(|category| Some(*category) != self.last_category)
                .collect();
            available[rng.usize(..available.len())]
        });
        self.last_category = Some(category);
        category
    }

    /// Full prompt, persona included, for a category.
    pub fn category_prompt(&self, category: MessageCategory, rng: &mut fastrand::Rng) -> String {
        let prompts = prompts_for(category);
        format!("{}{}", PERSONA, prompts[rng.usize(..prompts.len())])
    }

    /// Full prompt for user-supplied text.
    pub fn custom_prompt(&self, text: &str) -> String {
        format!("{}{}{}", PERSONA, text.trim(), CUSTOM_SUFFIX)
    }
}
