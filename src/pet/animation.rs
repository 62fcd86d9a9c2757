//! Animation keys the pet can display, plus their default holds and asset variants.
use std::{fmt, time::Duration};

/// Every animation the pet knows. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AnimationKey {
    #[default]
    Idle,
    Drinking,
    Sleeping,
    Playing,
    Greeting,
    Excited,
    Dancing,
    Crying,
    Laugh,
    HeartThrow,
    Running,
    SaysYes,
    Doubtful,
    Angry,
    Watching,
    Sitting,
    Pleasing,
}

/// Reactions picked at random for a plain left click.
pub const CLICK_REACTIONS: [AnimationKey; 3] = [
    AnimationKey::Excited,
    AnimationKey::Laugh,
    AnimationKey::HeartThrow,
];

/// Animations the pet performs on its own while idle.
pub const IDLE_ACTIONS: [AnimationKey; 8] = [
    AnimationKey::Dancing,
    AnimationKey::Laugh,
    AnimationKey::Excited,
    AnimationKey::HeartThrow,
    AnimationKey::Playing,
    AnimationKey::Greeting,
    AnimationKey::SaysYes,
    AnimationKey::Doubtful,
];

impl AnimationKey {
    pub const ALL: [AnimationKey; 17] = [
        Self::Idle,
        Self::Drinking,
        Self::Sleeping,
        Self::Playing,
        Self::Greeting,
        Self::Excited,
        Self::Dancing,
        Self::Crying,
        Self::Laugh,
        Self::HeartThrow,
        Self::Running,
        Self::SaysYes,
        Self::Doubtful,
        Self::Angry,
        Self::Watching,
        Self::Sitting,
        Self::Pleasing,
    ];

    /// Parses a loose animation name. Unknown names resolve to [`AnimationKey::Idle`].
    pub fn parse_or_idle(name: &str) -> Self {
        let normalised: String = name
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();

        match normalised.as_str() {
            "drinking" => Self::Drinking,
            "sleeping" | "tired" => Self::Sleeping,
            "playing" => Self::Playing,
            "greeting" => Self::Greeting,
            "excited" => Self::Excited,
            "dancing" | "dance" => Self::Dancing,
            "crying" => Self::Crying,
            "laugh" | "laughing" => Self::Laugh,
            "heartthrow" => Self::HeartThrow,
            "running" => Self::Running,
            "saysyes" => Self::SaysYes,
            "doubtful" => Self::Doubtful,
            "angry" => Self::Angry,
            "watching" => Self::Watching,
            "sitting" => Self::Sitting,
            "pleasing" => Self::Pleasing,
            _ => Self::Idle,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Drinking => "drinking",
            Self::Sleeping => "sleeping",
            Self::Playing => "playing",
            Self::Greeting => "greeting",
            Self::Excited => "excited",
            Self::Dancing => "dancing",
            Self::Crying => "crying",
            Self::Laugh => "laugh",
            Self::HeartThrow => "heart-throw",
            Self::Running => "running",
            Self::SaysYes => "says-yes",
            Self::Doubtful => "doubtful",
            Self::Angry => "angry",
            Self::Watching => "watching",
            Self::Sitting => "sitting",
            Self::Pleasing => "pleasing",
        }
    }

    /// How long the animation plays before reverting, when triggered as a reaction.
    /// `None` means it stays until something else replaces it.
    pub fn default_hold(self) -> Option<Duration> {
        let secs = match self {
            Self::Idle | Self::Sleeping | Self::Running | Self::Watching | Self::Sitting => {
                return None
            }
            Self::Drinking => 10,
            Self::Dancing => 8,
            Self::Playing | Self::Crying => 6,
            Self::SaysYes => 4,
            Self::Greeting
            | Self::Excited
            | Self::Laugh
            | Self::HeartThrow
            | Self::Doubtful
            | Self::Angry
            | Self::Pleasing => 5,
        };
        Some(Duration::from_secs(secs))
    }

    /// Asset directory names under the animation root. The first entry is the
    /// primary variant; keys with several variants pick one at random.
    pub fn variants(self) -> &'static [&'static str] {
        match self {
            Self::Idle => &["idle"],
            Self::Drinking => &["drinking"],
            Self::Sleeping => &["tired"],
            Self::Playing => &["playing_guitar"],
            Self::Greeting => &["says_hi"],
            Self::Excited => &["excited"],
            Self::Dancing => &["dance1", "dance2"],
            Self::Crying => &["crying"],
            Self::Laugh => &["laugh"],
            Self::HeartThrow => &["heart_throw"],
            Self::Running => &["running"],
            Self::SaysYes => &["says_yes"],
            Self::Doubtful => &["looking_doubtful"],
            Self::Angry => &["angry"],
            Self::Watching => &["watching_mobile"],
            Self::Sitting => &["sitting"],
            Self::Pleasing => &["pleasing"],
        }
    }
}

impl fmt::Display for AnimationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
