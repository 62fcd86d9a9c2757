//! The pet itself: animation vocabulary, behaviour rules, the coordinator
//! state machine and the feeding item.
pub mod animation;
pub mod config;
pub mod coordinator;
pub mod events;
pub mod feeding;
pub mod lockout;
pub mod movement;
pub mod plugin;
pub mod systems;

pub use animation::AnimationKey;
pub use config::BehaviorRules;
pub use coordinator::{PetCoordinator, PetSignal};
pub use events::{FeedingInput, PetInput};
pub use plugin::{PetPlugin, PetUpdateSet};
