//! Global timing shared by every plugin.
pub mod plugin;

pub use plugin::{config_seconds, sanitize_time_scale, CorePlugin, PetClock};
