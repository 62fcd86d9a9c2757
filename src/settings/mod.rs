//! Persisted user settings.
pub mod plugin;
pub mod store;

pub use plugin::{SettingsPlugin, SettingsUpdate};
pub use store::{PetSettings, SettingsStore};
