// Implementations of the group management store.

pub mod json_settings_store;

pub use json_settings_store::JsonSettingsStore;
