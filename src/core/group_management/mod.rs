// Core group management module - per-group moderation settings and the
// punish-word scanner.

pub mod group_management_models;
pub mod group_management_service;
pub mod settings_store;

#[cfg(test)]
pub mod mock_store;

pub use group_management_models::*;
pub use group_management_service::*;
pub use settings_store::*;
