// The infra module contains implementations of core traits.
// Each feature implementation goes in its own submodule.

#[path = "group_management/mod.rs"]
pub mod group_management;

#[path = "system_status/mod.rs"]
pub mod system_status;
