// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "group_management/mod.rs"]
pub mod group_management;

#[path = "system_status/mod.rs"]
pub mod system_status;

#[path = "command_router.rs"]
pub mod command_router;

#[path = "guard_plugin.rs"]
pub mod guard_plugin;
