pub mod system_status_models;
pub mod system_status_service;

pub use system_status_models::SystemSnapshot;
pub use system_status_service::{ProbeError, SystemProbe, SystemStatusService};
