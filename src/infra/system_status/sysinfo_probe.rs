use crate::core::system_status::{ProbeError, SystemProbe, SystemSnapshot};
use async_trait::async_trait;
use chrono::{DateTime, Local};
use std::path::Path;
use sysinfo::{CpuRefreshKind, Disks, Networks, System};

#[cfg(target_os = "linux")]
const UTMP_PATH: &str = "/var/run/utmp";
use tokio::sync::Mutex;

/// `SystemProbe` backed by the `sysinfo` crate.
pub struct SysinfoProbe {
    // sysinfo::System is not Sync, and CPU usage needs two samples from the
    // same instance.
    system: Mutex<System>,
}

impl SysinfoProbe {
    pub fn new() -> Self {
        let mut system = System::new_all();
        system.refresh_all();
        Self {
            system: Mutex::new(system),
        }
    }
}

impl Default for SysinfoProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SystemProbe for SysinfoProbe {
    async fn snapshot(&self) -> Result<SystemSnapshot, ProbeError> {
        let mut sys = self.system.lock().await;

        sys.refresh_cpu_specifics(CpuRefreshKind::everything());
        tokio::time::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL).await;
        sys.refresh_cpu_specifics(CpuRefreshKind::everything());
        sys.refresh_memory();

        let cpus = sys.cpus();
        let cpu_usage_percent = if cpus.is_empty() {
            0.0
        } else {
            cpus.iter().map(|cpu| cpu.cpu_usage()).sum::<f32>() / cpus.len() as f32
        };

        let disks = Disks::new_with_refreshed_list();
        let disk = disks
            .list()
            .iter()
            .find(|d| d.mount_point() == Path::new("/"))
            .or_else(|| disks.list().first())
            .ok_or_else(|| ProbeError::Unavailable("no disks reported".to_string()))?;

        let networks = Networks::new_with_refreshed_list();
        let (network_sent, network_received) = networks
            .list()
            .values()
            .fold((0u64, 0u64), |(sent, recv), data| {
                (
                    sent + data.total_transmitted(),
                    recv + data.total_received(),
                )
            });

        let boot_time = DateTime::from_timestamp(System::boot_time() as i64, 0)
            .ok_or_else(|| ProbeError::Unavailable("invalid boot time".to_string()))?
            .with_timezone(&Local);

        Ok(SystemSnapshot {
            os_name: os_family().to_string(),
            os_release: System::kernel_version().unwrap_or_default(),
            arch: std::env::consts::ARCH.to_string(),
            host_name: System::host_name().unwrap_or_else(|| "unknown".to_string()),
            cpu_usage_percent,
            cpu_physical_cores: System::physical_core_count(),
            cpu_threads: cpus.len(),
            memory_total: sys.total_memory(),
            memory_available: sys.available_memory(),
            disk_mount: disk.mount_point().display().to_string(),
            disk_total: disk.total_space(),
            disk_free: disk.available_space(),
            network_sent,
            network_received,
            boot_time,
            uptime_secs: System::uptime(),
            user_count: logged_in_sessions(),
        })
    }
}

/// OS family in the usual capitalised form ("Linux", "Windows", "Darwin").
fn os_family() -> &'static str {
    match std::env::consts::OS {
        "linux" => "Linux",
        "windows" => "Windows",
        "macos" => "Darwin",
        "freebsd" => "FreeBSD",
        other => other,
    }
}

#[cfg(target_os = "linux")]
fn logged_in_sessions() -> Option<usize> {
    count_user_sessions(Path::new(UTMP_PATH))
}

#[cfg(not(target_os = "linux"))]
fn logged_in_sessions() -> Option<usize> {
    None
}

/// Number of `USER_PROCESS` records in a utmp file.
#[cfg(target_os = "linux")]
fn count_user_sessions(path: &Path) -> Option<usize> {
    match utmp_rs::parse_from_path(path) {
        Ok(entries) => Some(
            entries
                .iter()
                .filter(|entry| matches!(entry, utmp_rs::UtmpEntry::UserProcess { .. }))
                .count(),
        ),
        Err(e) => {
            tracing::debug!("Cannot read login sessions from {}: {}", path.display(), e);
            None
        }
    }
}
