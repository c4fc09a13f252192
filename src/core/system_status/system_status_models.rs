use chrono::{DateTime, Local};

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;
const MIB: f64 = 1024.0 * 1024.0;
const UNKNOWN: &str = "未知";

/// A point-in-time view of the host, as reported by a `SystemProbe`.
///
/// Sizes are in bytes; the report converts them.
#[derive(Debug, Clone)]
pub struct SystemSnapshot {
    pub os_name: String,
    pub os_release: String,
    pub arch: String,
    pub host_name: String,
    pub cpu_usage_percent: f32,
    pub cpu_physical_cores: Option<usize>,
    pub cpu_threads: usize,
    pub memory_total: u64,
    pub memory_available: u64,
    pub disk_mount: String,
    pub disk_total: u64,
    pub disk_free: u64,
    pub network_sent: u64,
    pub network_received: u64,
    pub boot_time: DateTime<Local>,
    pub uptime_secs: u64,
    /// Logged-in sessions, `None` where the host keeps no session records
    pub user_count: Option<usize>,
}

impl SystemSnapshot {
    pub fn memory_usage_percent(&self) -> f64 {
        used_percent(self.memory_total, self.memory_available)
    }

    pub fn disk_usage_percent(&self) -> f64 {
        used_percent(self.disk_total, self.disk_free)
    }

    /// Render the admin-facing status message.
    pub fn format_report(&self) -> String {
        format!(
            "📊 系统状态信息：\n\n\
             💻 系统信息：{} {} ({})\n\
             🏷️ 主机名：{}\n\n\
             🔋 CPU状态：\n\
             \x20 - 使用率：{:.1}%\n\
             \x20 - 物理核心：{}\n\
             \x20 - 线程数：{} 线程\n\n\
             🧠 内存状态：\n\
             \x20 - 使用率：{:.1}%\n\
             \x20 - 总容量：{:.2} GB\n\
             \x20 - 可用容量：{:.2} GB\n\n\
             💽 磁盘状态 ({})：\n\
             \x20 - 使用率：{:.1}%\n\
             \x20 - 总容量：{:.2} GB\n\
             \x20 - 可用容量：{:.2} GB\n\n\
             📡 网络流量：\n\
             \x20 - 已发送：{:.2} MB\n\
             \x20 - 已接收：{:.2} MB\n\n\
             ⏱️ 系统时间：\n\
             \x20 - 启动时间：{}\n\
             \x20 - 运行时间：{}\n\n\
             👥 当前用户数：{}",
            self.os_name,
            self.os_release,
            self.arch,
            self.host_name,
            self.cpu_usage_percent,
            self.cpu_physical_cores
                .map_or_else(|| UNKNOWN.to_string(), |n| format!("{} 核", n)),
            self.cpu_threads,
            self.memory_usage_percent(),
            self.memory_total as f64 / GIB,
            self.memory_available as f64 / GIB,
            self.disk_mount,
            self.disk_usage_percent(),
            self.disk_total as f64 / GIB,
            self.disk_free as f64 / GIB,
            self.network_sent as f64 / MIB,
            self.network_received as f64 / MIB,
            self.boot_time.format("%Y-%m-%d %H:%M:%S"),
            format_uptime(self.uptime_secs),
            self.user_count
                .map_or_else(|| UNKNOWN.to_string(), |n| n.to_string()),
        )
    }
}

fn used_percent(total: u64, free: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    total.saturating_sub(free) as f64 / total as f64 * 100.0
}

/// `H:MM:SS`, prefixed with `N day(s), ` once the uptime passes a day.
pub fn format_uptime(secs: u64) -> String {
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let minutes = (secs % 3_600) / 60;
    let seconds = secs % 60;
    let clock = format!("{}:{:02}:{:02}", hours, minutes, seconds);

    match days {
        0 => clock,
        1 => format!("1 day, {}", clock),
        n => format!("{} days, {}", n, clock),
    }
}
