// System status service - the private, admin-only host report.
//
// Who may see the report is decided here; collecting the numbers is left to a
// `SystemProbe` so the core never touches the OS directly.

use super::system_status_models::SystemSnapshot;
use crate::core::group_management::{InboundMessage, SettingsStore};
use async_trait::async_trait;
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;
use thiserror::Error;

/// Replies for non-admins, weighted 5:2:2:1.
const BRUSH_OFF_REPLIES: &[(&str, u32)] = &[
    ("切你是谁", 5),
    ("我不认识你", 2),
    ("你不是主人", 2),
    ("123起开", 1),
];

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("System information unavailable: {0}")]
    Unavailable(String),
}

/// Source of host telemetry.
#[async_trait]
pub trait SystemProbe: Send + Sync {
    async fn snapshot(&self) -> Result<SystemSnapshot, ProbeError>;
}

pub struct SystemStatusService<S: SettingsStore, P: SystemProbe> {
    store: Arc<S>,
    probe: P,
}

impl<S: SettingsStore, P: SystemProbe> SystemStatusService<S, P> {
    pub fn new(store: Arc<S>, probe: P) -> Self {
        Self { store, probe }
    }

    pub async fn handle(&self, message: &InboundMessage) -> String {
        if !self.store.global_settings().await.system_status_enabled {
            return "❌ 系统状态查询功能已被禁用".to_string();
        }

        if !message.is_private_chat() {
            return "请在私聊中使用该指令".to_string();
        }

        if !message.is_admin {
            return pick_brush_off(&mut rand::thread_rng()).to_string();
        }

        match self.probe.snapshot().await {
            Ok(snapshot) => snapshot.format_report(),
            Err(e) => {
                tracing::error!("Failed to collect system status: {}", e);
                "❌ 获取系统状态失败，请稍后再试".to_string()
            }
        }
    }
}

pub fn pick_brush_off<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    BRUSH_OFF_REPLIES
        .choose_weighted(rng, |(_, weight)| *weight)
        .map(|(reply, _)| *reply)
        .unwrap_or(BRUSH_OFF_REPLIES[0].0)
}
