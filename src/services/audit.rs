use async_trait::async_trait;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::SampleStatus;
use crate::repositories::AuditRepository;
use crate::services::hooks::{SampleEvent, SampleHook};

/// 样本创建时的审计文本
pub const REGISTERED_ACTION: &str = "Sample registered.";

/// 审计记录器
///
/// 样本创建时追加一条记录；样本更新时仅在状态实际变化时追加一条记录。
/// 工作项的变更不产生审计记录。
#[derive(Debug, Clone, Copy, Default)]
pub struct AuditRecorder;

impl AuditRecorder {
    /// 状态变化的审计文本；状态未变化时为 None
    pub fn transition_action(before: SampleStatus, after: SampleStatus) -> Option<String> {
        (before != after).then(|| format!("Status changed from '{}' to '{}'.", before, after))
    }
}

#[async_trait]
impl SampleHook for AuditRecorder {
    fn name(&self) -> &'static str {
        "audit"
    }

    async fn on_sample_event(
        &self,
        conn: &mut PgConnection,
        actor_id: Uuid,
        event: SampleEvent<'_>,
    ) -> AppResult<()> {
        let (sample_id, action) = match event {
            SampleEvent::Registered { sample } => (sample.id, REGISTERED_ACTION.to_string()),
            SampleEvent::Updated { before, after } => {
                match Self::transition_action(before.status, after.status) {
                    Some(action) => (after.id, action),
                    None => return Ok(()),
                }
            }
        };

        let entry = AuditRepository::append(conn, sample_id, Some(actor_id), &action).await?;
        tracing::info!(
            sample_id = %sample_id,
            actor_id = %actor_id,
            audit_id = %entry.id,
            "{}",
            action
        );
        Ok(())
    }
}
