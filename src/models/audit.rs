use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// 审计日志记录（只追加，不可修改）
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AuditEntry {
    pub id: Uuid,
    /// 所属样本的内部主键
    pub sample_id: Uuid,
    /// 操作者；用户被删除后为空
    pub actor_id: Option<Uuid>,
    /// 可读的操作描述
    pub action: String,
    pub timestamp: DateTime<Utc>,
}

/// 嵌入样本详情中的审计日志视图
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AuditEntryView {
    pub id: Uuid,
    #[serde(skip)]
    pub sample_id: Uuid,
    pub actor_username: Option<String>,
    pub action: String,
    pub timestamp: DateTime<Utc>,
}
