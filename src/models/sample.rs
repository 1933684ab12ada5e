use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{AuditEntryView, WorkItem, validate_text};

/// 外部样本编号最大长度
pub const SAMPLE_ID_MAX_LEN: usize = 100;
/// 样本名称最大长度
pub const SAMPLE_NAME_MAX_LEN: usize = 255;

/// 样本生命周期状态（不强制流转顺序）
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "sample_status_enum", rename_all = "PascalCase")]
pub enum SampleStatus {
    /// 已接收
    #[default]
    Received,
    /// 处理中
    Processing,
    /// 已分析
    Analyzed,
    /// 已完成
    Complete,
}

impl SampleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SampleStatus::Received => "Received",
            SampleStatus::Processing => "Processing",
            SampleStatus::Analyzed => "Analyzed",
            SampleStatus::Complete => "Complete",
        }
    }
}

impl fmt::Display for SampleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 样本模型
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Sample {
    /// 内部主键（UUID v4）
    pub id: Uuid,
    /// 外部提供的样本编号，全局唯一
    pub sample_id: String,
    /// 显示名称
    pub name: String,
    /// 所有者；所有者被删除后为空
    pub owner_id: Option<Uuid>,
    /// 生命周期状态
    pub status: SampleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 创建样本请求
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateSampleRequest {
    pub sample_id: String,
    pub name: String,
    /// 缺省为 Received
    pub status: Option<SampleStatus>,
}

impl CreateSampleRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_text("样本编号", &self.sample_id, SAMPLE_ID_MAX_LEN)?;
        validate_text("样本名称", &self.name, SAMPLE_NAME_MAX_LEN)
    }
}

/// 更新样本请求（未提供的字段保持不变）
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateSampleRequest {
    pub sample_id: Option<String>,
    pub name: Option<String>,
    pub status: Option<SampleStatus>,
}

impl UpdateSampleRequest {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(sample_id) = &self.sample_id {
            validate_text("样本编号", sample_id, SAMPLE_ID_MAX_LEN)?;
        }
        if let Some(name) = &self.name {
            validate_text("样本名称", name, SAMPLE_NAME_MAX_LEN)?;
        }
        Ok(())
    }
}

/// 样本查询过滤器
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SampleFilter {
    pub status: Option<SampleStatus>,
    /// 对样本编号和名称进行不区分大小写的模糊匹配
    pub search: Option<String>,
}

/// 样本详情（包含审计历史，可选包含工作项）
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SampleDetail {
    pub id: Uuid,
    pub sample_id: String,
    pub name: String,
    pub owner_username: Option<String>,
    pub status: SampleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// 按创建时间升序排列
    pub audit_logs: Vec<AuditEntryView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_items: Option<Vec<WorkItem>>,
}

impl SampleDetail {
    pub fn assemble(
        sample: Sample,
        owner_username: Option<String>,
        audit_logs: Vec<AuditEntryView>,
        work_items: Option<Vec<WorkItem>>,
    ) -> Self {
        Self {
            id: sample.id,
            sample_id: sample.sample_id,
            name: sample.name,
            owner_username,
            status: sample.status,
            created_at: sample.created_at,
            updated_at: sample.updated_at,
            audit_logs,
            work_items,
        }
    }
}
