use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{deserialize_nullable, validate_text};

/// 工作项名称最大长度
pub const WORK_ITEM_NAME_MAX_LEN: usize = 255;
/// 文本结果最大长度
pub const RESULT_TEXT_MAX_LEN: usize = 255;

/// 工作项种类（任务或检测）
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "work_item_kind_enum", rename_all = "PascalCase")]
pub enum WorkItemKind {
    /// 任务（合成、纯化等操作步骤）
    #[default]
    Task,
    /// 检测（QC 等测试）
    Test,
}

/// 工作项状态，与样本状态相互独立
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "work_item_status_enum")]
pub enum WorkItemStatus {
    /// 待处理
    #[default]
    Pending,
    /// 进行中
    #[sqlx(rename = "In Progress")]
    #[serde(rename = "In Progress")]
    InProgress,
    /// 审核中
    #[sqlx(rename = "In Review")]
    #[serde(rename = "In Review")]
    InReview,
    /// 已完成
    Completed,
}

/// 工作项优先级
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "work_item_priority_enum", rename_all = "PascalCase")]
pub enum WorkItemPriority {
    High,
    #[default]
    Medium,
    Low,
}

/// 工作项模型：针对某个样本的一个工作单元
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct WorkItem {
    pub id: Uuid,
    /// 所属样本的内部主键
    pub sample_id: Uuid,
    pub kind: WorkItemKind,
    pub name: String,
    pub status: WorkItemStatus,
    pub priority: WorkItemPriority,
    pub due_date: Option<NaiveDate>,
    /// 指派的分析员；用户被删除后为空
    pub analyst_id: Option<Uuid>,
    pub result_text: Option<String>,
    pub result_numeric: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 创建工作项请求
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateWorkItemRequest {
    pub name: String,
    pub kind: Option<WorkItemKind>,
    pub status: Option<WorkItemStatus>,
    pub priority: Option<WorkItemPriority>,
    pub due_date: Option<NaiveDate>,
    pub analyst_id: Option<Uuid>,
    pub result_text: Option<String>,
    pub result_numeric: Option<f64>,
}

impl CreateWorkItemRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_text("工作项名称", &self.name, WORK_ITEM_NAME_MAX_LEN)?;
        validate_results(self.result_text.as_deref(), self.result_numeric)
    }
}

/// 更新工作项请求（未提供的字段保持不变）
///
/// 可置空字段使用 `Option<Option<T>>`：外层为 `None` 表示未提供，
/// `Some(None)` 表示显式传入 `null` 以清空该字段。
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateWorkItemRequest {
    pub name: Option<String>,
    pub kind: Option<WorkItemKind>,
    pub status: Option<WorkItemStatus>,
    pub priority: Option<WorkItemPriority>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<String>, format = Date, nullable)]
    pub due_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<String>, format = Uuid, nullable)]
    pub analyst_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<String>, nullable)]
    pub result_text: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<f64>, nullable)]
    pub result_numeric: Option<Option<f64>>,
}

impl UpdateWorkItemRequest {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(name) = &self.name {
            validate_text("工作项名称", name, WORK_ITEM_NAME_MAX_LEN)?;
        }
        validate_results(
            self.result_text.as_ref().and_then(|v| v.as_deref()),
            self.result_numeric.flatten(),
        )
    }
}

/// 工作项查询过滤器（等值匹配）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkItemFilter {
    pub status: Option<WorkItemStatus>,
    pub priority: Option<WorkItemPriority>,
    pub analyst_id: Option<Uuid>,
}

fn validate_results(result_text: Option<&str>, result_numeric: Option<f64>) -> Result<(), String> {
    if let Some(text) = result_text {
        if text.chars().count() > RESULT_TEXT_MAX_LEN {
            return Err(format!("文本结果长度不能超过{}个字符", RESULT_TEXT_MAX_LEN));
        }
    }
    if let Some(value) = result_numeric {
        if !value.is_finite() {
            return Err("数值结果必须是有限数".to_string());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_labels_contain_spaces() {
        assert_eq!(
            serde_json::to_value(WorkItemStatus::InProgress).unwrap(),
            serde_json::json!("In Progress")
        );
        let status: WorkItemStatus = serde_json::from_str("\"In Review\"").unwrap();
        assert_eq!(status, WorkItemStatus::InReview);
    }

    #[test]
    fn test_create_request_defaults() {
        let request: CreateWorkItemRequest =
            serde_json::from_str(r#"{"name": "Purity QC", "kind": "Test"}"#).unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.kind, Some(WorkItemKind::Test));
        assert!(request.priority.is_none());
        assert_eq!(WorkItemPriority::default(), WorkItemPriority::Medium);
    }

    #[test]
    fn test_result_validation() {
        let update = UpdateWorkItemRequest {
            result_numeric: Some(Some(f64::NAN)),
            ..Default::default()
        };
        assert!(update.validate().is_err());

        let update = UpdateWorkItemRequest {
            result_text: Some(Some("x".repeat(RESULT_TEXT_MAX_LEN + 1))),
            ..Default::default()
        };
        assert!(update.validate().is_err());

        let update = UpdateWorkItemRequest {
            result_text: Some(Some("pass".to_string())),
            result_numeric: Some(Some(98.125)),
            ..Default::default()
        };
        assert!(update.validate().is_ok());
    }

    #[test]
    fn test_update_request_distinguishes_null_from_absent() {
        let update: UpdateWorkItemRequest =
            serde_json::from_str(r#"{"analyst_id": null, "result_numeric": 1.5}"#).unwrap();
        assert_eq!(update.analyst_id, Some(None));
        assert_eq!(update.result_numeric, Some(Some(1.5)));
        assert_eq!(update.due_date, None);
        assert_eq!(update.result_text, None);
        assert!(update.validate().is_ok());
    }
}
