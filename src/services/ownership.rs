use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::Sample;

/// 样本不存在与不属于请求者时的统一提示
pub const SAMPLE_NOT_FOUND: &str = "样本不存在";
/// 在不属于请求者的样本下创建工作项时的提示
pub const PARENT_NOT_OWNED: &str = "样本不存在或无权在该样本下创建工作项";

/// 归属检查
///
/// 只有样本的所有者可以查看或修改样本；所有者被删除后样本不属于任何人。
/// 工作项与审计记录通过父样本间接受保护。
pub struct OwnershipGuard;

impl OwnershipGuard {
    pub fn owns(sample: &Sample, user_id: Uuid) -> bool {
        sample.owner_id == Some(user_id)
    }

    /// 样本不存在或不属于请求者时返回 404，两种情况不可区分
    pub fn require_owned(sample: Option<Sample>, user_id: Uuid) -> AppResult<Sample> {
        match sample {
            Some(sample) if Self::owns(&sample, user_id) => Ok(sample),
            _ => Err(AppError::not_found(SAMPLE_NOT_FOUND)),
        }
    }

    /// 创建工作项前检查父样本，不满足时返回验证错误
    pub fn require_parent_for_create(sample: Option<Sample>, user_id: Uuid) -> AppResult<Sample> {
        match sample {
            Some(sample) if Self::owns(&sample, user_id) => Ok(sample),
            _ => Err(AppError::validation(PARENT_NOT_OWNED)),
        }
    }
}
