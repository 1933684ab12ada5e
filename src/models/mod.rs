pub mod audit;
pub mod sample;
pub mod user;
pub mod work_item;

pub use audit::*;
pub use sample::*;
pub use user::*;
pub use work_item::*;

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// 每页最大数量
pub const MAX_PAGE_SIZE: u32 = 100;
/// 默认每页数量
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// 分页参数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    /// 根据查询参数构建分页，页码最小为1，每页数量限制在 1..=100
    pub fn from_params(page: Option<u32>, page_size: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            page_size: page_size
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.page_size as i64
    }

    pub fn limit(&self) -> i64 {
        self.page_size as i64
    }
}

/// 分页结果
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

impl<T> PagedResult<T> {
    pub fn new(items: Vec<T>, total: i64, page: u32, page_size: u32) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            ((total as f64) / (page_size as f64)).ceil() as u32
        };

        Self {
            items,
            total,
            page,
            page_size,
            total_pages,
        }
    }

    /// 转换结果项，保留分页信息
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PagedResult<U> {
        PagedResult {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            page_size: self.page_size,
            total_pages: self.total_pages,
        }
    }
}

/// 校验必填文本字段：去除首尾空白后非空且不超过最大长度
pub(crate) fn validate_text(field: &str, value: &str, max_len: usize) -> Result<(), String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("{}不能为空", field));
    }
    if trimmed.chars().count() > max_len {
        return Err(format!("{}长度不能超过{}个字符", field, max_len));
    }
    Ok(())
}

/// 可置空字段的反序列化：缺省为 `None`，显式 `null` 为 `Some(None)`
///
/// 需与 `#[serde(default)]` 一起使用。
pub(crate) fn deserialize_nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
