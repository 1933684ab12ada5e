//! 请求提取器
//!
//! - [`auth`]：从 Bearer 令牌解析当前用户
//! - [`extract`]：将 JSON/查询/路径解析失败转换为统一的 400 响应

pub mod auth;
pub mod extract;

pub use auth::AuthUser;
pub use extract::{AppJson, AppPath, AppQuery};
