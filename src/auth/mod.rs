//! 认证原语
//!
//! - [`password`]：Argon2id 密码哈希与校验
//! - [`jwt`]：访问令牌签发与校验

pub mod jwt;
pub mod password;
