use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::validate_text;

/// 用户名最大长度
pub const USERNAME_MAX_LEN: usize = 150;
/// 邮箱最大长度
pub const EMAIL_MAX_LEN: usize = 254;

/// 用户模型（包含密码哈希，不直接对外序列化）
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// 对外公开的用户信息（不含凭证）
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

/// 用户注册请求
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    /// 明文密码，仅用于写入
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(&self, min_password_length: usize) -> Result<(), String> {
        validate_text("用户名", &self.username, USERNAME_MAX_LEN)?;
        if self.username.trim() != self.username {
            return Err("用户名不能包含首尾空白".to_string());
        }
        validate_text("邮箱", &self.email, EMAIL_MAX_LEN)?;
        match self.email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
            _ => return Err("邮箱格式不正确".to_string()),
        }
        if self.password.chars().count() < min_password_length {
            return Err(format!("密码长度不能少于{}个字符", min_password_length));
        }
        Ok(())
    }
}

/// 登录请求
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// 登录响应
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    /// 固定为 "Bearer"
    pub token_type: String,
    /// 访问令牌有效期（秒）
    pub expires_in: i64,
    pub user: UserProfile,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(username: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_register_validation() {
        assert!(request("alice", "alice@lab.test", "s3cret-pass").validate(8).is_ok());
        assert!(request("", "alice@lab.test", "s3cret-pass").validate(8).is_err());
        assert!(request(" alice", "alice@lab.test", "s3cret-pass").validate(8).is_err());
        assert!(request("alice", "alice.lab.test", "s3cret-pass").validate(8).is_err());
        assert!(request("alice", "@lab.test", "s3cret-pass").validate(8).is_err());
        assert!(request("alice", "alice@lab.test", "short").validate(8).is_err());
    }

    #[test]
    fn test_profile_has_no_credentials() {
        let user = User {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            email: "alice@lab.test".to_string(),
            password_hash: "$argon2id$...".to_string(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(UserProfile::from(&user)).unwrap();
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 3);
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "alice");
    }
}
