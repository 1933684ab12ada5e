use std::sync::Arc;

use crate::{
    auth::{
        jwt::{JwtConfig, generate_access_token},
        password::{hash_password, verify_password},
    },
    database::Database,
    error::{AppError, AppResult},
    models::{LoginRequest, LoginResponse, RegisterRequest, UserProfile},
    repositories::UserRepository,
    services::hooks::UserHookChain,
};

/// 用户名或密码错误时的统一提示
const INVALID_CREDENTIALS: &str = "用户名或密码错误";

/// 账户服务：注册、登录
pub struct AccountService {
    db: Database,
    users: UserRepository,
    jwt: JwtConfig,
    min_password_length: usize,
    hooks: Arc<UserHookChain>,
}

impl AccountService {
    pub fn new(
        db: Database,
        jwt: JwtConfig,
        min_password_length: usize,
        hooks: Arc<UserHookChain>,
    ) -> Self {
        Self {
            users: UserRepository::new(db.clone()),
            db,
            jwt,
            min_password_length,
            hooks,
        }
    }

    /// 注册新用户，用户写入与注册钩子在同一事务中完成
    pub async fn register(&self, request: RegisterRequest) -> AppResult<UserProfile> {
        request
            .validate(self.min_password_length)
            .map_err(AppError::validation)?;

        let password_hash = hash_password(&request.password)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("密码哈希失败: {}", e)))?;

        let mut tx = self.db.pool().begin().await?;
        let user = UserRepository::create(
            &mut *tx,
            &request.username,
            request.email.trim(),
            &password_hash,
        )
        .await?;
        self.hooks.run(&mut *tx, &user).await?;
        tx.commit().await?;

        tracing::info!(user_id = %user.id, username = %user.username, "新用户注册成功");
        Ok(UserProfile::from(&user))
    }

    /// 校验用户名与密码并签发访问令牌
    pub async fn login(&self, request: LoginRequest) -> AppResult<LoginResponse> {
        let user = self
            .users
            .find_by_username(&request.username)
            .await?
            .ok_or_else(|| AppError::unauthorized(INVALID_CREDENTIALS))?;

        let valid = verify_password(&request.password, &user.password_hash)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("密码校验失败: {}", e)))?;
        if !valid {
            tracing::warn!(username = %request.username, "登录失败: 密码错误");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        let access_token = generate_access_token(user.id, &user.username, &self.jwt)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("令牌签发失败: {}", e)))?;

        tracing::info!(user_id = %user.id, "用户登录成功");
        Ok(LoginResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt.expires_in_secs(),
            user: UserProfile::from(&user),
        })
    }
}
