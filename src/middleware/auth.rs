//! 基于 JWT Bearer 令牌的认证提取器

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::handlers::AppState;
use crate::models::UserProfile;
use crate::repositories::UserRepository;

/// 当前已认证用户
///
/// 在处理器参数中声明即要求认证：
///
/// ```ignore
/// async fn handler(user: AuthUser) -> Result<Json<ApiResponse<()>>, AppError> { ... }
/// ```
///
/// 令牌缺失、格式错误、签名无效、已过期或用户已被删除时均返回 401，
/// 此时不会进入任何归属检查或数据访问。
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

impl AuthUser {
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("缺少认证信息"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::unauthorized("认证格式错误，应为: Bearer <token>"))?;

        let claims = validate_token(token, &state.jwt)
            .map_err(|_| AppError::unauthorized("令牌无效或已过期"))?;

        let database = state
            .database
            .as_ref()
            .ok_or_else(|| AppError::service_unavailable("数据库服务不可用"))?;

        let user = UserRepository::new(database.clone())
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| AppError::unauthorized("用户不存在"))?;

        Ok(AuthUser {
            id: user.id,
            username: user.username,
            email: user.email,
        })
    }
}
