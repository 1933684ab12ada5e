use crate::{
    error::AppError,
    handlers::AppState,
    middleware::{AppJson, AuthUser},
    models::{LoginRequest, LoginResponse, RegisterRequest, UserProfile},
    response::ApiResponse,
};
use axum::{extract::State, response::Json};

/// 用户注册
///
/// 用户名与邮箱均需唯一，密码以 Argon2id 哈希保存。
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "注册成功", body = UserProfile),
        (status = 400, description = "参数错误或用户名/邮箱已被注册"),
        (status = 500, description = "服务器内部错误")
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    AppJson(request): AppJson<RegisterRequest>,
) -> Result<Json<ApiResponse<UserProfile>>, AppError> {
    let profile = app_state.account_service()?.register(request).await?;
    Ok(Json(ApiResponse::success_with_message(
        profile,
        "注册成功".to_string(),
    )))
}

/// 用户登录
///
/// 校验用户名和密码，返回 Bearer 访问令牌。
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "登录成功", body = LoginResponse),
        (status = 401, description = "用户名或密码错误"),
        (status = 500, description = "服务器内部错误")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    AppJson(request): AppJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, AppError> {
    let response = app_state.account_service()?.login(request).await?;
    Ok(Json(ApiResponse::success(response)))
}

/// 当前用户信息（仅包含ID、用户名和邮箱）
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "查询成功", body = UserProfile),
        (status = 401, description = "未认证")
    )
)]
pub async fn current_user(user: AuthUser) -> Json<ApiResponse<UserProfile>> {
    Json(ApiResponse::success(user.profile()))
}
