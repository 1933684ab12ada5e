use crate::{
    error::AppError,
    handlers::AppState,
    middleware::{AppJson, AppPath, AppQuery, AuthUser},
    models::{
        AuditEntryView, CreateSampleRequest, PagedResult, Pagination, SampleDetail, SampleFilter,
        SampleStatus, UpdateSampleRequest,
    },
    response::ApiResponse,
};
use axum::{extract::State, response::Json};
use serde::Deserialize;
use uuid::Uuid;

/// 样本列表查询参数
#[derive(Debug, Default, Deserialize)]
pub struct SampleQueryParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub status: Option<SampleStatus>,
    pub search: Option<String>,
}

/// 样本详情查询参数
#[derive(Debug, Default, Deserialize)]
pub struct SampleDetailQuery {
    #[serde(default)]
    pub include_work_items: bool,
}

/// 获取样本列表
///
/// 仅返回请求者拥有的样本，按登记时间倒序分页，每个样本附带审计历史。
#[utoipa::path(
    get,
    path = "/api/samples",
    tag = "samples",
    security(("bearer_auth" = [])),
    params(
        ("page" = Option<u32>, Query, description = "页码，从1开始，默认为1"),
        ("page_size" = Option<u32>, Query, description = "每页数量，默认20，最大100"),
        ("status" = Option<String>, Query, description = "状态筛选：Received、Processing、Analyzed 或 Complete"),
        ("search" = Option<String>, Query, description = "样本编号或名称模糊查询，不区分大小写")
    ),
    responses(
        (status = 200, description = "查询成功"),
        (status = 401, description = "未认证"),
        (status = 500, description = "服务器内部错误")
    )
)]
pub async fn list_samples(
    State(app_state): State<AppState>,
    user: AuthUser,
    AppQuery(params): AppQuery<SampleQueryParams>,
) -> Result<Json<ApiResponse<PagedResult<SampleDetail>>>, AppError> {
    let pagination = Pagination::from_params(params.page, params.page_size);
    let filter = SampleFilter {
        status: params.status,
        search: params.search,
    };

    let result = app_state
        .sample_service()?
        .list(&user, &filter, &pagination)
        .await?;

    Ok(Json(ApiResponse::success(result)))
}

/// 登记样本
///
/// 样本归属于请求者，并自动生成一条 "Sample registered." 审计记录。
#[utoipa::path(
    post,
    path = "/api/samples",
    tag = "samples",
    security(("bearer_auth" = [])),
    request_body = CreateSampleRequest,
    responses(
        (status = 200, description = "登记成功", body = SampleDetail),
        (status = 400, description = "参数错误或样本编号已存在"),
        (status = 401, description = "未认证"),
        (status = 500, description = "服务器内部错误")
    )
)]
pub async fn create_sample(
    State(app_state): State<AppState>,
    user: AuthUser,
    AppJson(request): AppJson<CreateSampleRequest>,
) -> Result<Json<ApiResponse<SampleDetail>>, AppError> {
    let sample = app_state.sample_service()?.create(&user, request).await?;
    Ok(Json(ApiResponse::success_with_message(
        sample,
        "样本登记成功".to_string(),
    )))
}

/// 获取样本详情
///
/// 样本不存在或不属于请求者时均返回 404。
#[utoipa::path(
    get,
    path = "/api/samples/{id}",
    tag = "samples",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "样本内部ID（UUID格式）"),
        ("include_work_items" = Option<bool>, Query, description = "是否同时返回工作项，默认 false")
    ),
    responses(
        (status = 200, description = "查询成功", body = SampleDetail),
        (status = 401, description = "未认证"),
        (status = 404, description = "样本不存在"),
        (status = 500, description = "服务器内部错误")
    )
)]
pub async fn get_sample(
    State(app_state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
    AppQuery(params): AppQuery<SampleDetailQuery>,
) -> Result<Json<ApiResponse<SampleDetail>>, AppError> {
    let sample = app_state
        .sample_service()?
        .get(&user, id, params.include_work_items)
        .await?;
    Ok(Json(ApiResponse::success(sample)))
}

/// 更新样本（PUT 与 PATCH 均为部分更新）
///
/// 仅当状态实际变化时追加一条审计记录。
#[utoipa::path(
    put,
    path = "/api/samples/{id}",
    tag = "samples",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "样本内部ID（UUID格式）")
    ),
    request_body(
        content = UpdateSampleRequest,
        description = "要更新的样本信息，未提供的字段保持不变",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "更新成功", body = SampleDetail),
        (status = 400, description = "参数错误或样本编号已存在"),
        (status = 401, description = "未认证"),
        (status = 404, description = "样本不存在"),
        (status = 500, description = "服务器内部错误")
    )
)]
pub async fn update_sample(
    State(app_state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(request): AppJson<UpdateSampleRequest>,
) -> Result<Json<ApiResponse<SampleDetail>>, AppError> {
    let sample = app_state.sample_service()?.update(&user, id, request).await?;
    Ok(Json(ApiResponse::success(sample)))
}

/// 删除样本
///
/// 样本下的工作项与审计历史一并删除。
#[utoipa::path(
    delete,
    path = "/api/samples/{id}",
    tag = "samples",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "样本内部ID（UUID格式）")
    ),
    responses(
        (status = 200, description = "删除成功"),
        (status = 401, description = "未认证"),
        (status = 404, description = "样本不存在"),
        (status = 500, description = "服务器内部错误")
    )
)]
pub async fn delete_sample(
    State(app_state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    app_state.sample_service()?.delete(&user, id).await?;
    Ok(Json(ApiResponse::success(())))
}

/// 获取样本审计历史（只读）
#[utoipa::path(
    get,
    path = "/api/samples/{id}/audit-logs",
    tag = "samples",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "样本内部ID（UUID格式）")
    ),
    responses(
        (status = 200, description = "查询成功", body = Vec<AuditEntryView>),
        (status = 401, description = "未认证"),
        (status = 404, description = "样本不存在"),
        (status = 500, description = "服务器内部错误")
    )
)]
pub async fn get_sample_audit_logs(
    State(app_state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<ApiResponse<Vec<AuditEntryView>>>, AppError> {
    let logs = app_state.sample_service()?.audit_log(&user, id).await?;
    Ok(Json(ApiResponse::success(logs)))
}
