use crate::{
    error::AppError,
    handlers::AppState,
    middleware::{AppJson, AppPath, AppQuery, AuthUser},
    models::{
        CreateWorkItemRequest, UpdateWorkItemRequest, WorkItem, WorkItemFilter, WorkItemPriority,
        WorkItemStatus,
    },
    response::ApiResponse,
};
use axum::{extract::State, response::Json};
use serde::Deserialize;
use uuid::Uuid;

/// 工作项列表查询参数
#[derive(Debug, Default, Deserialize)]
pub struct WorkItemQueryParams {
    pub status: Option<WorkItemStatus>,
    pub priority: Option<WorkItemPriority>,
    pub analyst_id: Option<Uuid>,
}

/// 获取样本下的工作项列表
///
/// 样本不属于请求者时返回空列表。
#[utoipa::path(
    get,
    path = "/api/samples/{id}/work-items",
    tag = "work-items",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "父样本内部ID"),
        ("status" = Option<String>, Query, description = "状态筛选：Pending、In Progress、In Review 或 Completed"),
        ("priority" = Option<String>, Query, description = "优先级筛选：High、Medium 或 Low"),
        ("analyst_id" = Option<Uuid>, Query, description = "指派的分析员ID")
    ),
    responses(
        (status = 200, description = "查询成功", body = Vec<WorkItem>),
        (status = 401, description = "未认证"),
        (status = 500, description = "服务器内部错误")
    )
)]
pub async fn list_work_items(
    State(app_state): State<AppState>,
    user: AuthUser,
    AppPath(sample_pk): AppPath<Uuid>,
    AppQuery(params): AppQuery<WorkItemQueryParams>,
) -> Result<Json<ApiResponse<Vec<WorkItem>>>, AppError> {
    let filter = WorkItemFilter {
        status: params.status,
        priority: params.priority,
        analyst_id: params.analyst_id,
    };

    let items = app_state
        .work_item_service()?
        .list(&user, sample_pk, &filter)
        .await?;
    Ok(Json(ApiResponse::success(items)))
}

/// 在样本下创建工作项
///
/// 父样本不存在或不属于请求者时返回 400，不会创建任何工作项。
#[utoipa::path(
    post,
    path = "/api/samples/{id}/work-items",
    tag = "work-items",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "父样本内部ID")
    ),
    request_body = CreateWorkItemRequest,
    responses(
        (status = 200, description = "创建成功", body = WorkItem),
        (status = 400, description = "参数错误、父样本无权访问或分析员不存在"),
        (status = 401, description = "未认证"),
        (status = 500, description = "服务器内部错误")
    )
)]
pub async fn create_work_item(
    State(app_state): State<AppState>,
    user: AuthUser,
    AppPath(sample_pk): AppPath<Uuid>,
    AppJson(request): AppJson<CreateWorkItemRequest>,
) -> Result<Json<ApiResponse<WorkItem>>, AppError> {
    let item = app_state
        .work_item_service()?
        .create(&user, sample_pk, request)
        .await?;
    Ok(Json(ApiResponse::success_with_message(
        item,
        "工作项创建成功".to_string(),
    )))
}

/// 获取工作项详情
#[utoipa::path(
    get,
    path = "/api/samples/{id}/work-items/{work_item_id}",
    tag = "work-items",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "父样本内部ID"),
        ("work_item_id" = Uuid, Path, description = "工作项ID")
    ),
    responses(
        (status = 200, description = "查询成功", body = WorkItem),
        (status = 401, description = "未认证"),
        (status = 404, description = "工作项不存在"),
        (status = 500, description = "服务器内部错误")
    )
)]
pub async fn get_work_item(
    State(app_state): State<AppState>,
    user: AuthUser,
    AppPath((sample_pk, id)): AppPath<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<WorkItem>>, AppError> {
    let item = app_state
        .work_item_service()?
        .get(&user, sample_pk, id)
        .await?;
    Ok(Json(ApiResponse::success(item)))
}

/// 更新工作项（PUT 与 PATCH 均为部分更新）
#[utoipa::path(
    put,
    path = "/api/samples/{id}/work-items/{work_item_id}",
    tag = "work-items",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "父样本内部ID"),
        ("work_item_id" = Uuid, Path, description = "工作项ID")
    ),
    request_body = UpdateWorkItemRequest,
    responses(
        (status = 200, description = "更新成功", body = WorkItem),
        (status = 400, description = "参数错误或分析员不存在"),
        (status = 401, description = "未认证"),
        (status = 404, description = "工作项不存在"),
        (status = 500, description = "服务器内部错误")
    )
)]
pub async fn update_work_item(
    State(app_state): State<AppState>,
    user: AuthUser,
    AppPath((sample_pk, id)): AppPath<(Uuid, Uuid)>,
    AppJson(request): AppJson<UpdateWorkItemRequest>,
) -> Result<Json<ApiResponse<WorkItem>>, AppError> {
    let item = app_state
        .work_item_service()?
        .update(&user, sample_pk, id, request)
        .await?;
    Ok(Json(ApiResponse::success(item)))
}

/// 删除工作项
#[utoipa::path(
    delete,
    path = "/api/samples/{id}/work-items/{work_item_id}",
    tag = "work-items",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "父样本内部ID"),
        ("work_item_id" = Uuid, Path, description = "工作项ID")
    ),
    responses(
        (status = 200, description = "删除成功"),
        (status = 401, description = "未认证"),
        (status = 404, description = "工作项不存在"),
        (status = 500, description = "服务器内部错误")
    )
)]
pub async fn delete_work_item(
    State(app_state): State<AppState>,
    user: AuthUser,
    AppPath((sample_pk, id)): AppPath<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    app_state
        .work_item_service()?
        .delete(&user, sample_pk, id)
        .await?;
    Ok(Json(ApiResponse::success(())))
}
