use crate::handlers::{
    AppState, create_sample, create_work_item, current_user, db_health_check, delete_sample,
    delete_work_item, get_sample, get_sample_audit_logs, get_work_item, health_check,
    list_samples, list_work_items, login, register,
    system::{openapi_json, swagger_ui_page},
    update_sample, update_work_item,
};
use axum::{
    Router,
    http::{
        Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// 创建API路由
pub fn create_api_routes() -> Router<AppState> {
    Router::new()
        // 认证API
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/me", get(current_user))
        // 样本管理API
        .route("/api/samples", get(list_samples).post(create_sample))
        .route(
            "/api/samples/{id}",
            get(get_sample)
                .put(update_sample)
                .patch(update_sample)
                .delete(delete_sample),
        )
        .route("/api/samples/{id}/audit-logs", get(get_sample_audit_logs))
        // 工作项API
        .route(
            "/api/samples/{id}/work-items",
            get(list_work_items).post(create_work_item),
        )
        .route(
            "/api/samples/{id}/work-items/{work_item_id}",
            get(get_work_item)
                .put(update_work_item)
                .patch(update_work_item)
                .delete(delete_work_item),
        )
}

/// 创建完整应用：业务路由、健康检查、API 文档与中间件
pub fn create_app(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(vec![
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION]);

    Router::new()
        // 健康检查
        .route("/health", get(health_check))
        .route("/api/health/db", get(db_health_check))
        // API 文档
        .route("/api-docs/openapi.json", get(openapi_json))
        .route("/swagger-ui", get(swagger_ui_page))
        .route("/swagger-ui/", get(swagger_ui_page))
        // 业务API路由
        .merge(create_api_routes())
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
