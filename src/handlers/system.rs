use crate::{docs::ApiDoc, handlers::AppState, response::ApiResponse};
use axum::{
    extract::{Query, State},
    response::{Html, Json},
};
use serde::Deserialize;
use std::collections::HashMap;
use utoipa::OpenApi;

#[derive(Debug, Default, Deserialize)]
pub struct HealthQuery {
    #[serde(default)]
    detail: bool,
}

/// 健康检查
#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    params(
        ("detail" = Option<bool>, Query, description = "是否返回版本与时间等详细信息")
    ),
    responses(
        (status = 200, description = "服务存活")
    )
)]
pub async fn health_check(Query(params): Query<HealthQuery>) -> Json<ApiResponse<serde_json::Value>> {
    if params.detail {
        let timestamp = chrono::Utc::now().to_rfc3339();
        let mut details = HashMap::new();
        details.insert("status", "healthy");
        details.insert("version", env!("CARGO_PKG_VERSION"));
        details.insert("timestamp", timestamp.as_str());

        Json(ApiResponse::success(serde_json::json!(details)))
    } else {
        Json(ApiResponse::success(serde_json::json!({"status": "ok"})))
    }
}

/// 数据库健康检查
#[utoipa::path(
    get,
    path = "/api/health/db",
    tag = "system",
    responses(
        (status = 200, description = "数据库连接正常"),
        (status = 503, description = "数据库不可用")
    )
)]
pub async fn db_health_check(
    State(app_state): State<AppState>,
) -> ApiResponse<serde_json::Value> {
    match &app_state.database {
        Some(db) => match db.health_check().await {
            Ok(true) => {
                let timestamp = chrono::Utc::now().to_rfc3339();
                let mut details = HashMap::new();
                details.insert("database", "healthy");
                details.insert("timestamp", timestamp.as_str());
                ApiResponse::success(serde_json::json!(details))
            }
            Ok(false) => ApiResponse::error_with_data(
                503,
                "数据库连接异常".to_string(),
                serde_json::json!({"status": "unhealthy"}),
            ),
            Err(e) => {
                tracing::error!("数据库健康检查失败: {}", e);
                ApiResponse::error_with_data(
                    503,
                    "数据库健康检查失败".to_string(),
                    serde_json::json!({"status": "error"}),
                )
            }
        },
        None => ApiResponse::error_with_data(
            503,
            "数据库未配置或连接失败".to_string(),
            serde_json::json!({"status": "unavailable"}),
        ),
    }
}

/// OpenAPI 文档
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Swagger UI 页面，加载 /api-docs/openapi.json
pub async fn swagger_ui_page() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset=UTF-8>
  <title>Limsly API 文档</title>
  <link rel=stylesheet href=https://cdn.jsdelivr.net/npm/swagger-ui-dist@5.11.0/swagger-ui.css>
  <style>
    body { margin: 0; font-family: Arial, sans-serif; }
  </style>
</head>
<body>
  <div id=swagger-ui></div>
  <script src=https://cdn.jsdelivr.net/npm/swagger-ui-dist@5.11.0/swagger-ui-bundle.js></script>
  <script>
    window.onload = function() {
      window.ui = SwaggerUIBundle({
        url: '/api-docs/openapi.json',
        dom_id: '#swagger-ui',
        deepLinking: true,
        validatorUrl: null
      });
    };
  </script>
</body>
</html>"#,
    )
}
