use crate::models::{
    AuditEntryView, CreateSampleRequest, CreateWorkItemRequest, LoginRequest, LoginResponse,
    RegisterRequest, SampleDetail, SampleStatus, UpdateSampleRequest, UpdateWorkItemRequest,
    UserProfile, WorkItem, WorkItemKind, WorkItemPriority, WorkItemStatus,
};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

/// Bearer 令牌认证方案
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        // 认证API
        crate::handlers::auth::register,
        crate::handlers::auth::login,
        crate::handlers::auth::current_user,
        // 样本管理API
        crate::handlers::samples::list_samples,
        crate::handlers::samples::create_sample,
        crate::handlers::samples::get_sample,
        crate::handlers::samples::update_sample,
        crate::handlers::samples::delete_sample,
        crate::handlers::samples::get_sample_audit_logs,
        // 工作项API
        crate::handlers::work_items::list_work_items,
        crate::handlers::work_items::create_work_item,
        crate::handlers::work_items::get_work_item,
        crate::handlers::work_items::update_work_item,
        crate::handlers::work_items::delete_work_item,
        // 系统监控
        crate::handlers::system::health_check,
        crate::handlers::system::db_health_check,
    ),
    components(
        schemas(
            // 用户相关模型
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            UserProfile,
            // 样本相关模型
            SampleStatus,
            SampleDetail,
            CreateSampleRequest,
            UpdateSampleRequest,
            AuditEntryView,
            // 工作项相关模型
            WorkItem,
            WorkItemKind,
            WorkItemStatus,
            WorkItemPriority,
            CreateWorkItemRequest,
            UpdateWorkItemRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "用户注册、登录与当前用户信息"),
        (name = "samples", description = "样本登记、查询、更新、删除与审计历史"),
        (name = "work-items", description = "样本下的任务与检测工作项"),
        (name = "system", description = "系统健康状态")
    ),
    info(
        title = "Limsly API",
        version = "1.0.0",
        description = "Limsly 实验室样本追踪系统 REST API 文档"
    ),
    servers(
        (url = "http://localhost:8080", description = "开发环境")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_document_lists_routes() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        assert!(paths.iter().any(|p| p.as_str() == "/api/samples"));
        assert!(paths.iter().any(|p| p.as_str() == "/api/samples/{id}/audit-logs"));
        assert!(paths.iter().any(|p| p.as_str() == "/api/auth/login"));
        assert!(paths.iter().any(|p| p.as_str() == "/api/samples/{id}/work-items"));
        assert!(
            paths
                .iter()
                .any(|p| p.as_str() == "/api/samples/{id}/work-items/{work_item_id}")
        );
        assert!(!paths.iter().any(|p| p.contains("sample_pk")));

        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
