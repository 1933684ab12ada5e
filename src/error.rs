use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::response::{ApiResponse, ResponseCode};

/// Postgres SQLSTATE：唯一约束冲突
const PG_UNIQUE_VIOLATION: &str = "23505";
/// Postgres SQLSTATE：外键约束冲突
const PG_FOREIGN_KEY_VIOLATION: &str = "23503";

/// 应用程序错误类型
#[derive(Error, Debug)]
pub enum AppError {
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),

    #[error("数据库迁移错误: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("配置错误: {0}")]
    Config(String),

    #[error("验证错误: {0}")]
    Validation(String),

    #[error("未认证: {0}")]
    Unauthorized(String),

    #[error("内部错误: {0}")]
    Internal(#[from] anyhow::Error),

    #[error("请求参数错误: {0}")]
    BadRequest(String),

    #[error("资源不存在: {resource}")]
    NotFound { resource: String },
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (code, message) = match &self {
            AppError::Database(_) | AppError::Migration(_) => {
                (ResponseCode::DATABASE_ERROR, "数据库错误".to_string())
            }
            AppError::Serialization(_) => {
                (ResponseCode::INTERNAL_ERROR, "数据序列化错误".to_string())
            }
            AppError::Io(_) => (ResponseCode::INTERNAL_ERROR, "文件IO错误".to_string()),
            AppError::Config(_) => (ResponseCode::INTERNAL_ERROR, "配置错误".to_string()),
            AppError::Validation(msg) => (ResponseCode::BAD_REQUEST, msg.clone()),
            AppError::Unauthorized(msg) => (ResponseCode::UNAUTHORIZED, msg.clone()),
            AppError::Internal(_) => (ResponseCode::INTERNAL_ERROR, "服务器内部错误".to_string()),
            AppError::BadRequest(msg) => (ResponseCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound { resource } => (ResponseCode::NOT_FOUND, resource.clone()),
        };

        if self.is_client_error() {
            tracing::warn!("请求被拒绝: {}", self);
        } else {
            tracing::error!("应用错误: {}", self);
        }

        ApiResponse::<()>::error(code, message).into_response()
    }
}

/// 应用程序Result类型别名
pub type AppResult<T> = Result<T, AppError>;

/// 错误构造辅助函数
impl AppError {
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(resource: T) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    pub fn unauthorized<T: Into<String>>(msg: T) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn service_unavailable<T: Into<String>>(msg: T) -> Self {
        Self::Internal(anyhow::anyhow!(msg.into()))
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        Self::Config(msg.into())
    }

    /// 客户端可纠正的错误（4xx）
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_)
                | AppError::Unauthorized(_)
                | AppError::BadRequest(_)
                | AppError::NotFound { .. }
        )
    }

    /// 将唯一约束冲突转换为验证错误，其余数据库错误原样返回
    pub fn unique_violation(err: sqlx::Error, message: &str) -> Self {
        if constraint_code(&err).as_deref() == Some(PG_UNIQUE_VIOLATION) {
            Self::Validation(message.to_string())
        } else {
            Self::Database(err)
        }
    }

    /// 将外键约束冲突转换为验证错误，其余数据库错误原样返回
    pub fn foreign_key_violation(err: sqlx::Error, message: &str) -> Self {
        if constraint_code(&err).as_deref() == Some(PG_FOREIGN_KEY_VIOLATION) {
            Self::Validation(message.to_string())
        } else {
            Self::Database(err)
        }
    }
}

fn constraint_code(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().map(|code| code.into_owned()),
        _ => None,
    }
}
