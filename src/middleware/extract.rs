use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// JSON 请求体提取器，解析失败返回统一格式的 400 响应
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// 查询参数提取器
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

/// 路径参数提取器（如非法的 UUID）
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);
