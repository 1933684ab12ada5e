#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::ServiceExt;

use limsly_backend::config::Config;
use limsly_backend::database::Database;
use limsly_backend::handlers::AppState;
use limsly_backend::repositories::UserRepository;
use limsly_backend::routes::create_app;
use limsly_backend::services::{SampleHookChain, UserHookChain};

pub const PASSWORD: &str = "correct-horse-battery";

/// 测试配置：固定的 JWT 密钥，关闭注册通知
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.auth.jwt_secret = "integration-test-secret-0123456789".to_string();
    config
}

/// 使用给定连接池构建与生产一致的完整路由
pub fn build_test_app(pool: PgPool) -> Router {
    create_app(AppState::new(
        Some(Database::from_pool(pool)),
        test_config(),
    ))
}

/// 使用自定义样本钩子链构建路由
pub fn build_test_app_with_hooks(pool: PgPool, sample_hooks: SampleHookChain) -> Router {
    let config = test_config();
    create_app(AppState::with_hooks(
        Some(Database::from_pool(pool)),
        sample_hooks,
        UserHookChain::with_defaults(&config.notification),
        config,
    ))
}

/// 发送请求，返回状态码与 JSON 响应体
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

pub async fn get(app: &Router, uri: &str, token: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post(app: &Router, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put(app: &Router, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn patch(app: &Router, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

pub async fn delete(app: &Router, uri: &str, token: &str) -> (StatusCode, Value) {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// 通过 API 注册用户
pub async fn register(app: &Router, username: &str) -> Value {
    let (status, json) = send(
        app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({
            "username": username,
            "email": format!("{username}@lab.example"),
            "password": PASSWORD,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "register failed: {json}");
    json["data"].clone()
}

/// 通过 API 登录并返回访问令牌
pub async fn login(app: &Router, username: &str) -> String {
    let (status, json) = send(
        app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "username": username, "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {json}");
    json["data"]["access_token"].as_str().unwrap().to_string()
}

/// 注册并登录，返回访问令牌
pub async fn register_and_login(app: &Router, username: &str) -> String {
    register(app, username).await;
    login(app, username).await
}

/// 创建样本，返回样本数据
pub async fn create_sample(app: &Router, token: &str, sample_id: &str, name: &str) -> Value {
    let (status, json) = post(
        app,
        "/api/samples",
        token,
        json!({ "sample_id": sample_id, "name": name }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "create sample failed: {json}");
    json["data"].clone()
}

/// 通过用户仓库删除用户
pub async fn delete_user(pool: &PgPool, username: &str) {
    let users = UserRepository::new(Database::from_pool(pool.clone()));
    let user = users
        .find_by_username(username)
        .await
        .unwrap()
        .expect("user exists");
    assert!(users.delete(user.id).await.unwrap());
    assert!(!users.delete(user.id).await.unwrap());
}

pub fn id_of(value: &Value) -> String {
    value["id"].as_str().unwrap().to_string()
}

pub fn actions(sample: &Value) -> Vec<String> {
    sample["audit_logs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["action"].as_str().unwrap().to_string())
        .collect()
}
